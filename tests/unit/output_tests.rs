/*!
 * Tests for output naming, collision handling and writing
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use captionsmith::formats::OutputFormat;
use captionsmith::output::{
    artifact_path, resolve_output_path, write_artifact, ExistsPolicy, LanguageTags, OutputLocks,
};
use captionsmith::transcript::TextSource;
use crate::common;

fn tags() -> LanguageTags {
    LanguageTags {
        source: None,
        detected: Some("en".to_string()),
        target: Some("fr".to_string()),
    }
}

/// Test that the media extension is replaced by the artifact extension
#[test]
fn test_artifact_path_withDottedStem_shouldReplaceLastExtensionOnly() {
    let media = PathBuf::from("/music/live.2024.mp3");

    assert_eq!(artifact_path(&media, None, OutputFormat::Srt), PathBuf::from("/music/live.2024.srt"));
    assert_eq!(artifact_path(&media, Some("de"), OutputFormat::Lrc), PathBuf::from("/music/live.2024.de.lrc"));
}

/// Test that the language suffix follows the text source
#[test]
fn test_resolve_output_path_withSuffix_shouldUseSourceOrTargetCode() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let media = temp_dir.path().join("talk.mp4");
    let locks = OutputLocks::new();

    let original = resolve_output_path(&media, &tags(), TextSource::Transcription, OutputFormat::Vtt, true, ExistsPolicy::Skip, &locks);
    let translated = resolve_output_path(&media, &tags(), TextSource::Translation, OutputFormat::Vtt, true, ExistsPolicy::Skip, &locks);

    assert_eq!(original.path, temp_dir.path().join("talk.en.vtt"));
    assert_eq!(translated.path, temp_dir.path().join("talk.fr.vtt"));
    Ok(())
}

/// Test that the overwrite policy replaces an existing artifact
#[test]
fn test_write_artifact_withOverwritePolicy_shouldReplaceContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let existing = common::create_test_file(&temp_dir.path().to_path_buf(), "song.lrc", "old")?;
    let locks = OutputLocks::new();

    let target = resolve_output_path(
        &temp_dir.path().join("song.mp3"),
        &LanguageTags::default(),
        TextSource::Transcription,
        OutputFormat::Lrc,
        false,
        ExistsPolicy::Overwrite,
        &locks,
    );
    assert_eq!(target.path, existing);
    assert!(target.should_write);

    write_artifact(&target, "[00:00.00]new\n", &locks)?;

    assert_eq!(fs::read_to_string(&existing)?, "[00:00.00]new\n");
    assert!(!locks.is_reserved(&existing));
    Ok(())
}

/// Test that two artifacts resolved before writing get distinct names under rename
#[test]
fn test_resolve_output_path_withPendingReservation_shouldPickNextName() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let media = temp_dir.path().join("song.mp3");
    let locks = OutputLocks::new();

    let first = resolve_output_path(&media, &LanguageTags::default(), TextSource::Transcription, OutputFormat::Txt, false, ExistsPolicy::Rename, &locks);
    let second = resolve_output_path(&media, &LanguageTags::default(), TextSource::Transcription, OutputFormat::Txt, false, ExistsPolicy::Rename, &locks);

    assert_eq!(first.path, temp_dir.path().join("song.txt"));
    assert_eq!(second.path, temp_dir.path().join("song_1.txt"));

    write_artifact(&first, "a", &locks)?;
    write_artifact(&second, "b", &locks)?;
    assert_eq!(fs::read_to_string(&second.path)?, "b");
    Ok(())
}

/// Test that a failed write still releases the reservation
#[test]
fn test_write_artifact_withUnwritableTarget_shouldFailAndRelease() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let blocker = common::create_test_file(&temp_dir.path().to_path_buf(), "blocker", "file")?;
    let media = blocker.join("song.mp3");
    let locks = OutputLocks::new();

    let target = resolve_output_path(&media, &LanguageTags::default(), TextSource::Transcription, OutputFormat::Json, false, ExistsPolicy::Skip, &locks);
    assert!(target.should_write);

    assert!(write_artifact(&target, "[]", &locks).is_err());
    assert!(!locks.is_reserved(&target.path));
    Ok(())
}
