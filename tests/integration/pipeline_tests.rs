/*!
 * End-to-end tests of the media to artifact pipeline with mock collaborators
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use captionsmith::app_config::Config;
use captionsmith::app_controller::{Controller, ItemOutcome};
use captionsmith::formats::OutputFormat;
use captionsmith::output::{ExistsPolicy, SkipScope};
use captionsmith::providers::Translator;
use crate::common;
use crate::common::mock_collaborators::{MockRecognizer, MockTranslator};

fn controller_for(config: Config, recognizer: MockRecognizer, translator: Option<Arc<MockTranslator>>) -> Controller {
    Controller::with_collaborators(
        config,
        Arc::new(recognizer),
        translator.map(|t| t as Arc<dyn Translator>),
    )
}

fn translating_config(format: OutputFormat) -> Config {
    let mut config = Config {
        source_language: Some("en".to_string()),
        target_language: Some("fr".to_string()),
        ..Config::default()
    };
    config.output.format = format;
    config.output.language_suffix = true;
    config.output.export_all = true;
    config
}

/// Test that a media file produces its lyric artifact next to it
#[test]
fn test_run_withSingleFile_shouldWriteArtifact() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let media = common::create_test_file(&temp_dir.path().to_path_buf(), "song.mp3", "audio")?;
    let controller = controller_for(Config::default(), MockRecognizer::new(common::sample_transcription()), None);

    let outcome = tokio_test::block_on(controller.run(&media))?;

    let expected = temp_dir.path().join("song.lrc");
    assert_eq!(outcome, ItemOutcome::Written(vec![expected.clone()]));
    assert_eq!(fs::read_to_string(&expected)?, "[00:00.00]Hello world\n[00:03.00]Second line\n");
    Ok(())
}

/// Test that a missing media file is rejected before recognition
#[test]
fn test_run_withMissingFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let recognizer = MockRecognizer::new(common::sample_transcription());
    let calls = recognizer.calls();
    let controller = controller_for(Config::default(), recognizer, None);

    let result = tokio_test::block_on(controller.run(&temp_dir.path().join("missing.mp3")));

    assert!(result.is_err());
    assert!(calls.lock().unwrap().is_empty());
    Ok(())
}

/// Test that the skip policy leaves an existing artifact untouched
#[test]
fn test_run_withExistingArtifactAndSkip_shouldReportSkipped() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let media = common::create_test_file(&dir, "song.mp3", "audio")?;
    let existing = common::create_test_file(&dir, "song.lrc", "keep me")?;
    let controller = controller_for(Config::default(), MockRecognizer::new(common::sample_transcription()), None);

    let outcome = tokio_test::block_on(controller.run(&media))?;

    assert_eq!(outcome, ItemOutcome::Skipped(existing.clone()));
    assert_eq!(fs::read_to_string(&existing)?, "keep me");
    Ok(())
}

/// Test that the rename policy writes next to an existing artifact
#[test]
fn test_run_withExistingArtifactAndRename_shouldWriteNumberedFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let media = common::create_test_file(&dir, "song.mp3", "audio")?;
    common::create_test_file(&dir, "song.srt", "keep me")?;

    let mut config = Config::default();
    config.output.format = OutputFormat::Srt;
    config.output.exists = ExistsPolicy::Rename;
    let controller = controller_for(config, MockRecognizer::new(common::sample_transcription()), None);

    let outcome = tokio_test::block_on(controller.run(&media))?;

    let renamed = dir.join("song_1.srt");
    assert_eq!(outcome, ItemOutcome::Written(vec![renamed.clone()]));
    assert!(fs::read_to_string(&renamed)?.starts_with("1\n00:00:00,000 --> "));
    assert_eq!(fs::read_to_string(dir.join("song.srt"))?, "keep me");
    Ok(())
}

/// Test that export-all writes the translation first, then the transcription
#[test]
fn test_run_withTranslationAndExportAll_shouldWriteBothArtifacts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let media = common::create_test_file(&dir, "talk.mp4", "video")?;
    let translator = Arc::new(MockTranslator::new());
    let controller = controller_for(
        translating_config(OutputFormat::Txt),
        MockRecognizer::new(common::sample_transcription()),
        Some(Arc::clone(&translator)),
    );

    let outcome = tokio_test::block_on(controller.run(&media))?;

    let translated = dir.join("talk.fr.txt");
    let original = dir.join("talk.en.txt");
    assert_eq!(outcome, ItemOutcome::Written(vec![translated.clone(), original.clone()]));
    assert_eq!(fs::read_to_string(&translated)?, "[fr] Hello world\n[fr] Second line");
    assert_eq!(fs::read_to_string(&original)?, "Hello world\nSecond line");
    assert_eq!(translator.call_count(), 1);
    Ok(())
}

/// Test that translation is skipped when the target is the detected language
#[test]
fn test_run_withTargetEqualToDetectedLanguage_shouldSkipTranslation() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let media = common::create_test_file(&temp_dir.path().to_path_buf(), "talk.mp4", "video")?;
    let translator = Arc::new(MockTranslator::new());

    let mut config = Config {
        target_language: Some("eng".to_string()),
        ..Config::default()
    };
    config.output.format = OutputFormat::Txt;
    let controller = controller_for(config, MockRecognizer::new(common::sample_transcription()), Some(Arc::clone(&translator)));

    let outcome = tokio_test::block_on(controller.run(&media))?;

    assert_eq!(outcome, ItemOutcome::Written(vec![temp_dir.path().join("talk.txt")]));
    assert_eq!(translator.call_count(), 0);
    Ok(())
}

/// Test that a requested translation without a translator fails the item
#[test]
fn test_run_withTargetButNoTranslator_shouldFailItem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let media = common::create_test_file(&temp_dir.path().to_path_buf(), "talk.mp4", "video")?;
    let controller = controller_for(translating_config(OutputFormat::Lrc), MockRecognizer::new(common::sample_transcription()), None);

    let outcome = tokio_test::block_on(controller.run(&media))?;

    assert!(matches!(outcome, ItemOutcome::Failed(_)));
    assert!(!temp_dir.path().join("talk.en.lrc").exists());
    Ok(())
}

/// Test that an item-scoped skip drops the remaining artifacts of the item
#[test]
fn test_run_withItemSkipScope_shouldSkipRemainingArtifacts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let media = common::create_test_file(&dir, "talk.mp4", "video")?;
    let existing = common::create_test_file(&dir, "talk.fr.lrc", "keep me")?;

    let mut config = translating_config(OutputFormat::Lrc);
    config.output.skip_scope = SkipScope::Item;
    let controller = controller_for(config, MockRecognizer::new(common::sample_transcription()), Some(Arc::new(MockTranslator::new())));

    let outcome = tokio_test::block_on(controller.run(&media))?;

    assert_eq!(outcome, ItemOutcome::Skipped(existing));
    assert!(!dir.join("talk.en.lrc").exists());
    Ok(())
}

/// Test that an artifact-scoped skip still writes the other artifacts
#[test]
fn test_run_withArtifactSkipScope_shouldWriteOtherArtifacts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let media = common::create_test_file(&dir, "talk.mp4", "video")?;
    common::create_test_file(&dir, "talk.fr.lrc", "keep me")?;

    let mut config = translating_config(OutputFormat::Lrc);
    config.output.skip_scope = SkipScope::Artifact;
    let controller = controller_for(config, MockRecognizer::new(common::sample_transcription()), Some(Arc::new(MockTranslator::new())));

    let outcome = tokio_test::block_on(controller.run(&media))?;

    assert_eq!(outcome, ItemOutcome::Written(vec![dir.join("talk.en.lrc")]));
    assert_eq!(fs::read_to_string(dir.join("talk.fr.lrc"))?, "keep me");
    Ok(())
}

/// Test that a failing second write names the artifact already written
#[test]
fn test_run_withSecondWriteFailing_shouldReportWrittenArtifact() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let media = common::create_test_file(&dir, "talk.mp4", "video")?;
    let blocked = dir.join("talk.en.txt");
    fs::create_dir(&blocked)?;
    common::create_test_file(&blocked, "keep", "me")?;

    let mut config = translating_config(OutputFormat::Txt);
    config.output.exists = ExistsPolicy::Overwrite;
    let controller = controller_for(config, MockRecognizer::new(common::sample_transcription()), Some(Arc::new(MockTranslator::new())));

    let outcome = tokio_test::block_on(controller.run(&media))?;

    let translated = dir.join("talk.fr.txt");
    match outcome {
        ItemOutcome::Failed(message) => assert!(message.contains(&translated.display().to_string())),
        other => panic!("expected a failed outcome, got {:?}", other),
    }
    assert_eq!(fs::read_to_string(&translated)?, "[fr] Hello world\n[fr] Second line");
    assert!(blocked.is_dir());
    Ok(())
}

/// Test that one failing item does not stop the batch
#[test]
fn test_run_folder_withFailingItem_shouldContinueWithOthers() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    for name in ["a.mp3", "b_broken.mp3", "c.wav", "notes.txt"] {
        common::create_test_file(&dir, name, "data")?;
    }
    let recognizer = MockRecognizer::new(common::sample_transcription()).failing_on("broken");
    let calls = recognizer.calls();
    let controller = controller_for(Config::default(), recognizer, None);

    let summary = tokio_test::block_on(controller.run_folder(&dir, None))?;

    assert_eq!(summary.written, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 0);
    assert!(!summary.cancelled);
    let seen: Vec<PathBuf> = calls.lock().unwrap().clone();
    assert_eq!(seen, vec![dir.join("a.mp3"), dir.join("b_broken.mp3"), dir.join("c.wav")]);
    assert!(dir.join("a.lrc").exists());
    assert!(!dir.join("b_broken.lrc").exists());
    assert!(dir.join("c.lrc").exists());
    Ok(())
}

/// Test that a cancelled batch stops before the next item
#[test]
fn test_run_folder_withCancelFlagSet_shouldStopBeforeFirstItem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_file(&dir, "a.mp3", "data")?;
    common::create_test_file(&dir, "b.mp3", "data")?;
    let recognizer = MockRecognizer::new(common::sample_transcription());
    let calls = recognizer.calls();
    let controller = controller_for(Config::default(), recognizer, None);

    controller.cancel_flag().store(true, Ordering::SeqCst);
    let summary = tokio_test::block_on(controller.run_folder(&dir, None))?;

    assert!(summary.cancelled);
    assert_eq!(summary.total(), 0);
    assert!(calls.lock().unwrap().is_empty());
    Ok(())
}

/// Test that a folder without media is an error
#[test]
fn test_run_folder_withNoMedia_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(&temp_dir.path().to_path_buf(), "notes.txt", "text")?;
    let controller = controller_for(Config::default(), MockRecognizer::new(common::sample_transcription()), None);

    assert!(tokio_test::block_on(controller.run_folder(temp_dir.path(), None)).is_err());
    Ok(())
}
