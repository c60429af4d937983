/*!
 * Tests for ISO language code utilities
 */

use anyhow::Result;
use captionsmith::language_utils::{
    get_language_name, language_codes_match, normalize_language_code, validate_language_code,
};

/// Test that two- and three-letter codes are accepted
#[test]
fn test_validate_language_code_withKnownCodes_shouldSucceed() {
    assert!(validate_language_code("en").is_ok());
    assert!(validate_language_code("fra").is_ok());
    assert!(validate_language_code("ger").is_ok());
    assert!(validate_language_code(" ES ").is_ok());
}

/// Test that unknown codes and other lengths are rejected
#[test]
fn test_validate_language_code_withUnknownCodes_shouldFail() {
    assert!(validate_language_code("xx").is_err());
    assert!(validate_language_code("english").is_err());
    assert!(validate_language_code("").is_err());
}

/// Test that codes normalize to ISO 639-1 when one exists
#[test]
fn test_normalize_language_code_withThreeLetterCode_shouldReturnTwoLetterCode() -> Result<()> {
    assert_eq!(normalize_language_code("fra")?, "fr");
    assert_eq!(normalize_language_code("fre")?, "fr");
    assert_eq!(normalize_language_code("EN")?, "en");
    Ok(())
}

/// Test that different spellings of one language match
#[test]
fn test_language_codes_match_withEquivalentCodes_shouldReturnTrue() {
    assert!(language_codes_match("de", "deu"));
    assert!(language_codes_match("de", "ger"));
    assert!(!language_codes_match("de", "fr"));
    assert!(!language_codes_match("xx", "xx"));
}

/// Test that language names are resolved
#[test]
fn test_get_language_name_withKnownCode_shouldReturnName() -> Result<()> {
    assert_eq!(get_language_name("en")?, "English");
    assert!(get_language_name("zz").is_err());
    Ok(())
}
