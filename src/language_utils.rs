use anyhow::{Result, anyhow};
use isolang::Language;

// @module: ISO 639 language code handling
//
// The recognizer reports and accepts two-letter codes, so every code the user
// supplies is normalized to ISO 639-1 when one exists and to ISO 639-2/T otherwise.

/// ISO 639-2/B codes whose 639-2/T form differs
const BIBLIOGRAPHIC_CODES: [(&str, &str); 18] = [
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("dut", "nld"),
    ("fre", "fra"),
    ("geo", "kat"),
    ("ger", "deu"),
    ("gre", "ell"),
    ("ice", "isl"),
    ("mac", "mkd"),
    ("may", "msa"),
    ("per", "fas"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Resolves a two- or three-letter code to its language
fn lookup(code: &str) -> Option<Language> {
    let code = code.trim().to_lowercase();
    match code.len() {
        2 => Language::from_639_1(&code),
        3 => {
            let terminology = BIBLIOGRAPHIC_CODES
                .iter()
                .find(|(bibliographic, _)| *bibliographic == code)
                .map_or(code.as_str(), |(_, terminology)| terminology);
            Language::from_639_3(terminology)
        }
        _ => None,
    }
}

/// Fails unless `code` is a known ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<()> {
    lookup(code)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// ISO 639-1 code when the language has one, ISO 639-2/T otherwise
pub fn normalize_language_code(code: &str) -> Result<String> {
    let language = lookup(code)
        .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))?;

    Ok(language
        .to_639_1()
        .map_or_else(|| language.to_639_3().to_string(), str::to_string))
}

/// Whether two codes name the same language ("fr", "fra" and "fre" all match)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (lookup(code1), lookup(code2)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// English name of the language, used in translation prompts
pub fn get_language_name(code: &str) -> Result<String> {
    lookup(code)
        .map(|language| language.to_name().to_string())
        .ok_or_else(|| anyhow!("Unknown language code: {}", code))
}
