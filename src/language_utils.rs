//! Language utilities for ISO language code handling
//!
//! Game projects name their languages loosely: `it`, `ita`, `ger`, `zh-CN`.
//! Providers want something narrower (the google endpoint only takes
//! ISO 639-1 with an optional region), so codes are normalized here once.

use anyhow::{anyhow, Result};
use isolang::Language;

/// ISO 639-2/B codes that differ from their 639-2/T form
const BIBLIOGRAPHIC_CODES: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Split `zh-CN` / `pt_BR` into the base code and the optional region
fn split_region(code: &str) -> (String, Option<String>) {
    let trimmed = code.trim();
    match trimmed.split_once(['-', '_']) {
        Some((base, region)) if !region.is_empty() => {
            (base.to_lowercase(), Some(region.to_uppercase()))
        }
        _ => (trimmed.to_lowercase(), None),
    }
}

fn lookup(base: &str) -> Option<Language> {
    match base.len() {
        2 => Language::from_639_1(base),
        3 => {
            let part2t = BIBLIOGRAPHIC_CODES
                .iter()
                .find(|(b, _)| *b == base)
                .map(|(_, t)| *t)
                .unwrap_or(base);
            Language::from_639_3(part2t)
        }
        _ => None,
    }
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let (base, _) = split_region(code);
    lookup(&base)
        .map(|lang| lang.to_639_3().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Code to send to a translation provider: ISO 639-1 when one exists,
/// with the region kept (`zh-CN`), otherwise the 3-letter code
pub fn provider_code(code: &str) -> Result<String> {
    let (base, region) = split_region(code);
    let lang = lookup(&base).ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
    let short = lang
        .to_639_1()
        .map(|c| c.to_string())
        .unwrap_or_else(|| lang.to_639_3().to_string());

    Ok(match region {
        Some(region) => format!("{}-{}", short, region),
        None => short,
    })
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Check if two codes name the same provider language. Unlike
/// [`language_codes_match`] the region counts: `zh-CN` and `zh-TW` differ.
pub fn provider_codes_match(code1: &str, code2: &str) -> bool {
    match (provider_code(code1), provider_code(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let (base, _) = split_region(code);
    lookup(&base)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}
