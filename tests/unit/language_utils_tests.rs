/*!
 * Tests for language utility functions
 */

use rpgtl::language_utils::{
    get_language_name, language_codes_match, normalize_to_part2t, provider_code, provider_codes_match,
};

/// Test normalization of language codes
#[test]
fn test_normalize_to_part2t_withVariousCodes_shouldNormalize() {
    assert_eq!(normalize_to_part2t("it").unwrap(), "ita");
    assert_eq!(normalize_to_part2t("ita").unwrap(), "ita");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("FR").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("pt-BR").unwrap(), "por");
    assert!(normalize_to_part2t("xx").is_err());
    assert!(normalize_to_part2t("").is_err());
}

/// Provider codes are two letters when possible, region kept
#[test]
fn test_provider_code_withVariousCodes_shouldPreferShortForm() {
    assert_eq!(provider_code("ita").unwrap(), "it");
    assert_eq!(provider_code("en").unwrap(), "en");
    assert_eq!(provider_code("fre").unwrap(), "fr");
    assert_eq!(provider_code("zh-cn").unwrap(), "zh-CN");
    assert_eq!(provider_code("pt_br").unwrap(), "pt-BR");
    assert!(provider_code("klingon").is_err());
}

/// Test language code matching
#[test]
fn test_language_codes_match_withEquivalentCodes_shouldMatch() {
    assert!(language_codes_match("it", "ita"));
    assert!(language_codes_match("de", "ger"));
    assert!(language_codes_match("zh-CN", "chi"));
    assert!(!language_codes_match("it", "en"));
    assert!(!language_codes_match("it", "zz"));
}

/// Regional variants are distinct provider languages
#[test]
fn test_provider_codes_match_withRegionalVariants_shouldKeepThemApart() {
    assert!(provider_codes_match("it", "ita"));
    assert!(provider_codes_match("zh-CN", "zh_cn"));
    assert!(!provider_codes_match("zh-CN", "zh-TW"));
    assert!(!provider_codes_match("zh", "zh-CN"));
    assert!(!provider_codes_match("it", "zz"));
}

/// Test language names
#[test]
fn test_get_language_name_withValidCodes_shouldReturnEnglishName() {
    assert_eq!(get_language_name("it").unwrap(), "Italian");
    assert_eq!(get_language_name("eng").unwrap(), "English");
    assert_eq!(get_language_name("ja").unwrap(), "Japanese");
    assert!(get_language_name("??").is_err());
}
