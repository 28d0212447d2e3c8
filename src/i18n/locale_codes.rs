/// Locale codes offered by `searchLocaleCodes`.
pub const LOCALE_CODES: &[&str] = &[
    "af", "af-NA", "af-ZA", "am", "am-ET", "ar", "ar-AE", "ar-BH", "ar-DZ", "ar-EG", "ar-IQ",
    "ar-JO", "ar-KW", "ar-LB", "ar-LY", "ar-MA", "ar-OM", "ar-QA", "ar-SA", "ar-SY", "ar-TN",
    "ar-YE", "az", "az-AZ", "be", "be-BY", "bg", "bg-BG", "bn", "bn-BD", "bn-IN", "bs", "bs-BA",
    "ca", "ca-ES", "cs", "cs-CZ", "cy", "cy-GB", "da", "da-DK", "de", "de-AT", "de-CH", "de-DE",
    "de-LI", "de-LU", "el", "el-CY", "el-GR", "en", "en-AU", "en-CA", "en-GB", "en-IE", "en-IN",
    "en-NZ", "en-PH", "en-SG", "en-US", "en-ZA", "es", "es-AR", "es-BO", "es-CL", "es-CO",
    "es-CR", "es-DO", "es-EC", "es-ES", "es-GT", "es-HN", "es-MX", "es-NI", "es-PA", "es-PE",
    "es-PR", "es-PY", "es-SV", "es-US", "es-UY", "es-VE", "et", "et-EE", "eu", "eu-ES", "fa",
    "fa-IR", "fi", "fi-FI", "fil", "fil-PH", "fr", "fr-BE", "fr-CA", "fr-CH", "fr-FR", "fr-LU",
    "fr-MC", "ga", "ga-IE", "gl", "gl-ES", "gu", "gu-IN", "he", "he-IL", "hi", "hi-IN", "hr",
    "hr-HR", "hu", "hu-HU", "hy", "hy-AM", "id", "id-ID", "is", "is-IS", "it", "it-CH", "it-IT",
    "ja", "ja-JP", "ka", "ka-GE", "kk", "kk-KZ", "km", "km-KH", "kn", "kn-IN", "ko", "ko-KR",
    "lo", "lo-LA", "lt", "lt-LT", "lv", "lv-LV", "mk", "mk-MK", "ml", "ml-IN", "mn", "mn-MN",
    "mr", "mr-IN", "ms", "ms-MY", "mt", "mt-MT", "my", "my-MM", "nb", "nb-NO", "ne", "ne-NP",
    "nl", "nl-BE", "nl-NL", "nn", "nn-NO", "pa", "pa-IN", "pl", "pl-PL", "pt", "pt-AO", "pt-BR",
    "pt-PT", "ro", "ro-MD", "ro-RO", "ru", "ru-RU", "ru-UA", "si", "si-LK", "sk", "sk-SK", "sl",
    "sl-SI", "sq", "sq-AL", "sr", "sr-RS", "sv", "sv-FI", "sv-SE", "sw", "sw-KE", "sw-TZ", "ta",
    "ta-IN", "ta-LK", "te", "te-IN", "th", "th-TH", "tr", "tr-TR", "uk", "uk-UA", "ur", "ur-IN",
    "ur-PK", "uz", "uz-UZ", "vi", "vi-VN", "zh", "zh-CN", "zh-HK", "zh-SG", "zh-TW", "zu",
    "zu-ZA",
];

/// Codes containing `search`, ignoring case. An empty search matches all.
pub fn search_locale_codes(search: Option<&str>) -> Vec<String> {
    let query = search.unwrap_or_default().to_lowercase();
    LOCALE_CODES
        .iter()
        .filter(|code| code.to_lowercase().contains(&query))
        .map(|code| code.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_ignores_case() {
        let found = search_locale_codes(Some("EN-u"));
        assert!(found.contains(&"en-US".to_string()));
        assert!(found.iter().all(|c| c.to_lowercase().contains("en-u")));
    }

    #[test]
    fn empty_search_returns_everything() {
        assert_eq!(search_locale_codes(None).len(), LOCALE_CODES.len());
    }
}
