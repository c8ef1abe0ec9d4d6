use worklens_core::Lang;

/// Map an ISO 3166-1 alpha-2 country code to a site language.
///
/// Total function: Japan reads Japanese; the Chinese-speaking markets
/// (mainland China, Hong Kong, Taiwan, Singapore) read Chinese;
/// everywhere else defaults to English.
pub fn country_to_lang(code: &str) -> Lang {
    match code {
        "JP" => Lang::Ja,
        "CN" | "HK" | "TW" | "SG" => Lang::Zh,
        _ => Lang::En,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_is_exact() {
        assert_eq!(country_to_lang("JP"), Lang::Ja);
        for code in ["CN", "HK", "TW", "SG"] {
            assert_eq!(country_to_lang(code), Lang::Zh, "{}", code);
        }
        for code in ["US", "GB", "DE", "KR", "FR", "BR", "", "XX", "jp", "cn"] {
            assert_eq!(country_to_lang(code), Lang::En, "{:?}", code);
        }
    }
}
