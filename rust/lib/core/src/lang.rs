use serde::{Deserialize, Serialize};

/// Supported site languages.
///
/// Every locale-bearing input (query parameter, cookie, geolocation
/// result) is narrowed to this enum before it can influence a page.
/// Anything that is not exactly `en`, `ja` or `zh` is dropped, never
/// rejected with an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    Ja,
    Zh,
}

impl Default for Lang {
    fn default() -> Self {
        Self::En
    }
}

impl Lang {
    /// All supported languages, in display order.
    pub const ALL: [Lang; 3] = [Lang::En, Lang::Ja, Lang::Zh];

    /// Parse a candidate language code. Returns `None` for anything
    /// outside the allow-list — including well-formed BCP 47 tags like
    /// `en-US` and hostile input like script payloads.
    pub fn parse(s: &str) -> Option<Lang> {
        match s {
            "en" => Some(Lang::En),
            "ja" => Some(Lang::Ja),
            "zh" => Some(Lang::Zh),
            _ => None,
        }
    }

    /// Two-letter language code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ja => "ja",
            Lang::Zh => "zh",
        }
    }

    /// Full locale tag used for date/number formatting.
    pub fn locale_tag(&self) -> &'static str {
        match self {
            Lang::En => "en-US",
            Lang::Ja => "ja-JP",
            Lang::Zh => "zh-CN",
        }
    }

    /// Native display name, for the language switcher.
    pub fn native_name(&self) -> &'static str {
        match self {
            Lang::En => "English",
            Lang::Ja => "日本語",
            Lang::Zh => "中文",
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_allow_list() {
        assert_eq!(Lang::parse("en"), Some(Lang::En));
        assert_eq!(Lang::parse("ja"), Some(Lang::Ja));
        assert_eq!(Lang::parse("zh"), Some(Lang::Zh));
    }

    #[test]
    fn parse_rejects_everything_else() {
        for bad in [
            "",
            "EN",
            "en-US",
            "fr",
            "jp",
            "zh-TW",
            " en",
            "en ",
            "<script>alert(1)</script>",
            "en\"><img src=x>",
        ] {
            assert_eq!(Lang::parse(bad), None, "accepted {:?}", bad);
        }
    }

    #[test]
    fn default_is_english() {
        assert_eq!(Lang::default(), Lang::En);
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&Lang::Ja).unwrap();
        assert_eq!(json, "\"ja\"");
        let back: Lang = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Lang::Ja);
    }
}
