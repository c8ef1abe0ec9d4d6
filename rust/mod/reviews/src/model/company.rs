use serde::{Deserialize, Serialize};

use worklens_core::Lang;

/// Company — a reviewed employer. PK = id; `slug` is the URL handle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,

    /// Canonical (English) name.
    pub name: String,

    /// Localized names; empty means "use the canonical name".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ja: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_zh: Option<String>,

    /// URL slug — unique, lowercase.
    pub slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Count of published reviews. Maintained by the service on every
    /// review insert.
    #[serde(default)]
    pub review_count: u64,

    /// Mean rating over published reviews, 0.0 when unreviewed.
    #[serde(default)]
    pub avg_rating: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_at: Option<String>,
}

impl Company {
    /// Display name for a language, falling back to the canonical name.
    pub fn display_name(&self, lang: Lang) -> &str {
        let localized = match lang {
            Lang::Ja => self.name_ja.as_deref(),
            Lang::Zh => self.name_zh.as_deref(),
            Lang::En => None,
        };
        match localized {
            Some(s) if !s.is_empty() => s,
            _ => &self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company() -> Company {
        Company {
            id: "c1".into(),
            name: "Acme Robotics".into(),
            name_ja: Some("アクメロボティクス".into()),
            name_zh: None,
            slug: "acme-robotics".into(),
            industry: Some("manufacturing".into()),
            location: None,
            description: None,
            review_count: 0,
            avg_rating: 0.0,
            create_at: None,
            update_at: None,
        }
    }

    #[test]
    fn display_name_falls_back_to_canonical() {
        let c = company();
        assert_eq!(c.display_name(Lang::Ja), "アクメロボティクス");
        assert_eq!(c.display_name(Lang::Zh), "Acme Robotics");
        assert_eq!(c.display_name(Lang::En), "Acme Robotics");
    }

    #[test]
    fn empty_localized_name_falls_back() {
        let mut c = company();
        c.name_ja = Some(String::new());
        assert_eq!(c.display_name(Lang::Ja), "Acme Robotics");
    }
}
