use serde::{Deserialize, Serialize};

/// Review categories — one review page per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewCategory {
    Culture,
    WorkLife,
    Salary,
    Management,
    Career,
}

impl ReviewCategory {
    pub const ALL: [ReviewCategory; 5] = [
        ReviewCategory::Culture,
        ReviewCategory::WorkLife,
        ReviewCategory::Salary,
        ReviewCategory::Management,
        ReviewCategory::Career,
    ];

    pub fn parse(s: &str) -> Option<ReviewCategory> {
        match s {
            "culture" => Some(ReviewCategory::Culture),
            "work-life" => Some(ReviewCategory::WorkLife),
            "salary" => Some(ReviewCategory::Salary),
            "management" => Some(ReviewCategory::Management),
            "career" => Some(ReviewCategory::Career),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewCategory::Culture => "culture",
            ReviewCategory::WorkLife => "work-life",
            ReviewCategory::Salary => "salary",
            ReviewCategory::Management => "management",
            ReviewCategory::Career => "career",
        }
    }

    /// Translation key for the category label.
    pub fn label_key(&self) -> String {
        format!("category.{}", self.as_str())
    }
}

/// Review lifecycle status. Only published reviews are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    Published,
    Pending,
    Removed,
}

impl Default for ReviewStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Content visibility for review comments.
///
/// Anonymous visitors get `Preview` (masked comments); authenticated
/// users get `Full`. Title and rating are always visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Preview,
    Full,
}

/// Number of characters of a comment shown in preview mode.
const PREVIEW_CHARS: usize = 60;

/// Review — one employee review of a company in one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub company_id: String,
    pub category: ReviewCategory,

    /// Star rating, 1..=5.
    pub rating: u8,

    pub title: String,
    pub comment: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_status: Option<String>,

    #[serde(default)]
    pub status: ReviewStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
}

/// The reader-facing projection of a review, with the comment masked
/// or full depending on access level.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub id: String,
    pub category: ReviewCategory,
    pub rating: u8,
    pub title: String,
    pub comment: String,
    /// True when the comment was truncated for preview access.
    pub masked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
}

impl Review {
    /// Project this review for a reader with the given access level.
    pub fn visible_as(&self, level: AccessLevel) -> ReviewView {
        let (comment, masked) = match level {
            AccessLevel::Full => (self.comment.clone(), false),
            AccessLevel::Preview => mask_comment(&self.comment),
        };
        ReviewView {
            id: self.id.clone(),
            category: self.category,
            rating: self.rating,
            title: self.title.clone(),
            comment,
            masked,
            employment_status: self.employment_status.clone(),
            submitted_at: self.submitted_at.clone(),
        }
    }
}

/// Truncate on a character boundary so CJK comments mask cleanly.
fn mask_comment(comment: &str) -> (String, bool) {
    let mut chars = comment.char_indices();
    match chars.nth(PREVIEW_CHARS) {
        Some((byte_idx, _)) => {
            let mut out = comment[..byte_idx].to_string();
            out.push('…');
            (out, true)
        }
        None => (comment.to_string(), true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(comment: &str) -> Review {
        Review {
            id: "r1".into(),
            company_id: "c1".into(),
            category: ReviewCategory::Salary,
            rating: 4,
            title: "Decent pay".into(),
            comment: comment.into(),
            employment_status: Some("current".into()),
            status: ReviewStatus::Published,
            submitted_at: Some("2024-01-15T00:00:00Z".into()),
        }
    }

    #[test]
    fn category_parse_round_trip() {
        for cat in ReviewCategory::ALL {
            assert_eq!(ReviewCategory::parse(cat.as_str()), Some(cat));
        }
        assert_eq!(ReviewCategory::parse("benefits"), None);
        assert_eq!(ReviewCategory::parse(""), None);
    }

    #[test]
    fn category_label_keys() {
        assert_eq!(ReviewCategory::WorkLife.label_key(), "category.work-life");
    }

    #[test]
    fn full_access_shows_everything() {
        let long = "x".repeat(200);
        let view = review(&long).visible_as(AccessLevel::Full);
        assert_eq!(view.comment, long);
        assert!(!view.masked);
    }

    #[test]
    fn preview_truncates_long_comments() {
        let long = "a".repeat(200);
        let view = review(&long).visible_as(AccessLevel::Preview);
        assert!(view.masked);
        assert_eq!(view.comment.chars().count(), 61); // 60 + ellipsis
        assert!(view.comment.ends_with('…'));
        // Title and rating stay visible either way.
        assert_eq!(view.title, "Decent pay");
        assert_eq!(view.rating, 4);
    }

    #[test]
    fn preview_keeps_short_comments_but_flags_them() {
        let view = review("short").visible_as(AccessLevel::Preview);
        assert_eq!(view.comment, "short");
        assert!(view.masked);
    }

    #[test]
    fn preview_masks_on_char_boundaries() {
        let cjk = "残業が多いが給料は良い。".repeat(10);
        let view = review(&cjk).visible_as(AccessLevel::Preview);
        assert!(view.masked);
        assert_eq!(view.comment.chars().count(), 61);
        // Must not panic and must still be valid UTF-8 prefix.
        assert!(cjk.starts_with(view.comment.trim_end_matches('…')));
    }
}
