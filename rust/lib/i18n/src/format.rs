use chrono::{DateTime, NaiveDate};

use worklens_core::Lang;

/// Format an RFC 3339 timestamp (or bare `YYYY-MM-DD` date) for the
/// given language. Unparseable input comes back unchanged — a broken
/// date string must never break a page render.
pub fn format_date(input: &str, lang: Lang) -> String {
    let date = match parse_date(input) {
        Some(d) => d,
        None => return input.to_string(),
    };
    let pattern = match lang {
        Lang::En => "%b %-d, %Y",
        Lang::Ja | Lang::Zh => "%Y年%m月%d日",
    };
    date.format(pattern).to_string()
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

/// Comma-grouped integer rendering. All three site languages group by
/// thousands, so the output is language-independent.
pub fn format_number(n: i64) -> String {
    let negative = n < 0;
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if negative {
        format!("-{}", out)
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_per_language() {
        let ts = "2024-03-05T09:30:00+00:00";
        assert_eq!(format_date(ts, Lang::En), "Mar 5, 2024");
        assert_eq!(format_date(ts, Lang::Ja), "2024年03月05日");
        assert_eq!(format_date(ts, Lang::Zh), "2024年03月05日");
    }

    #[test]
    fn bare_date_accepted() {
        assert_eq!(format_date("2023-12-01", Lang::En), "Dec 1, 2023");
    }

    #[test]
    fn garbage_passes_through() {
        assert_eq!(format_date("not-a-date", Lang::En), "not-a-date");
        assert_eq!(format_date("", Lang::Ja), "");
    }

    #[test]
    fn number_grouping() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(-45000), "-45,000");
    }
}
