//! Heuristic field extraction from recognized receipt text.
//!
//! Both fields are first-match-wins in order of appearance. The parser has
//! no notion of which amount is the total (a subtotal printed earlier wins),
//! does not strip currency symbols or thousands separators (`1,234.50`
//! yields `234.50`), and does not check that a date exists on the calendar.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::ParsedFields;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_amount, r"\d+\.\d{2}");
re!(re_iso_date, r"\d{4}-\d{2}-\d{2}");

// ── Public parsing API ───────────────────────────────────────────────────────

pub struct FieldParser;

impl FieldParser {
    /// Extract the candidate amount and date from recognized text.
    pub fn parse(text: &str) -> ParsedFields {
        ParsedFields {
            amount: Self::amount(text).map(str::to_string),
            date: Self::date(text).map(str::to_string),
        }
    }

    /// First `<digits>.<two digits>` substring, verbatim.
    pub fn amount(text: &str) -> Option<&str> {
        re_amount().find(text).map(|m| m.as_str())
    }

    /// First `YYYY-MM-DD`-shaped substring, verbatim.
    pub fn date(text: &str) -> Option<&str> {
        re_iso_date().find(text).map(|m| m.as_str())
    }
}
