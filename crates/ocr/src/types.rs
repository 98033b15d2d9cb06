use serde::{Deserialize, Serialize};

/// Candidate fields found in recognized text. `None` means "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFields {
    pub amount: Option<String>,
    pub date: Option<String>,
}

/// Output of one receipt scan, used once to pre-fill an expense form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub raw_text: String,
    /// Decimal as it appeared in the text, e.g. `"450.00"`.
    pub amount: Option<String>,
    /// `YYYY-MM-DD`-shaped, not guaranteed to be a real date.
    pub date: Option<String>,
}

impl ExtractionResult {
    pub fn new(raw_text: String, fields: ParsedFields) -> Self {
        Self { raw_text, amount: fields.amount, date: fields.date }
    }
}
