use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// A book-like word followed by `chapter:verse[-verse]` at the very end.
    static ref TRAILING_CITATION_RE: Regex =
        Regex::new(r"\s+[\p{L}’'`-]+\s?\d+:\d+(?:-\d+)?$").expect("trailing citation regex");
}

/// A scripture verse as shown on the card.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Verse {
    pub reference: String,
    pub text: String,
}

impl Verse {
    /// Parses `"<reference>|<verse text>"`.
    ///
    /// Only the first `|` separates. Without a delimiter the whole input is
    /// the text and the reference is empty. A citation the model repeats at
    /// the end of the text is removed.
    pub fn parse(raw: &str) -> Self {
        let (reference, text) = match raw.split_once('|') {
            Some((reference, text)) => (reference.trim(), text.trim()),
            None => ("", raw.trim()),
        };

        Self {
            reference: reference.to_string(),
            text: strip_trailing_citation(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reference.trim().is_empty() && self.text.trim().is_empty()
    }
}

/// Removes a trailing `Book 1:2` style citation from verse text.
pub fn strip_trailing_citation(text: &str) -> String {
    TRAILING_CITATION_RE.replace(text, "").trim().to_string()
}
