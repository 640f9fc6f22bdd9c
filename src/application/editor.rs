//! Draft/committed card state.

use crate::domain::{CardContent, Verse, non_blank};

/// Holds the form-bound draft and the committed copy the card renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardEditor {
    draft: CardContent,
    committed: CardContent,
}

impl Default for CardEditor {
    fn default() -> Self {
        Self {
            draft: CardContent::initial_draft(),
            committed: CardContent::initial_committed(),
        }
    }
}

impl CardEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &CardContent {
        &self.draft
    }

    pub fn committed(&self) -> &CardContent {
        &self.committed
    }

    pub fn set_recipient(&mut self, value: impl Into<String>) {
        self.draft.recipient = value.into();
    }

    pub fn set_message(&mut self, value: impl Into<String>) {
        self.draft.message = value.into();
    }

    pub fn set_verse_reference(&mut self, value: impl Into<String>) {
        self.draft.verse_reference = value.into();
    }

    pub fn set_verse_text(&mut self, value: impl Into<String>) {
        self.draft.verse_text = value.into();
    }

    /// Copies every non-blank draft field (trimmed) into the committed copy.
    ///
    /// Blank draft fields leave the committed value untouched. Returns
    /// whether the committed content changed.
    pub fn commit(&mut self) -> bool {
        let before = self.committed.clone();
        commit_field(&mut self.committed.recipient, &self.draft.recipient);
        commit_field(&mut self.committed.message, &self.draft.message);
        commit_field(
            &mut self.committed.verse_reference,
            &self.draft.verse_reference,
        );
        commit_field(&mut self.committed.verse_text, &self.draft.verse_text);
        self.committed != before
    }

    /// Writes a generated greeting into both copies and commits the recipient.
    pub fn apply_generated_greeting(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.draft.message = text.to_string();
        self.committed.message = text.to_string();
        commit_field(&mut self.committed.recipient, &self.draft.recipient);
    }

    /// Writes a parsed verse into the draft; committed fields keep their
    /// previous value where the verse is blank.
    pub fn apply_generated_verse(&mut self, verse: &Verse) {
        self.draft.verse_reference = verse.reference.trim().to_string();
        self.draft.verse_text = verse.text.trim().to_string();
        commit_field(
            &mut self.committed.verse_reference,
            &self.draft.verse_reference,
        );
        commit_field(&mut self.committed.verse_text, &self.draft.verse_text);
    }
}

fn commit_field(committed: &mut String, draft: &str) {
    if let Some(value) = non_blank(draft) {
        committed.clear();
        committed.push_str(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEFAULT_MESSAGE, DEFAULT_VERSE_REFERENCE, DEFAULT_VERSE_TEXT};

    #[test]
    fn commit_copies_trimmed_draft() {
        let mut editor = CardEditor::new();
        editor.set_recipient("  Selam ");
        editor.set_verse_reference("John 1:14");
        editor.set_verse_text("The Word became flesh");

        assert!(editor.commit());
        let committed = editor.committed();
        assert_eq!(committed.recipient, "Selam");
        assert_eq!(committed.message, DEFAULT_MESSAGE);
        assert_eq!(committed.verse_reference, "John 1:14");
        assert_eq!(committed.verse_text, "The Word became flesh");
    }

    #[test]
    fn commit_is_idempotent() {
        let mut editor = CardEditor::new();
        editor.set_recipient("Selam");
        editor.set_message("Peace to your home");
        editor.commit();
        let first = editor.committed().clone();

        assert!(!editor.commit());
        assert_eq!(editor.committed(), &first);
    }

    #[test]
    fn commit_never_blanks() {
        let mut editor = CardEditor::new();
        editor.set_recipient("Abel");
        editor.commit();

        editor.set_recipient("   ");
        editor.set_message("");
        editor.commit();

        assert_eq!(editor.committed().recipient, "Abel");
        assert_eq!(editor.committed().message, DEFAULT_MESSAGE);
        assert!(editor.committed().is_renderable());
    }

    #[test]
    fn blank_verse_draft_keeps_default_verse() {
        let mut editor = CardEditor::new();
        editor.commit();
        assert_eq!(editor.committed().verse_reference, DEFAULT_VERSE_REFERENCE);
        assert_eq!(editor.committed().verse_text, DEFAULT_VERSE_TEXT);
    }

    #[test]
    fn draft_edits_do_not_touch_committed_until_commit() {
        let mut editor = CardEditor::new();
        editor.set_message("Changed");
        assert_eq!(editor.committed().message, DEFAULT_MESSAGE);
        assert_eq!(editor.draft().message, "Changed");
    }

    #[test]
    fn generated_greeting_updates_both_copies() {
        let mut editor = CardEditor::new();
        editor.set_recipient("Hanna");
        editor.apply_generated_greeting(" Melkam Gena, Hanna! ");

        assert_eq!(editor.draft().message, "Melkam Gena, Hanna!");
        assert_eq!(editor.committed().message, "Melkam Gena, Hanna!");
        assert_eq!(editor.committed().recipient, "Hanna");
    }

    #[test]
    fn generated_verse_with_blank_reference_keeps_committed_reference() {
        let mut editor = CardEditor::new();
        editor.apply_generated_verse(&Verse {
            reference: String::new(),
            text: "Glory to God".into(),
        });

        assert_eq!(editor.draft().verse_reference, "");
        assert_eq!(editor.committed().verse_reference, DEFAULT_VERSE_REFERENCE);
        assert_eq!(editor.committed().verse_text, "Glory to God");
    }
}
