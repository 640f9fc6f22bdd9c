use serde::{Deserialize, Serialize};

/// Blessing shown until the user writes or generates their own.
pub const DEFAULT_MESSAGE: &str = "May the warmth of the Gena bonfire, the hum of coffee ceremony, and the rhythm of Ethiopian drums fill every corner of your home this season.";

/// Placeholder recipient ("name") the form starts with.
pub const DEFAULT_RECIPIENT: &str = "ስም";

/// Recipient used in share text and file names when none is set.
pub const FALLBACK_RECIPIENT: &str = "friend";

pub const DEFAULT_VERSE_REFERENCE: &str = "Luke 2:10-11";

pub const DEFAULT_VERSE_TEXT: &str = "\"Fear not, for behold, I bring you good news of great joy... For unto you is born this day in the city of David a Savior, who is Christ the Lord.\"";

/// Text content of a card.
///
/// A session holds two of these: the draft bound to the form and the
/// committed copy that is rendered, shared and exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardContent {
    pub recipient: String,
    pub message: String,
    pub verse_reference: String,
    pub verse_text: String,
}

impl CardContent {
    /// Initial form state. Verse fields start blank so the user can opt in.
    pub fn initial_draft() -> Self {
        Self {
            recipient: DEFAULT_RECIPIENT.to_string(),
            message: DEFAULT_MESSAGE.to_string(),
            verse_reference: String::new(),
            verse_text: String::new(),
        }
    }

    /// Initial preview state. Every field is renderable.
    pub fn initial_committed() -> Self {
        Self {
            recipient: DEFAULT_RECIPIENT.to_string(),
            message: DEFAULT_MESSAGE.to_string(),
            verse_reference: DEFAULT_VERSE_REFERENCE.to_string(),
            verse_text: DEFAULT_VERSE_TEXT.to_string(),
        }
    }

    /// Recipient for display, falling back to [`FALLBACK_RECIPIENT`].
    pub fn display_recipient(&self) -> &str {
        non_blank(&self.recipient).unwrap_or(FALLBACK_RECIPIENT)
    }

    /// Message for display, falling back to [`DEFAULT_MESSAGE`].
    pub fn display_message(&self) -> &str {
        non_blank(&self.message).unwrap_or(DEFAULT_MESSAGE)
    }

    /// True when every field holds non-blank text.
    pub fn is_renderable(&self) -> bool {
        [
            &self.recipient,
            &self.message,
            &self.verse_reference,
            &self.verse_text,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

/// Returns the trimmed value, or `None` when it is blank.
pub fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Where the card artwork comes from. The last action wins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ImageSelection {
    #[default]
    None,
    /// `data:` URL produced from a local upload.
    Uploaded(String),
    /// Remote URL or local path typed by the user or picked from the built-ins.
    Url(String),
}

/// Height of the artwork area inside the card, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHeight(u32);

impl ImageHeight {
    pub const MIN: u32 = 140;
    pub const MAX: u32 = 320;
    pub const STEP: u32 = 8;

    /// Clamps into range and snaps to the slider step.
    pub fn new(px: u32) -> Self {
        let clamped = px.clamp(Self::MIN, Self::MAX);
        let steps = (clamped - Self::MIN + Self::STEP / 2) / Self::STEP;
        Self((Self::MIN + steps * Self::STEP).min(Self::MAX))
    }

    pub fn px(self) -> u32 {
        self.0
    }
}

impl Default for ImageHeight {
    fn default() -> Self {
        Self(192)
    }
}

/// Artwork bundled with the app, relative to the assets directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltInImage {
    pub label: &'static str,
    pub path: &'static str,
}

pub const BUILT_IN_IMAGES: &[BuiltInImage] = &[
    BuiltInImage {
        label: "Image 1",
        path: "images/image-1.png",
    },
    BuiltInImage {
        label: "Image 2",
        path: "images/image-2.png",
    },
    BuiltInImage {
        label: "Image 3",
        path: "images/image-3.png",
    },
    BuiltInImage {
        label: "Image 4",
        path: "images/image-4.png",
    },
];
