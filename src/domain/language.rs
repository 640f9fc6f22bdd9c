use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Script the generated text should be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguagePreference {
    /// Follow the language of the recipient and seed text.
    #[default]
    Auto,
    /// Always answer in Amharic (Ge'ez script).
    Amharic,
}

impl LanguagePreference {
    pub fn from_flag(prefer_amharic: bool) -> Self {
        if prefer_amharic {
            Self::Amharic
        } else {
            Self::Auto
        }
    }

    pub fn is_amharic(self) -> bool {
        matches!(self, Self::Amharic)
    }
}

impl fmt::Display for LanguagePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Amharic => write!(f, "amharic"),
        }
    }
}

impl FromStr for LanguagePreference {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "automatic" => Ok(Self::Auto),
            "amharic" | "am" => Ok(Self::Amharic),
            other => Err(format!("unknown language preference: {other}")),
        }
    }
}

/// Grammatical voice used for Amharic greetings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreetingVoice {
    #[default]
    Neutral,
    Feminine,
}

impl fmt::Display for GreetingVoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neutral => write!(f, "neutral"),
            Self::Feminine => write!(f, "feminine"),
        }
    }
}

impl FromStr for GreetingVoice {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neutral" => Ok(Self::Neutral),
            "feminine" | "female" => Ok(Self::Feminine),
            other => Err(format!("unknown greeting voice: {other}")),
        }
    }
}
