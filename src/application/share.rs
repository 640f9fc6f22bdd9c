use crate::domain::CardContent;
use reqwest::Url;

pub const SHARE_LINK: &str = "https://gena-card.vercel.app";
pub const SHARE_TITLE: &str = "Ethiopian Gena Card";

/// Text used for clipboard copies and share targets.
pub fn share_note(committed: &CardContent) -> String {
    format!(
        "ገና እንኳን ደስ አለዎት {}! {}",
        committed.display_recipient(),
        committed.display_message()
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareTarget {
    WhatsApp,
    Twitter,
    LinkedIn,
    Facebook,
}

impl ShareTarget {
    pub const ALL: [ShareTarget; 4] = [
        ShareTarget::WhatsApp,
        ShareTarget::Twitter,
        ShareTarget::LinkedIn,
        ShareTarget::Facebook,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::WhatsApp => "WhatsApp",
            Self::Twitter => "X / Twitter",
            Self::LinkedIn => "LinkedIn",
            Self::Facebook => "Facebook",
        }
    }

    /// Share-intent URL carrying the note, query-encoded.
    pub fn url(self, note: &str) -> String {
        let (base, params): (&str, Vec<(&str, &str)>) = match self {
            Self::WhatsApp => ("https://wa.me/", vec![("text", note)]),
            Self::Twitter => ("https://twitter.com/intent/tweet", vec![("text", note)]),
            Self::LinkedIn => (
                "https://www.linkedin.com/sharing/share-offsite/",
                vec![("url", SHARE_LINK), ("summary", note)],
            ),
            Self::Facebook => (
                "https://www.facebook.com/sharer/sharer.php",
                vec![("u", SHARE_LINK), ("quote", note)],
            ),
        };
        match Url::parse_with_params(base, &params) {
            Ok(url) => url.into(),
            Err(err) => {
                log::error!("Invalid share URL base {}: {}", base, err);
                base.to_string()
            }
        }
    }
}

impl std::str::FromStr for ShareTarget {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "whatsapp" => Ok(Self::WhatsApp),
            "x" | "twitter" => Ok(Self::Twitter),
            "linkedin" => Ok(Self::LinkedIn),
            "facebook" => Ok(Self::Facebook),
            other => Err(format!("unknown share target: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_MESSAGE;
    use std::str::FromStr;

    #[test]
    fn note_uses_committed_content_with_fallbacks() {
        let mut content = CardContent::initial_committed();
        content.recipient = "Selam".into();
        assert_eq!(
            share_note(&content),
            format!("ገና እንኳን ደስ አለዎት Selam! {DEFAULT_MESSAGE}")
        );

        content.recipient = " ".into();
        assert!(share_note(&content).contains("friend!"));
    }

    #[test]
    fn target_urls_encode_the_note() {
        let note = "Hi & bye?";
        let whatsapp = ShareTarget::WhatsApp.url(note);
        assert!(whatsapp.starts_with("https://wa.me/?text="));
        assert!(whatsapp.contains("%26"));
        assert!(!whatsapp.contains(" & "));

        let facebook = ShareTarget::Facebook.url(note);
        let parsed = Url::parse(&facebook).unwrap();
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("u".to_string(), SHARE_LINK.to_string()),
                ("quote".to_string(), note.to_string())
            ]
        );
    }

    #[test]
    fn parses_target_names() {
        assert_eq!(ShareTarget::from_str("X").unwrap(), ShareTarget::Twitter);
        assert!(ShareTarget::from_str("myspace").is_err());
        assert_eq!(ShareTarget::LinkedIn.label(), "LinkedIn");
    }
}
