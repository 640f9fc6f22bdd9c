//! Greeting and verse generation with fallback.
//!
//! In [`GenerationMode::Resilient`] every failure is absorbed by the next
//! entry of the matching fallback pool, so callers always get text. In
//! [`GenerationMode::Strict`] the failure is returned instead.

use crate::domain::{GenerationError, GreetingVoice, LanguagePreference, Verse};
use crate::infra::fallback::FallbackPools;
use crate::infra::gemini::{SamplingParams, TextGenerator, TextRequest};
use crate::prompts;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Greetings favour novelty.
pub const GREETING_PARAMS: SamplingParams = SamplingParams {
    temperature: 0.9,
    top_p: 0.95,
    max_output_tokens: 256,
};

/// Verse lookup favours accuracy.
pub const VERSE_PARAMS: SamplingParams = SamplingParams {
    temperature: 0.2,
    top_p: 0.8,
    max_output_tokens: 200,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Fall back to the local pools on any failure.
    #[default]
    Resilient,
    /// Return failures to the caller.
    Strict,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resilient => write!(f, "resilient"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for GenerationMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "resilient" | "fallback" => Ok(Self::Resilient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown generation mode: {other}")),
        }
    }
}

/// Where generated text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextOrigin {
    Remote,
    /// The remote call failed with this error and a pool entry was used.
    Fallback(GenerationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated<T> {
    pub value: T,
    pub origin: TextOrigin,
}

impl<T> Generated<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, TextOrigin::Fallback(_))
    }
}

pub struct GenerationService {
    generator: Arc<dyn TextGenerator>,
    pools: Mutex<FallbackPools>,
    mode: GenerationMode,
}

impl GenerationService {
    pub fn new(generator: Arc<dyn TextGenerator>, mode: GenerationMode) -> Self {
        Self::with_pools(generator, mode, FallbackPools::default())
    }

    pub fn with_pools(
        generator: Arc<dyn TextGenerator>,
        mode: GenerationMode,
        pools: FallbackPools,
    ) -> Self {
        Self {
            generator,
            pools: Mutex::new(pools),
            mode,
        }
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    /// Rewinds all fallback cursors.
    pub fn reset_fallbacks(&self) {
        self.pools.lock().reset();
    }

    pub async fn generate_greeting(
        &self,
        recipient: &str,
        seed_text: &str,
        language: LanguagePreference,
        voice: GreetingVoice,
    ) -> Result<Generated<String>, GenerationError> {
        let result = match greeting_prompt(recipient, seed_text, language, voice) {
            Ok(prompt) => {
                self.request(TextRequest {
                    prompt,
                    params: GREETING_PARAMS,
                })
                .await
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(text) => Ok(Generated {
                value: text,
                origin: TextOrigin::Remote,
            }),
            Err(err) if self.mode == GenerationMode::Resilient => {
                let text = self.pools.lock().next_greeting(language, voice);
                log::warn!("Greeting generation failed, using fallback: {}", err);
                Ok(Generated {
                    value: text.to_string(),
                    origin: TextOrigin::Fallback(err),
                })
            }
            Err(err) => Err(err),
        }
    }

    pub async fn generate_verse(
        &self,
        seed_text: &str,
        language: LanguagePreference,
    ) -> Result<Generated<Verse>, GenerationError> {
        let result = match verse_prompt(seed_text, language) {
            Ok(prompt) => {
                self.request(TextRequest {
                    prompt,
                    params: VERSE_PARAMS,
                })
                .await
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(raw) => Ok(Generated {
                value: Verse::parse(&raw),
                origin: TextOrigin::Remote,
            }),
            Err(err) if self.mode == GenerationMode::Resilient => {
                let raw = self.pools.lock().next_verse(language);
                log::warn!("Verse generation failed, using fallback: {}", err);
                Ok(Generated {
                    value: Verse::parse(raw),
                    origin: TextOrigin::Fallback(err),
                })
            }
            Err(err) => Err(err),
        }
    }

    async fn request(&self, request: TextRequest) -> Result<String, GenerationError> {
        let text = self.generator.generate(&request).await?;
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text.trim().to_string())
    }
}

fn greeting_prompt(
    recipient: &str,
    seed_text: &str,
    language: LanguagePreference,
    voice: GreetingVoice,
) -> Result<String, GenerationError> {
    prompts::render(
        "greeting",
        &json!({
            "recipient": recipient,
            "seed": seed_text,
            "amharic": language.is_amharic(),
            "feminine": voice == GreetingVoice::Feminine,
        }),
    )
    .map_err(|e| GenerationError::Transport(e.to_string()))
}

fn verse_prompt(seed_text: &str, language: LanguagePreference) -> Result<String, GenerationError> {
    prompts::render(
        "verse",
        &json!({
            "seed": seed_text,
            "amharic": language.is_amharic(),
        }),
    )
    .map_err(|e| GenerationError::Transport(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::fallback::{AMHARIC_FEMININE_GREETINGS, ENGLISH_GREETINGS, ENGLISH_VERSES};
    use async_trait::async_trait;

    /// Replies with a fixed result and records the prompts it saw.
    struct ScriptedGenerator {
        reply: Result<String, GenerationError>,
        seen: Mutex<Vec<TextRequest>>,
    }

    impl ScriptedGenerator {
        fn new(reply: Result<String, GenerationError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, request: &TextRequest) -> Result<String, GenerationError> {
            self.seen.lock().push(request.clone());
            self.reply.clone()
        }
    }

    #[tokio::test]
    async fn greeting_success_uses_remote_text_and_params() {
        let generator = ScriptedGenerator::new(Ok("  Melkam Gena, Selam!  ".into()));
        let service = GenerationService::new(generator.clone(), GenerationMode::Resilient);

        let greeting = service
            .generate_greeting(
                "Selam",
                "warm wishes",
                LanguagePreference::Auto,
                GreetingVoice::Neutral,
            )
            .await
            .unwrap();

        assert_eq!(greeting.value, "Melkam Gena, Selam!");
        assert_eq!(greeting.origin, TextOrigin::Remote);
        let seen = generator.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].params, GREETING_PARAMS);
        assert!(seen[0].prompt.contains("Selam"));
    }

    #[tokio::test]
    async fn resilient_mode_falls_back_on_every_failure_kind() {
        for failure in [
            GenerationError::Configuration,
            GenerationError::EmptyResponse,
            GenerationError::Transport("503".into()),
        ] {
            let service = GenerationService::new(
                ScriptedGenerator::new(Err(failure.clone())),
                GenerationMode::Resilient,
            );
            let greeting = service
                .generate_greeting("Abel", "", LanguagePreference::Auto, GreetingVoice::Neutral)
                .await
                .unwrap();
            assert_eq!(greeting.value, ENGLISH_GREETINGS[0]);
            assert_eq!(greeting.origin, TextOrigin::Fallback(failure));
        }
    }

    #[tokio::test]
    async fn blank_remote_text_counts_as_empty_response() {
        let service = GenerationService::new(
            ScriptedGenerator::new(Ok("   ".into())),
            GenerationMode::Strict,
        );
        let err = service
            .generate_greeting("Abel", "", LanguagePreference::Auto, GreetingVoice::Neutral)
            .await
            .unwrap_err();
        assert_eq!(err, GenerationError::EmptyResponse);
    }

    #[tokio::test]
    async fn strict_mode_surfaces_errors() {
        let service = GenerationService::new(
            ScriptedGenerator::new(Err(GenerationError::Configuration)),
            GenerationMode::Strict,
        );
        assert_eq!(
            service
                .generate_verse("joy", LanguagePreference::Auto)
                .await
                .unwrap_err(),
            GenerationError::Configuration
        );
    }

    #[tokio::test]
    async fn feminine_amharic_fallback_rotates() {
        let service = GenerationService::new(
            ScriptedGenerator::new(Err(GenerationError::EmptyResponse)),
            GenerationMode::Resilient,
        );
        let mut drawn = Vec::new();
        for _ in 0..=AMHARIC_FEMININE_GREETINGS.len() {
            let greeting = service
                .generate_greeting("ሰላም", "", LanguagePreference::Amharic, GreetingVoice::Feminine)
                .await
                .unwrap();
            drawn.push(greeting.value);
        }
        assert_eq!(drawn[..AMHARIC_FEMININE_GREETINGS.len()], *AMHARIC_FEMININE_GREETINGS);
        assert_eq!(drawn.last().unwrap(), AMHARIC_FEMININE_GREETINGS[0]);
    }

    #[tokio::test]
    async fn verse_success_is_parsed_and_cleaned() {
        let generator = ScriptedGenerator::new(Ok(
            "Luke 2:10-11|Fear not, for behold, great joy. Luke 2:10".into(),
        ));
        let service = GenerationService::new(generator.clone(), GenerationMode::Resilient);
        let verse = service
            .generate_verse("joy", LanguagePreference::Auto)
            .await
            .unwrap();
        assert_eq!(verse.value.reference, "Luke 2:10-11");
        assert_eq!(verse.value.text, "Fear not, for behold, great joy.");
        assert_eq!(generator.seen.lock()[0].params, VERSE_PARAMS);
    }

    #[tokio::test]
    async fn verse_fallback_is_parsed_and_reset_rewinds() {
        let service = GenerationService::new(
            ScriptedGenerator::new(Err(GenerationError::Transport("offline".into()))),
            GenerationMode::Resilient,
        );
        let first = service
            .generate_verse("joy", LanguagePreference::Auto)
            .await
            .unwrap();
        assert!(first.is_fallback());
        assert_eq!(first.value, Verse::parse(ENGLISH_VERSES[0]));

        let second = service
            .generate_verse("joy", LanguagePreference::Auto)
            .await
            .unwrap();
        assert_eq!(second.value, Verse::parse(ENGLISH_VERSES[1]));

        service.reset_fallbacks();
        let again = service
            .generate_verse("joy", LanguagePreference::Auto)
            .await
            .unwrap();
        assert_eq!(again.value, first.value);
    }

    #[test]
    fn mode_display_parse() {
        assert_eq!(GenerationMode::Strict.to_string(), "strict");
        assert_eq!(
            GenerationMode::from_str("Fallback").unwrap(),
            GenerationMode::Resilient
        );
        assert!(GenerationMode::from_str("yolo").is_err());
    }
}
