use handlebars::Handlebars;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;

static PROMPT_REGISTRY: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("greeting", include_str!("greeting.hbs"));
    m.insert("verse", include_str!("verse.hbs"));
    m
});

/// Render a prompt by name using Handlebars.
///
/// Usage:
///     render("greeting", json!({"recipient": "Selam", "seed": "...", "amharic": false}))
///
pub fn render(name: &str, ctx: &Value) -> anyhow::Result<String> {
    let template = PROMPT_REGISTRY
        .get(name)
        .ok_or_else(|| anyhow::anyhow!("unknown prompt '{name}'"))?;

    let mut hb = Handlebars::new();
    hb.set_strict_mode(true); // fail if a variable is missing
    hb.register_escape_fn(handlebars::no_escape); // prompts are plain text, not HTML

    hb.render_template(template, ctx)
        .map(|rendered| rendered.trim().to_string())
        .map_err(|e| anyhow::anyhow!("rendering prompt '{name}' failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn greeting_prompt_embeds_recipient_and_language() {
        let prompt = render(
            "greeting",
            &json!({
                "recipient": "Selam & family",
                "seed": "coffee and candles",
                "amharic": true,
                "feminine": true,
            }),
        )
        .unwrap();
        assert!(prompt.contains("Selam & family"));
        assert!(prompt.contains("coffee and candles"));
        assert!(prompt.contains("Amharic"));
        assert!(prompt.contains("feminine"));
    }

    #[test]
    fn verse_prompt_requests_pipe_format() {
        let prompt = render("verse", &json!({ "seed": "joy", "amharic": false })).unwrap();
        assert!(prompt.contains("<reference>|<verse text>"));
        assert!(prompt.contains("joy"));
        assert!(!prompt.contains("Amharic Bible"));
    }

    #[test]
    fn missing_variable_fails_in_strict_mode() {
        assert!(render("verse", &json!({ "amharic": false })).is_err());
        assert!(render("unknown", &json!({})).is_err());
    }
}
