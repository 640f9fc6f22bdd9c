//! Gena Card CLI entry point.
//!
//! Builds Ethiopian Christmas cards from the terminal: writes blessings and
//! verses with Gemini (or the saved collection), exports PNG cards and
//! prepares share links.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use gena_card::application::session::CardSession;
use gena_card::application::share::ShareTarget;
use gena_card::domain::{BUILT_IN_IMAGES, GreetingVoice, LanguagePreference};
use gena_card::infra::app_config::{self, AppConfig};
use gena_card::infra::clipboard::SystemClipboard;
use gena_card::infra::gemini::GeminiClient;
use gena_card::infra::generation::{GenerationMode, GenerationService};
use gena_card::infra::image_source::is_remote;
use gena_card::infra::render::{Background, RenderOptions, SvgCardRenderer};
use gena_card::infra::share::DesktopShare;

#[derive(Parser, Debug)]
#[command(name = "gena-card")]
#[command(version)]
#[command(about = "Craft Ethiopian Christmas (Gena) greeting cards", long_about = None)]
struct Cli {
    /// Override the generation mode from config (resilient or strict)
    #[arg(long, global = true)]
    mode: Option<GenerationMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct LanguageArgs {
    /// Write generated text in Amharic (Ge'ez script)
    #[arg(long)]
    amharic: bool,

    /// Use feminine forms for Amharic greetings
    #[arg(long)]
    feminine: bool,
}

impl LanguageArgs {
    fn language(&self) -> LanguagePreference {
        LanguagePreference::from_flag(self.amharic)
    }

    fn voice(&self) -> GreetingVoice {
        if self.feminine {
            GreetingVoice::Feminine
        } else {
            GreetingVoice::Neutral
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a greeting for someone
    Greeting {
        /// Recipient name (English or Amharic)
        #[arg(short, long, default_value = gena_card::domain::FALLBACK_RECIPIENT)]
        to: String,
        /// Text that sets the tone
        #[arg(long, default_value = gena_card::domain::DEFAULT_MESSAGE)]
        seed: String,
        #[command(flatten)]
        language: LanguageArgs,
    },

    /// Suggest a Nativity verse
    Verse {
        /// Text that sets the tone
        #[arg(long, default_value = gena_card::domain::DEFAULT_MESSAGE)]
        seed: String,
        #[command(flatten)]
        language: LanguageArgs,
    },

    /// Build a card and export it as PNG
    Card(CardArgs),

    /// Print share links for a blessing
    ShareLinks {
        #[arg(short, long)]
        to: Option<String>,
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show or initialise the configuration
    Config {
        /// Write a config file with default values if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args, Debug)]
struct CardArgs {
    /// Recipient name (English or Amharic)
    #[arg(short, long)]
    to: Option<String>,

    /// Blessing text
    #[arg(short, long)]
    message: Option<String>,

    /// Verse reference, e.g. "Luke 2:10-11"
    #[arg(long)]
    verse_ref: Option<String>,

    /// Verse text
    #[arg(long)]
    verse_text: Option<String>,

    /// Let Gemini write the blessing
    #[arg(long)]
    ai_greeting: bool,

    /// Let Gemini pick the verse
    #[arg(long)]
    ai_verse: bool,

    #[command(flatten)]
    language: LanguageArgs,

    /// Card artwork: local image file or http(s) URL
    #[arg(long, conflicts_with = "built_in")]
    image: Option<String>,

    /// Built-in artwork number (1-4)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
    built_in: Option<u8>,

    /// Height of the artwork area in pixels (140-320)
    #[arg(long)]
    image_height: Option<u32>,

    /// Output directory (defaults to config or the Downloads folder)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Pixel density of the exported PNG
    #[arg(long, default_value_t = 2.0)]
    density: f32,

    /// Solid background colour as RRGGBB instead of transparent
    #[arg(long, value_parser = parse_hex_color)]
    background: Option<Background>,

    /// Copy the blessing to the clipboard
    #[arg(long)]
    copy: bool,

    /// Copy the app link to the clipboard
    #[arg(long, conflicts_with = "copy")]
    copy_link: bool,

    /// Seconds to keep serving a copy before exiting (Linux clipboards
    /// lose the text when the copying process exits)
    #[arg(long, default_value_t = 30)]
    clipboard_hold: u64,

    /// Open a share target (whatsapp, x, linkedin, facebook)
    #[arg(long)]
    share: Option<ShareTarget>,

    /// Skip writing the PNG
    #[arg(long)]
    no_export: bool,
}

fn parse_hex_color(value: &str) -> std::result::Result<Background, String> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("expected RRGGBB, got '{value}'"));
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
    Ok(Background::Rgba(channel(0)?, channel(2)?, channel(4)?, 255))
}

fn build_service(config: &AppConfig) -> Result<Arc<GenerationService>> {
    let client = GeminiClient::from_config(config).context("Failed to build Gemini client")?;
    if !client.has_api_key() {
        log::warn!("No Gemini API key configured; generated text comes from the saved collection");
    }
    Ok(Arc::new(GenerationService::new(Arc::new(client), config.mode)))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = dotenvy::dotenv() {
        log::debug!("No .env loaded: {}", err);
    }

    let cli = Cli::parse();
    let mut config = app_config::load_config();
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }

    match cli.command {
        Commands::Greeting { to, seed, language } => {
            let service = build_service(&config)?;
            let greeting = service
                .generate_greeting(&to, &seed, language.language(), language.voice())
                .await?;
            println!("{}", greeting.value);
        }
        Commands::Verse { seed, language } => {
            let service = build_service(&config)?;
            let verse = service.generate_verse(&seed, language.language()).await?;
            println!("{}|{}", verse.value.reference, verse.value.text);
        }
        Commands::Card(args) => run_card(args, &config).await?,
        Commands::ShareLinks { to, message } => {
            let mut session = CardSession::new(build_service(&config)?, config.assets_dir());
            if let Some(to) = to {
                session.editor_mut().set_recipient(to);
            }
            if let Some(message) = message {
                session.editor_mut().set_message(message);
            }
            session.commit();
            println!("{}", session.share_note());
            for target in ShareTarget::ALL {
                println!("{:<12} {}", target.label(), session.share_url(target));
            }
        }
        Commands::Config { init } => {
            let path = app_config::config_path();
            if init && !path.exists() {
                app_config::save_config(&AppConfig::default())?;
                println!("Wrote {}", path.display());
            }
            println!("config:   {}", path.display());
            println!("api key:  {}", config.masked_api_key());
            println!("model:    {}", config.model);
            println!("endpoint: {}", config.endpoint);
            println!("mode:     {}", config.mode);
            println!("assets:   {}", config.assets_dir().display());
            println!("output:   {}", config.output_dir().display());
        }
    }

    Ok(())
}

async fn run_card(args: CardArgs, config: &AppConfig) -> Result<()> {
    let mut session = CardSession::new(build_service(config)?, config.assets_dir());
    session.set_language(args.language.language());
    session.set_voice(args.language.voice());
    session.set_render_options(RenderOptions {
        pixel_density: args.density,
        background: args.background.unwrap_or_default(),
    });
    session.set_fetch_timeout(Duration::from_secs(config.request_timeout_secs));

    {
        let editor = session.editor_mut();
        if let Some(to) = &args.to {
            editor.set_recipient(to.as_str());
        }
        if let Some(message) = &args.message {
            editor.set_message(message.as_str());
        }
        if let Some(reference) = &args.verse_ref {
            editor.set_verse_reference(reference.as_str());
        }
        if let Some(text) = &args.verse_text {
            editor.set_verse_text(text.as_str());
        }
    }

    if let Some(height) = args.image_height {
        session.set_image_height(height);
    }

    if let Some(image) = &args.image {
        if is_remote(image) {
            session.set_image_url_input(image.as_str());
            session.apply_image_url();
        } else if !session.upload_image(std::path::Path::new(image)) {
            anyhow::bail!(
                "{}",
                session.error_message().unwrap_or("Unable to read image")
            );
        }
    } else if let Some(number) = args.built_in {
        let index = usize::from(number - 1);
        session.select_built_in(index);
        log::info!("Using {}", BUILT_IN_IMAGES[index].label);
    }

    if args.ai_greeting {
        session.generate_greeting().await;
    }
    if args.ai_verse {
        session.generate_verse().await;
    }
    if let Some(error) = session.error_message() {
        eprintln!("{error}");
    }

    session.commit();
    let committed = session.committed();
    println!("ለ {}", committed.recipient);
    println!("{}", committed.message);
    println!("{} | {}", committed.verse_reference, committed.verse_text);

    if !args.no_export {
        let out_dir = args.out.clone().unwrap_or_else(|| config.output_dir());
        let renderer = SvgCardRenderer::new();
        match session.export(&renderer, &out_dir).await {
            Some(path) => println!("Saved {}", path.display()),
            None => anyhow::bail!("Unable to generate the card image"),
        }
    }

    if let Some(target) = args.share {
        session.open_share_target(target, &mut DesktopShare);
    }

    // Last, since holding the clipboard blocks until it is taken over.
    if args.copy || args.copy_link {
        let mut clipboard = SystemClipboard::holding_for(Duration::from_secs(args.clipboard_hold));
        let started = chrono::Utc::now();
        if args.copy {
            session.copy_share_note(&mut clipboard);
        } else {
            session.copy_share_link(&mut clipboard);
        }
        if let Some(status) = session.status_at(started) {
            println!("{status}");
        }
    }

    session.teardown();
    Ok(())
}
