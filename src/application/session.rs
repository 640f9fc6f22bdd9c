//! One card-building session: the state a UI binds to and the actions it
//! triggers.
//!
//! Async actions come in `begin_*` / `finish_*` halves. `begin_*` marks the
//! action busy and issues a request token; `finish_*` applies the result only
//! when its token is still the latest for that action, so a slow response
//! can never overwrite a newer one. The `generate_*` helpers run both halves
//! back to back.

use crate::application::editor::CardEditor;
use crate::application::export::{card_file_name, render_card_png, write_card};
use crate::application::share::{SHARE_LINK, SHARE_TITLE, ShareTarget, share_note};
use crate::application::status::StatusBoard;
use crate::domain::{
    BUILT_IN_IMAGES, CardContent, FALLBACK_RECIPIENT, GenerationError, GreetingVoice, ImageError,
    ImageHeight, ImageSelection, LanguagePreference, ShareError, Verse, non_blank,
};
use crate::infra::app_config::DEFAULT_TIMEOUT_SECS;
use crate::infra::clipboard::ClipboardWriter;
use crate::infra::generation::{Generated, GenerationService};
use crate::infra::image_source::{load_upload, resolve_for_export};
use crate::infra::render::{CardRegion, CardRenderer, LayoutBox, RenderOptions};
use crate::infra::share::ShareSurface;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Identifies one issued request of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Issues monotonically increasing tokens and tracks the busy flag.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
    busy: bool,
}

impl RequestTracker {
    pub fn begin(&mut self) -> RequestToken {
        self.latest += 1;
        self.busy = true;
        RequestToken(self.latest)
    }

    /// Returns `true` when `token` is current; only then is the action idle again.
    pub fn finish(&mut self, token: RequestToken) -> bool {
        if token.0 != self.latest {
            return false;
        }
        self.busy = false;
        true
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingRequest {
    pub token: RequestToken,
    pub recipient: String,
    pub seed: String,
    pub language: LanguagePreference,
    pub voice: GreetingVoice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseRequest {
    pub token: RequestToken,
    pub seed: String,
    pub language: LanguagePreference,
}

pub struct CardSession {
    editor: CardEditor,
    image: ImageSelection,
    image_url_input: String,
    image_height: ImageHeight,
    layout: LayoutBox,
    language: LanguagePreference,
    voice: GreetingVoice,
    status: StatusBoard,
    error_message: Option<String>,
    greeting_requests: RequestTracker,
    verse_requests: RequestTracker,
    is_downloading: bool,
    service: Arc<GenerationService>,
    assets_dir: PathBuf,
    render_options: RenderOptions,
    fetch_timeout: Duration,
}

impl CardSession {
    pub fn new(service: Arc<GenerationService>, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            editor: CardEditor::new(),
            image: ImageSelection::None,
            image_url_input: String::new(),
            image_height: ImageHeight::default(),
            layout: LayoutBox::default(),
            language: LanguagePreference::default(),
            voice: GreetingVoice::default(),
            status: StatusBoard::new(),
            error_message: None,
            greeting_requests: RequestTracker::default(),
            verse_requests: RequestTracker::default(),
            is_downloading: false,
            service,
            assets_dir: assets_dir.into(),
            render_options: RenderOptions::default(),
            fetch_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    // --- Form state -------------------------------------------------------

    pub fn draft(&self) -> &CardContent {
        self.editor.draft()
    }

    pub fn committed(&self) -> &CardContent {
        self.editor.committed()
    }

    pub fn editor_mut(&mut self) -> &mut CardEditor {
        &mut self.editor
    }

    pub fn set_language(&mut self, language: LanguagePreference) {
        self.language = language;
    }

    pub fn language(&self) -> LanguagePreference {
        self.language
    }

    pub fn set_voice(&mut self, voice: GreetingVoice) {
        self.voice = voice;
    }

    pub fn set_render_options(&mut self, options: RenderOptions) {
        self.render_options = options;
    }

    /// Upper bound for downloading remote artwork during export.
    pub fn set_fetch_timeout(&mut self, timeout: Duration) {
        self.fetch_timeout = timeout;
    }

    pub fn image(&self) -> &ImageSelection {
        &self.image
    }

    pub fn image_url_input(&self) -> &str {
        &self.image_url_input
    }

    pub fn set_image_url_input(&mut self, value: impl Into<String>) {
        self.image_url_input = value.into();
    }

    pub fn image_height(&self) -> ImageHeight {
        self.image_height
    }

    pub fn set_image_height(&mut self, px: u32) {
        self.image_height = ImageHeight::new(px);
    }

    pub fn layout(&self) -> LayoutBox {
        self.layout
    }

    pub fn set_layout(&mut self, layout: LayoutBox) {
        self.layout = layout;
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn status(&mut self) -> Option<&str> {
        self.status_at(Utc::now())
    }

    pub fn status_at(&mut self, now: DateTime<Utc>) -> Option<&str> {
        self.status.current(now)
    }

    pub fn is_greeting_busy(&self) -> bool {
        self.greeting_requests.is_busy()
    }

    pub fn is_verse_busy(&self) -> bool {
        self.verse_requests.is_busy()
    }

    pub fn is_downloading(&self) -> bool {
        self.is_downloading
    }

    /// Copies the draft into the preview.
    pub fn commit(&mut self) {
        self.editor.commit();
        self.status.flash("Card preview updated", Utc::now());
    }

    /// Ends the session; pending status timers are dropped.
    pub fn teardown(&mut self) {
        self.status.clear();
    }

    // --- Generation -------------------------------------------------------

    pub fn begin_greeting(&mut self) -> GreetingRequest {
        self.error_message = None;
        self.status.progress("Asking Gemini for a wish…");
        GreetingRequest {
            token: self.greeting_requests.begin(),
            recipient: non_blank(&self.editor.draft().recipient)
                .unwrap_or(FALLBACK_RECIPIENT)
                .to_string(),
            seed: self.editor.committed().display_message().to_string(),
            language: self.language,
            voice: self.voice,
        }
    }

    /// Applies a greeting result; returns `false` when the result was stale.
    pub fn finish_greeting(
        &mut self,
        token: RequestToken,
        result: Result<Generated<String>, GenerationError>,
    ) -> bool {
        if !self.greeting_requests.finish(token) {
            log::debug!("Dropping stale greeting response {:?}", token);
            return false;
        }

        let now = Utc::now();
        match result {
            Ok(greeting) => {
                self.editor.apply_generated_greeting(&greeting.value);
                if greeting.is_fallback() {
                    self.status.flash("Added a blessing from the saved collection", now);
                } else {
                    self.status.flash("Gemini wrote a fresh blessing", now);
                }
            }
            Err(err) => {
                log::error!("Greeting generation failed: {}", err);
                self.error_message = Some(err.to_string());
                self.status.flash("Unable to reach Gemini", now);
            }
        }
        true
    }

    pub async fn generate_greeting(&mut self) -> bool {
        let request = self.begin_greeting();
        let service = self.service.clone();
        let result = service
            .generate_greeting(
                &request.recipient,
                &request.seed,
                request.language,
                request.voice,
            )
            .await;
        self.finish_greeting(request.token, result)
    }

    pub fn begin_verse(&mut self) -> VerseRequest {
        self.error_message = None;
        self.status.progress("Finding a Christmas verse…");
        VerseRequest {
            token: self.verse_requests.begin(),
            seed: self.editor.committed().display_message().to_string(),
            language: self.language,
        }
    }

    /// Applies a verse result; returns `false` when the result was stale.
    pub fn finish_verse(
        &mut self,
        token: RequestToken,
        result: Result<Generated<Verse>, GenerationError>,
    ) -> bool {
        if !self.verse_requests.finish(token) {
            log::debug!("Dropping stale verse response {:?}", token);
            return false;
        }

        let now = Utc::now();
        match result {
            Ok(verse) => {
                self.editor.apply_generated_verse(&verse.value);
                self.status.flash("Verse added to card", now);
            }
            Err(err) => {
                log::error!("Verse generation failed: {}", err);
                self.error_message = Some(err.to_string());
                self.status.flash("Unable to fetch verse", now);
            }
        }
        true
    }

    pub async fn generate_verse(&mut self) -> bool {
        let request = self.begin_verse();
        let service = self.service.clone();
        let result = service
            .generate_verse(&request.seed, request.language)
            .await;
        self.finish_verse(request.token, result)
    }

    // --- Artwork ----------------------------------------------------------

    /// Reads a local file into the card. Non-images set the inline error.
    pub fn upload_image(&mut self, path: &Path) -> bool {
        match load_upload(path) {
            Ok(data_url) => {
                self.error_message = None;
                self.image = ImageSelection::Uploaded(data_url);
                self.status.flash("Card image added", Utc::now());
                true
            }
            Err(ImageError::UnsupportedFileType(name)) => {
                log::warn!("Rejected non-image upload {}", name);
                self.error_message = Some("Please choose an image file".to_string());
                false
            }
            Err(err) => {
                log::error!("Image upload failed: {}", err);
                self.error_message = Some(err.to_string());
                self.status.flash("Unable to read image", Utc::now());
                false
            }
        }
    }

    /// Uses the URL input as the image source; blank input clears it.
    pub fn apply_image_url(&mut self) {
        let url = self.image_url_input.trim().to_string();
        if url.is_empty() {
            self.image = ImageSelection::None;
            self.status.flash("Card image cleared", Utc::now());
            return;
        }
        self.image = ImageSelection::Url(url);
        self.status.flash("Card image set from URL", Utc::now());
    }

    pub fn select_built_in(&mut self, index: usize) -> bool {
        let Some(built_in) = BUILT_IN_IMAGES.get(index) else {
            return false;
        };
        self.image = ImageSelection::Url(built_in.path.to_string());
        self.image_url_input = built_in.path.to_string();
        self.status.flash("Card image set", Utc::now());
        true
    }

    // --- Sharing ----------------------------------------------------------

    pub fn share_note(&self) -> String {
        share_note(self.editor.committed())
    }

    pub fn share_url(&self, target: ShareTarget) -> String {
        target.url(&self.share_note())
    }

    pub fn copy_share_note(&mut self, clipboard: &mut dyn ClipboardWriter) -> bool {
        let note = self.share_note();
        self.copy_text(
            clipboard,
            &note,
            "Blessing copied to clipboard",
            "Copying failed",
        )
    }

    pub fn copy_share_link(&mut self, clipboard: &mut dyn ClipboardWriter) -> bool {
        self.copy_text(clipboard, SHARE_LINK, "Link copied", "Copy link failed")
    }

    fn copy_text(
        &mut self,
        clipboard: &mut dyn ClipboardWriter,
        text: &str,
        success: &str,
        failure: &str,
    ) -> bool {
        let now = Utc::now();
        match clipboard.write_text(text) {
            Ok(()) => {
                self.status.flash(success, now);
                true
            }
            Err(ShareError::ClipboardUnavailable) => {
                self.status.flash("Clipboard unavailable", now);
                false
            }
            Err(err) => {
                log::error!("Clipboard write failed: {}", err);
                self.status.flash(failure, now);
                false
            }
        }
    }

    pub fn native_share(&mut self, surface: &mut dyn ShareSurface) -> bool {
        let note = self.share_note();
        let now = Utc::now();
        match surface.share(SHARE_TITLE, &note) {
            Ok(()) => {
                self.status.flash("Shared via device dialog", now);
                true
            }
            Err(ShareError::Cancelled) => false,
            Err(ShareError::ShareUnavailable) => {
                self.status.flash("Native share is not supported", now);
                false
            }
            Err(err) => {
                log::error!("Native share failed: {}", err);
                self.status.flash("Share failed or was cancelled", now);
                false
            }
        }
    }

    pub fn open_share_target(&mut self, target: ShareTarget, surface: &mut dyn ShareSurface) -> bool {
        let url = self.share_url(target);
        let now = Utc::now();
        match surface.open_url(&url) {
            Ok(()) => {
                self.status.flash("Share dialog ready", now);
                true
            }
            Err(err) => {
                log::error!("Opening {} share link failed: {}", target.label(), err);
                self.status.flash("Unable to open share link", now);
                false
            }
        }
    }

    // --- Export -----------------------------------------------------------

    /// Renders the committed card and writes it into `out_dir`.
    ///
    /// Returns the written path; failures only produce a status message.
    pub async fn export(&mut self, renderer: &dyn CardRenderer, out_dir: &Path) -> Option<PathBuf> {
        if self.is_downloading {
            return None;
        }
        self.is_downloading = true;
        let result = self.export_inner(renderer, out_dir).await;
        self.is_downloading = false;

        let now = Utc::now();
        match result {
            Ok(path) => {
                self.status.flash("Card saved to downloads", now);
                Some(path)
            }
            Err(err) => {
                log::error!("Card export failed: {}", err);
                self.status.flash("Unable to generate the card image", now);
                None
            }
        }
    }

    async fn export_inner(
        &mut self,
        renderer: &dyn CardRenderer,
        out_dir: &Path,
    ) -> anyhow::Result<PathBuf> {
        let content = self.editor.committed().clone();
        anyhow::ensure!(content.is_renderable(), "committed card has blank fields");
        let image = resolve_for_export(&self.image, &self.assets_dir, self.fetch_timeout).await?;

        let mut region = CardRegion {
            layout: self.layout,
            content,
            image,
            image_height: self.image_height,
        };
        let rendered = render_card_png(&mut region, renderer, &self.render_options);
        self.layout = region.layout;
        let png = rendered?;

        let file_name = card_file_name(self.editor.committed().display_recipient());
        Ok(write_card(out_dir, &file_name, &png)?)
    }
}
