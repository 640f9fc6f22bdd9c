//! Card export: fix the layout, rasterize, restore, write the PNG.

use crate::domain::{ExportError, FALLBACK_RECIPIENT};
use crate::infra::image_source::decode_data_url;
use crate::infra::render::{CardRegion, CardRenderer, LayoutBox, RenderOptions};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Canonical export width in CSS pixels.
pub const EXPORT_WIDTH: u32 = 600;

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").expect("whitespace regex");
}

/// Pins a region's layout to a fixed width until dropped.
///
/// The previous layout is restored on every exit path, including unwinding.
pub struct ExportWidthOverride<'a> {
    region: &'a mut CardRegion,
    previous: LayoutBox,
}

impl<'a> ExportWidthOverride<'a> {
    pub fn apply(region: &'a mut CardRegion, width: u32) -> Self {
        let previous = region.layout;
        region.layout = LayoutBox::fixed(width);
        Self { region, previous }
    }

    pub fn region(&self) -> &CardRegion {
        self.region
    }
}

impl Drop for ExportWidthOverride<'_> {
    fn drop(&mut self) {
        self.region.layout = self.previous;
    }
}

/// Renders the region at [`EXPORT_WIDTH`] and returns PNG bytes.
pub fn render_card_png(
    region: &mut CardRegion,
    renderer: &dyn CardRenderer,
    options: &RenderOptions,
) -> Result<Vec<u8>, ExportError> {
    let data_url = {
        let pinned = ExportWidthOverride::apply(region, EXPORT_WIDTH);
        renderer.render_region_to_image(pinned.region(), options)?
    };

    let (mime, bytes) = decode_data_url(&data_url).ok_or(ExportError::InvalidDataUrl)?;
    if mime != "image/png" {
        return Err(ExportError::InvalidDataUrl);
    }
    Ok(bytes)
}

/// `<recipient>-gena-card.png`, safe to use as a file name.
pub fn card_file_name(recipient: &str) -> String {
    let cleaned: String = recipient
        .trim()
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect();
    let dashed = WHITESPACE_RE.replace_all(cleaned.trim(), "-");
    let stem = dashed.trim_matches(|c| c == '.' || c == '-');
    let stem = if stem.is_empty() {
        FALLBACK_RECIPIENT
    } else {
        stem
    };
    format!("{stem}-gena-card.png")
}

/// Writes the PNG into `dir`, creating it if needed.
pub fn write_card(dir: &Path, file_name: &str, png: &[u8]) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, png)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CardContent, ImageHeight, RenderError};
    use crate::infra::image_source::to_data_url;
    use std::cell::Cell;

    struct RecordingRenderer {
        seen_width: Cell<Option<u32>>,
        fail: bool,
    }

    impl CardRenderer for RecordingRenderer {
        fn render_region_to_image(
            &self,
            region: &CardRegion,
            _options: &RenderOptions,
        ) -> Result<String, RenderError> {
            self.seen_width.set(Some(region.layout.resolved_width()));
            if self.fail {
                return Err(RenderError::new("cross-origin image"));
            }
            Ok(to_data_url("image/png", b"png-bytes"))
        }
    }

    fn region() -> CardRegion {
        CardRegion {
            layout: LayoutBox {
                width: Some(480),
                min_width: None,
                max_width: Some(640),
            },
            content: CardContent::initial_committed(),
            image: None,
            image_height: ImageHeight::default(),
        }
    }

    #[test]
    fn export_pins_width_and_restores_after_success() {
        let mut card = region();
        let before = card.layout;
        let renderer = RecordingRenderer {
            seen_width: Cell::new(None),
            fail: false,
        };

        let png = render_card_png(&mut card, &renderer, &RenderOptions::default()).unwrap();

        assert_eq!(png, b"png-bytes");
        assert_eq!(renderer.seen_width.get(), Some(EXPORT_WIDTH));
        assert_eq!(card.layout, before);
    }

    #[test]
    fn export_restores_layout_after_failure() {
        let mut card = region();
        let before = card.layout;
        let renderer = RecordingRenderer {
            seen_width: Cell::new(None),
            fail: true,
        };

        let err = render_card_png(&mut card, &renderer, &RenderOptions::default()).unwrap_err();

        assert!(matches!(err, ExportError::Render(_)));
        assert_eq!(card.layout, before);
    }

    #[test]
    fn override_restores_on_unwind() {
        let mut card = region();
        let before = card.layout;
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _pinned = ExportWidthOverride::apply(&mut card, EXPORT_WIDTH);
            panic!("renderer crashed");
        }));
        assert!(result.is_err());
        assert_eq!(card.layout, before);
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(card_file_name("Selam Tesfaye"), "Selam-Tesfaye-gena-card.png");
        assert_eq!(card_file_name("  a \t b  "), "a-b-gena-card.png");
        assert_eq!(card_file_name("../etc/passwd"), "etcpasswd-gena-card.png");
        assert_eq!(card_file_name("   "), "friend-gena-card.png");
        assert_eq!(card_file_name("ሰላም ለአንቺ"), "ሰላም-ለአንቺ-gena-card.png");
    }

    #[test]
    fn writes_png_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_card(&dir.path().join("out"), "x-gena-card.png", b"png").unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"png");
    }
}
