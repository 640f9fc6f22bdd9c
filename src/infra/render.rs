//! Card rasterization.
//!
//! The card is composed as SVG and rendered with usvg/resvg into a PNG
//! data URL.

use crate::domain::{CardContent, ImageHeight, RenderError};
use crate::infra::image_source::to_data_url;
use std::sync::Arc;

/// Width the card takes in the on-screen preview when unconstrained.
pub const PREVIEW_WIDTH: u32 = 640;

const PADDING: f32 = 32.0;
const TITLE: &str = "መልካም ገና";

/// Layout constraints of the rendered card region, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutBox {
    pub width: Option<u32>,
    pub min_width: Option<u32>,
    pub max_width: Option<u32>,
}

impl LayoutBox {
    pub fn fixed(width: u32) -> Self {
        Self {
            width: Some(width),
            min_width: Some(width),
            max_width: Some(width),
        }
    }

    /// Width after applying min/max constraints.
    pub fn resolved_width(&self) -> u32 {
        let mut width = self.width.unwrap_or(PREVIEW_WIDTH);
        if let Some(max) = self.max_width {
            width = width.min(max);
        }
        if let Some(min) = self.min_width {
            width = width.max(min);
        }
        width
    }
}

/// Everything needed to draw the card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRegion {
    pub layout: LayoutBox,
    pub content: CardContent,
    /// Embeddable `data:` URL of the artwork, if any.
    pub image: Option<String>,
    pub image_height: ImageHeight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    Transparent,
    Rgba(u8, u8, u8, u8),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub pixel_density: f32,
    pub background: Background,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pixel_density: 2.0,
            background: Background::Transparent,
        }
    }
}

/// Captures a card region as an encoded image.
pub trait CardRenderer {
    /// Returns a PNG `data:` URL.
    fn render_region_to_image(
        &self,
        region: &CardRegion,
        options: &RenderOptions,
    ) -> Result<String, RenderError>;
}

pub struct SvgCardRenderer {
    fontdb: Arc<fontdb::Database>,
}

impl SvgCardRenderer {
    pub fn new() -> Self {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();
        log::debug!("Loaded {} font faces", fontdb.len());
        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Renderer without any fonts; text is skipped. Useful for tests.
    pub fn without_fonts() -> Self {
        Self {
            fontdb: Arc::new(fontdb::Database::new()),
        }
    }
}

impl Default for SvgCardRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CardRenderer for SvgCardRenderer {
    fn render_region_to_image(
        &self,
        region: &CardRegion,
        options: &RenderOptions,
    ) -> Result<String, RenderError> {
        let width = region.layout.resolved_width();
        if width == 0 {
            return Err(RenderError::new("card region has zero width"));
        }
        if !options.pixel_density.is_finite() || options.pixel_density <= 0.0 {
            return Err(RenderError::new(format!(
                "invalid pixel density {}",
                options.pixel_density
            )));
        }

        let (svg, height) = compose_svg(region, width as f32);

        let mut opts = usvg::Options::default();
        opts.fontdb = self.fontdb.clone();
        let tree = usvg::Tree::from_str(&svg, &opts)
            .map_err(|e| RenderError::new(format!("SVG parsing error: {e}")))?;

        let scale = options.pixel_density;
        let mut pixmap = tiny_skia::Pixmap::new(
            (width as f32 * scale).ceil() as u32,
            (height * scale).ceil() as u32,
        )
        .ok_or_else(|| RenderError::new("card region has zero size"))?;

        if let Background::Rgba(r, g, b, a) = options.background {
            pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
        }

        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        let png = pixmap
            .encode_png()
            .map_err(|e| RenderError::new(format!("PNG encoding failed: {e}")))?;
        Ok(to_data_url("image/png", &png))
    }
}

struct TextBlock {
    lines: Vec<String>,
    size: f32,
    fill: &'static str,
    weight: u32,
}

impl TextBlock {
    fn new(text: &str, size: f32, fill: &'static str, weight: u32, width: f32) -> Self {
        Self {
            lines: wrap_text(text, chars_per_line(size, width)),
            size,
            fill,
            weight,
        }
    }

    fn line_height(&self) -> f32 {
        self.size * 1.45
    }

    fn height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height()
    }

    fn write(&self, svg: &mut String, x: f32, top: f32, anchor: &str) {
        for (i, line) in self.lines.iter().enumerate() {
            let baseline = top + self.size + i as f32 * self.line_height();
            svg.push_str(&format!(
                r#"<text x="{x:.1}" y="{baseline:.1}" font-family="Noto Sans Ethiopic, Noto Sans, sans-serif" font-size="{:.1}" font-weight="{}" fill="{}" text-anchor="{anchor}">{}</text>"#,
                self.size,
                self.weight,
                self.fill,
                escape_xml(line)
            ));
        }
    }
}

/// Builds the card SVG for the given width and returns it with its height.
pub fn compose_svg(region: &CardRegion, width: f32) -> (String, f32) {
    let content = &region.content;
    let inner = (width - PADDING * 2.0).max(1.0);
    let center = width / 2.0;

    let title = TextBlock::new(TITLE, 52.0, "#d1fae5", 600, inner);
    let verse = TextBlock::new(&content.verse_text, 13.0, "#e2e8f0", 400, inner);
    let reference = TextBlock::new(&content.verse_reference, 13.0, "#6ee7b7", 600, inner);
    let recipient = TextBlock::new(
        &format!("ለ {}", content.display_recipient()),
        24.0,
        "#ffffff",
        600,
        inner,
    );
    let message = TextBlock::new(content.display_message(), 15.0, "#e2e8f0", 400, inner);
    let footer = TextBlock::new(
        &format!("Crafted for {} · መልካም ገና!", content.display_recipient()),
        12.0,
        "#94a3b8",
        400,
        inner,
    );

    let mut body = String::new();
    let mut y = PADDING;

    title.write(&mut body, center, y, "middle");
    y += title.height() + 12.0;

    verse.write(&mut body, center, y, "middle");
    y += verse.height() + 4.0;
    reference.write(&mut body, center, y, "middle");
    y += reference.height() + 20.0;

    recipient.write(&mut body, PADDING, y, "start");
    y += recipient.height() + 8.0;
    message.write(&mut body, PADDING, y, "start");
    y += message.height() + 20.0;

    if let Some(image) = &region.image {
        let image_height = region.image_height.px() as f32;
        body.push_str(&format!(
            r#"<clipPath id="art-clip"><rect x="{PADDING:.1}" y="{y:.1}" width="{inner:.1}" height="{image_height:.1}" rx="16"/></clipPath><image x="{PADDING:.1}" y="{y:.1}" width="{inner:.1}" height="{image_height:.1}" preserveAspectRatio="xMidYMid slice" clip-path="url(#art-clip)" xlink:href="{}"/>"#,
            escape_xml(image)
        ));
        y += image_height + 20.0;
    }

    footer.write(&mut body, center, y, "middle");
    y += footer.height() + PADDING;

    let height = y.ceil();
    let svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}"><defs><linearGradient id="card-bg" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="#022c22"/><stop offset="0.55" stop-color="#0f172a"/><stop offset="1" stop-color="#3b0764"/></linearGradient></defs><rect x="0" y="0" width="{width:.0}" height="{height:.0}" rx="28" fill="url(#card-bg)" stroke="#10b981" stroke-opacity="0.35"/>{body}</svg>"##
    );
    (svg, height)
}

fn chars_per_line(font_size: f32, width: f32) -> usize {
    ((width / (font_size * 0.55)).floor() as usize).max(8)
}

/// Greedy word wrap on whitespace; overlong words get a line of their own.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::image_source::decode_data_url;

    fn region(layout: LayoutBox) -> CardRegion {
        CardRegion {
            layout,
            content: CardContent::initial_committed(),
            image: None,
            image_height: ImageHeight::default(),
        }
    }

    #[test]
    fn resolved_width_applies_constraints() {
        assert_eq!(LayoutBox::default().resolved_width(), PREVIEW_WIDTH);
        assert_eq!(LayoutBox::fixed(600).resolved_width(), 600);
        let clamped = LayoutBox {
            width: Some(900),
            min_width: None,
            max_width: Some(700),
        };
        assert_eq!(clamped.resolved_width(), 700);
    }

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text("one two three four", 9),
            vec!["one two", "three", "four"]
        );
        assert_eq!(wrap_text("supercalifragilistic ok", 5).len(), 2);
        assert!(wrap_text("   ", 10).is_empty());
    }

    #[test]
    fn svg_escapes_user_text_and_embeds_image() {
        let mut card = region(LayoutBox::fixed(600));
        card.content.recipient = "Tom & <Jerry>".into();
        card.image = Some("data:image/png;base64,AAAA".into());
        let (svg, height) = compose_svg(&card, 600.0);
        assert!(svg.contains("Tom &amp; &lt;Jerry&gt;"));
        assert!(svg.contains(r#"xlink:href="data:image/png;base64,AAAA""#));
        assert!(height > ImageHeight::default().px() as f32);
    }

    #[test]
    fn taller_image_area_makes_taller_card() {
        let mut card = region(LayoutBox::fixed(600));
        card.image = Some("data:image/png;base64,AAAA".into());
        card.image_height = ImageHeight::new(140);
        let (_, short) = compose_svg(&card, 600.0);
        card.image_height = ImageHeight::new(320);
        let (_, tall) = compose_svg(&card, 600.0);
        assert!((tall - short - 180.0).abs() <= 1.0);
    }

    #[test]
    fn renders_png_at_pixel_density() {
        let renderer = SvgCardRenderer::without_fonts();
        let data_url = renderer
            .render_region_to_image(&region(LayoutBox::fixed(600)), &RenderOptions::default())
            .unwrap();
        let (mime, bytes) = decode_data_url(&data_url).unwrap();
        assert_eq!(mime, "image/png");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 1200);
    }

    #[test]
    fn zero_width_region_fails() {
        let renderer = SvgCardRenderer::without_fonts();
        let err = renderer
            .render_region_to_image(&region(LayoutBox::fixed(0)), &RenderOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("zero width"));
    }

    #[test]
    fn invalid_density_fails() {
        let renderer = SvgCardRenderer::without_fonts();
        let options = RenderOptions {
            pixel_density: 0.0,
            background: Background::Rgba(0, 0, 0, 255),
        };
        assert!(
            renderer
                .render_region_to_image(&region(LayoutBox::default()), &options)
                .is_err()
        );
    }
}
