//! Turning uploads, URLs and bundled artwork into embeddable data URLs.

use crate::domain::{ImageError, ImageSelection, RenderError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Reads a user-selected file, accepting only image content.
pub fn load_upload(path: &Path) -> Result<String, ImageError> {
    let bytes = std::fs::read(path)?;
    let mime = detect_image_mime(&bytes).ok_or_else(|| {
        ImageError::UnsupportedFileType(
            path.file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
        )
    })?;
    Ok(to_data_url(mime, &bytes))
}

/// Media type sniffed from the content, `None` for non-images.
pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    if looks_like_svg(bytes) {
        return Some("image/svg+xml");
    }
    image::guess_format(bytes)
        .ok()
        .map(|format| format.to_mime_type())
        .filter(|mime| mime.starts_with("image/"))
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(512)]);
    let head = head.trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Splits a base64 `data:` URL into media type and bytes.
pub fn decode_data_url(url: &str) -> Option<(String, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some((mime.to_string(), bytes))
}

pub fn is_remote(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolves the current selection to a data URL the renderer can embed.
///
/// Absolute paths that exist are read as-is. Other paths, including
/// site-relative ones such as `/images/image-1.png`, are looked up under
/// `assets_dir`. Remote downloads give up after `fetch_timeout`.
pub async fn resolve_for_export(
    selection: &ImageSelection,
    assets_dir: &Path,
    fetch_timeout: Duration,
) -> Result<Option<String>, RenderError> {
    match selection {
        ImageSelection::None => Ok(None),
        ImageSelection::Uploaded(data_url) => Ok(Some(data_url.clone())),
        ImageSelection::Url(url) if url.starts_with("data:") => Ok(Some(url.clone())),
        ImageSelection::Url(url) if is_remote(url) => {
            fetch_remote(url, fetch_timeout).await.map(Some)
        }
        ImageSelection::Url(path) => {
            let full = local_image_path(Path::new(path.trim()), assets_dir).await;
            let bytes = tokio::fs::read(&full)
                .await
                .map_err(|e| RenderError::new(format!("read {}: {e}", full.display())))?;
            let mime = detect_image_mime(&bytes)
                .ok_or_else(|| RenderError::new(format!("{} is not an image", full.display())))?;
            Ok(Some(to_data_url(mime, &bytes)))
        }
    }
}

async fn local_image_path(path: &Path, assets_dir: &Path) -> PathBuf {
    if path.is_absolute() && tokio::fs::metadata(path).await.is_ok() {
        return path.to_path_buf();
    }
    let relative = path.strip_prefix("/").unwrap_or(path);
    assets_dir.join(relative)
}

async fn fetch_remote(url: &str, timeout: Duration) -> Result<String, RenderError> {
    log::debug!("Fetching card image {}", url);
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RenderError::new(format!("http client: {e}")))?;
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| RenderError::new(format!("fetch {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(RenderError::new(format!(
            "fetch {url}: HTTP {}",
            response.status().as_u16()
        )));
    }

    let header_mime = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(';').next().unwrap_or_default().trim().to_string());

    let bytes = response
        .bytes()
        .await
        .map_err(|e| RenderError::new(format!("fetch {url}: {e}")))?;

    let mime = match header_mime {
        Some(mime) if mime.starts_with("image/") => mime,
        _ => detect_image_mime(&bytes)
            .map(str::to_string)
            .ok_or_else(|| RenderError::new(format!("{url} did not return an image")))?,
    };

    Ok(to_data_url(&mime, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_1X1: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0xF8,
        0xCF, 0xC0, 0xF0, 0x1F, 0x00, 0x05, 0x00, 0x01, 0xFF, 0x89, 0x99, 0x3D, 0x1D, 0x00, 0x00,
        0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn accepts_png_upload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.bin");
        std::fs::write(&path, PNG_1X1).unwrap();

        let data_url = load_upload(&path).unwrap();
        assert!(data_url.starts_with("data:image/png;base64,"));
        let (mime, bytes) = decode_data_url(&data_url).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, PNG_1X1);
    }

    #[test]
    fn rejects_non_image_upload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "just words").unwrap();

        match load_upload(&path) {
            Err(ImageError::UnsupportedFileType(name)) => assert_eq!(name, "notes.txt"),
            other => panic!("expected unsupported file type, got {other:?}"),
        }
    }

    #[test]
    fn missing_upload_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_upload(&dir.path().join("gone.png")),
            Err(ImageError::Read(_))
        ));
    }

    #[test]
    fn sniffs_svg() {
        assert_eq!(
            detect_image_mime(br#"<svg xmlns="http://www.w3.org/2000/svg"/>"#),
            Some("image/svg+xml")
        );
    }

    #[test]
    fn decode_rejects_non_base64_urls() {
        assert!(decode_data_url("https://example.com/a.png").is_none());
        assert!(decode_data_url("data:text/plain,hello").is_none());
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn resolves_relative_paths_under_assets_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images/image-1.png"), PNG_1X1).unwrap();

        let resolved = resolve_for_export(
            &ImageSelection::Url("/images/image-1.png".into()),
            dir.path(),
            TIMEOUT,
        )
        .await
        .unwrap()
        .unwrap();
        assert!(resolved.starts_with("data:image/png;base64,"));

        let missing = resolve_for_export(
            &ImageSelection::Url("images/none.png".into()),
            dir.path(),
            TIMEOUT,
        )
        .await;
        assert!(missing.is_err());

        assert_eq!(
            resolve_for_export(&ImageSelection::None, dir.path(), TIMEOUT)
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn reads_absolute_paths_directly() {
        let assets = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let art = elsewhere.path().join("art.png");
        std::fs::write(&art, PNG_1X1).unwrap();

        let resolved = resolve_for_export(
            &ImageSelection::Url(art.to_string_lossy().into_owned()),
            assets.path(),
            TIMEOUT,
        )
        .await
        .unwrap()
        .unwrap();

        let (mime, bytes) = decode_data_url(&resolved).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, PNG_1X1);
    }

    #[tokio::test]
    async fn downloads_remote_artwork() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/art.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(PNG_1X1)
            .create_async()
            .await;

        let resolved = resolve_for_export(
            &ImageSelection::Url(format!("{}/art.png", server.url())),
            Path::new("/nonexistent-assets"),
            TIMEOUT,
        )
        .await
        .unwrap()
        .unwrap();
        assert!(resolved.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn stalled_remote_artwork_times_out() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/slow.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(2));
                w.write_all(PNG_1X1)
            })
            .create_async()
            .await;

        let started = std::time::Instant::now();
        let result = resolve_for_export(
            &ImageSelection::Url(format!("{}/slow.png", server.url())),
            Path::new("/nonexistent-assets"),
            Duration::from_millis(200),
        )
        .await;

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
