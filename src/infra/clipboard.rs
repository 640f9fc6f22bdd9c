use crate::domain::ShareError;
use std::time::Duration;

/// Write-only access to the system clipboard.
pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), ShareError>;
}

/// `arboard`-backed clipboard, opened on first use.
///
/// On X11 and Wayland the copied text is only served while the owning
/// handle is alive. Long-running callers keep the handle around; a process
/// that exits right after copying should use [`SystemClipboard::holding_for`].
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
    hold: Option<Duration>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard whose writes block until another owner takes the selection
    /// (a clipboard manager or the next copy) or `hold` elapses. Only Linux
    /// needs this; elsewhere the OS keeps the text after exit.
    pub fn holding_for(hold: Duration) -> Self {
        Self {
            inner: None,
            hold: Some(hold),
        }
    }

    pub fn hold(&self) -> Option<Duration> {
        self.hold
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ShareError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(|e| {
                log::warn!("Clipboard unavailable: {}", e);
                ShareError::ClipboardUnavailable
            })?;
            self.inner = Some(clipboard);
        }
        self.inner.as_mut().ok_or(ShareError::ClipboardUnavailable)
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ShareError> {
        let hold = self.hold;
        let clipboard = self.handle()?;
        let result = match hold {
            Some(hold) => set_text_and_hold(clipboard, text, hold),
            None => clipboard.set_text(text.to_string()),
        };
        result.map_err(|e| ShareError::Failed(e.to_string()))
    }
}

#[cfg(target_os = "linux")]
fn set_text_and_hold(
    clipboard: &mut arboard::Clipboard,
    text: &str,
    hold: Duration,
) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;

    log::info!(
        "Serving the clipboard for up to {}s; paste now or let a clipboard manager take it",
        hold.as_secs()
    );
    clipboard
        .set()
        .wait_until(std::time::Instant::now() + hold)
        .text(text.to_string())
}

#[cfg(not(target_os = "linux"))]
fn set_text_and_hold(
    clipboard: &mut arboard::Clipboard,
    text: &str,
    _hold: Duration,
) -> Result<(), arboard::Error> {
    clipboard.set_text(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_clipboard_does_not_hold() {
        assert_eq!(SystemClipboard::new().hold(), None);
    }

    #[test]
    fn holding_clipboard_keeps_its_deadline() {
        let clipboard = SystemClipboard::holding_for(Duration::from_secs(30));
        assert_eq!(clipboard.hold(), Some(Duration::from_secs(30)));
    }
}
