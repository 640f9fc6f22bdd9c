use crate::domain::ShareError;

/// OS-level sharing: the native share sheet and share-target links.
pub trait ShareSurface {
    /// Opens the native share sheet. User cancellation is [`ShareError::Cancelled`].
    fn share(&mut self, title: &str, text: &str) -> Result<(), ShareError>;

    /// Opens a share-target URL with the system handler.
    fn open_url(&mut self, url: &str) -> Result<(), ShareError>;
}

/// Desktop surface: no share sheet, links open in the default browser.
#[derive(Debug, Default)]
pub struct DesktopShare;

impl ShareSurface for DesktopShare {
    fn share(&mut self, _title: &str, _text: &str) -> Result<(), ShareError> {
        Err(ShareError::ShareUnavailable)
    }

    fn open_url(&mut self, url: &str) -> Result<(), ShareError> {
        open::that(url).map_err(|e| ShareError::Failed(e.to_string()))
    }
}
