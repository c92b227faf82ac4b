//! User-facing feedback and telemetry.

/// Telemetry event emitted when a snapshot is too large to share.
pub const TOO_BIG_EVENT: &str = "shared-fail-too-big";

/// A short notification for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn too_large() -> Self {
        Self::new("Too big!", "This project is too large to share.")
    }

    pub fn upload_failed() -> Self {
        Self::new("Error", "Uploading the project failed. Please try again.")
    }
}

/// Surfaces share results to the user and records telemetry.
pub trait Presentation: Send + Sync {
    fn toast(&self, toast: Toast);

    fn track(&self, event: &str, properties: &[(&str, String)]);
}

/// Presentation that only writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPresentation;

impl Presentation for LogPresentation {
    fn toast(&self, toast: Toast) {
        log::info!("{}: {}", toast.title, toast.description);
    }

    fn track(&self, event: &str, properties: &[(&str, String)]) {
        log::debug!("event {} {:?}", event, properties);
    }
}
