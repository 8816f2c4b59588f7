//! System clipboard access

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(#[source] arboard::Error),

    #[error("Clipboard access failed: {0}")]
    Access(#[source] arboard::Error),
}

pub type Result<T> = std::result::Result<T, ClipboardError>;

pub trait Clipboard {
    fn get_text(&mut self) -> Result<String>;
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Clipboard backed by the OS via arboard.
///
/// The OS handle is opened on first use and reopened after a failure.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().map_err(ClipboardError::Unavailable)?,
        };
        Ok(self.inner.insert(clipboard))
    }
}

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Result<String> {
        let result = self.handle()?.get_text();
        result.map_err(|e| {
            self.inner = None;
            ClipboardError::Access(e)
        })
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        let result = self.handle()?.set_text(text.to_string());
        result.map_err(|e| {
            self.inner = None;
            ClipboardError::Access(e)
        })
    }
}
