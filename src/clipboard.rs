use async_trait::async_trait;
use copypasta::{ClipboardContext, ClipboardProvider};
use log::debug;

use crate::errors::ClipboardError;

// @module: System clipboard access

/// Destination for copied text
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard of the current desktop session, through `copypasta`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }

    fn set_contents(text: String) -> Result<(), ClipboardError> {
        let mut context = ClipboardContext::new().map_err(|e| ClipboardError::Command(e.to_string()))?;
        context
            .set_contents(text)
            .map_err(|e| ClipboardError::Command(e.to_string()))
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        debug!("Copying {} chars to the system clipboard", text.len());
        let text = text.to_owned();
        // The platform context is not Send, so it lives and dies on the blocking thread
        tokio::task::spawn_blocking(move || Self::set_contents(text))
            .await
            .map_err(|e| ClipboardError::Command(e.to_string()))?
    }
}
