//! Clipboard writes and copy-button feedback.
//!
//! A copy never fails loudly: the outcome only changes the button label
//! (`copy` -> `copied` / `error`), which reverts after [`COPY_FEEDBACK_DURATION`].

use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use arboard::Clipboard;
use log::{debug, warn};

/// Maximum clipboard size (64KB); everything copied here is a short timestamp string
const MAX_CLIPBOARD_SIZE: usize = 64 * 1024;

/// How long `copied` / `error` stays on a button before reverting to `copy`
pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_millis(1400);

/// Clipboard sink (allows mocking in tests)
pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard via arboard, opened per copy
pub struct SystemClipboard;

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

fn validate_clipboard_text(text: &str) -> Result<()> {
    if text.is_empty() {
        bail!("Cannot copy empty text to clipboard");
    }
    if text.len() > MAX_CLIPBOARD_SIZE {
        bail!("Text too large for clipboard ({} bytes, max {})", text.len(), MAX_CLIPBOARD_SIZE);
    }
    Ok(())
}

/// Validate then hand `text` to `provider`
pub fn copy_with(text: &str, provider: &mut dyn ClipboardProvider) -> Result<()> {
    validate_clipboard_text(text)?;
    provider.set_text(text)?;
    debug!("Copied {} bytes to clipboard", text.len());
    Ok(())
}

/// Copy text to the system clipboard.
///
/// # Errors
/// Returns error if the text is empty or oversized, or if the system clipboard
/// is unavailable (headless environment, denied access).
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    copy_with(text, &mut SystemClipboard)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyState {
    Idle,
    Copied,
    Failed,
}

/// Transient feedback for one copy affordance
#[derive(Debug, Clone)]
pub struct CopyButton {
    state: CopyState,
    changed_at: Option<Instant>,
}

impl Default for CopyButton {
    fn default() -> Self {
        Self::new()
    }
}

impl CopyButton {
    pub fn new() -> Self {
        Self { state: CopyState::Idle, changed_at: None }
    }

    pub fn state(&self) -> CopyState {
        self.state
    }

    pub fn label(&self) -> &'static str {
        match self.state {
            CopyState::Idle => "copy",
            CopyState::Copied => "copied",
            CopyState::Failed => "error",
        }
    }

    /// Copy `text` through `provider` and record the outcome
    pub fn press(
        &mut self,
        text: &str,
        provider: &mut dyn ClipboardProvider,
        now: Instant,
    ) -> CopyState {
        self.record(copy_with(text, provider), now)
    }

    /// Record a copy outcome; errors are logged, never returned
    pub fn record(&mut self, outcome: Result<()>, now: Instant) -> CopyState {
        self.state = match outcome {
            Ok(()) => CopyState::Copied,
            Err(e) => {
                warn!("Clipboard copy failed: {:#}", e);
                CopyState::Failed
            }
        };
        self.changed_at = Some(now);
        self.state
    }

    /// Revert to `copy` once feedback has been shown long enough.
    /// Returns true when the label changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.changed_at {
            Some(at) if now.saturating_duration_since(at) >= COPY_FEEDBACK_DURATION => {
                self.state = CopyState::Idle;
                self.changed_at = None;
                true
            }
            _ => false,
        }
    }
}
