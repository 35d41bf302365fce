use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tracing::{debug, info};

/// Opens a card's canonical viewing location outside the grid.
///
/// The grid never observes the outcome beyond an error to log.
pub trait Navigator {
    fn open(&self, url: &str) -> Result<()>;
}

/// Hands URLs to the desktop's default opener.
#[derive(Debug, Default)]
pub struct SystemNavigator;

impl SystemNavigator {
    fn opener() -> &'static str {
        if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        }
    }
}

impl Navigator for SystemNavigator {
    fn open(&self, url: &str) -> Result<()> {
        let opener = Self::opener();
        debug!(opener, url, "Opening external URL");
        Command::new(opener)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to launch {} for {}", opener, url))?;
        Ok(())
    }
}

/// Records navigations instead of performing them.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    opened: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn open(&self, url: &str) -> Result<()> {
        info!(url, "Navigation requested");
        self.opened.lock().push(url.to_string());
        Ok(())
    }
}
