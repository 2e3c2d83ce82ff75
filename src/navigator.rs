//! Hand-off of URLs to the browser.

use crate::error::{AppError, Result};

/// Where a URL should be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenTarget {
    /// Replace this page: the app exits after the hand-off.
    CurrentTab,
    /// Open alongside; the app keeps running.
    NewTab,
}

pub trait Navigator {
    fn open(&mut self, url: &str, target: OpenTarget) -> Result<()>;
}

/// Opens URLs with the platform's default handler.
#[derive(Debug, Default)]
pub struct SystemNavigator;

impl Navigator for SystemNavigator {
    fn open(&mut self, url: &str, target: OpenTarget) -> Result<()> {
        log::info!("opening {} ({:?})", url, target);
        open::that(url).map_err(|e| AppError::Host(format!("{}: {}", url, e)))
    }
}
