//! Optional diagnostic dump of visited pages.
//!
//! The engine receives a [`DebugSink`] as a capability. Sinks never fail the
//! caller: a sink that cannot write logs a warning and returns.

mod writer;

pub use writer::FsDumpSink;

use crate::DownloadedAsset;

/// Receives a copy of every visited page
pub trait DebugSink: Send + Sync {
    fn record_page(&self, url: &str, html: &str, assets: &[DownloadedAsset]);
}
