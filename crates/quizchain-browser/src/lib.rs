//! The "controlled browser page" the engine drives.
//!
//! [`BrowserPage`] is the capability the navigation loop consumes; the
//! Chromium implementation is [`ChromiumSession`].

mod chrome_finder;
mod error;
mod launcher;
mod page;
mod profile;
mod session;

pub use chrome_finder::ChromeFinder;
pub use error::{Error, Result};
pub use launcher::LaunchOptions;
pub use page::{BrowserPage, FetchedResource};
pub use profile::ProfileManager;
pub use session::{ChromiumPage, ChromiumSession};
