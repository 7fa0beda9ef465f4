use crate::{Error, Result};
use chromiumoxide::browser::BrowserConfig;
use std::path::PathBuf;
use std::time::Duration;

/// How to start the controlled browser
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub chrome_path: PathBuf,
    pub profile_path: PathBuf,
    pub headless: bool,
    /// Timeout for individual CDP commands
    pub request_timeout: Duration,
}

impl LaunchOptions {
    pub fn new(chrome_path: PathBuf, profile_path: PathBuf) -> Self {
        Self {
            chrome_path,
            profile_path,
            headless: true,
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Build the chromiumoxide configuration
    pub fn build_config(&self) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .chrome_executable(&self.chrome_path)
            .user_data_dir(&self.profile_path)
            .request_timeout(self.request_timeout);

        if !self.headless {
            builder = builder.with_head();
        }

        for arg in self.build_args() {
            builder = builder.arg(arg);
        }

        builder
            .build()
            .map_err(|e| Error::Browser(format!("Failed to build browser config: {}", e)))
    }

    /// Extra command-line arguments passed to the browser
    fn build_args(&self) -> Vec<String> {
        vec![
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-extensions".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_options_build_args() {
        let options = LaunchOptions::new(
            PathBuf::from("/usr/bin/chromium"),
            PathBuf::from("/tmp/profile"),
        );

        let args = options.build_args();

        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(args.contains(&"--disable-dev-shm-usage".to_string()));
        assert!(args.contains(&"--no-first-run".to_string()));
    }

    #[test]
    fn test_launch_options_default_to_headless() {
        let options = LaunchOptions::new(
            PathBuf::from("/usr/bin/chromium"),
            PathBuf::from("/tmp/profile"),
        );
        assert!(options.headless);
        assert!(!options.headless(false).headless);
    }
}
