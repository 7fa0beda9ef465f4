use super::DebugSink;
use crate::model::AssetManifestEntry;
use crate::{AssetKind, DownloadedAsset, Result};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

const MAX_STEM_LEN: usize = 120;

/// Writes page HTML, an asset manifest and audio assets into a directory
#[derive(Debug, Clone)]
pub struct FsDumpSink {
    dir: PathBuf,
}

impl FsDumpSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one page's dump and return the HTML file path
    pub fn write_page(&self, url: &str, html: &str, assets: &[DownloadedAsset]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let stem = format!(
            "{}_{}",
            safe_stem(url),
            chrono::Utc::now().timestamp_millis()
        );

        let html_path = self.dir.join(format!("{stem}.html"));
        fs::write(&html_path, html)?;

        let manifest: Vec<AssetManifestEntry> =
            assets.iter().map(DownloadedAsset::manifest_entry).collect();
        let manifest_path = self.dir.join(format!("{stem}_downloads.json"));
        let writer = BufWriter::new(File::create(&manifest_path)?);
        serde_json::to_writer_pretty(writer, &manifest)?;

        for (i, asset) in assets.iter().enumerate() {
            if asset.kind != AssetKind::Audio || asset.bytes.is_empty() {
                continue;
            }
            let ext = Path::new(&asset.filename)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("wav");
            let audio_path = self.dir.join(format!("{stem}_audio_{i}.{ext}"));
            if let Err(e) = fs::write(&audio_path, &asset.bytes) {
                tracing::debug!("Skipping audio dump {}: {}", audio_path.display(), e);
            }
        }

        tracing::debug!(
            "Dumped page {} with {} assets to {}",
            url,
            assets.len(),
            self.dir.display()
        );

        Ok(html_path)
    }
}

impl DebugSink for FsDumpSink {
    fn record_page(&self, url: &str, html: &str, assets: &[DownloadedAsset]) {
        if let Err(e) = self.write_page(url, html, assets) {
            tracing::warn!("Debug dump for {} failed: {}", url, e);
        }
    }
}

/// File-name-safe rendering of a URL
fn safe_stem(url: &str) -> String {
    url.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .take(MAX_STEM_LEN)
        .collect()
}
