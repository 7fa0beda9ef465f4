use serde::{Deserialize, Serialize};
use url::Url;

/// Kind of a downloaded asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Csv,
    Pdf,
    Audio,
    Binary,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Csv => "csv",
            AssetKind::Pdf => "pdf",
            AssetKind::Audio => "audio",
            AssetKind::Binary => "binary",
        }
    }

    /// Classify by file extension first, then by the declared content type
    pub fn classify(url: &str, content_type: Option<&str>) -> Self {
        Self::from_extension(url)
            .or_else(|| content_type.and_then(Self::from_content_type))
            .unwrap_or(AssetKind::Binary)
    }

    /// Classify by the extension of the URL path (query and fragment ignored)
    pub fn from_extension(url: &str) -> Option<Self> {
        let path = match Url::parse(url) {
            Ok(parsed) => parsed.path().to_lowercase(),
            Err(_) => url
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .to_lowercase(),
        };

        let ext = path.rsplit_once('.').map(|(_, ext)| ext)?;
        match ext {
            "pdf" => Some(AssetKind::Pdf),
            "csv" => Some(AssetKind::Csv),
            "wav" | "mp3" => Some(AssetKind::Audio),
            _ => None,
        }
    }

    /// Classify by a `Content-Type` header value
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let parsed: mime::Mime = content_type.trim().parse().ok()?;

        if parsed.subtype() == mime::PDF {
            return Some(AssetKind::Pdf);
        }
        if parsed.subtype() == mime::CSV || parsed.subtype().as_str().contains("csv") {
            return Some(AssetKind::Csv);
        }
        if parsed.type_() == mime::AUDIO {
            return Some(AssetKind::Audio);
        }
        None
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file fetched for a single page visit
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedAsset {
    pub kind: AssetKind,
    pub source_url: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl DownloadedAsset {
    pub fn new(kind: AssetKind, source_url: impl Into<String>, bytes: Vec<u8>) -> Self {
        let source_url = source_url.into();
        let filename = filename_from_url(&source_url);
        Self {
            kind,
            source_url,
            filename,
            bytes,
        }
    }

    /// Metadata describing this asset, without its bytes
    pub fn manifest_entry(&self) -> AssetManifestEntry {
        AssetManifestEntry {
            kind: self.kind,
            url: self.source_url.clone(),
            filename: self.filename.clone(),
            bytes_len: self.bytes.len(),
        }
    }
}

/// One line of the debug-dump asset manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetManifestEntry {
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub url: String,
    pub filename: String,
    pub bytes_len: usize,
}

/// Last path segment of a URL, or an empty string
pub fn filename_from_url(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    path.rsplit('/').next().unwrap_or_default().to_string()
}
