use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recognized icon image formats, in resolution priority order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IconFormat {
    Png,
    Svg,
    Jpg,
    Jpeg,
}

impl IconFormat {
    /// Candidate order for resolving a symbol to a file. First match wins.
    pub const PRIORITY: [IconFormat; 4] = [
        IconFormat::Png,
        IconFormat::Svg,
        IconFormat::Jpg,
        IconFormat::Jpeg,
    ];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            "jpg" => Some(Self::Jpg),
            "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
            Self::Jpg => "image/jpg",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// One icon file as seen by the listing and search endpoints.
///
/// `symbol` keeps the casing of the filename on disk; `format` keeps the
/// extension's original case. Consumers rely on this, so it is not normalized
/// here (the manifest uppercases separately).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconEntry {
    pub symbol: String,
    pub format: String,
    pub url: String,
}

/// One icon file as described in the manifest, with uppercased symbol and an
/// absolute CDN URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub symbol: String,
    pub format: String,
    pub url: String,
    #[serde(rename = "cdnUrl")]
    pub cdn_url: String,
}

/// The generated collection manifest, persisted as `manifest.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    pub description: String,
    /// Distinct uppercase symbols, sorted ascending.
    pub crypto: Vec<String>,
    /// One entry per file, so a symbol with two formats appears twice.
    pub icons: Vec<ManifestEntry>,
    #[serde(rename = "totalIcons")]
    pub total_icons: usize,
    pub formats: Vec<String>,
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconListResponse {
    pub total: usize,
    pub icons: Vec<IconEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub total: usize,
    pub icons: Vec<IconEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Seconds since process start.
    pub uptime: f64,
}
