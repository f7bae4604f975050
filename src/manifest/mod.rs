//! Manifest generation and persistence.
//!
//! The manifest is derived state: a full directory scan produces a
//! [`Manifest`] record which is written out as pretty-printed JSON,
//! overwriting the previous artifact. It is never updated incrementally and
//! never held in memory across requests.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::icons::IconStore;
use crate::models::{Manifest, ManifestEntry};

const MANIFEST_NAME: &str = "binance-icons-collection";
const MANIFEST_DESCRIPTION: &str = "Cryptocurrency icons from Binance";

#[derive(Clone)]
pub struct ManifestService {
    store: IconStore,
    manifest_path: PathBuf,
    base_url: String,
    // Single-flight guard so concurrent lazy rebuilds do not race on the write.
    rebuild_lock: Arc<tokio::sync::Mutex<()>>,
}

impl ManifestService {
    pub fn new(store: IconStore, manifest_path: PathBuf, base_url: String) -> Self {
        Self {
            store,
            manifest_path,
            base_url,
            rebuild_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Derive a manifest from the current directory contents.
    ///
    /// Pure except for the scan itself: symbols are uppercased, deduplicated
    /// across formats, and sorted ascending into `crypto`; `icons` keeps one
    /// entry per file.
    pub async fn build(&self) -> Result<Manifest, AppError> {
        let files = self.store.scan().await?;

        let mut crypto: Vec<String> = files.iter().map(|f| f.symbol.to_uppercase()).collect();
        crypto.sort();
        crypto.dedup();

        let icons: Vec<ManifestEntry> = files
            .iter()
            .map(|f| {
                let symbol = f.symbol.to_uppercase();
                let url = format!("/icons/{}", symbol);
                ManifestEntry {
                    cdn_url: format!("{}{}", self.base_url, url),
                    symbol,
                    format: f.format.clone(),
                    url,
                }
            })
            .collect();

        Ok(Manifest {
            name: MANIFEST_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: MANIFEST_DESCRIPTION.to_string(),
            total_icons: crypto.len(),
            crypto,
            icons,
            formats: vec!["png".to_string(), "svg".to_string()],
            last_updated: chrono::Utc::now(),
        })
    }

    /// Rebuild the persisted artifact, overwriting any previous version.
    ///
    /// A missing icons directory is not an error: the artifact is left as-is
    /// until the directory appears and a rebuild runs again.
    pub async fn rebuild(&self) -> Result<(), AppError> {
        let manifest = match self.build().await {
            Ok(manifest) => manifest,
            Err(e) if e.is_not_found() => {
                warn!(
                    "Icons directory {} not found, skipping manifest rebuild",
                    self.store.icons_dir().display()
                );
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let contents = serde_json::to_string_pretty(&manifest)?;
        fs::write(&self.manifest_path, contents).await?;
        info!("Manifest updated: {} icons", manifest.total_icons);
        Ok(())
    }

    /// Read the persisted manifest, rebuilding it first if absent.
    pub async fn read_or_rebuild(&self) -> Result<Manifest, AppError> {
        {
            let _guard = self.rebuild_lock.lock().await;
            if !self.manifest_path.exists() {
                self.rebuild().await?;
            }
        }

        let contents = fs::read_to_string(&self.manifest_path).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}
