use std::path::{Path, PathBuf};
use tokio::fs;

use crate::errors::AppError;
use crate::models::{IconEntry, IconFormat};

/// Filesystem access for the icon collection.
///
/// The directory is externally owned: every scan and resolve reads it fresh,
/// and nothing is cached in memory between requests.
#[derive(Clone)]
pub struct IconStore {
    icons_dir: PathBuf,
}

impl IconStore {
    pub fn new(icons_dir: PathBuf) -> Self {
        Self { icons_dir }
    }

    pub fn icons_dir(&self) -> &Path {
        &self.icons_dir
    }

    /// Extensions probed by [`resolve`](Self::resolve), in priority order.
    pub fn searched_formats() -> Vec<&'static str> {
        IconFormat::PRIORITY.iter().map(|f| f.extension()).collect()
    }

    /// List every recognized icon file in the directory, one entry per file.
    ///
    /// Symbols keep the casing of the filename on disk. Entries are sorted by
    /// filename so repeated scans are deterministic. Subdirectories and files
    /// with unrecognized extensions are skipped.
    pub async fn scan(&self) -> Result<Vec<IconEntry>, AppError> {
        let mut dir = match fs::read_dir(&self.icons_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::not_found(
                    "icons directory",
                    self.icons_dir.display().to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Some(icon) = Self::entry_from_filename(name) {
                entries.push(icon);
            }
        }

        entries.sort_by(|a, b| a.symbol.cmp(&b.symbol).then(a.format.cmp(&b.format)));
        Ok(entries)
    }

    /// Resolve a symbol to the bytes of its highest-priority file.
    ///
    /// The symbol is uppercased, then `{SYMBOL}.png`, `.svg`, `.jpg`, `.jpeg`
    /// are probed in order and the first file found wins. Returns `None` when
    /// no format matches.
    pub async fn resolve(
        &self,
        symbol: &str,
    ) -> Result<Option<(IconFormat, Vec<u8>)>, AppError> {
        let symbol = symbol.to_uppercase();
        for format in IconFormat::PRIORITY {
            let path = self
                .icons_dir
                .join(format!("{}.{}", symbol, format.extension()));
            match fs::read(&path).await {
                Ok(bytes) => return Ok(Some((format, bytes))),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(None)
    }

    fn entry_from_filename(name: &str) -> Option<IconEntry> {
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        IconFormat::from_extension(ext)?;
        Some(IconEntry {
            symbol: stem.to_string(),
            format: ext.to_string(),
            url: format!("/icons/{}", stem),
        })
    }
}
