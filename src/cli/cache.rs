use tabled::Table;

use crate::{
    config, error, info, management, management::CoverCacheManager, success,
    types::CacheTableRow,
};

/// Prints a listing of the cover cache with per-entry dimensions and sizes.
pub async fn cache_info() {
    let manager = CoverCacheManager::new(config::cache_dir());
    let entries = match manager.entries() {
        Ok(entries) => entries,
        Err(e) => error!("Cannot read cache directory. Err: {:?}", e),
    };

    if entries.is_empty() {
        info!("Cover cache at {} is empty.", manager.root().display());
        return;
    }

    let mut total_bytes: u64 = 0;
    let mut rows: Vec<CacheTableRow> = Vec::new();
    for path in &entries {
        let size = std::fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
        total_bytes += size;

        // Entries are self-validating; a cached file without a readable
        // image header is shown as invalid instead of trusted.
        let dimensions = match management::entry_dimensions(path) {
            Some((width, height)) => format!("{width}x{height}"),
            None => "invalid".to_string(),
        };

        let entry = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        rows.push(CacheTableRow {
            entry,
            dimensions,
            size: format!("{} KiB", size / 1024),
        });
    }

    let table = Table::new(rows);
    println!("{}", table);
    info!(
        "{} entries, {} KiB total at {}",
        entries.len(),
        total_bytes / 1024,
        manager.root().display()
    );
}

/// Removes every cached cover.
pub async fn cache_clear() {
    let manager = CoverCacheManager::new(config::cache_dir());
    match manager.clear() {
        Ok(removed) => success!("Removed {} cached cover(s).", removed),
        Err(e) => error!("Cannot clear cover cache. Err: {:?}", e),
    }
}
