mod cache;

pub use cache::CacheError;
pub use cache::CoverCacheManager;
pub use cache::entry_dimensions;
