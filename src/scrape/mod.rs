mod extractor;
mod fetcher;
mod harvester;

pub use extractor::extract_items;
pub use fetcher::{PageFetcher, DEFAULT_TIMEOUT_SECS};
pub use harvester::Harvester;
