//! Harvests culture and event listings from a configured set of
//! webpages into SQLite, deduplicated by URL, with recent/stats/search
//! queries over the stored items.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod scrape;
