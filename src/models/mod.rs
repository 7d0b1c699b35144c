mod item;
mod report;

pub use item::{ContentType, Item, NewItem, SearchResult};
pub use report::{ContentStats, HarvestReport, InsertSummary, RunState, RunStatus};
