mod repository;
mod schema;

pub use repository::{relevance_score, Repository};
