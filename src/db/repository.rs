use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::{
    ContentStats, ContentType, InsertSummary, Item, NewItem, RunState, RunStatus, SearchResult,
};

use super::schema::SCHEMA;

const ITEM_COLUMNS: &str =
    "id, title, url, summary, source_website, content_type, venue, event_date, tags, scraped_at";

/// Results scoring below this are not worth returning.
const MIN_RELEVANCE: f64 = 0.1;

pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    // Item operations

    /// Insert a batch of candidate items, skipping any whose URL is
    /// already stored. The whole batch commits as one transaction; a
    /// database error aborts the call and rolls everything back.
    pub async fn insert_items(&self, items: Vec<NewItem>) -> Result<InsertSummary> {
        // Serialize tags up front so the closure only deals in SQL values.
        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            let tags_json = serde_json::to_string(&item.tags)?;
            rows.push((
                item.title,
                item.url,
                item.summary,
                item.source_website,
                item.content_type.as_str(),
                item.venue,
                item.event_date.map(|dt| dt.to_rfc3339()),
                tags_json,
            ));
        }

        let summary = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let mut summary = InsertSummary::default();
                {
                    let mut stmt = tx.prepare(
                        r#"INSERT INTO items (title, url, summary, source_website, content_type, venue, event_date, tags)
                           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                           ON CONFLICT(url) DO NOTHING"#,
                    )?;
                    for (title, url, text, source, ctype, venue, event_date, tags) in &rows {
                        let changed = stmt
                            .execute(params![title, url, text, source, ctype, venue, event_date, tags])?;
                        if changed == 0 {
                            summary.skipped += 1;
                        } else {
                            summary.inserted += 1;
                        }
                    }
                }
                tx.commit()?;
                Ok(summary)
            })
            .await?;
        Ok(summary)
    }

    pub async fn count_items(&self) -> Result<i64> {
        let count = self
            .conn
            .call(|conn| {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;
        Ok(count)
    }

    /// Most recently harvested items, newest first.
    pub async fn recent_items(&self, limit: u32) -> Result<Vec<Item>> {
        let items = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ITEM_COLUMNS} FROM items ORDER BY scraped_at DESC, id DESC LIMIT ?1"
                ))?;
                let items = stmt
                    .query_map(params![limit], |row| Ok(item_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(items)
            })
            .await?;
        Ok(items)
    }

    /// Counts of stored items, total and grouped by content type and by
    /// source website.
    pub async fn stats(&self) -> Result<ContentStats> {
        let stats = self
            .conn
            .call(|conn| {
                let mut stats = ContentStats {
                    total: conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?,
                    ..ContentStats::default()
                };

                let mut type_stmt = conn
                    .prepare("SELECT content_type, COUNT(*) FROM items GROUP BY content_type")?;
                let by_type = type_stmt.query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
                })?;
                for entry in by_type {
                    let (kind, count) = entry?;
                    stats.by_type.insert(kind, count);
                }

                let mut source_stmt = conn
                    .prepare("SELECT source_website, COUNT(*) FROM items GROUP BY source_website")?;
                let by_source = source_stmt.query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
                })?;
                for entry in by_source {
                    let (source, count) = entry?;
                    stats.by_source.insert(source, count);
                }

                Ok(stats)
            })
            .await?;
        Ok(stats)
    }

    /// Relevance-ranked search over titles, summaries, tags and venues.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        content_type: Option<ContentType>,
    ) -> Result<Vec<SearchResult>> {
        let type_filter = content_type.map(|t| t.as_str().to_string());
        let candidates = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ITEM_COLUMNS} FROM items WHERE ?1 IS NULL OR content_type = ?1"
                ))?;
                let items = stmt
                    .query_map(params![type_filter], |row| Ok(item_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(items)
            })
            .await?;

        let mut results: Vec<SearchResult> = candidates
            .into_iter()
            .filter_map(|item| {
                let relevance_score = relevance_score(&item, query);
                (relevance_score > MIN_RELEVANCE).then_some(SearchResult {
                    item,
                    relevance_score,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);
        Ok(results)
    }

    // Harvest run tracking

    pub async fn record_run(
        &self,
        state: RunState,
        message: String,
        item_count: i64,
    ) -> Result<()> {
        let finished_at = match state {
            RunState::Running => None,
            _ => Some(Utc::now().to_rfc3339()),
        };
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO harvest_runs (id, status, message, item_count, finished_at)
                       VALUES (1, ?1, ?2, ?3, ?4)
                       ON CONFLICT(id) DO UPDATE SET
                           status = excluded.status,
                           message = excluded.message,
                           item_count = excluded.item_count,
                           finished_at = excluded.finished_at"#,
                    params![state.as_str(), message, item_count, finished_at],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// Status of the most recent harvest run, or `None` if one has never run.
    pub async fn last_run(&self) -> Result<Option<RunStatus>> {
        let status = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT status, message, item_count, finished_at FROM harvest_runs WHERE id = 1",
                )?;
                let status = stmt
                    .query_row([], |row| Ok(run_status_from_row(row)))
                    .optional()?;
                Ok(status)
            })
            .await?;
        Ok(status)
    }
}

/// Relevance of an item for a query, in `[0, 1]`. Title matches weigh
/// most, then summary, tags and venue.
pub fn relevance_score(item: &Item, query: &str) -> f64 {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return 0.0;
    }

    let mut score = field_score(&item.title.to_lowercase(), &query) * 0.4;
    score += field_score(&item.summary.to_lowercase(), &query) * 0.3;

    for tag in &item.tags {
        if tag.to_lowercase().contains(&query) {
            score += 0.2;
        }
    }

    if let Some(venue) = &item.venue {
        if venue.to_lowercase().contains(&query) {
            score += 0.1;
        }
    }

    score.min(1.0)
}

/// Full substring match scores 1.0; otherwise the fraction of query
/// tokens found in the field. Both inputs must already be lowercased.
fn field_score(field: &str, query: &str) -> f64 {
    if field.is_empty() {
        return 0.0;
    }
    if field.contains(query) {
        return 1.0;
    }
    let tokens: Vec<&str> = query.split_whitespace().collect();
    if tokens.is_empty() {
        return 0.0;
    }
    let hits = tokens.iter().filter(|t| field.contains(*t)).count();
    hits as f64 / tokens.len() as f64
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56+00:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Try SQLite datetime format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn item_from_row(row: &Row) -> Item {
    Item {
        id: row.get(0).unwrap(),
        title: row.get(1).unwrap(),
        url: row.get(2).unwrap(),
        summary: row.get(3).unwrap(),
        source_website: row.get(4).unwrap(),
        content_type: row
            .get::<_, String>(5)
            .ok()
            .and_then(|s| ContentType::parse(&s))
            .unwrap_or_default(),
        venue: row.get(6).unwrap(),
        event_date: row
            .get::<_, Option<String>>(7)
            .unwrap()
            .and_then(|s| parse_datetime(&s)),
        tags: row
            .get::<_, String>(8)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default(),
        scraped_at: row
            .get::<_, String>(9)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
    }
}

fn run_status_from_row(row: &Row) -> RunStatus {
    RunStatus {
        state: row
            .get::<_, String>(0)
            .ok()
            .and_then(|s| RunState::parse(&s))
            .unwrap_or(RunState::Failed),
        message: row.get(1).unwrap(),
        item_count: row.get(2).unwrap(),
        finished_at: row
            .get::<_, Option<String>>(3)
            .unwrap()
            .and_then(|s| parse_datetime(&s)),
    }
}
