pub const SCHEMA: &str = r#"
-- items table: one row per discovered link, deduplicated by URL.
-- The UNIQUE constraint on url is the sole deduplication authority.
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    url TEXT NOT NULL UNIQUE,
    summary TEXT NOT NULL DEFAULT '',
    source_website TEXT NOT NULL,
    content_type TEXT NOT NULL DEFAULT 'article',
    venue TEXT,
    event_date TEXT,
    tags TEXT NOT NULL DEFAULT '[]',
    scraped_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_items_scraped_at ON items(scraped_at DESC);
CREATE INDEX IF NOT EXISTS idx_items_content_type ON items(content_type);
CREATE INDEX IF NOT EXISTS idx_items_source_website ON items(source_website);

-- harvest_runs table: single-row record of the last harvest cycle
CREATE TABLE IF NOT EXISTS harvest_runs (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    status TEXT NOT NULL,
    message TEXT NOT NULL,
    item_count INTEGER NOT NULL DEFAULT 0,
    finished_at TEXT
);
"#;
