use std::collections::HashSet;

use tempfile::TempDir;

use event_harvester::db::Repository;
use event_harvester::models::{ContentType, NewItem, RunState};

async fn open_repo(dir: &TempDir) -> Repository {
    let db_path = dir.path().join("events.db");
    Repository::new(db_path.to_str().unwrap())
        .await
        .expect("open repository")
}

fn item(title: &str, url: &str) -> NewItem {
    NewItem {
        title: title.to_string(),
        url: url.to_string(),
        summary: String::new(),
        source_website: "https://example.com/".to_string(),
        content_type: ContentType::Article,
        venue: None,
        event_date: None,
        tags: Vec::new(),
    }
}

#[tokio::test]
async fn duplicate_url_insert_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    let first = repo
        .insert_items(vec![
            item("A long enough first title", "https://example.com/a"),
            item("A long enough second title", "https://example.com/b"),
        ])
        .await
        .unwrap();
    assert_eq!((first.inserted, first.skipped), (2, 0));

    // Same URL with a different title must not replace the stored row.
    let second = repo
        .insert_items(vec![
            item("A conflicting replacement title", "https://example.com/a"),
            item("A long enough third title", "https://example.com/c"),
        ])
        .await
        .unwrap();
    assert_eq!((second.inserted, second.skipped), (1, 1));
    assert_eq!(repo.count_items().await.unwrap(), 3);

    let items = repo.recent_items(10).await.unwrap();
    let stored_a = items
        .iter()
        .find(|i| i.url == "https://example.com/a")
        .unwrap();
    assert_eq!(stored_a.title, "A long enough first title");
}

#[tokio::test]
async fn repeated_identical_batch_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    let batch = vec![
        item("A long enough first title", "https://example.com/a"),
        item("A long enough second title", "https://example.com/b"),
    ];
    repo.insert_items(batch.clone()).await.unwrap();
    let again = repo.insert_items(batch).await.unwrap();

    assert_eq!((again.inserted, again.skipped), (0, 2));
    assert_eq!(repo.count_items().await.unwrap(), 2);

    let urls: Vec<String> = repo
        .recent_items(10)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.url)
        .collect();
    let distinct: HashSet<&String> = urls.iter().collect();
    assert_eq!(distinct.len(), urls.len());
}

#[tokio::test]
async fn schema_initialization_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("events.db");

    {
        let repo = Repository::new(db_path.to_str().unwrap()).await.unwrap();
        repo.insert_items(vec![item(
            "A title that survives reopening",
            "https://example.com/a",
        )])
        .await
        .unwrap();
    }

    // Reopening runs the schema again; existing rows must survive.
    let repo = Repository::new(db_path.to_str().unwrap()).await.unwrap();
    assert_eq!(repo.count_items().await.unwrap(), 1);
}

#[tokio::test]
async fn recent_items_come_newest_first() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    for (title, url) in [
        ("The first item to be stored", "https://example.com/1"),
        ("The second item to be stored", "https://example.com/2"),
        ("The third item to be stored", "https://example.com/3"),
    ] {
        repo.insert_items(vec![item(title, url)]).await.unwrap();
    }

    let recent = repo.recent_items(2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].url, "https://example.com/3");
    assert_eq!(recent[1].url, "https://example.com/2");
}

#[tokio::test]
async fn stats_group_by_type_and_source() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    let mut gig = item("A gig with a long enough title", "https://example.com/gig");
    gig.content_type = ContentType::Event;
    let mut talk = item("A talk with a long enough title", "https://other.example/talk");
    talk.source_website = "https://other.example/".to_string();

    repo.insert_items(vec![
        gig,
        talk,
        item("An article with a long title", "https://example.com/article"),
    ])
    .await
    .unwrap();

    let stats = repo.stats().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_type.get("event"), Some(&1));
    assert_eq!(stats.by_type.get("article"), Some(&2));
    assert_eq!(stats.by_source.get("https://example.com/"), Some(&2));
    assert_eq!(stats.by_source.get("https://other.example/"), Some(&1));
}

#[tokio::test]
async fn search_ranks_matches_and_honours_type_filter() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    let mut jazz = item("Jazz night at the old quarter", "https://example.com/jazz");
    jazz.content_type = ContentType::Event;
    jazz.tags = vec!["music".to_string()];
    let mut jazzish = item(
        "A column mentioning jazz in passing",
        "https://example.com/column",
    );
    jazzish.content_type = ContentType::Article;

    repo.insert_items(vec![
        jazz,
        jazzish,
        item("Gallery opening hours changed", "https://example.com/hours"),
    ])
    .await
    .unwrap();

    let results = repo.search("jazz", 10, None).await.unwrap();
    assert_eq!(results.len(), 2);
    for result in &results {
        assert!(result.relevance_score > 0.1);
        assert!(result.item.title.to_lowercase().contains("jazz"));
    }

    let events_only = repo
        .search("jazz", 10, Some(ContentType::Event))
        .await
        .unwrap();
    assert_eq!(events_only.len(), 1);
    assert_eq!(events_only[0].item.url, "https://example.com/jazz");

    let limited = repo.search("jazz", 1, None).await.unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn run_status_round_trips() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    assert!(repo.last_run().await.unwrap().is_none());

    repo.record_run(RunState::Running, "Harvest in progress".to_string(), 0)
        .await
        .unwrap();
    let running = repo.last_run().await.unwrap().unwrap();
    assert_eq!(running.state, RunState::Running);
    assert!(running.finished_at.is_none());

    repo.record_run(RunState::Completed, "Stored 7 new items".to_string(), 7)
        .await
        .unwrap();
    let done = repo.last_run().await.unwrap().unwrap();
    assert_eq!(done.state, RunState::Completed);
    assert_eq!(done.message, "Stored 7 new items");
    assert_eq!(done.item_count, 7);
    assert!(done.finished_at.is_some());
}
