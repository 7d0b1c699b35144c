use std::time::Duration;

use event_harvester::config::Config;
use event_harvester::db::Repository;
use event_harvester::error::Result;
use event_harvester::models::Item;
use event_harvester::scrape::{Harvester, PageFetcher};

const USAGE: &str = "\
Usage: event-harvester [COMMAND]

Commands:
  harvest          Fetch all configured sources and store new items (default)
  recent [N]       Show the N most recently harvested items (default 20)
  stats            Show item counts by content type and source website
  search <QUERY>   Search stored items by relevance
  status           Show the status of the last harvest run
";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("harvest");

    let config = Config::load()?;
    let repository = Repository::new(&config.db_path).await?;

    match command {
        "harvest" => {
            let fetcher = PageFetcher::new(Duration::from_secs(config.fetch_timeout_secs));
            let harvester = Harvester::new(&repository, fetcher);
            let report = harvester.run(&config.sources).await?;

            println!(
                "Harvested {} sources: {} new items, {} duplicates skipped",
                report.sources_ok, report.inserted, report.skipped
            );
            for source in &report.failed_sources {
                println!("Failed: {}", source);
            }
        }

        "recent" => {
            let limit = args
                .get(2)
                .and_then(|s| s.parse().ok())
                .unwrap_or(20);
            let items = repository.recent_items(limit).await?;
            if items.is_empty() {
                println!("No items stored yet. Run `event-harvester harvest` first.");
            }
            for item in &items {
                print_item(item);
            }
        }

        "stats" => {
            let stats = repository.stats().await?;
            println!("Total items: {}", stats.total);
            println!("By content type:");
            for (kind, count) in &stats.by_type {
                println!("  {:<16} {}", kind, count);
            }
            println!("By source website:");
            for (source, count) in &stats.by_source {
                println!("  {:<60} {}", source, count);
            }
        }

        "search" => {
            let query = args[2..].join(" ");
            if query.trim().is_empty() {
                eprintln!("{}", USAGE);
                std::process::exit(2);
            }
            let results = repository.search(&query, 10, None).await?;
            if results.is_empty() {
                println!("No matches for '{}'", query);
            }
            for result in &results {
                println!("[{:.2}]", result.relevance_score);
                print_item(&result.item);
            }
        }

        "status" => match repository.last_run().await? {
            Some(run) => {
                println!("Status:  {}", run.state.as_str());
                println!("Message: {}", run.message);
                println!("Items:   {}", run.item_count);
                if let Some(finished) = run.finished_at {
                    println!("At:      {}", finished.to_rfc3339());
                }
            }
            None => println!("Harvest has never been run."),
        },

        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

fn print_item(item: &Item) {
    println!(
        "{} [{}] {}",
        item.scraped_at.format("%Y-%m-%d %H:%M"),
        item.content_type.as_str(),
        item.title
    );
    println!("    {}", item.url);
    if !item.tags.is_empty() {
        println!("    tags: {}", item.tags.join(", "));
    }
}
