// Entry point - parse flags, wire up the catalog, then hand off to the TUI or print
use anyhow::Context;
use artscout_api::MetClient;
use artscout_core::{
    caption, format_details, CachedCatalog, CatalogSource, Config, Explorer, MetCatalog,
    ObjectId, ObjectRecord, PageSize, PageState, Query, SearchOutcome,
};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "artscout")]
#[command(version, about = "Browse The Met's open collection from the terminal", long_about = None)]
struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Search the collection and print one page of results
    Search {
        /// Keyword, e.g. "Van Gogh"
        keyword: String,

        /// Page to show, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Results per page: 9, 12, 15, 18 or 24
        #[arg(long, value_parser = parse_page_size)]
        page_size: Option<PageSize>,

        /// Print the page as JSON
        #[arg(long)]
        json: bool,

        /// Include every detail row for each object
        #[arg(long)]
        details: bool,
    },
    /// Show everything known about one object
    Show {
        /// Met object ID
        id: ObjectId,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_page_size(value: &str) -> Result<PageSize, String> {
    let size: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    PageSize::try_from(size)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal, so it stays quiet unless RUST_LOG asks otherwise
    let default_filter = if cli.command.is_some() {
        "artscout=info"
    } else {
        "off"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load config")?;

    let client = MetClient::with_config(config.api.client_config())
        .context("Failed to build HTTP client")?;
    let catalog = CachedCatalog::new(MetCatalog::new(client), config.cache.ttl());
    let explorer = Explorer::new(catalog);

    match cli.command {
        Some(Commands::Search {
            keyword,
            page,
            page_size,
            json,
            details,
        }) => {
            let page_size = page_size.unwrap_or(config.ui.page_size);
            search(&explorer, &keyword, page, page_size, json, details).await
        }
        Some(Commands::Show { id, json }) => show(&explorer, id, json).await,
        None => {
            let app = artscout_tui::App::new(config.ui.page_size, config.ui.grid_columns);
            artscout_tui::run_tui(app, explorer).await
        }
    }
}

async fn search<C: CatalogSource>(
    explorer: &Explorer<C>,
    keyword: &str,
    page: usize,
    page_size: PageSize,
    json: bool,
    details: bool,
) -> anyhow::Result<()> {
    tracing::info!("Searching for: {}", keyword);

    let query = Query::new(keyword, page_size);
    let results = match explorer.search(&query).await.context("Search failed")? {
        // Nothing was searched, which is not a failure
        SearchOutcome::Prompt => {
            print_no_results(json, "Enter a keyword to search the collection.");
            return Ok(());
        }
        SearchOutcome::Empty => {
            print_no_results(json, "No results found. Try another keyword.");
            return Ok(());
        }
        SearchOutcome::Results(results) => results,
    };

    // Out of range pages land on the nearest valid one
    let state = PageState::at(page, usize::MAX);
    let view = explorer.load_page(&results, page_size, state).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!(
        "{}  (page {} of {})",
        view.summary(),
        view.state.page(),
        view.total_pages
    );
    for record in &view.records {
        println!();
        print_record(record, details);
    }

    if !view.skipped.is_empty() {
        println!();
        println!("{} object(s) could not be loaded", view.skipped.len());
    }

    Ok(())
}

async fn show<C: CatalogSource>(
    explorer: &Explorer<C>,
    id: ObjectId,
    json: bool,
) -> anyhow::Result<()> {
    tracing::info!("Showing object: {}", id);

    let record = explorer
        .catalog()
        .get_object(id)
        .await
        .with_context(|| format!("Failed to fetch object {}", id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_record(&record, true);
    }

    Ok(())
}

fn print_no_results(json: bool, message: &str) {
    if json {
        println!("{}", serde_json::json!({ "total": 0, "records": [] }));
    } else {
        println!("{}", message);
    }
}

fn print_record(record: &ObjectRecord, details: bool) {
    println!("{} [#{}]", record.display_title(), record.object_id);

    let caption = caption(record);
    if !caption.is_empty() {
        println!("  {}", caption);
    }
    if let Some(url) = record.image_url() {
        println!("  {}", url);
    }

    if details {
        for row in format_details(record) {
            println!("  {}: {}", row.label, row.value);
        }
        if let Some(url) = record.object_url.as_deref().filter(|u| !u.is_empty()) {
            println!("  {}", url);
        }
    }
}
