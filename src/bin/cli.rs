//! Newsroom CLI
//!
//! Command-line access to the newsroom CMS API.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use newsroom::{
    client::{ApiClient, SessionEvent},
    config::load_config,
    error::{AppError, Result},
    feed::{ArticleFeed, FeedSettings, FeedUpdate},
    models::{ArticleStatus, ArticleSummary, Config, MediaUpload},
    query::{ArticleQuery, FilterChange, FilterState, MediaQuery},
    session::Session,
    utils::url::resolve_asset_url,
};
use serde::Serialize;
use tokio::sync::mpsc;

/// Environment variable read by `login` when `--password` is omitted.
const PASSWORD_ENV: &str = "NEWSROOM_PASSWORD";

/// Newsroom - CMS API client
#[derive(Parser, Debug)]
#[command(name = "newsroom", version, about = "Newsroom CMS API client")]
struct Cli {
    /// Path to the TOML config file (default: ./newsroom.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print raw JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and persist the access token
    Login {
        #[arg(long)]
        email: String,
        /// Password (falls back to $NEWSROOM_PASSWORD)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the persisted access token
    Logout,

    /// List articles
    Articles {
        /// Category slug
        #[arg(long)]
        category: Option<String>,
        /// draft, published or archived
        #[arg(long)]
        status: Option<ArticleStatus>,
        /// Only highlighted (true) or non-highlighted (false) articles
        #[arg(long)]
        highlight: Option<bool>,
        /// Earliest publication date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest publication date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Narrow the fetched page by title or summary
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Overrides listing.page_size
        #[arg(long)]
        page_size: Option<u32>,
        /// Include every status instead of listing.default_status
        #[arg(long)]
        all: bool,
    },

    /// Show one article
    Article {
        /// Article slug
        slug: Option<String>,
        /// Look up by id instead of slug
        #[arg(long, conflicts_with = "slug")]
        id: Option<String>,
    },

    /// List categories
    Categories,

    /// Show a category with its first page of articles
    Category { slug: String },

    /// List tags
    Tags,

    /// List users (requires login)
    Users,

    /// List media assets
    Media {
        /// Search text
        #[arg(short, long)]
        query: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u64>,
    },

    /// Upload a media file (requires login)
    Upload {
        file: PathBuf,
        #[arg(long)]
        alt: Option<String>,
        #[arg(long)]
        caption: Option<String>,
        #[arg(long)]
        credit: Option<String>,
        /// Overrides the mime type guessed from the extension
        #[arg(long)]
        mime: Option<String>,
    },

    /// List homepage sections
    Sections,

    /// List the items of a homepage section
    SectionItems { section_id: String },

    /// Validate the configuration
    Validate,
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_article_line(config: &Config, article: &ArticleSummary) {
    let date = article
        .published_at
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    let mut flags = String::new();
    if article.is_breaking {
        flags.push('B');
    }
    if article.is_featured {
        flags.push('F');
    }
    if article.is_highlight {
        flags.push('H');
    }
    println!(
        "{}  {:<3} {:<9} {}  [{}]",
        date,
        flags,
        article.status.as_str(),
        article.title,
        article.slug
    );
    if let Some(hero) = article.hero_image_url.as_deref().filter(|h| !h.is_empty()) {
        println!(
            "             hero: {}",
            resolve_asset_url(&config.api.asset_base_url, hero)
        );
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The log level comes from the config, so logging starts after loading.
    let config = load_config(cli.config.as_deref());
    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(cli.verbose, &level);
    let config = config?;

    if let Command::Validate = cli.command {
        log::info!("Validating configuration...");
        log::info!("API base: {}", config.api.base_url);
        match config.session.token_path() {
            Some(path) => log::info!("Token file: {}", path.display()),
            None => log::info!("Token file: none (in-memory session)"),
        }
        log::info!("All validations passed!");
        return Ok(());
    }

    let session = Arc::new(Session::from_config(&config.session).await?);
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let client = ApiClient::new(&config.api, Arc::clone(&session))?.with_listener(events_tx);

    let outcome = run(&cli, &config, &client).await;

    while let Ok(event) = events_rx.try_recv() {
        match event {
            SessionEvent::Expired => {
                log::error!("Session expired. Run `newsroom login` to sign in again.")
            }
            SessionEvent::AccessDenied => {
                log::error!("Access denied for the current user.")
            }
        }
    }
    outcome
}

async fn run(cli: &Cli, config: &Config, client: &ApiClient) -> Result<()> {
    match &cli.command {
        Command::Login { email, password } => {
            let password = match password {
                Some(p) => p.clone(),
                None => std::env::var(PASSWORD_ENV).map_err(|_| {
                    AppError::validation(format!("--password or ${PASSWORD_ENV} is required"))
                })?,
            };
            if config.session.token_path().is_none() {
                log::warn!("session.token_file is not set; the token will not be kept");
            }
            client.login(email, &password).await?;
            log::info!("Logged in as {}", email);
        }

        Command::Logout => {
            client.logout().await?;
            log::info!("Logged out");
        }

        Command::Articles {
            category,
            status,
            highlight,
            from,
            to,
            search,
            page,
            page_size,
            all,
        } => {
            let mut settings = FeedSettings::from_config(&config.listing);
            if let Some(size) = page_size {
                settings.page_size = *size;
            }

            let mut filters = FilterState::new();
            filters.apply(FilterChange::Category(category.clone()));
            let status = if *all {
                None
            } else {
                status.or(config.listing.default_status)
            };
            filters.apply(FilterChange::Status(status));
            filters.apply(FilterChange::Highlight(*highlight));
            filters.apply(FilterChange::DateFrom(*from));
            filters.apply(FilterChange::DateTo(*to));
            if let Some(term) = search {
                filters.apply(FilterChange::Search(term.clone()));
            }
            filters.validate(settings.date_range)?;

            let mut feed = ArticleFeed::new(Arc::new(client.clone()), settings.with_filters(filters));
            feed.apply(FilterChange::Page(*page))?;
            match feed.settle().await {
                Some(FeedUpdate::Failed(e)) => return Err(e),
                Some(FeedUpdate::Degraded(e)) => log::warn!("Showing no results: {}", e),
                _ => {}
            }

            if cli.json {
                #[derive(Serialize)]
                struct Listing<'a> {
                    page: u32,
                    articles: &'a [ArticleSummary],
                    featured: Option<&'a ArticleSummary>,
                    has_next: bool,
                    has_prev: bool,
                }
                print_json(&Listing {
                    page: feed.pagination().page(),
                    articles: feed.visible(),
                    featured: feed.featured(),
                    has_next: feed.pagination().can_next(),
                    has_prev: feed.pagination().can_prev(),
                })?;
            } else {
                if let Some(featured) = feed.featured() {
                    println!("Featured: {}", featured.title);
                    if !featured.summary_text().is_empty() {
                        println!("  {}", featured.summary_text());
                    }
                    println!();
                }
                if feed.visible().is_empty() {
                    println!("No articles found.");
                }
                for article in feed.visible() {
                    print_article_line(config, article);
                }
                let pagination = feed.pagination();
                if pagination.show_controls() {
                    println!();
                    println!(
                        "Page {}{}{}",
                        pagination.page(),
                        if pagination.can_prev() { "  --page for previous" } else { "" },
                        if pagination.can_next() { "  more available" } else { "" },
                    );
                }
            }
            feed.teardown();
        }

        Command::Article { slug, id } => {
            let article = match (slug, id) {
                (_, Some(id)) => client.get_article_by_id(id).await?,
                (Some(slug), None) => client.get_article(slug).await?,
                (None, None) => {
                    return Err(AppError::validation("an article slug or --id is required"));
                }
            };
            if cli.json {
                print_json(&article)?;
            } else {
                println!("{}", article.summary.title);
                print_article_line(config, &article.summary);
                let categories: Vec<_> = article
                    .summary
                    .categories
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect();
                let tags: Vec<_> = article.tags.iter().map(|t| t.name.as_str()).collect();
                println!("Categories: {}", categories.join(", "));
                println!("Tags: {}", tags.join(", "));
                println!();
                println!("{}", article.body);
            }
        }

        Command::Categories => {
            let categories = client.list_categories().await?;
            if cli.json {
                print_json(&categories)?;
            } else {
                for category in &categories {
                    println!("{:<24} {}", category.slug, category.name);
                }
            }
        }

        Command::Category { slug } => {
            let filters = FilterState::for_category(slug.clone());
            let query = ArticleQuery::from_filters(&filters, config.listing.page_size);
            let (category, articles) =
                futures::try_join!(client.get_category(slug), client.list_articles(&query))?;

            if cli.json {
                print_json(&serde_json::json!({
                    "category": category,
                    "articles": articles,
                }))?;
            } else {
                println!("{} ({})", category.name, category.slug);
                for article in &articles {
                    print_article_line(config, article);
                }
            }
        }

        Command::Tags => {
            let tags = client.list_tags().await?;
            if cli.json {
                print_json(&tags)?;
            } else {
                for tag in &tags {
                    println!("{:<24} {}", tag.slug, tag.name);
                }
            }
        }

        Command::Users => {
            let users = client.list_users().await?;
            if cli.json {
                print_json(&users)?;
            } else {
                for user in &users {
                    println!(
                        "{:<32} {:<20} {}",
                        user.email,
                        user.name.as_deref().unwrap_or("-"),
                        user.role.as_deref().unwrap_or("-")
                    );
                }
            }
        }

        Command::Media {
            query,
            limit,
            offset,
        } => {
            let query = MediaQuery {
                q: query.clone(),
                limit: *limit,
                offset: *offset,
            };
            let assets = client.list_media(&query).await?;
            if cli.json {
                print_json(&assets)?;
            } else {
                for asset in &assets {
                    println!(
                        "{:<28} {}",
                        asset.file_name,
                        resolve_asset_url(&config.api.asset_base_url, &asset.url)
                    );
                }
            }
        }

        Command::Upload {
            file,
            alt,
            caption,
            credit,
            mime,
        } => {
            let bytes = tokio::fs::read(file).await?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| AppError::validation("upload path has no file name"))?;

            let mut upload = MediaUpload::new(file_name, bytes);
            upload.mime_type = mime.clone();
            upload.alt_text = alt.clone();
            upload.caption = caption.clone();
            upload.credit = credit.clone();

            let asset = client.upload_media(upload).await?;
            if cli.json {
                print_json(&asset)?;
            } else {
                log::info!(
                    "Uploaded {} -> {}",
                    asset.file_name,
                    resolve_asset_url(&config.api.asset_base_url, &asset.url)
                );
            }
        }

        Command::Sections => {
            let sections = client.list_sections().await?;
            if cli.json {
                print_json(&sections)?;
            } else {
                for section in &sections {
                    println!("{:<12} {:<20} {}", section.id, section.key, section.title);
                }
            }
        }

        Command::SectionItems { section_id } => {
            let mut items = client.list_section_items(section_id).await?;
            items.sort_by_key(|item| item.position);
            if cli.json {
                print_json(&items)?;
            } else {
                for item in &items {
                    println!("{:>4}  {}", item.position, item.article_id);
                }
            }
        }

        Command::Validate => {}
    }

    Ok(())
}
