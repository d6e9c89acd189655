//! CampusCart CLI
//!
//! Browse marketplace listings and manage the local session from a terminal.

use std::path::PathBuf;
use std::sync::Arc;

use campuscart::{
    error::{AppError, Result},
    models::{Config, DatePosted, FilterSelection, FilterState, ListingKind, ReviewDraft, UserProfile},
    pipeline::{self, BrowseOptions},
    services::{MarketplaceClient, SessionStore},
    utils::geo::parse_coordinates,
};
use clap::{Args, Parser, Subcommand};

const CARD_TEMPLATE: &str = "[{tag}] {title} | {price} | {seller} | {location} | {date}";

/// CampusCart - Student Marketplace Client
#[derive(Parser, Debug)]
#[command(name = "campuscart", version, about = "Student marketplace client")]
struct Cli {
    /// Directory holding config.toml and the session file
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Override the API base URL from the config file
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List listings of one kind
    Browse(BrowseArgs),

    /// Count listings on every tab
    Overview,

    /// Review a listing
    Review {
        #[arg(long, default_value = "products")]
        kind: ListingKind,
        /// Listing id
        #[arg(long)]
        id: String,
        /// Stars, 1 to 5
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        comment: String,
    },

    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },

    /// Store a bearer token for authenticated requests
    Login {
        #[arg(long)]
        token: String,
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Validate configuration files
    Validate,
}

#[derive(Subcommand, Debug)]
enum WishlistAction {
    Add { id: String },
    Remove { id: String },
}

#[derive(Args, Debug)]
struct BrowseArgs {
    /// products, rooms, services or jobs
    #[arg(short, long, default_value = "products")]
    kind: ListingKind,

    /// Free-text search
    #[arg(short = 'q', long)]
    search: Option<String>,

    /// Saved filter query string, e.g. "location=Delhi&datePosted=7"
    #[arg(long)]
    filters: Option<String>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    location: Option<String>,

    #[arg(long)]
    min_price: Option<String>,

    #[arg(long)]
    max_price: Option<String>,

    /// Item condition, repeatable
    #[arg(long = "condition")]
    conditions: Vec<String>,

    /// today, this_week, this_month or a number of days
    #[arg(long)]
    date_posted: Option<String>,

    /// Your position as "lat,lng", adds distances
    #[arg(long)]
    near: Option<String>,

    #[arg(long)]
    limit: Option<usize>,

    /// Print listings as JSON
    #[arg(long)]
    json: bool,
}

impl BrowseArgs {
    /// Merge the saved query string with explicit flags, flags winning.
    fn selection(&self) -> FilterSelection {
        let mut selection = self
            .filters
            .as_deref()
            .map(|q| FilterSelection::decode(&FilterState::from_query_string(q)))
            .unwrap_or_default();

        let overrides = [
            (&self.category, &mut selection.category),
            (&self.location, &mut selection.location),
            (&self.min_price, &mut selection.min_price),
            (&self.max_price, &mut selection.max_price),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }
        if !self.conditions.is_empty() {
            selection.conditions = self.conditions.clone();
        }
        if let Some(raw) = &self.date_posted {
            match DatePosted::parse(raw) {
                Some(d) => selection.date_posted = Some(d),
                None => log::warn!("Ignoring unrecognised --date-posted value '{}'", raw),
            }
        }
        selection
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");
    let mut config = Config::load_or_default(&config_path);
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    log::debug!("Loaded configuration from {}", config_path.display());

    let session_path = config.session.path_in(&cli.storage_dir);
    let session = Arc::new(SessionStore::hydrate(&session_path).await);

    match cli.command {
        Command::Browse(args) => {
            let client = MarketplaceClient::new(&config.api, Arc::clone(&session))?;
            let origin = match args.near.as_deref() {
                Some(raw) => Some(parse_coordinates(raw).ok_or_else(|| {
                    AppError::validation(format!("--near expects \"lat,lng\", got '{raw}'"))
                })?),
                None => None,
            };
            let options = BrowseOptions {
                kind: args.kind,
                selection: args.selection(),
                search: args.search.clone().unwrap_or_default(),
                origin,
                limit: args.limit,
            };

            let listings = pipeline::run_browse(&config, Arc::new(client), options).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&listings)?);
            } else {
                for listing in &listings {
                    let mut line = listing.format(CARD_TEMPLATE);
                    if listing.distance_km.is_some() {
                        line.push_str(&listing.format(" | {distance}"));
                    }
                    println!("{line}");
                }
                log::info!("{} listings", listings.len());
            }
        }

        Command::Overview => {
            let client = MarketplaceClient::new(&config.api, Arc::clone(&session))?;
            for summary in pipeline::run_overview(&config, Arc::new(client)).await {
                match summary.result {
                    Ok(count) => println!("{:<8} {count}", summary.kind.tag()),
                    Err(message) => println!("{:<8} {message}", summary.kind.tag()),
                }
            }
        }

        Command::Review {
            kind,
            id,
            rating,
            comment,
        } => {
            let client = MarketplaceClient::new(&config.api, Arc::clone(&session))?;
            let draft = ReviewDraft::new(kind, id, rating, comment);
            client.submit_review(&draft).await?;
            log::info!("Review submitted for {} {}", draft.kind, draft.listing_id);
        }

        Command::Wishlist { action } => {
            let client = MarketplaceClient::new(&config.api, Arc::clone(&session))?;
            match action {
                WishlistAction::Add { id } => {
                    client.add_to_wishlist(&id).await?;
                    log::info!("Added {} to wishlist", id);
                }
                WishlistAction::Remove { id } => {
                    client.remove_from_wishlist(&id).await?;
                    log::info!("Removed {} from wishlist", id);
                }
            }
        }

        Command::Login {
            token,
            user_id,
            name,
            email,
        } => {
            let user = match (user_id, name) {
                (Some(id), Some(name)) => Some(UserProfile { id, name, email }),
                (None, None) => None,
                _ => {
                    return Err(AppError::validation(
                        "--user-id and --name must be given together",
                    ));
                }
            };
            session.login(token, user).await?;
            log::info!("Session saved to {}", session_path.display());
        }

        Command::Logout => session.logout().await?,

        Command::Whoami => match session.current_user() {
            Some(user) => println!("{} ({})", user.name, user.id),
            None if session.is_authenticated() => println!("Signed in (no profile stored)"),
            None => println!("Not signed in"),
        },

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}
