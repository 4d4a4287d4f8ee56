//! AnimeTracker command-line client
//!
//! Rates episodes and OP/EDs, shows aggregate scores, and manages user lists
//! and the ranked top list against the AnimeTracker REST API.

use std::path::PathBuf;

use animetrack_client::{ApiClient, ClientConfig, TokenStore, default_token_path};
use animetrack_core::rating::{
    AggregateScore, AnimeScores, BandScale, Precision, RatingBand, RatingSubject,
};
use animetrack_core::top::{AddOutcome, ReorderOutcome, TopSnapshot};
use animetrack_core::{
    AnimeList, AnimetrackError, Capacity, ListDraft, Reconciler, normalize_rating, submit_comment,
    submit_rating,
};
use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Parser)]
#[command(name = "animetrack")]
#[command(about = "Rate anime and manage your lists and top list")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    connection: Connection,

    /// Maximum number of animes in the top list
    #[arg(short, long, env = "ANIMETRACK_TOP_CAPACITY", default_value_t = 5)]
    capacity: u32,
}

/// Where the API lives and where the session token is kept.
#[derive(Args)]
struct Connection {
    /// API root URL
    #[arg(long, env = "ANIMETRACK_API_URL")]
    api_url: Option<String>,

    /// File holding the bearer token
    #[arg(long, env = "ANIMETRACK_TOKEN_FILE")]
    token_file: Option<PathBuf>,
}

impl Connection {
    fn token_path(&self) -> PathBuf {
        self.token_file.clone().unwrap_or_else(default_token_path)
    }

    fn tokens(&self) -> Result<TokenStore> {
        let path = self.token_path();
        TokenStore::at(&path)
            .with_context(|| format!("Failed to open token file {}", path.display()))
    }

    fn client(&self) -> Result<ApiClient> {
        let mut config = ClientConfig::from_env().context("Invalid client configuration")?;
        if let Some(url) = &self.api_url {
            config = config.with_base_url(url.as_str());
        }
        ApiClient::new(config, self.tokens()?).context("Failed to build HTTP client")
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the stored bearer token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Show how typed digits would be stored, without sending anything
    Normalize {
        /// Digits as typed into a rating cell, e.g. "73" or "7.3"
        raw: String,
    },
    /// Rate or comment an episode, or rate an OP/ED
    Rate {
        #[command(subcommand)]
        target: RateTarget,
    },
    /// Show season and overall scores for an anime
    Score { anime_id: i64 },
    /// List the OP/EDs of a season with their average rating
    Music { anime_id: i64, season_id: i64 },
    /// Manage your anime lists; shows them all without a subcommand
    Lists {
        #[command(subcommand)]
        action: Option<ListAction>,
    },
    /// Manage the ranked top list
    Top {
        #[command(subcommand)]
        action: TopAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Store a token for later requests
    Set { value: String },
    /// Forget the stored token
    Clear,
}

#[derive(Subcommand)]
enum RateTarget {
    /// Rate an episode, comment it, or both
    Episode {
        id: i64,
        /// Digits as typed, e.g. "73" for 7.3. Omit to save only the comment.
        raw: Option<String>,
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Rate an opening or ending
    Music {
        id: i64,
        /// Digits as typed, e.g. "73" for 7.3
        raw: String,
        #[arg(short, long)]
        comment: Option<String>,
    },
}

#[derive(Subcommand)]
enum ListAction {
    /// Show one list with its animes
    Show { list_id: i64 },
    /// Create a list
    Create {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Change a list's title or description
    Edit {
        list_id: i64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a list
    Delete { list_id: i64 },
    /// Add an anime to a list
    Add { list_id: i64, anime_id: i64 },
    /// Remove an anime from a list, then refresh the top list
    Remove { list_id: i64, anime_id: i64 },
}

#[derive(Subcommand)]
enum TopAction {
    /// Show the top list
    List,
    /// Find animes of a list that could join the top
    Search { list_id: i64, query: String },
    /// Append an anime to the top list
    Add { anime_id: i64 },
    /// Remove an entry by its top-entry id
    Remove { entry_id: i64 },
    /// Move the entry at one rank to another (ranks start at 1)
    Move { from: usize, to: usize },
    /// Drop the entry at a rank outside the list, removing it
    Drop { rank: usize },
}

/// Converts a 1-based rank into a list index.
fn rank_to_index(rank: usize) -> Result<usize> {
    match rank.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("ranks start at 1"),
    }
}

fn print_snapshot(snap: &TopSnapshot) {
    println!(
        "{} ({} of {})",
        snap.capacity,
        snap.list.len(),
        snap.capacity.get()
    );
    if snap.list.is_empty() {
        println!("  no animes in the top yet");
        return;
    }
    for (index, entry) in snap.list.entries().iter().enumerate() {
        let id = entry
            .id
            .map_or_else(|| "pending".to_string(), |id| id.to_string());
        println!(
            "  #{:<3} {}  (entry {id}, position {})",
            index + 1,
            entry.label(),
            entry.position
        );
    }
    if !snap.list.is_consistent() {
        warn!("server positions are not contiguous; the order above may be partial");
    }
}

fn print_list(list: &AnimeList) {
    println!("[{}] {}", list.id, list.title);
    match list.description.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(description) => println!("  {description}"),
        None => println!("  (no description)"),
    }
    if list.items.is_empty() {
        println!("  no animes in this list yet");
    }
    for item in &list.items {
        println!("  - {} (anime {})", item.anime.title, item.anime.id);
    }
}

fn describe_score(score: AggregateScore, precision: Precision, scale: BandScale) -> String {
    let band = RatingBand::classify(score.value(), scale);
    format!("{} [{band}]", score.format(precision))
}

fn with_login_hint(err: AnimetrackError) -> anyhow::Error {
    match err {
        AnimetrackError::Unauthorized => anyhow::anyhow!(
            "session expired; run `animetrack token set <token>` with a fresh token"
        ),
        other => other.into(),
    }
}

async fn run_rate(api: ApiClient, target: RateTarget) -> Result<()> {
    let (subject, raw, comment) = match target {
        RateTarget::Episode {
            id,
            raw: Some(raw),
            comment,
        } => (RatingSubject::Episode(id), raw, comment),
        RateTarget::Episode {
            id,
            raw: None,
            comment,
        } => {
            let Some(comment) = comment else {
                bail!("nothing to save; pass a rating, a --comment, or both");
            };
            submit_comment(&api, id, &comment)
                .await
                .map_err(with_login_hint)
                .context("Failed to save comment")?;
            println!("Comment saved");
            return Ok(());
        }
        RateTarget::Music { id, raw, comment } => (RatingSubject::Music(id), raw, comment),
    };

    let saved = submit_rating(&api, subject, raw.trim(), comment.as_deref())
        .await
        .map_err(with_login_hint)
        .context("Failed to save rating")?;
    match saved {
        Some(rating) => println!("Saved {rating}"),
        None => println!("No rating entered; nothing changed."),
    }
    Ok(())
}

async fn run_lists(api: ApiClient, capacity: Capacity, action: Option<ListAction>) -> Result<()> {
    let login = |e: animetrack_client::ClientError| with_login_hint(e.into());

    match action {
        None => {
            let lists = api
                .get_lists()
                .await
                .map_err(login)
                .context("Failed to load lists")?;
            if lists.is_empty() {
                println!("No lists yet.");
            }
            for list in &lists {
                println!("[{}] {} ({} animes)", list.id, list.title, list.items.len());
            }
        }
        Some(ListAction::Show { list_id }) => {
            let list = api
                .get_list(list_id)
                .await
                .map_err(login)
                .context("Failed to load list")?;
            print_list(&list);
        }
        Some(ListAction::Create { title, description }) => {
            let mut draft = ListDraft::new(title)?;
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            let list = api
                .create_list(&draft)
                .await
                .map_err(login)
                .context("Failed to create list")?;
            println!("Created list {}", list.id);
        }
        Some(ListAction::Edit {
            list_id,
            title,
            description,
        }) => {
            if title.is_none() && description.is_none() {
                bail!("nothing to change; pass --title, --description, or both");
            }
            let current = api
                .get_list(list_id)
                .await
                .map_err(login)
                .context("Failed to load list")?;
            let mut draft = current.draft();
            if let Some(title) = title {
                draft = draft.with_title(title)?;
            }
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            let list = api
                .update_list(list_id, &draft)
                .await
                .map_err(login)
                .context("Failed to update list")?;
            print_list(&list);
        }
        Some(ListAction::Delete { list_id }) => {
            api.delete_list(list_id)
                .await
                .map_err(login)
                .context("Failed to delete list")?;
            println!("Deleted list {list_id}");
        }
        Some(ListAction::Add { list_id, anime_id }) => {
            let item = api
                .add_anime_to_list(list_id, anime_id)
                .await
                .map_err(login)
                .context("Failed to add anime to list")?;
            println!("Added {} to list {list_id}", item.anime.title);
        }
        Some(ListAction::Remove { list_id, anime_id }) => {
            api.remove_anime_from_list(list_id, anime_id)
                .await
                .map_err(login)
                .context("Failed to remove anime from list")?;
            println!("Removed anime {anime_id} from list {list_id}");
            // The server may drop the anime from the top as well.
            let store = Reconciler::new(api, capacity);
            store
                .reconcile()
                .await
                .map_err(with_login_hint)
                .context("Failed to refresh top list")?;
            print_snapshot(&store.snapshot());
        }
    }
    Ok(())
}

async fn run_top(api: ApiClient, capacity: Capacity, action: TopAction) -> Result<()> {
    let store = Reconciler::new(api, capacity);
    store
        .load()
        .await
        .map_err(with_login_hint)
        .context("Failed to load top list")?;

    match action {
        TopAction::List => {}
        TopAction::Search { list_id, query } => {
            let list = store
                .api()
                .get_list(list_id)
                .await
                .map_err(|e| with_login_hint(e.into()))
                .context("Failed to load list")?;
            let animes = list.animes();
            let found = store.snapshot().list.candidates(&animes, &query);
            if found.is_empty() {
                println!("No matching animes outside the top.");
            }
            for anime in found {
                println!("  {} (anime {})", anime.title, anime.id);
            }
            return Ok(());
        }
        TopAction::Add { anime_id } => match store.add(anime_id).await {
            AddOutcome::Added { position } => info!(anime_id, position, "anime added"),
            AddOutcome::Full => println!("The top list is full ({capacity})."),
            AddOutcome::Duplicate => println!("Anime {anime_id} is already in the top list."),
        },
        TopAction::Remove { entry_id } => {
            if !store.remove(entry_id).await {
                println!("No top entry with id {entry_id}.");
            }
        }
        TopAction::Move { from, to } => {
            let outcome = store
                .reorder(rank_to_index(from)?, Some(rank_to_index(to)?))
                .await?;
            if let ReorderOutcome::Reordered { failed, .. } = outcome {
                if failed > 0 {
                    println!("{failed} position update(s) failed; showing the server's order.");
                }
            }
        }
        TopAction::Drop { rank } => {
            store.reorder(rank_to_index(rank)?, None).await?;
        }
    }

    print_snapshot(&store.snapshot());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let conn = &cli.connection;

    match cli.command {
        Commands::Normalize { raw } => match normalize_rating(raw.trim()) {
            Some(rating) => println!("{rating}"),
            None => println!("-"),
        },
        Commands::Token { action } => match action {
            TokenAction::Set { value } => {
                conn.tokens()?
                    .set(value.trim())
                    .context("Failed to store token")?;
                println!("Token saved to {}", conn.token_path().display());
            }
            TokenAction::Clear => {
                conn.tokens()?.clear().context("Failed to clear token")?;
                println!("Token cleared");
            }
        },
        Commands::Rate { target } => run_rate(conn.client()?, target).await?,
        Commands::Score { anime_id } => {
            let api = conn.client()?;
            let detail = api
                .get_anime_detail(anime_id)
                .await
                .map_err(|e| with_login_hint(e.into()))
                .context("Failed to load anime")?;
            let scores = AnimeScores::compute(&detail);
            println!("{}", detail.title);
            for (season, score) in detail.seasons.iter().zip(&scores.seasons) {
                println!(
                    "  Season {:<3} {}",
                    season.number,
                    describe_score(*score, Precision::Season, BandScale::Episode)
                );
            }
            println!(
                "  Overall    {}",
                describe_score(scores.anime, Precision::Season, BandScale::Episode)
            );
        }
        Commands::Music {
            anime_id,
            season_id,
        } => {
            let api = conn.client()?;
            let songs = api
                .get_music(anime_id, season_id)
                .await
                .map_err(|e| with_login_hint(e.into()))
                .context("Failed to load OP/ED list")?;
            if songs.is_empty() {
                println!("No OP/ED registered for this season.");
            }
            for song in &songs {
                println!(
                    "  {} {:<40} {}",
                    song.kind,
                    song.name,
                    describe_score(song.average(), Precision::Badge, BandScale::Music)
                );
            }
        }
        Commands::Lists { action } => {
            let capacity = Capacity::new(cli.capacity).context("Invalid --capacity")?;
            run_lists(conn.client()?, capacity, action).await?;
        }
        Commands::Top { action } => {
            let capacity = Capacity::new(cli.capacity).context("Invalid --capacity")?;
            run_top(conn.client()?, capacity, action).await?;
        }
    }

    Ok(())
}
