use std::sync::Arc;

use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tokio::sync::Mutex;

use spotedit::{
    cli, config, error,
    library::{DEFAULT_LIMIT, MAX_LIMIT, PageCursor, Registry},
    spotify::SpotifyClient,
    types::{CreatePlaylistRequest, PkceToken, PlaylistDetails},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Create a playlist
    Create(CreateOptions),

    /// Follow a playlist or artist
    Follow(ItemOptions),

    /// Unfollow a playlist or artist
    Unfollow(RemoveItemOptions),

    /// Save a track, album, show or episode
    Save(ItemOptions),

    /// Remove a saved track, album, show or episode
    Unsave(RemoveItemOptions),

    /// Search the catalog or your own library
    Search(SearchOptions),

    /// List your library, or the contents of a playlist, album or show
    List(ListOptions),

    /// Edit a playlist
    Edit(EditOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CreateOptions {
    /// Name of the new playlist
    pub name: String,

    /// Playlist description
    #[clap(long, default_value = "")]
    pub desc: String,

    #[clap(long)]
    pub public: bool,

    #[clap(long)]
    pub collab: bool,

    /// Create even if a playlist with this name already exists
    #[clap(long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ItemOptions {
    /// playlist, track, artist, album, show or episode
    pub kind: String,
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct RemoveItemOptions {
    /// playlist, track, artist, album, show or episode
    pub kind: String,

    /// Name of the item, or its id with --id
    pub selector: String,

    /// Treat the selector as an id
    #[clap(long)]
    pub id: bool,

    /// Do not ask for confirmation
    #[clap(long)]
    pub no_prompt: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    pub kind: String,
    pub query: Option<String>,

    /// Search names among the items you follow or saved
    #[clap(long)]
    pub user: bool,

    #[clap(
        long,
        default_value_t = DEFAULT_LIMIT,
        value_parser = clap::value_parser!(u32).range(1..=MAX_LIMIT as i64)
    )]
    pub limit: u32,

    /// ISO 3166-1 alpha-2 country code
    #[clap(long)]
    pub market: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListOptions {
    pub kind: String,

    /// List the contents of this playlist, album or show instead of your library
    #[clap(long)]
    pub id: Option<String>,

    #[clap(
        long,
        default_value_t = DEFAULT_LIMIT,
        value_parser = clap::value_parser!(u32).range(1..=MAX_LIMIT as i64)
    )]
    pub limit: u32,

    #[clap(long, default_value_t = 0)]
    pub offset: u32,

    /// Retrieve every page
    #[clap(long)]
    pub retrieve_all: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct EditOptions {
    #[command(subcommand)]
    pub command: EditSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum EditSubcommand {
    /// Add tracks to a playlist
    Add(EditAddOpts),

    /// Remove tracks from a playlist
    Remove(EditRemoveOpts),

    /// Change playlist name, visibility or description
    Details(EditDetailsOpts),
}

#[derive(Args, Debug, Clone)]
pub struct EditAddOpts {
    pub playlist_id: String,

    #[clap(required = true)]
    pub track_ids: Vec<String>,

    /// Positions per track, e.g. "0,3; ...; 7"
    #[clap(long)]
    pub insert_at: Option<String>,

    /// Skip tracks already in the playlist
    #[clap(long)]
    pub add_if_unique: bool,
}

#[derive(Args, Debug, Clone)]
pub struct EditRemoveOpts {
    pub playlist_id: String,

    #[clap(required = true)]
    pub track_ids: Vec<String>,

    /// Remove every occurrence
    #[clap(long)]
    pub all: bool,

    /// Exact positions per track, e.g. "0,3; ...; 7"
    #[clap(long)]
    pub specific: Option<String>,

    /// Only search positions START..END; END -1 means to the end
    #[clap(
        long,
        num_args = 2,
        value_names = ["START", "END"],
        allow_negative_numbers = true
    )]
    pub offset: Option<Vec<i64>>,

    /// Occurrences to remove per track
    #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub count: u64,
}

#[derive(Args, Debug, Clone)]
pub struct EditDetailsOpts {
    pub playlist_id: String,

    #[clap(long)]
    pub name: Option<String>,

    #[clap(long)]
    pub public: Option<bool>,

    #[clap(long)]
    pub collaborative: Option<bool>,

    #[clap(long)]
    pub description: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

async fn registry() -> Registry {
    match SpotifyClient::from_cache().await {
        Ok(client) => Registry::new(Arc::new(client)),
        Err(e) => error!(
            "Failed to load token. Please run spotedit auth\n Error: {}",
            e
        ),
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Create(opt) => {
            let request = CreatePlaylistRequest {
                name: opt.name,
                description: opt.desc,
                public: opt.public,
                collaborative: opt.collab,
            };
            cli::create(&registry().await, request, opt.force).await
        }
        Command::Follow(opt) => cli::follow(&registry().await, &opt.kind, &opt.id).await,
        Command::Save(opt) => cli::save(&registry().await, &opt.kind, &opt.id).await,
        Command::Unfollow(opt) => {
            cli::unfollow(
                &registry().await,
                &opt.kind,
                &opt.selector,
                opt.id,
                opt.no_prompt,
            )
            .await
        }
        Command::Unsave(opt) => {
            cli::unsave(
                &registry().await,
                &opt.kind,
                &opt.selector,
                opt.id,
                opt.no_prompt,
            )
            .await
        }
        Command::Search(opt) => {
            cli::search(
                &registry().await,
                &opt.kind,
                opt.query,
                opt.user,
                opt.limit,
                opt.market,
            )
            .await
        }
        Command::List(opt) => {
            let cursor = PageCursor::new(opt.limit, opt.offset, opt.retrieve_all);
            cli::list(&registry().await, &opt.kind, opt.id, cursor).await
        }
        Command::Edit(opt) => match opt.command {
            EditSubcommand::Add(a) => {
                cli::add_tracks(
                    &registry().await,
                    &a.playlist_id,
                    &a.track_ids,
                    a.insert_at.as_deref(),
                    a.add_if_unique,
                )
                .await
            }
            EditSubcommand::Remove(r) => {
                cli::remove_tracks(
                    &registry().await,
                    &r.playlist_id,
                    &r.track_ids,
                    r.all,
                    r.specific.as_deref(),
                    r.offset.as_deref(),
                    r.count as usize,
                )
                .await
            }
            EditSubcommand::Details(d) => {
                let details = PlaylistDetails {
                    name: d.name,
                    public: d.public,
                    collaborative: d.collaborative,
                    description: d.description,
                };
                cli::edit_details(&registry().await, &d.playlist_id, details).await
            }
        },
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
