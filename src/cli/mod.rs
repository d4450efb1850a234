//! # CLI Module
//!
//! User-facing commands. Each command resolves its kind tag through the
//! [`Registry`](crate::library::Registry), calls into the library layer and
//! turns the outcome into `info!`/`success!`/`warning!` lines. Any
//! [`LibraryError`](crate::error::LibraryError) ends the command through
//! `error!`, which prints the templated message and exits with code 1.
//!
//! ## Commands
//!
//! - [`auth`] - OAuth 2.0 PKCE authorization
//! - [`create`] - Create a playlist, refusing duplicate names unless forced
//! - [`follow`], [`save`] - Add an item to the user's library
//! - [`unfollow`], [`unsave`] - Remove an item from the user's library, by name or id
//! - [`search`] - Search the public catalog or the user's own library
//! - [`list`] - List a library, or the contents of a playlist, album or show
//! - [`add_tracks`], [`remove_tracks`], [`edit_details`] - Playlist editing
//!
//! ## Usage
//!
//! ```bash
//! spotedit auth
//! spotedit create "Road trip" --desc "long drives" --public
//! spotedit follow artist 0OdUWJ0sBjDrqHygGUXeCF
//! spotedit list playlist --retrieve-all
//! spotedit edit add <PLAYLIST_ID> <TRACK_A> <TRACK_B> --insert-at "0; ..."
//! spotedit edit remove <PLAYLIST_ID> <TRACK_A> --count 2 --offset 10 -1
//! ```

mod auth;
mod create;
mod edit;
mod library;
mod list;
mod search;

pub use auth::auth;
pub use create::create;
pub use edit::{add_tracks, edit_details, remove_tracks};
pub use library::{follow, save, unfollow, unsave};
pub use list::list;
pub use search::search;
