//! Collections, playlists and the kind registry, written against the
//! [`Catalog`](crate::spotify::Catalog) trait so none of it knows about HTTP.

mod collection;
mod paginator;
mod playlist;
pub mod positions;
pub mod registry;
mod resource;

pub use collection::{Collection, Selector};
pub use paginator::{DEFAULT_LIMIT, MAX_LIMIT, PageCursor, Paginator};
pub use playlist::{AddReport, Playlist, RemovalReport, RemoveOptions, walk_and_count};
pub use positions::{PositionLists, WalkRange, parse_position_lists};
pub use registry::{Registry, capabilities, resolve_kind};
pub use resource::Resource;
