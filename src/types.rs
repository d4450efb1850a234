use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// The six resource kinds the catalog exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Playlist,
    Track,
    Artist,
    Album,
    Show,
    Episode,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Playlist,
        ResourceKind::Track,
        ResourceKind::Artist,
        ResourceKind::Album,
        ResourceKind::Show,
        ResourceKind::Episode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Playlist => "playlist",
            ResourceKind::Track => "track",
            ResourceKind::Artist => "artist",
            ResourceKind::Album => "album",
            ResourceKind::Show => "show",
            ResourceKind::Episode => "episode",
        }
    }

    /// What the members of a resource of this kind are, if it holds any.
    pub fn member_kind(&self) -> Option<ResourceKind> {
        match self {
            ResourceKind::Playlist | ResourceKind::Album => Some(ResourceKind::Track),
            ResourceKind::Show => Some(ResourceKind::Episode),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == tag)
            .ok_or_else(|| format!("Item of type '{}' not recognized!", s))
    }
}

/// Which collection a page request or membership change targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionScope {
    /// The current user's followed or saved items of one kind.
    Library(ResourceKind),
    /// The members of a single playlist, album or show.
    Contents { parent: ResourceKind, id: String },
}

impl CollectionScope {
    pub fn member_kind(&self) -> Option<ResourceKind> {
        match self {
            CollectionScope::Library(kind) => Some(*kind),
            CollectionScope::Contents { parent, .. } => parent.member_kind(),
        }
    }
}

impl fmt::Display for CollectionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionScope::Library(kind) => write!(f, "library of {}s", kind),
            CollectionScope::Contents { parent, id } => write!(f, "{} {}", parent, id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
    /// Continuation token for endpoints that page by cursor instead of offset.
    pub after: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    pub has_next: bool,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub id: String,
    pub positions: Vec<usize>,
}

/// A single membership change sent to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Add {
        ids: Vec<String>,
        position: Option<usize>,
    },
    Remove {
        ids: Vec<String>,
    },
    RemoveAll {
        ids: Vec<String>,
    },
    RemoveAtPositions {
        occurrences: Vec<Occurrence>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub query: String,
    pub limit: u32,
    pub offset: u32,
    pub market: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborative: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PlaylistDetails {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.public.is_none()
            && self.collaborative.is_none()
            && self.description.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub id: String,
}

#[derive(Tabled)]
pub struct ResourceTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingObject {
    pub items: Vec<Value>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowedArtistsResponse {
    pub artists: CursorPagingObject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorPagingObject {
    pub items: Vec<Value>,
    pub next: Option<String>,
    pub cursors: Option<Cursors>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cursors {
    pub after: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddItemsRequest {
    pub uris: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveItemsRequest {
    pub tracks: Vec<TrackSelector>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackSelector {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<usize>>,
}
