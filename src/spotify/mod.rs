//! # Spotify Integration Module
//!
//! This module is the boundary between spotedit and the Spotify Web API. The
//! library layer never talks HTTP itself; it talks to the [`Catalog`] trait,
//! and [`SpotifyClient`] is the implementation used by the CLI.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer (commands, prompts, tables)
//!          ↓
//! Library Layer (registry, collections, playlist mutator)
//!          ↓
//! Catalog trait
//!     ├── SpotifyClient (reqwest, OAuth bearer tokens)
//!     └── in-memory fakes used by the test-suite
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Modules
//!
//! - [`auth`] - OAuth 2.0 PKCE flow: verifier/challenge, local callback server,
//!   token exchange and refresh.
//! - [`client`] - [`SpotifyClient`], which maps every [`Catalog`] operation onto
//!   Spotify endpoints, unwraps the per-endpoint JSON envelopes and handles
//!   retries (502) and rate limits (429 with `Retry-After`).
//!
//! ## Payload Shapes
//!
//! Spotify wraps saved items differently per endpoint (`{"track": {...}}`,
//! `{"album": {...}}`, `{"artists": {"items": [...]}}`). [`Catalog::fetch_page`]
//! always returns the bare resource objects, so the library layer only ever
//! reads `id` and `name` from them.
//!
//! ## Not Found
//!
//! A 404 from the API is reported as [`CatalogError::NotFound`]. Every other
//! failure stays a distinct variant so callers never mistake a broken
//! connection for a missing playlist.

pub mod auth;
pub mod client;

use async_trait::async_trait;
use serde_json::Value;

pub use client::SpotifyClient;

use crate::{
    error::CatalogError,
    types::{
        CollectionScope, CreatePlaylistRequest, Mutation, Page, PageRequest, PlaylistDetails,
        ResourceKind, SearchQuery,
    },
};

/// Remote operations the library layer depends on.
///
/// Implementations must report a missing resource or collection as
/// [`CatalogError::NotFound`] and anything else as another variant.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetches one page of a collection.
    async fn fetch_page(
        &self,
        scope: &CollectionScope,
        request: &PageRequest,
    ) -> Result<Page, CatalogError>;

    /// Fetches the full payload of a single resource.
    async fn fetch_one(&self, kind: ResourceKind, id: &str) -> Result<Value, CatalogError>;

    /// Creates a playlist owned by the current user and returns its id.
    async fn create_playlist(&self, request: &CreatePlaylistRequest)
    -> Result<String, CatalogError>;

    async fn change_playlist_details(
        &self,
        playlist_id: &str,
        details: &PlaylistDetails,
    ) -> Result<(), CatalogError>;

    /// Applies a membership change to a collection.
    async fn mutate_membership(
        &self,
        scope: &CollectionScope,
        mutation: &Mutation,
    ) -> Result<(), CatalogError>;

    /// Checks the current user's library of `kind` for each id, in order.
    async fn check_membership(
        &self,
        kind: ResourceKind,
        ids: &[String],
    ) -> Result<Vec<bool>, CatalogError>;

    /// Searches the public catalog.
    async fn search(&self, kind: ResourceKind, query: &SearchQuery)
    -> Result<Page, CatalogError>;
}
