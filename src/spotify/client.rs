use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::{
    sync::{Mutex, OnceCell},
    time::sleep,
};

use super::Catalog;
use crate::{
    config,
    error::CatalogError,
    management::TokenManager,
    types::{
        AddItemsRequest, CollectionScope, CreatePlaylistRequest, CreatePlaylistResponse,
        CurrentUser, FollowedArtistsResponse, Mutation, Occurrence, Page, PageRequest,
        PagingObject, PlaylistDetails, RemoveItemsRequest, ResourceKind, SearchQuery,
        TrackSelector,
    },
};

/// Ids per request for the library follow/save endpoints.
const LIBRARY_BATCH: usize = 50;
/// Items per request for the playlist item endpoints.
const PLAYLIST_BATCH: usize = 100;
/// Largest page the API serves.
const MAX_PAGE: u32 = 50;
/// Longest `Retry-After` we are willing to sleep through.
const MAX_RETRY_AFTER: u64 = 120;
const MAX_ATTEMPTS: u32 = 5;

/// [`Catalog`] implementation backed by the Spotify Web API.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
    user_id: OnceCell<String>,
}

impl SpotifyClient {
    pub fn new(tokens: TokenManager) -> Self {
        Self::with_api_url(tokens, config::spotify_apiurl())
    }

    pub fn with_api_url(tokens: TokenManager, api_url: String) -> Self {
        Self {
            http: Client::new(),
            api_url,
            tokens: Mutex::new(tokens),
            user_id: OnceCell::new(),
        }
    }

    /// Builds a client from the token cached by `spotedit auth`.
    pub async fn from_cache() -> Result<Self, String> {
        let tokens = TokenManager::load().await?;
        Ok(Self::new(tokens))
    }

    /// Id of the authenticated user, fetched once per client.
    pub async fn current_user_id(&self) -> Result<String, CatalogError> {
        let id = self
            .user_id
            .get_or_try_init(|| async {
                let user: CurrentUser = self.get_json("/me").await?;
                Ok::<_, CatalogError>(user.id)
            })
            .await?;
        Ok(id.clone())
    }

    /// Sends a request, retrying on 502 and honouring `Retry-After` on 429.
    ///
    /// 404 becomes [`CatalogError::NotFound`]; other error statuses are
    /// returned as HTTP errors.
    async fn send<F>(&self, build: F) -> Result<Response, CatalogError>
    where
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let token = self.tokens.lock().await.get_valid_token().await;
            let response = build(&self.http).bearer_auth(token).send().await?;

            match response.status() {
                StatusCode::NOT_FOUND => return Err(CatalogError::NotFound),
                StatusCode::UNAUTHORIZED => {
                    let body = response.text().await.unwrap_or_default();
                    return Err(CatalogError::Unauthorized(format!(
                        "{} Please run spotedit auth",
                        body
                    )));
                }
                StatusCode::BAD_GATEWAY if attempt < MAX_ATTEMPTS => {
                    log::debug!("bad gateway, retrying in 10s (attempt {})", attempt);
                    sleep(Duration::from_secs(10)).await;
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(1);
                    if retry_after > MAX_RETRY_AFTER || attempt >= MAX_ATTEMPTS {
                        return Err(CatalogError::RateLimited { retry_after });
                    }
                    log::debug!("rate limited, sleeping {}s", retry_after);
                    sleep(Duration::from_secs(retry_after)).await;
                }
                _ => return Ok(response.error_for_status()?),
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = self.url(path);
        log::trace!("GET {}", url);
        let response = self.send(|http| http.get(&url)).await?;
        Ok(response.json::<T>().await?)
    }

    async fn write(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<(), CatalogError> {
        let url = self.url(path);
        log::trace!("{} {}", method, url);
        self.send(|http| {
            let request = http.request(method.clone(), &url);
            match &body {
                Some(body) => request.json(body),
                // Spotify rejects body-less PUT/DELETE without a length header
                None => request.header(reqwest::header::CONTENT_LENGTH, 0),
            }
        })
        .await?;
        Ok(())
    }

    fn library_path(kind: ResourceKind) -> &'static str {
        match kind {
            ResourceKind::Track => "/me/tracks",
            ResourceKind::Album => "/me/albums",
            ResourceKind::Show => "/me/shows",
            ResourceKind::Episode => "/me/episodes",
            ResourceKind::Playlist => "/me/playlists",
            ResourceKind::Artist => "/me/following",
        }
    }

    async fn fetch_library_page(
        &self,
        kind: ResourceKind,
        limit: u32,
        request: &PageRequest,
    ) -> Result<Page, CatalogError> {
        if kind == ResourceKind::Artist {
            let mut path = format!("/me/following?type=artist&limit={}", limit);
            if let Some(after) = &request.after {
                path.push_str(&format!("&after={}", after));
            }
            let res: FollowedArtistsResponse = self.get_json(&path).await?;
            return Ok(Page {
                items: res.artists.items,
                has_next: res.artists.next.is_some(),
                cursor: res.artists.cursors.and_then(|c| c.after),
            });
        }

        let path = format!(
            "{}?limit={}&offset={}",
            Self::library_path(kind),
            limit,
            request.offset
        );
        let res: PagingObject = self.get_json(&path).await?;
        let has_next = res.next.is_some();
        let items = match kind {
            ResourceKind::Playlist => res.items,
            wrapped => unwrap_items(res.items, wrapped.as_str()),
        };
        Ok(Page {
            items,
            has_next,
            cursor: None,
        })
    }

    async fn fetch_contents_page(
        &self,
        parent: ResourceKind,
        id: &str,
        limit: u32,
        request: &PageRequest,
    ) -> Result<Page, CatalogError> {
        let path = match parent {
            ResourceKind::Playlist => format!("/playlists/{}/tracks", id),
            ResourceKind::Album => format!("/albums/{}/tracks", id),
            ResourceKind::Show => format!("/shows/{}/episodes", id),
            other => {
                return Err(CatalogError::Unsupported(format!(
                    "{} has no contents",
                    other
                )));
            }
        };
        let path = format!("{}?limit={}&offset={}", path, limit, request.offset);
        let res: PagingObject = self.get_json(&path).await?;
        let has_next = res.next.is_some();
        let items = match parent {
            // Playlist entries wrap the track; keep null entries so indices stay aligned
            ResourceKind::Playlist => unwrap_items(res.items, "track"),
            _ => res.items,
        };
        Ok(Page {
            items,
            has_next,
            cursor: None,
        })
    }

    async fn mutate_library(
        &self,
        kind: ResourceKind,
        mutation: &Mutation,
    ) -> Result<(), CatalogError> {
        let (method, ids) = match mutation {
            Mutation::Add {
                ids,
                position: None,
            } => (Method::PUT, ids),
            Mutation::Remove { ids } => (Method::DELETE, ids),
            other => {
                return Err(CatalogError::Unsupported(format!(
                    "{:?} on the {} library",
                    other, kind
                )));
            }
        };

        match kind {
            ResourceKind::Playlist => {
                for id in ids {
                    self.write(method.clone(), &format!("/playlists/{}/followers", id), None)
                        .await?;
                }
            }
            ResourceKind::Artist => {
                for chunk in ids.chunks(LIBRARY_BATCH) {
                    let path = format!("/me/following?type=artist&ids={}", chunk.join(","));
                    self.write(method.clone(), &path, None).await?;
                }
            }
            _ => {
                for chunk in ids.chunks(LIBRARY_BATCH) {
                    let path = format!("{}?ids={}", Self::library_path(kind), chunk.join(","));
                    self.write(method.clone(), &path, None).await?;
                }
            }
        }
        Ok(())
    }

    async fn mutate_playlist(&self, id: &str, mutation: &Mutation) -> Result<(), CatalogError> {
        let path = format!("/playlists/{}/tracks", id);
        match mutation {
            Mutation::Add { ids, position } => {
                for (n, chunk) in ids.chunks(PLAYLIST_BATCH).enumerate() {
                    let body = AddItemsRequest {
                        uris: chunk.iter().map(|id| track_uri(id)).collect(),
                        position: position.map(|p| p + n * PLAYLIST_BATCH),
                    };
                    self.write(Method::POST, &path, Some(to_value(&body)?))
                        .await?;
                }
            }
            // Without positions the endpoint drops every occurrence
            Mutation::Remove { ids } | Mutation::RemoveAll { ids } => {
                for chunk in ids.chunks(PLAYLIST_BATCH) {
                    let body = RemoveItemsRequest {
                        tracks: chunk
                            .iter()
                            .map(|id| TrackSelector {
                                uri: track_uri(id),
                                positions: None,
                            })
                            .collect(),
                    };
                    self.write(Method::DELETE, &path, Some(to_value(&body)?))
                        .await?;
                }
            }
            Mutation::RemoveAtPositions { occurrences } => {
                for batch in removal_batches(occurrences) {
                    let body = RemoveItemsRequest {
                        tracks: batch
                            .iter()
                            .map(|o| TrackSelector {
                                uri: track_uri(&o.id),
                                positions: Some(o.positions.clone()),
                            })
                            .collect(),
                    };
                    self.write(Method::DELETE, &path, Some(to_value(&body)?))
                        .await?;
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn fetch_page(
        &self,
        scope: &CollectionScope,
        request: &PageRequest,
    ) -> Result<Page, CatalogError> {
        let limit = request.limit.clamp(1, MAX_PAGE);
        match scope {
            CollectionScope::Library(kind) => self.fetch_library_page(*kind, limit, request).await,
            CollectionScope::Contents { parent, id } => {
                self.fetch_contents_page(*parent, id, limit, request).await
            }
        }
    }

    async fn fetch_one(&self, kind: ResourceKind, id: &str) -> Result<Value, CatalogError> {
        self.get_json(&format!("/{}s/{}", kind, id)).await
    }

    async fn create_playlist(
        &self,
        request: &CreatePlaylistRequest,
    ) -> Result<String, CatalogError> {
        let user_id = self.current_user_id().await?;
        let url = self.url(&format!("/users/{}/playlists", user_id));
        let response = self.send(|http| http.post(&url).json(request)).await?;
        let created: CreatePlaylistResponse = response.json().await?;
        Ok(created.id)
    }

    async fn change_playlist_details(
        &self,
        playlist_id: &str,
        details: &PlaylistDetails,
    ) -> Result<(), CatalogError> {
        self.write(
            Method::PUT,
            &format!("/playlists/{}", playlist_id),
            Some(to_value(details)?),
        )
        .await
    }

    async fn mutate_membership(
        &self,
        scope: &CollectionScope,
        mutation: &Mutation,
    ) -> Result<(), CatalogError> {
        log::debug!("{:?} on {}", mutation, scope);
        match scope {
            CollectionScope::Library(kind) => self.mutate_library(*kind, mutation).await,
            CollectionScope::Contents {
                parent: ResourceKind::Playlist,
                id,
            } => self.mutate_playlist(id, mutation).await,
            CollectionScope::Contents { parent, .. } => Err(CatalogError::Unsupported(format!(
                "{} contents are read-only",
                parent
            ))),
        }
    }

    async fn check_membership(
        &self,
        kind: ResourceKind,
        ids: &[String],
    ) -> Result<Vec<bool>, CatalogError> {
        let mut found = Vec::with_capacity(ids.len());
        match kind {
            ResourceKind::Playlist => {
                let user_id = self.current_user_id().await?;
                for id in ids {
                    let path = format!("/playlists/{}/followers/contains?ids={}", id, user_id);
                    let res: Vec<bool> = self.get_json(&path).await?;
                    found.push(res.first().copied().unwrap_or(false));
                }
            }
            ResourceKind::Artist => {
                for chunk in ids.chunks(LIBRARY_BATCH) {
                    let path = format!("/me/following/contains?type=artist&ids={}", chunk.join(","));
                    found.extend(self.get_json::<Vec<bool>>(&path).await?);
                }
            }
            _ => {
                for chunk in ids.chunks(LIBRARY_BATCH) {
                    let path = format!(
                        "{}/contains?ids={}",
                        Self::library_path(kind),
                        chunk.join(",")
                    );
                    found.extend(self.get_json::<Vec<bool>>(&path).await?);
                }
            }
        }
        Ok(found)
    }

    async fn search(&self, kind: ResourceKind, query: &SearchQuery) -> Result<Page, CatalogError> {
        let url = self.url("/search");
        let limit = query.limit.clamp(1, MAX_PAGE).to_string();
        let offset = query.offset.to_string();
        let response = self
            .send(|http| {
                let mut params = vec![
                    ("q", query.query.as_str()),
                    ("type", kind.as_str()),
                    ("limit", limit.as_str()),
                    ("offset", offset.as_str()),
                ];
                if let Some(market) = &query.market {
                    params.push(("market", market.as_str()));
                }
                http.get(&url).query(&params)
            })
            .await?;

        let mut json: Value = response.json().await?;
        let key = format!("{}s", kind);
        let found = json.get_mut(&key).map(Value::take).unwrap_or(Value::Null);
        let paging: PagingObject = serde_json::from_value(found)
            .map_err(|e| CatalogError::Decode(e.to_string()))?;
        Ok(Page {
            has_next: paging.next.is_some(),
            items: paging.items.into_iter().filter(|v| !v.is_null()).collect(),
            cursor: None,
        })
    }
}

/// Splits positional removals into requests the service accepts.
///
/// Every position comes from the same read, so batches go out from the end
/// of the playlist backwards: a request only ever deletes slots after the
/// ones still pending, and their positions stay valid.
pub fn removal_batches(occurrences: &[Occurrence]) -> Vec<Vec<Occurrence>> {
    let mut slots: Vec<(usize, &str)> = occurrences
        .iter()
        .flat_map(|o| o.positions.iter().map(move |&p| (p, o.id.as_str())))
        .collect();
    slots.sort_unstable_by(|a, b| b.0.cmp(&a.0));
    slots.dedup_by_key(|s| s.0);

    slots
        .chunks(PLAYLIST_BATCH)
        .map(|chunk| {
            let mut batch: Vec<Occurrence> = Vec::new();
            for &(position, id) in chunk {
                match batch.iter_mut().find(|o| o.id == id) {
                    Some(o) => o.positions.push(position),
                    None => batch.push(Occurrence {
                        id: id.to_string(),
                        positions: vec![position],
                    }),
                }
            }
            batch
        })
        .collect()
}

/// Pulls the resource out of saved-item envelopes like `{"added_at": ..., "track": {...}}`.
fn unwrap_items(items: Vec<Value>, key: &str) -> Vec<Value> {
    items
        .into_iter()
        .map(|mut item| item.get_mut(key).map(Value::take).unwrap_or(Value::Null))
        .collect()
}

fn track_uri(id: &str) -> String {
    if id.starts_with("spotify:") {
        id.to_string()
    } else {
        format!("spotify:track:{}", id)
    }
}

fn to_value<T: serde::Serialize>(body: &T) -> Result<Value, CatalogError> {
    serde_json::to_value(body).map_err(|e| CatalogError::Decode(e.to_string()))
}
