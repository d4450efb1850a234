#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::{Value, json};
use spotedit::{
    error::CatalogError,
    library::Registry,
    spotify::Catalog,
    types::{
        CollectionScope, CreatePlaylistRequest, Mutation, Page, PageRequest, PlaylistDetails,
        ResourceKind, SearchQuery,
    },
};

/// Every call the fake received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchPage {
        scope: CollectionScope,
        request: PageRequest,
    },
    FetchOne(ResourceKind, String),
    Create(String),
    ChangeDetails(String),
    Mutate(CollectionScope, Mutation),
    Check(ResourceKind, Vec<String>),
    Search(ResourceKind, String),
}

#[derive(Default)]
struct State {
    resources: HashMap<(ResourceKind, String), Value>,
    library: HashMap<ResourceKind, Vec<String>>,
    contents: HashMap<(ResourceKind, String), Vec<String>>,
    calls: Vec<Call>,
    /// Fail every `fetch_page` after this many succeeded.
    pages_before_failure: Option<usize>,
    fail_mutations: bool,
    /// Largest page served, whatever the request asks for.
    max_page: Option<usize>,
    next_id: usize,
}

/// In-memory catalog with Spotify-like semantics: libraries are sets,
/// playlists are ordered sequences that allow duplicates.
#[derive(Default)]
pub struct FakeCatalog {
    state: Mutex<State>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn with_resource(self, kind: ResourceKind, id: &str, name: &str) -> Self {
        self.state.lock().unwrap().resources.insert(
            (kind, id.to_string()),
            json!({ "id": id, "name": name, "type": kind.as_str() }),
        );
        self
    }

    pub fn with_tracks(mut self, ids: &[&str]) -> Self {
        for id in ids {
            self = self.with_resource(ResourceKind::Track, id, &format!("Track {}", id));
        }
        self
    }

    /// A playlist with the given track sequence. An empty id stands for an
    /// unavailable entry.
    pub fn with_playlist(self, id: &str, name: &str, tracks: &[&str]) -> Self {
        let this = self.with_resource(ResourceKind::Playlist, id, name);
        {
            let mut state = this.state.lock().unwrap();
            state.contents.insert(
                (ResourceKind::Playlist, id.to_string()),
                tracks.iter().map(|t| t.to_string()).collect(),
            );
            for t in tracks.iter().filter(|t| !t.is_empty()) {
                state
                    .resources
                    .entry((ResourceKind::Track, t.to_string()))
                    .or_insert_with(|| json!({ "id": t, "name": format!("Track {}", t) }));
            }
        }
        this
    }

    pub fn with_album(self, id: &str, name: &str, tracks: &[&str]) -> Self {
        let this = self.with_resource(ResourceKind::Album, id, name);
        this.state.lock().unwrap().contents.insert(
            (ResourceKind::Album, id.to_string()),
            tracks.iter().map(|t| t.to_string()).collect(),
        );
        this.with_tracks(tracks)
    }

    /// Puts already registered resources into the user's library.
    pub fn with_library(self, kind: ResourceKind, ids: &[&str]) -> Self {
        self.state
            .lock()
            .unwrap()
            .library
            .entry(kind)
            .or_default()
            .extend(ids.iter().map(|i| i.to_string()));
        self
    }

    pub fn fail_pages_after(self, successful: usize) -> Self {
        self.state.lock().unwrap().pages_before_failure = Some(successful);
        self
    }

    pub fn with_max_page(self, max: usize) -> Self {
        self.state.lock().unwrap().max_page = Some(max);
        self
    }

    pub fn fail_mutations(self) -> Self {
        self.state.lock().unwrap().fail_mutations = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Mutate(_, m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn page_requests(&self) -> Vec<PageRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::FetchPage { request, .. } => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn playlist_tracks(&self, id: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .contents
            .get(&(ResourceKind::Playlist, id.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    pub fn library(&self, kind: ResourceKind) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .library
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    pub fn resource(&self, kind: ResourceKind, id: &str) -> Option<Value> {
        self.state
            .lock()
            .unwrap()
            .resources
            .get(&(kind, id.to_string()))
            .cloned()
    }
}

pub fn registry(fake: &Arc<FakeCatalog>) -> Registry {
    let catalog: Arc<dyn Catalog> = fake.clone();
    Registry::new(catalog)
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn payload(state: &State, kind: ResourceKind, id: &str) -> Value {
    if id.is_empty() {
        return Value::Null;
    }
    state
        .resources
        .get(&(kind, id.to_string()))
        .cloned()
        .unwrap_or_else(|| json!({ "id": id, "name": id }))
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn fetch_page(
        &self,
        scope: &CollectionScope,
        request: &PageRequest,
    ) -> Result<Page, CatalogError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::FetchPage {
            scope: scope.clone(),
            request: request.clone(),
        });

        if let Some(left) = state.pages_before_failure {
            if left == 0 {
                return Err(CatalogError::Unauthorized("token revoked".to_string()));
            }
            state.pages_before_failure = Some(left - 1);
        }

        let (sequence, member) = match scope {
            CollectionScope::Library(kind) => {
                (state.library.get(kind).cloned().unwrap_or_default(), *kind)
            }
            CollectionScope::Contents { parent, id } => {
                let member = parent.member_kind().ok_or(CatalogError::NotFound)?;
                let items = state
                    .contents
                    .get(&(*parent, id.clone()))
                    .cloned()
                    .ok_or(CatalogError::NotFound)?;
                (items, member)
            }
        };

        let limit = match state.max_page {
            Some(max) => (request.limit as usize).min(max),
            None => request.limit as usize,
        };
        // Followed artists page by cursor and ignore the offset.
        let start = match (scope, &request.after) {
            (CollectionScope::Library(ResourceKind::Artist), Some(after)) => sequence
                .iter()
                .position(|id| id == after)
                .map_or(sequence.len(), |p| p + 1),
            (CollectionScope::Library(ResourceKind::Artist), None) => 0,
            _ => request.offset as usize,
        };
        let start = start.min(sequence.len());
        let end = (start + limit).min(sequence.len());
        let page_ids = &sequence[start..end];
        let has_next = end < sequence.len();

        Ok(Page {
            items: page_ids.iter().map(|id| payload(&state, member, id)).collect(),
            has_next,
            cursor: if has_next {
                page_ids.last().cloned()
            } else {
                None
            },
        })
    }

    async fn fetch_one(&self, kind: ResourceKind, id: &str) -> Result<Value, CatalogError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::FetchOne(kind, id.to_string()));
        state
            .resources
            .get(&(kind, id.to_string()))
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    async fn create_playlist(
        &self,
        request: &CreatePlaylistRequest,
    ) -> Result<String, CatalogError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create(request.name.clone()));
        state.next_id += 1;
        let id = format!("created{}", state.next_id);
        state.resources.insert(
            (ResourceKind::Playlist, id.clone()),
            json!({
                "id": id,
                "name": request.name,
                "description": request.description,
                "public": request.public,
                "collaborative": request.collaborative,
            }),
        );
        state
            .contents
            .insert((ResourceKind::Playlist, id.clone()), Vec::new());
        state
            .library
            .entry(ResourceKind::Playlist)
            .or_default()
            .push(id.clone());
        Ok(id)
    }

    async fn change_playlist_details(
        &self,
        playlist_id: &str,
        details: &PlaylistDetails,
    ) -> Result<(), CatalogError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ChangeDetails(playlist_id.to_string()));
        let raw = state
            .resources
            .get_mut(&(ResourceKind::Playlist, playlist_id.to_string()))
            .ok_or(CatalogError::NotFound)?;
        if let Some(name) = &details.name {
            raw["name"] = json!(name);
        }
        if let Some(description) = &details.description {
            raw["description"] = json!(description);
        }
        if let Some(public) = details.public {
            raw["public"] = json!(public);
        }
        if let Some(collaborative) = details.collaborative {
            raw["collaborative"] = json!(collaborative);
        }
        Ok(())
    }

    async fn mutate_membership(
        &self,
        scope: &CollectionScope,
        mutation: &Mutation,
    ) -> Result<(), CatalogError> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(Call::Mutate(scope.clone(), mutation.clone()));
        if state.fail_mutations {
            return Err(CatalogError::Unauthorized("read-only token".to_string()));
        }

        match scope {
            CollectionScope::Library(kind) => {
                let library = state.library.entry(*kind).or_default();
                match mutation {
                    Mutation::Add { ids, .. } => {
                        for id in ids {
                            if !library.contains(id) {
                                library.push(id.clone());
                            }
                        }
                    }
                    Mutation::Remove { ids } | Mutation::RemoveAll { ids } => {
                        library.retain(|i| !ids.contains(i));
                    }
                    Mutation::RemoveAtPositions { .. } => {
                        return Err(CatalogError::Unsupported("positions in a library".into()));
                    }
                }
            }
            CollectionScope::Contents { parent, id } => {
                if *parent != ResourceKind::Playlist {
                    return Err(CatalogError::Unsupported(format!("{} contents", parent)));
                }
                let tracks = state
                    .contents
                    .get_mut(&(*parent, id.clone()))
                    .ok_or(CatalogError::NotFound)?;
                match mutation {
                    Mutation::Add { ids, position } => match position {
                        Some(p) => {
                            let at = (*p).min(tracks.len());
                            for (n, id) in ids.iter().enumerate() {
                                tracks.insert(at + n, id.clone());
                            }
                        }
                        None => tracks.extend(ids.iter().cloned()),
                    },
                    Mutation::Remove { ids } | Mutation::RemoveAll { ids } => {
                        tracks.retain(|t| !ids.contains(t));
                    }
                    Mutation::RemoveAtPositions { occurrences } => {
                        let mut positions = Vec::new();
                        for o in occurrences {
                            for &p in &o.positions {
                                if tracks.get(p) != Some(&o.id) {
                                    return Err(CatalogError::Decode(format!(
                                        "{} is not at position {}",
                                        o.id, p
                                    )));
                                }
                                positions.push(p);
                            }
                        }
                        positions.sort_unstable();
                        positions.dedup();
                        for p in positions.into_iter().rev() {
                            tracks.remove(p);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    async fn check_membership(
        &self,
        kind: ResourceKind,
        ids: &[String],
    ) -> Result<Vec<bool>, CatalogError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Check(kind, ids.to_vec()));
        let library = state.library.get(&kind).cloned().unwrap_or_default();
        Ok(ids.iter().map(|id| library.contains(id)).collect())
    }

    async fn search(&self, kind: ResourceKind, query: &SearchQuery) -> Result<Page, CatalogError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Search(kind, query.query.clone()));
        let needle = query.query.to_lowercase();
        let mut items: Vec<Value> = state
            .resources
            .iter()
            .filter(|((k, _), raw)| {
                *k == kind
                    && raw["name"]
                        .as_str()
                        .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .map(|(_, raw)| raw.clone())
            .collect();
        items.sort_by(|a, b| a["id"].as_str().cmp(&b["id"].as_str()));
        items.truncate(query.limit as usize);
        Ok(Page {
            items,
            has_next: false,
            cursor: None,
        })
    }
}
