use std::sync::Arc;

use crate::{
    error::{LibraryError, Result},
    spotify::Catalog,
    types::{CollectionScope, CreatePlaylistRequest, ResourceKind, SearchQuery},
};

use super::{Collection, Playlist, Resource};

/// What a resource kind supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Resources of this kind hold members (playlist tracks, album tracks, show episodes).
    pub can_contain: bool,
    /// Members are an ordered, position-addressable and editable sequence.
    pub is_ordered: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct KindEntry {
    pub kind: ResourceKind,
    pub capabilities: Capabilities,
    /// How the user's library of this kind is phrased: "followed" or "saved".
    pub library_label: &'static str,
}

const fn entry(
    kind: ResourceKind,
    can_contain: bool,
    is_ordered: bool,
    library_label: &'static str,
) -> KindEntry {
    KindEntry {
        kind,
        capabilities: Capabilities {
            can_contain,
            is_ordered,
        },
        library_label,
    }
}

pub static KINDS: [KindEntry; 6] = [
    entry(ResourceKind::Playlist, true, true, "followed"),
    entry(ResourceKind::Artist, false, false, "followed"),
    entry(ResourceKind::Track, false, false, "saved"),
    entry(ResourceKind::Album, true, false, "saved"),
    entry(ResourceKind::Show, true, false, "saved"),
    entry(ResourceKind::Episode, false, false, "saved"),
];

/// Looks up the registry entry for a kind.
pub fn kind_entry(kind: ResourceKind) -> &'static KindEntry {
    let index = match kind {
        ResourceKind::Playlist => 0,
        ResourceKind::Artist => 1,
        ResourceKind::Track => 2,
        ResourceKind::Album => 3,
        ResourceKind::Show => 4,
        ResourceKind::Episode => 5,
    };
    &KINDS[index]
}

pub fn capabilities(kind: ResourceKind) -> Capabilities {
    kind_entry(kind).capabilities
}

/// Resolves a kind tag like `"playlist"`; unknown tags are an error.
pub fn resolve_kind(tag: &str) -> Result<ResourceKind> {
    tag.parse::<ResourceKind>()
        .map_err(|_| LibraryError::UnrecognizedKind(tag.to_string()))
}

/// Single entry point for turning kind tags and ids into resources and collections.
#[derive(Clone)]
pub struct Registry {
    catalog: Arc<dyn Catalog>,
}

impl Registry {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    /// Fetches an item by kind tag and id. `Ok(None)` when it does not exist.
    pub async fn get_item(&self, tag: &str, id: &str) -> Result<Option<Resource>> {
        let kind = resolve_kind(tag)?;
        Resource::fetch(self.catalog(), kind, id).await
    }

    /// The current user's followed or saved items of a kind.
    pub fn get_collection(&self, tag: &str) -> Result<Collection> {
        let kind = resolve_kind(tag)?;
        Ok(self.library(kind))
    }

    pub fn library(&self, kind: ResourceKind) -> Collection {
        Collection::new(Arc::clone(&self.catalog), CollectionScope::Library(kind))
    }

    /// Fetches an item and the library collection it belongs in.
    ///
    /// Fails with `UnrecognizedKind` or `NotFound` before anything is mutated.
    pub async fn get_item_and_collection(
        &self,
        tag: &str,
        id: &str,
    ) -> Result<(Resource, Collection)> {
        let collection = self.get_collection(tag)?;
        let kind = resolve_kind(tag)?;
        let item = Resource::require(self.catalog(), kind, id).await?;
        Ok((item, collection))
    }

    /// The members of a playlist, album or show.
    pub fn contents(&self, resource: &Resource) -> Result<Collection> {
        if !capabilities(resource.kind).can_contain {
            return Err(LibraryError::Unsupported {
                kind: resource.kind,
                operation: "list contents of",
            });
        }
        Ok(Collection::new(
            Arc::clone(&self.catalog),
            CollectionScope::Contents {
                parent: resource.kind,
                id: resource.id.clone(),
            },
        ))
    }

    /// Opens a playlist for editing.
    pub async fn playlist(&self, id: &str) -> Result<Playlist> {
        let resource = Resource::require(self.catalog(), ResourceKind::Playlist, id).await?;
        Ok(Playlist::new(Arc::clone(&self.catalog), resource))
    }

    /// Creates a playlist and returns it hydrated from the catalog.
    pub async fn create_playlist(&self, request: &CreatePlaylistRequest) -> Result<Resource> {
        let id = self.catalog.create_playlist(request).await?;
        log::debug!("created playlist {}", id);
        Resource::require(self.catalog(), ResourceKind::Playlist, &id).await
    }

    /// Searches the public catalog; a thin passthrough.
    pub async fn search_public(&self, tag: &str, query: &SearchQuery) -> Result<Vec<Resource>> {
        let kind = resolve_kind(tag)?;
        let page = self.catalog.search(kind, query).await?;
        Ok(page
            .items
            .into_iter()
            .map(|raw| Resource::from_raw(kind, raw))
            .collect())
    }
}
