use std::sync::Arc;

use crate::{
    error::{CatalogError, LibraryError, Result},
    spotify::Catalog,
    types::{CollectionScope, Mutation, ResourceKind},
};

use super::{
    PageCursor, Paginator, Resource,
    registry::{capabilities, kind_entry},
};

/// How a caller picks one member of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(String),
    Name(String),
}

impl Selector {
    fn matches(&self, resource: &Resource) -> bool {
        match self {
            Selector::Id(id) => !id.is_empty() && resource.id == *id,
            Selector::Name(name) => resource
                .name
                .as_deref()
                .is_some_and(|n| n.trim() == name.trim()),
        }
    }

    fn text(&self) -> &str {
        match self {
            Selector::Id(s) | Selector::Name(s) => s,
        }
    }
}

/// Uniform view over one collection: a user library or the contents of a
/// playlist, album or show.
#[derive(Clone)]
pub struct Collection {
    catalog: Arc<dyn Catalog>,
    scope: CollectionScope,
}

impl Collection {
    pub fn new(catalog: Arc<dyn Catalog>, scope: CollectionScope) -> Self {
        Self { catalog, scope }
    }

    pub fn scope(&self) -> &CollectionScope {
        &self.scope
    }

    /// Kind of the resources this collection holds.
    pub fn member_kind(&self) -> Result<ResourceKind> {
        match &self.scope {
            CollectionScope::Library(kind) => Ok(*kind),
            CollectionScope::Contents { parent, .. } => {
                parent.member_kind().ok_or(LibraryError::Unsupported {
                    kind: *parent,
                    operation: "list contents of",
                })
            }
        }
    }

    /// "followed playlists", "saved tracks", "tracks of playlist <id>".
    pub fn describe(&self) -> String {
        match &self.scope {
            CollectionScope::Library(kind) => {
                format!("{} {}s", kind_entry(*kind).library_label, kind)
            }
            CollectionScope::Contents { parent, id } => match parent.member_kind() {
                Some(member) => format!("{}s of {} {}", member, parent, id),
                None => format!("{} {}", parent, id),
            },
        }
    }

    /// A lazy page source over this collection.
    pub fn pages(&self, cursor: PageCursor) -> Paginator<'_> {
        Paginator::new(self.catalog.as_ref(), &self.scope, cursor)
    }

    /// Followed artists page by cursor only and cannot start at an offset.
    pub fn supports_offset(&self) -> bool {
        !matches!(self.scope, CollectionScope::Library(ResourceKind::Artist))
    }

    /// Retrieves members in collection order. `Ok(None)` when the collection
    /// itself does not exist.
    pub async fn items(&self, cursor: PageCursor) -> Result<Option<Vec<Resource>>> {
        let kind = self.member_kind()?;
        if cursor.offset > 0 && !self.supports_offset() {
            return Err(LibraryError::Unsupported {
                kind,
                operation: "skip by offset over",
            });
        }
        let raw = self.pages(cursor).collect_all().await?;
        Ok(raw.map(|items| {
            items
                .into_iter()
                .map(|raw| Resource::from_raw(kind, raw))
                .collect()
        }))
    }

    /// Every member; a missing collection is an error.
    pub async fn all_items(&self) -> Result<Vec<Resource>> {
        self.items(PageCursor::all())
            .await?
            .ok_or_else(|| self.not_found())
    }

    /// Whether `item` is a member.
    ///
    /// Libraries use the catalog's membership check. Contents are scanned
    /// page by page, stopping at the first match.
    pub async fn contains(&self, item: &Resource) -> Result<bool> {
        self.check_kind(item)?;

        if let CollectionScope::Library(kind) = &self.scope {
            let found = self
                .catalog
                .check_membership(*kind, std::slice::from_ref(&item.id))
                .await
                .map_err(|e| LibraryError::from_catalog(e, item.kind, &item.id))?;
            return Ok(found.first().copied().unwrap_or(false));
        }

        let mut pages = self.pages(PageCursor::all());
        loop {
            match pages.next_page().await {
                Ok(Some(page)) => {
                    if page
                        .iter()
                        .any(|raw| raw["id"].as_str() == Some(item.id.as_str()))
                    {
                        return Ok(true);
                    }
                }
                Ok(None) => return Ok(false),
                Err(e) => return Err(self.map_catalog(e)),
            }
        }
    }

    /// Follows, saves, or appends `item`. Re-query to observe the result.
    pub async fn add(&self, item: &Resource) -> Result<()> {
        self.check_kind(item)?;
        self.check_mutable("add to")?;
        self.mutate(
            item,
            Mutation::Add {
                ids: vec![item.id.clone()],
                position: None,
            },
        )
        .await
    }

    /// Unfollows, unsaves, or removes `item`.
    pub async fn remove(&self, item: &Resource) -> Result<()> {
        self.check_kind(item)?;
        self.check_mutable("remove from")?;
        self.mutate(
            item,
            Mutation::Remove {
                ids: vec![item.id.clone()],
            },
        )
        .await
    }

    /// All members matching `selector`, in collection order.
    pub async fn matching(&self, selector: &Selector) -> Result<Vec<Resource>> {
        Ok(self
            .all_items()
            .await?
            .into_iter()
            .filter(|r| selector.matches(r))
            .collect())
    }

    /// Exactly one member matching `selector`.
    pub async fn find(&self, selector: &Selector) -> Result<Resource> {
        let kind = self.member_kind()?;
        let mut found = self.matching(selector).await?;
        match found.len() {
            0 => Err(LibraryError::NotFound {
                kind,
                selector: selector.text().to_string(),
            }),
            1 => Ok(found.remove(0)),
            matches => Err(LibraryError::AmbiguousSelector {
                kind,
                name: selector.text().to_string(),
                matches,
            }),
        }
    }

    async fn mutate(&self, item: &Resource, mutation: Mutation) -> Result<()> {
        self.catalog
            .mutate_membership(&self.scope, &mutation)
            .await
            .map_err(|e| match &self.scope {
                CollectionScope::Library(_) => LibraryError::from_catalog(e, item.kind, &item.id),
                CollectionScope::Contents { .. } => self.map_catalog(e),
            })
    }

    fn check_kind(&self, item: &Resource) -> Result<()> {
        let expected = self.member_kind()?;
        if item.kind != expected {
            return Err(LibraryError::KindMismatch {
                expected,
                found: item.kind,
            });
        }
        Ok(())
    }

    fn check_mutable(&self, operation: &'static str) -> Result<()> {
        match &self.scope {
            CollectionScope::Contents { parent, .. } if !capabilities(*parent).is_ordered => {
                Err(LibraryError::Unsupported {
                    kind: *parent,
                    operation,
                })
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn not_found(&self) -> LibraryError {
        match &self.scope {
            CollectionScope::Library(kind) => LibraryError::NotFound {
                kind: *kind,
                selector: "library".to_string(),
            },
            CollectionScope::Contents { parent, id } => LibraryError::NotFound {
                kind: *parent,
                selector: id.clone(),
            },
        }
    }

    pub(crate) fn map_catalog(&self, err: CatalogError) -> LibraryError {
        match err {
            CatalogError::NotFound => self.not_found(),
            other => LibraryError::Catalog(other),
        }
    }
}
