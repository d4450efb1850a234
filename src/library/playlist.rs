use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use crate::{
    error::{LibraryError, Result},
    spotify::Catalog,
    types::{CollectionScope, Mutation, Occurrence, PlaylistDetails, ResourceKind},
};

use super::{
    Collection, PageCursor, Resource,
    positions::{WalkRange, positions_for},
};

/// Page size for the full reads done before `--add-if-unique` and walk-and-count.
const FULL_READ_LIMIT: u32 = 50;

/// How `Playlist::remove` picks which occurrences to delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOptions {
    /// Remove every occurrence; positions and counts are ignored.
    pub all: bool,
    /// Explicit positions, aligned with the ids.
    pub positions: Vec<Option<Vec<usize>>>,
    /// Bounds of the walk for ids without explicit positions.
    pub range: WalkRange,
    /// Occurrences to remove per id during the walk.
    pub count: usize,
}

impl Default for RemoveOptions {
    fn default() -> Self {
        Self {
            all: false,
            positions: Vec::new(),
            range: WalkRange::default(),
            count: 1,
        }
    }
}

/// What one `remove` call targeted, per mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub removed_all: Vec<String>,
    pub specific: Vec<Occurrence>,
    pub walked: Vec<Occurrence>,
    /// Walk ids with no occurrence inside the walked range.
    pub unmatched: Vec<String>,
}

impl RemovalReport {
    pub fn is_empty(&self) -> bool {
        self.removed_all.is_empty() && self.specific.is_empty() && self.walked.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddReport {
    /// `(id, position)` for every positional insert, in call order.
    pub inserted: Vec<(String, usize)>,
    pub appended: Vec<String>,
    /// Ids left out because the playlist already had them.
    pub skipped: Vec<String>,
}

/// An editable, ordered playlist.
pub struct Playlist {
    catalog: Arc<dyn Catalog>,
    resource: Resource,
    tracks: Collection,
}

impl Playlist {
    pub fn new(catalog: Arc<dyn Catalog>, resource: Resource) -> Self {
        let tracks = Collection::new(
            Arc::clone(&catalog),
            CollectionScope::Contents {
                parent: ResourceKind::Playlist,
                id: resource.id.clone(),
            },
        );
        Self {
            catalog,
            resource,
            tracks,
        }
    }

    pub fn id(&self) -> &str {
        &self.resource.id
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn tracks(&self) -> &Collection {
        &self.tracks
    }

    /// Re-reads the playlist payload.
    pub async fn refresh(&mut self) -> Result<()> {
        self.resource.refresh(self.catalog.as_ref()).await
    }

    /// Updates name, visibility, collaboration or description.
    pub async fn change_details(&mut self, details: &PlaylistDetails) -> Result<()> {
        if details.is_empty() {
            return Err(LibraryError::MissingSelector(
                "at least one of --name, --public, --collaborative, --description".to_string(),
            ));
        }
        self.catalog
            .change_playlist_details(&self.resource.id, details)
            .await
            .map_err(|e| self.tracks.map_catalog(e))?;
        self.refresh().await
    }

    /// Track ids in playlist order, read fresh from the catalog.
    ///
    /// Unavailable entries keep their slot with an empty id.
    pub async fn track_ids(&self) -> Result<Vec<String>> {
        let tracks = self
            .tracks
            .items(PageCursor::new(FULL_READ_LIMIT, 0, true))
            .await?
            .ok_or_else(|| self.tracks.not_found())?;
        Ok(tracks.into_iter().map(|t| t.id).collect())
    }

    /// Adds tracks in order.
    ///
    /// An id with a position list is inserted once per position. Ids without
    /// one are appended, consecutive appends going out as one batch.
    pub async fn add(
        &self,
        ids: &[String],
        positions: &[Option<Vec<usize>>],
        unique: bool,
    ) -> Result<AddReport> {
        let mut report = AddReport::default();
        let mut present: HashSet<String> = if unique {
            self.track_ids().await?.into_iter().collect()
        } else {
            HashSet::new()
        };
        let mut pending: Vec<String> = Vec::new();

        for (index, id) in ids.iter().enumerate() {
            if unique && !present.insert(id.clone()) {
                log::debug!("{} already in playlist {}, skipping", id, self.id());
                report.skipped.push(id.clone());
                continue;
            }

            match positions_for(positions, index) {
                Some(list) => {
                    self.flush_appends(&mut pending, &mut report).await?;
                    for &position in list {
                        self.mutate(Mutation::Add {
                            ids: vec![id.clone()],
                            position: Some(position),
                        })
                        .await?;
                        report.inserted.push((id.clone(), position));
                    }
                }
                None => pending.push(id.clone()),
            }
        }
        self.flush_appends(&mut pending, &mut report).await?;

        Ok(report)
    }

    async fn flush_appends(&self, pending: &mut Vec<String>, report: &mut AddReport) -> Result<()> {
        if pending.is_empty() {
            return Ok(());
        }
        let ids = std::mem::take(pending);
        self.mutate(Mutation::Add {
            ids: ids.clone(),
            position: None,
        })
        .await?;
        report.appended.extend(ids);
        Ok(())
    }

    /// Removes tracks.
    ///
    /// `all` wins over everything else. Otherwise ids with explicit positions
    /// are removed at exactly those positions, and the rest by walking a fresh
    /// read of the playlist within `range`, removing up to `count`
    /// occurrences of each.
    pub async fn remove(&self, ids: &[String], options: &RemoveOptions) -> Result<RemovalReport> {
        if ids.is_empty() {
            return Err(LibraryError::MissingSelector("track id".to_string()));
        }
        let mut report = RemovalReport::default();

        if options.all {
            let mut seen = HashSet::new();
            let unique: Vec<String> = ids
                .iter()
                .filter(|id| seen.insert(id.as_str()))
                .cloned()
                .collect();
            self.mutate(Mutation::RemoveAll {
                ids: unique.clone(),
            })
            .await?;
            report.removed_all = unique;
            return Ok(report);
        }

        let mut specific: Vec<Occurrence> = Vec::new();
        let mut walk: Vec<(String, usize)> = Vec::new();
        for (index, id) in ids.iter().enumerate() {
            match positions_for(&options.positions, index) {
                Some(list) => merge_positions(&mut specific, id, list),
                None => walk.push((id.clone(), options.count)),
            }
        }

        if !specific.is_empty() {
            self.mutate(Mutation::RemoveAtPositions {
                occurrences: specific.clone(),
            })
            .await?;
            report.specific = specific;
        }

        if !walk.is_empty() {
            let current = self.track_ids().await?;
            let walked = walk_and_count(&current, &walk, options.range);
            if !walked.is_empty() {
                self.mutate(Mutation::RemoveAtPositions {
                    occurrences: walked.clone(),
                })
                .await?;
            }

            let mut unmatched: Vec<String> = Vec::new();
            for (id, _) in &walk {
                if !walked.iter().any(|o| o.id == *id) && !unmatched.contains(id) {
                    unmatched.push(id.clone());
                }
            }
            report.walked = walked;
            report.unmatched = unmatched;
        }

        Ok(report)
    }

    async fn mutate(&self, mutation: Mutation) -> Result<()> {
        self.catalog
            .mutate_membership(self.tracks.scope(), &mutation)
            .await
            .map_err(|e| self.tracks.map_catalog(e))
    }
}

fn merge_positions(occurrences: &mut Vec<Occurrence>, id: &str, positions: &[usize]) {
    match occurrences.iter_mut().find(|o| o.id == id) {
        Some(existing) => {
            for &p in positions {
                if !existing.positions.contains(&p) {
                    existing.positions.push(p);
                }
            }
        }
        None => {
            let mut unique = Vec::with_capacity(positions.len());
            for &p in positions {
                if !unique.contains(&p) {
                    unique.push(p);
                }
            }
            occurrences.push(Occurrence {
                id: id.to_string(),
                positions: unique,
            });
        }
    }
}

/// Walks `sequence` within `range` and records the index of each pending id
/// until its count is used up.
///
/// Counts of an id listed more than once add up. The walk stops as soon as
/// every count reaches zero. Occurrences come back in the order the ids were
/// first listed.
pub fn walk_and_count(
    sequence: &[String],
    pending: &[(String, usize)],
    range: WalkRange,
) -> Vec<Occurrence> {
    let mut order: Vec<&str> = Vec::new();
    let mut remaining: HashMap<&str, usize> = HashMap::new();
    for (id, count) in pending {
        if id.is_empty() {
            continue;
        }
        if !remaining.contains_key(id.as_str()) {
            order.push(id.as_str());
        }
        *remaining.entry(id.as_str()).or_default() += count;
    }

    let mut left: usize = remaining.values().sum();
    let mut found: HashMap<&str, Vec<usize>> = HashMap::new();
    for index in range.clamp(sequence.len()) {
        if left == 0 {
            break;
        }
        let id = sequence[index].as_str();
        if let Some(count) = remaining.get_mut(id) {
            if *count > 0 {
                *count -= 1;
                left -= 1;
                found.entry(id).or_default().push(index);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|id| {
            found.remove(id).map(|positions| Occurrence {
                id: id.to_string(),
                positions,
            })
        })
        .collect()
}
