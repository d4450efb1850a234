use std::fmt;

use serde_json::Value;

use crate::{
    error::{LibraryError, Result},
    spotify::Catalog,
    types::ResourceKind,
};

/// One remote entity: a playlist, track, artist, album, show or episode.
///
/// `raw` keeps the full payload as returned by the catalog; only `id` and
/// `name` are read out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: String,
    pub name: Option<String>,
    pub kind: ResourceKind,
    pub raw: Value,
}

impl Resource {
    /// Wraps an already fetched payload without another round-trip.
    ///
    /// Payloads without an id (unavailable playlist entries come back as
    /// `null`) get an empty id, which never matches a selector.
    pub fn from_raw(kind: ResourceKind, raw: Value) -> Self {
        let id = raw["id"].as_str().unwrap_or_default().to_string();
        let name = raw["name"].as_str().map(str::to_string);
        Self {
            id,
            name,
            kind,
            raw,
        }
    }

    /// Fetches a resource by id. `Ok(None)` means the catalog does not know it.
    pub async fn fetch(catalog: &dyn Catalog, kind: ResourceKind, id: &str) -> Result<Option<Self>> {
        match catalog.fetch_one(kind, id).await {
            Ok(raw) => {
                let mut resource = Self::from_raw(kind, raw);
                if resource.id.is_empty() {
                    resource.id = id.to_string();
                }
                Ok(Some(resource))
            }
            Err(e) => match LibraryError::from_catalog(e, kind, id) {
                LibraryError::NotFound { .. } => Ok(None),
                other => Err(other),
            },
        }
    }

    /// Like [`fetch`](Self::fetch), but a missing resource is an error.
    pub async fn require(catalog: &dyn Catalog, kind: ResourceKind, id: &str) -> Result<Self> {
        Self::fetch(catalog, kind, id)
            .await?
            .ok_or_else(|| LibraryError::NotFound {
                kind,
                selector: id.to_string(),
            })
    }

    /// Re-reads `raw` from the catalog, e.g. after a mutation.
    pub async fn refresh(&mut self, catalog: &dyn Catalog) -> Result<()> {
        let raw = catalog
            .fetch_one(self.kind, &self.id)
            .await
            .map_err(|e| LibraryError::from_catalog(e, self.kind, &self.id))?;
        self.name = raw["name"].as_str().map(str::to_string);
        self.raw = raw;
        Ok(())
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    fn wrapped(label: &str, value: &str) -> Vec<String> {
        let mut lines = Vec::new();
        let mut line = format!("{}\t", label);
        let mut has_word = false;
        for word in value.split_whitespace() {
            if has_word && line.len() + word.len() + 1 > 64 {
                lines.push(line);
                line = "\t\t".to_string();
                has_word = false;
            }
            if has_word {
                line.push(' ');
            }
            line.push_str(word);
            has_word = true;
        }
        lines.push(line);
        lines
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = &self.raw;
        let text = |v: &Value| v.as_str().unwrap_or_default().to_string();

        let mut lines = vec!["-----------------------".to_string()];
        match self.kind {
            ResourceKind::Playlist => {
                lines.push(format!("Name:\t\t{}", self.display_name()));
                lines.extend(Self::wrapped("Description:", &text(&raw["description"])));
                lines.push(format!("Owner:\t\t{}", text(&raw["owner"]["display_name"])));
                lines.push(format!("Track count:\t{}", raw["tracks"]["total"]));
                lines.push(format!("Playlist id:\t{}", self.id));
                lines.push(format!("Owner id:\t{}", text(&raw["owner"]["id"])));
                lines.push(format!("Url: {}", text(&raw["external_urls"]["spotify"])));
            }
            ResourceKind::Artist => {
                let genres = raw["genres"]
                    .as_array()
                    .map(|g| g.iter().map(text).collect::<Vec<_>>().join(", "))
                    .unwrap_or_default();
                lines.push(format!("Name:\t\t{}", self.display_name()));
                lines.push(format!("id:\t\t{}", self.id));
                lines.extend(Self::wrapped("Genres:\t", &genres));
                lines.push(format!("Followers: {}", raw["followers"]["total"]));
                lines.push(format!("Url: {}", text(&raw["external_urls"]["spotify"])));
            }
            kind => {
                lines.push(format!("<{}: name: {}, id: {}>", kind, self.display_name(), self.id));
            }
        }
        write!(f, "{}", lines.join("\n"))
    }
}
