use serde_json::Value;

use crate::{
    error::CatalogError,
    spotify::Catalog,
    types::{CollectionScope, PageRequest},
};

pub const DEFAULT_LIMIT: u32 = 20;
/// Largest page the service serves.
pub const MAX_LIMIT: u32 = 50;

/// Where a pagination pass starts and whether it continues past the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub limit: u32,
    pub offset: u32,
    pub retrieve_all: bool,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            retrieve_all: false,
        }
    }
}

impl PageCursor {
    pub fn new(limit: u32, offset: u32, retrieve_all: bool) -> Self {
        Self {
            limit,
            offset,
            retrieve_all,
        }
    }

    /// Every page from the start of the collection.
    pub fn all() -> Self {
        Self {
            retrieve_all: true,
            ..Self::default()
        }
    }
}

/// Lazily walks the pages of one collection.
///
/// Pages are requested one at a time, strictly in order. The first call to
/// [`next_page`](Self::next_page) always hits the catalog; later calls only do
/// while `retrieve_all` is set and the previous page reported a successor.
pub struct Paginator<'a> {
    catalog: &'a dyn Catalog,
    scope: &'a CollectionScope,
    start: PageCursor,
    offset: u32,
    after: Option<String>,
    exhausted: bool,
}

impl<'a> Paginator<'a> {
    pub fn new(catalog: &'a dyn Catalog, scope: &'a CollectionScope, cursor: PageCursor) -> Self {
        Self {
            catalog,
            scope,
            start: cursor,
            offset: cursor.offset,
            after: None,
            exhausted: false,
        }
    }

    /// Rewinds to the cursor the paginator was created with.
    pub fn restart(&mut self) {
        self.offset = self.start.offset;
        self.after = None;
        self.exhausted = false;
    }

    /// Offset the next request will use.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Fetches the next page, or returns `Ok(None)` once the pass is over.
    ///
    /// A missing collection surfaces as [`CatalogError::NotFound`].
    pub async fn next_page(&mut self) -> Result<Option<Vec<Value>>, CatalogError> {
        if self.exhausted {
            return Ok(None);
        }

        let request = PageRequest {
            limit: self.start.limit,
            offset: self.offset,
            after: self.after.clone(),
        };
        log::trace!(
            "fetching {} limit={} offset={}",
            self.scope,
            request.limit,
            request.offset
        );

        let page = match self.catalog.fetch_page(self.scope, &request).await {
            Ok(page) => page,
            Err(e) => {
                self.exhausted = true;
                return Err(e);
            }
        };

        // Advance by what was served; the catalog may cap the page size.
        let served = page.items.len() as u32;
        if self.start.retrieve_all && page.has_next && served > 0 {
            self.offset += served;
            self.after = page.cursor;
        } else {
            if page.has_next && served == 0 {
                log::warn!("{} reported more items after an empty page", self.scope);
            }
            self.exhausted = true;
        }

        Ok(Some(page.items))
    }

    /// Concatenates every remaining page in fetch order.
    ///
    /// Returns `Ok(None)` when the catalog reports the collection missing, and
    /// `Ok(Some(vec![]))` for a collection that exists but is empty.
    pub async fn collect_all(&mut self) -> Result<Option<Vec<Value>>, CatalogError> {
        let mut items = Vec::new();
        loop {
            match self.next_page().await {
                Ok(Some(page)) => items.extend(page),
                Ok(None) => return Ok(Some(items)),
                Err(CatalogError::NotFound) => return Ok(None),
                Err(e) => return Err(e),
            }
        }
    }
}
