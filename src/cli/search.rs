use tabled::Table;

use crate::{
    error,
    library::{Registry, Resource, resolve_kind},
    types::SearchQuery,
    utils, warning,
};

/// Searches the public catalog, or with `user` the names in the user's own
/// library. `user` without a query lists the whole library.
pub async fn search(
    registry: &Registry,
    tag: &str,
    query: Option<String>,
    user: bool,
    limit: u32,
    market: Option<String>,
) {
    let kind = match resolve_kind(tag) {
        Ok(k) => k,
        Err(e) => error!("{}", e),
    };

    let pb = utils::spinner("Searching...");
    let result = if user {
        search_library(registry, tag, query.as_deref()).await
    } else {
        let Some(query) = query else {
            pb.finish_and_clear();
            error!("A search query is required unless --user is given.");
        };
        let request = SearchQuery {
            query,
            limit,
            offset: 0,
            market,
        };
        registry.search_public(tag, &request).await
    };
    pb.finish_and_clear();

    let found = match result {
        Ok(found) => found,
        Err(e) => error!("Search failed. Err: {}", e),
    };

    if found.is_empty() {
        warning!("No {}s found.", kind);
        return;
    }
    println!("{}", Table::new(utils::resource_rows(&found, 0)));
}

async fn search_library(
    registry: &Registry,
    tag: &str,
    query: Option<&str>,
) -> Result<Vec<Resource>, crate::error::LibraryError> {
    let items = registry.get_collection(tag)?.all_items().await?;
    Ok(match query.map(|q| q.trim().to_lowercase()) {
        Some(needle) if !needle.is_empty() => items
            .into_iter()
            .filter(|r| {
                r.name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .collect(),
        _ => items,
    })
}
