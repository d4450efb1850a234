use tabled::Table;

use crate::{
    error, info,
    library::{Collection, PageCursor, Registry},
    utils, warning,
};

/// Lists the user's library of a kind, or with `of` the contents of one
/// playlist, album or show.
pub async fn list(registry: &Registry, tag: &str, of: Option<String>, cursor: PageCursor) {
    let collection = match of {
        Some(id) => {
            let parent = match registry.get_item(tag, &id).await {
                Ok(Some(p)) => p,
                Ok(None) => error!("{} with id '{}' appears to not exist!", tag, id),
                Err(e) => error!("{}", e),
            };
            match registry.contents(&parent) {
                Ok(c) => c,
                Err(e) => error!("{}", e),
            }
        }
        None => match registry.get_collection(tag) {
            Ok(c) => c,
            Err(e) => error!("{}", e),
        },
    };

    print_collection(&collection, cursor).await
}

async fn print_collection(collection: &Collection, cursor: PageCursor) {
    if cursor.retrieve_all {
        info!("Retrieving all items...");
    } else {
        info!(
            "Retrieving {} items starting at offset {}",
            cursor.limit, cursor.offset
        );
    }

    let pb = utils::spinner(&format!("Fetching {}...", collection.describe()));
    let result = collection.items(cursor).await;
    pb.finish_and_clear();

    let items = match result {
        Ok(Some(items)) => items,
        Ok(None) => error!("{}", collection.not_found()),
        Err(e) => error!("{}", e),
    };

    if items.is_empty() {
        warning!("No {} found.", collection.describe());
        return;
    }

    let rows = utils::resource_rows(&items, cursor.offset as usize);
    println!("{}", Table::new(rows));
}
