use crate::{
    error,
    error::LibraryError,
    info,
    library::{Collection, Registry, Resource, Selector, registry::kind_entry, resolve_kind},
    success,
    types::ResourceKind,
    utils,
};

const FOLLOWED: &str = "followed";
const SAVED: &str = "saved";

pub async fn follow(registry: &Registry, tag: &str, id: &str) {
    add(registry, tag, id, FOLLOWED, "follow").await
}

pub async fn save(registry: &Registry, tag: &str, id: &str) {
    add(registry, tag, id, SAVED, "save").await
}

pub async fn unfollow(registry: &Registry, tag: &str, selector: &str, by_id: bool, no_prompt: bool) {
    remove(registry, tag, selector, by_id, no_prompt, FOLLOWED, "unfollow").await
}

pub async fn unsave(registry: &Registry, tag: &str, selector: &str, by_id: bool, no_prompt: bool) {
    remove(registry, tag, selector, by_id, no_prompt, SAVED, "unsave").await
}

/// Resolves `tag` and checks the verb fits the kind: artists and playlists are
/// followed, everything else is saved.
fn resolve(tag: &str, label: &str, verb: &'static str) -> ResourceKind {
    let kind = match resolve_kind(tag) {
        Ok(k) => k,
        Err(e) => error!("{}", e),
    };
    if kind_entry(kind).library_label != label {
        error!(
            "{}",
            LibraryError::Unsupported {
                kind,
                operation: verb
            }
        );
    }
    kind
}

async fn add(registry: &Registry, tag: &str, id: &str, label: &str, verb: &'static str) {
    let kind = resolve(tag, label, verb);
    let (item, collection) = match registry.get_item_and_collection(kind.as_str(), id).await {
        Ok(found) => found,
        Err(e) => error!("{}", e),
    };

    if let Err(e) = collection.add(&item).await {
        error!("Cannot {} {} '{}'. Err: {}", verb, kind, item.display_name(), e);
    }
    success!("{} {} '{}'", past_tense(verb), kind, item.display_name());
}

async fn remove(
    registry: &Registry,
    tag: &str,
    selector: &str,
    by_id: bool,
    no_prompt: bool,
    label: &str,
    verb: &'static str,
) {
    let kind = resolve(tag, label, verb);
    let collection = registry.library(kind);
    let item = match select(registry, &collection, kind, selector, by_id).await {
        Ok(item) => item,
        Err(e) => error!("{}", e),
    };

    if !no_prompt
        && !utils::confirm(&format!(
            "{} {} '{}' ({})?",
            capitalize(verb),
            kind,
            item.display_name(),
            item.id
        ))
    {
        info!("Operation cancelled");
        return;
    }

    if let Err(e) = collection.remove(&item).await {
        error!("Cannot {} {} '{}'. Err: {}", verb, kind, item.display_name(), e);
    }
    success!("{} {} '{}'", past_tense(verb), kind, item.display_name());
}

async fn select(
    registry: &Registry,
    collection: &Collection,
    kind: ResourceKind,
    selector: &str,
    by_id: bool,
) -> Result<Resource, LibraryError> {
    if by_id {
        Resource::require(registry.catalog(), kind, selector).await
    } else {
        collection.find(&Selector::Name(selector.to_string())).await
    }
}

fn past_tense(verb: &str) -> String {
    capitalize(&format!("{}ed", verb.trim_end_matches('e')))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
