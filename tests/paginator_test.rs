mod common;

use common::FakeCatalog;
use spotedit::{
    error::CatalogError,
    library::{PageCursor, Paginator},
    types::{CollectionScope, PageRequest, ResourceKind},
};

// Library of `count` followed playlists named p0, p1, ...
fn followed_playlists(count: usize) -> FakeCatalog {
    let ids: Vec<String> = (0..count).map(|i| format!("p{}", i)).collect();
    let mut fake = FakeCatalog::new();
    for id in &ids {
        fake = fake.with_resource(ResourceKind::Playlist, id, &format!("Playlist {}", id));
    }
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    fake.with_library(ResourceKind::Playlist, &refs)
}

fn ids_of(items: &[serde_json::Value]) -> Vec<String> {
    items
        .iter()
        .map(|v| v["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_empty_collection_is_some_empty() {
    let fake = followed_playlists(0);
    let scope = CollectionScope::Library(ResourceKind::Playlist);

    let items = Paginator::new(&fake, &scope, PageCursor::all())
        .collect_all()
        .await
        .unwrap();

    assert_eq!(items, Some(vec![]));
    assert_eq!(fake.page_requests().len(), 1);
}

#[tokio::test]
async fn test_single_full_page_needs_one_request() {
    let fake = followed_playlists(20);
    let scope = CollectionScope::Library(ResourceKind::Playlist);

    let items = Paginator::new(&fake, &scope, PageCursor::all())
        .collect_all()
        .await
        .unwrap()
        .unwrap();

    assert_eq!(items.len(), 20);
    assert_eq!(fake.page_requests().len(), 1);
}

#[tokio::test]
async fn test_retrieve_all_walks_every_page_in_order() {
    let fake = followed_playlists(45);
    let scope = CollectionScope::Library(ResourceKind::Playlist);

    let items = Paginator::new(&fake, &scope, PageCursor::all())
        .collect_all()
        .await
        .unwrap()
        .unwrap();

    let expected: Vec<String> = (0..45).map(|i| format!("p{}", i)).collect();
    assert_eq!(ids_of(&items), expected);

    let offsets: Vec<u32> = fake.page_requests().iter().map(|r| r.offset).collect();
    assert_eq!(offsets, vec![0, 20, 40]);
}

#[tokio::test]
async fn test_without_retrieve_all_only_first_page() {
    let fake = followed_playlists(45);
    let scope = CollectionScope::Library(ResourceKind::Playlist);

    let items = Paginator::new(&fake, &scope, PageCursor::new(10, 5, false))
        .collect_all()
        .await
        .unwrap()
        .unwrap();

    assert_eq!(items.len(), 10);
    assert_eq!(items[0]["id"], "p5");
    assert_eq!(
        fake.page_requests(),
        vec![PageRequest {
            limit: 10,
            offset: 5,
            after: None
        }]
    );
}

#[tokio::test]
async fn test_missing_collection_is_none() {
    let fake = FakeCatalog::new();
    let scope = CollectionScope::Contents {
        parent: ResourceKind::Playlist,
        id: "gone".to_string(),
    };

    let items = Paginator::new(&fake, &scope, PageCursor::all())
        .collect_all()
        .await
        .unwrap();

    assert_eq!(items, None);
}

#[tokio::test]
async fn test_transport_error_propagates() {
    let fake = followed_playlists(45).fail_pages_after(1);
    let scope = CollectionScope::Library(ResourceKind::Playlist);

    let result = Paginator::new(&fake, &scope, PageCursor::all())
        .collect_all()
        .await;

    assert!(matches!(result, Err(CatalogError::Unauthorized(_))));
    assert_eq!(fake.page_requests().len(), 2);
}

#[tokio::test]
async fn test_next_page_is_lazy_and_restartable() {
    let fake = followed_playlists(30);
    let scope = CollectionScope::Library(ResourceKind::Playlist);
    let mut pages = Paginator::new(&fake, &scope, PageCursor::all());

    // Nothing is fetched until asked for
    assert!(fake.page_requests().is_empty());

    let first = pages.next_page().await.unwrap().unwrap();
    assert_eq!(first.len(), 20);
    assert_eq!(pages.offset(), 20);
    assert_eq!(fake.page_requests().len(), 1);

    let second = pages.next_page().await.unwrap().unwrap();
    assert_eq!(second.len(), 10);
    assert!(pages.next_page().await.unwrap().is_none());
    assert_eq!(fake.page_requests().len(), 2);

    pages.restart();
    assert_eq!(pages.offset(), 0);
    let again = pages.next_page().await.unwrap().unwrap();
    assert_eq!(ids_of(&again), ids_of(&first));
}

#[tokio::test]
async fn test_followed_artists_page_by_cursor() {
    let ids: Vec<String> = (0..25).map(|i| format!("a{}", i)).collect();
    let mut fake = FakeCatalog::new();
    for id in &ids {
        fake = fake.with_resource(ResourceKind::Artist, id, id);
    }
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let fake = fake.with_library(ResourceKind::Artist, &refs);
    let scope = CollectionScope::Library(ResourceKind::Artist);

    let items = Paginator::new(&fake, &scope, PageCursor::new(10, 0, true))
        .collect_all()
        .await
        .unwrap()
        .unwrap();

    assert_eq!(ids_of(&items), ids);
    let cursors: Vec<Option<String>> = fake
        .page_requests()
        .into_iter()
        .map(|r| r.after)
        .collect();
    assert_eq!(
        cursors,
        vec![None, Some("a9".to_string()), Some("a19".to_string())]
    );
}

#[tokio::test]
async fn test_offset_follows_served_page_size() {
    // Asks for 100 per page, the catalog only serves 50
    let fake = followed_playlists(120).with_max_page(50);
    let scope = CollectionScope::Library(ResourceKind::Playlist);

    let items = Paginator::new(&fake, &scope, PageCursor::new(100, 0, true))
        .collect_all()
        .await
        .unwrap()
        .unwrap();

    let expected: Vec<String> = (0..120).map(|i| format!("p{}", i)).collect();
    assert_eq!(ids_of(&items), expected);

    let offsets: Vec<u32> = fake.page_requests().iter().map(|r| r.offset).collect();
    assert_eq!(offsets, vec![0, 50, 100]);
}

#[tokio::test]
async fn test_offset_follows_short_pages_from_a_later_start() {
    let fake = followed_playlists(30).with_max_page(8);
    let scope = CollectionScope::Library(ResourceKind::Playlist);
    let mut pages = Paginator::new(&fake, &scope, PageCursor::new(20, 5, true));

    let first = pages.next_page().await.unwrap().unwrap();
    assert_eq!(first.len(), 8);
    assert_eq!(pages.offset(), 13);

    let rest = pages.collect_all().await.unwrap().unwrap();
    assert_eq!(rest.len(), 17);
    assert_eq!(rest.last().unwrap()["id"], "p29");
}
