use crate::{
    error,
    error::LibraryError,
    info,
    library::{PositionLists, Playlist, Registry, RemoveOptions, WalkRange, parse_position_lists},
    success,
    types::{PlaylistDetails, ResourceKind},
    warning,
};

async fn open_playlist(registry: &Registry, playlist_id: &str) -> Playlist {
    match registry.playlist(playlist_id).await {
        Ok(p) => p,
        Err(e) => error!("{}", e),
    }
}

fn parse_positions(input: Option<&str>, ids: &[String]) -> PositionLists {
    let lists = match input.map(parse_position_lists).transpose() {
        Ok(lists) => lists.unwrap_or_default(),
        Err(e) => error!("{}", e),
    };
    if lists.len() > ids.len() {
        warning!(
            "{} position lists given for {} tracks, the extra lists are ignored.",
            lists.len(),
            ids.len()
        );
    }
    lists
}

/// `edit add`: inserts or appends tracks to a playlist.
pub async fn add_tracks(
    registry: &Registry,
    playlist_id: &str,
    track_ids: &[String],
    insert_at: Option<&str>,
    unique: bool,
) {
    let positions = parse_positions(insert_at, track_ids);
    let playlist = open_playlist(registry, playlist_id).await;

    // Every track must exist before the playlist is touched.
    for id in track_ids {
        match registry.get_item(ResourceKind::Track.as_str(), id).await {
            Ok(Some(_)) => {}
            Ok(None) => error!(
                "{}",
                LibraryError::NotFound {
                    kind: ResourceKind::Track,
                    selector: id.clone(),
                }
            ),
            Err(e) => error!("{}", e),
        }
    }

    let report = match playlist.add(track_ids, &positions, unique).await {
        Ok(r) => r,
        Err(e) => error!("Cannot add tracks to '{}'. Err: {}", playlist.resource().display_name(), e),
    };

    let name = playlist.resource().display_name();
    for (id, position) in &report.inserted {
        success!("Inserted {} at position {} of '{}'", id, position, name);
    }
    if !report.appended.is_empty() {
        success!("Appended {} tracks to '{}'", report.appended.len(), name);
    }
    for id in &report.skipped {
        warning!("Skipped {}, it is already in '{}'", id, name);
    }
}

/// `edit remove`: removes occurrences of tracks from a playlist.
pub async fn remove_tracks(
    registry: &Registry,
    playlist_id: &str,
    track_ids: &[String],
    all: bool,
    specific: Option<&str>,
    offset: Option<&[i64]>,
    count: usize,
) {
    let positions = parse_positions(specific, track_ids);
    let range = match offset {
        Some([start, end]) => match WalkRange::from_bounds(*start, *end) {
            Ok(r) => r,
            Err(e) => error!("{}", e),
        },
        Some(other) => error!("--offset takes START and END, got {} values", other.len()),
        None => WalkRange::default(),
    };
    let options = RemoveOptions {
        all,
        positions,
        range,
        count,
    };

    let playlist = open_playlist(registry, playlist_id).await;
    let report = match playlist.remove(track_ids, &options).await {
        Ok(r) => r,
        Err(e) => error!(
            "Cannot remove tracks from '{}'. Err: {}",
            playlist.resource().display_name(),
            e
        ),
    };

    let name = playlist.resource().display_name();
    for id in &report.removed_all {
        success!("Removed every occurrence of {} from '{}'", id, name);
    }
    for occurrence in report.specific.iter().chain(&report.walked) {
        success!(
            "Removed {} at positions {:?} from '{}'",
            occurrence.id,
            occurrence.positions,
            name
        );
    }
    for id in &report.unmatched {
        warning!("{} was not found in the searched range of '{}'", id, name);
    }
    if report.is_empty() {
        info!("Nothing was removed.");
    }
}

/// `edit details`: changes playlist metadata and prints the result.
pub async fn edit_details(registry: &Registry, playlist_id: &str, details: PlaylistDetails) {
    let mut playlist = open_playlist(registry, playlist_id).await;
    if let Err(e) = playlist.change_details(&details).await {
        error!("{}", e);
    }
    success!("Updated '{}'", playlist.resource().display_name());
    println!("{}", playlist.resource());
}
