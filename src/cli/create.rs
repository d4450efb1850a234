use crate::{
    error, info,
    library::{Registry, Selector},
    success,
    types::{CreatePlaylistRequest, ResourceKind},
    warning,
};

/// Creates a playlist owned by the current user.
///
/// Without `force`, a followed playlist with the same name blocks creation.
pub async fn create(registry: &Registry, request: CreatePlaylistRequest, force: bool) {
    if !force {
        let followed = registry.library(ResourceKind::Playlist);
        match followed
            .matching(&Selector::Name(request.name.clone()))
            .await
        {
            Ok(existing) if !existing.is_empty() => {
                warning!(
                    "A playlist named '{}' already exists (id: {}). Use --force to create another one.",
                    request.name,
                    existing[0].id
                );
                return;
            }
            Ok(_) => {}
            Err(e) => error!("Cannot check existing playlists. Err: {}", e),
        }
    }

    let playlist = match registry.create_playlist(&request).await {
        Ok(p) => p,
        Err(e) => error!("Cannot create playlist '{}'. Err: {}", request.name, e),
    };

    success!("Created playlist '{}'", playlist.display_name());
    info!(
        "public: {}, collaborative: {}",
        request.public, request.collaborative
    );
    if !request.description.is_empty() {
        info!("description: {}", request.description);
    }
    println!("{}", playlist);
}
