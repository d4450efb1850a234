use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{error, spotify, success, types::PkceToken};

pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) {
    match spotify::auth::auth(shared_state).await {
        Ok(_) => success!("Authentication successful, token saved."),
        Err(e) => error!("Authentication failed. Err: {}", e),
    }
}
