//! # API Module
//!
//! HTTP endpoints served by the local callback server during `spotedit auth`.
//!
//! - [`callback`] - Handles the redirect from Spotify's authorization server and
//!   exchanges the authorization code for a token using the PKCE verifier held
//!   in shared state.
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use spotedit::api::callback;
//!
//! let app = Router::new().route("/callback", get(callback));
//! ```

mod callback;

pub use callback::callback;
