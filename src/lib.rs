//! Spotify Session Proxy Library
//!
//! This library exposes a handful of Spotify Web API endpoints (OAuth login,
//! profile, playlists, search) behind browser-session scoped HTTP routes,
//! rendered as JSON or XML. Tokens are kept in memory per session and
//! refreshed in the background.
//!
//! # Modules
//!
//! - `api` - HTTP handlers of the proxy routes
//! - `config` - Configuration management and environment variables
//! - `error` - The error type shared by every layer
//! - `format` - JSON and XML rendering of results
//! - `management` - Session store, token refresher and search resolver
//! - `radio` - Now-playing lookup used as search context
//! - `server` - Router construction and the HTTP server
//! - `spotify` - Spotify accounts service and Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spotproxy::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> spotproxy::Res<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     server::start_api_server(settings).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod management;
pub mod radio;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for startup and server plumbing.
///
/// Domain operations return [`error::ProxyError`]; this boxed alias is used
/// where errors of several crates meet, such as binding the listener.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
