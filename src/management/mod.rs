mod auth;
mod refresher;
mod resolver;
mod session;

pub use auth::LoginManager;
pub use refresher::{DEFAULT_REFRESH_INTERVAL, RefresherHandle, SweepReport, TokenRefresher};
pub use resolver::{SearchResolver, collect_artists, resolve_track};
pub use session::{InMemorySessionStore, SessionStore};
