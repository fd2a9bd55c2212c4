use std::{
    net::SocketAddr,
    str::FromStr,
    sync::{Arc, OnceLock},
};

use axum::{Router, routing::get};
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    Res, api,
    config::Settings,
    management::{
        InMemorySessionStore, LoginManager, RefresherHandle, SearchResolver, SessionStore,
        TokenRefresher,
    },
    radio::{NowPlaying, SverigesRadio},
    spotify::{SearchApi, SpotifyClient, TokenSource},
};

/// Everything the handlers share. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: Arc<dyn SessionStore>,
    pub spotify: Arc<SpotifyClient>,
    pub radio: Arc<dyn NowPlaying>,
    pub resolver: Arc<SearchResolver>,
    pub logins: Arc<LoginManager>,
    refresher: Arc<OnceLock<RefresherHandle>>,
    shutdown: CancellationToken,
}

impl AppState {
    /// Wires the production collaborators from `settings`.
    pub fn from_settings(settings: Settings) -> Res<Self> {
        let spotify = Arc::new(SpotifyClient::new(
            settings.spotify.clone(),
            settings.http_timeout,
        )?);
        let radio = Arc::new(SverigesRadio::new(&settings.radio, settings.http_timeout)?);
        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());

        Ok(Self::new(settings, store, spotify, radio))
    }

    pub fn new(
        settings: Settings,
        store: Arc<dyn SessionStore>,
        spotify: Arc<SpotifyClient>,
        radio: Arc<dyn NowPlaying>,
    ) -> Self {
        let search: Arc<dyn SearchApi> = spotify.clone();
        let resolver = Arc::new(SearchResolver::new(
            Arc::clone(&store),
            search,
            &settings.spotify.open_url,
        ));

        AppState {
            settings: Arc::new(settings),
            store,
            spotify,
            radio,
            resolver,
            logins: Arc::new(LoginManager::new()),
            refresher: Arc::new(OnceLock::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Starts the token refresher unless it is already running.
    pub fn ensure_refresher(&self) {
        self.refresher.get_or_init(|| {
            let source: Arc<dyn TokenSource> = self.spotify.clone();
            TokenRefresher::new(
                Arc::clone(&self.store),
                source,
                self.settings.refresh_interval,
            )
            .spawn(self.shutdown.child_token())
        });
    }

    pub fn refresher_running(&self) -> bool {
        self.refresher.get().is_some()
    }

    /// Stops background work owned by the state.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

pub fn router(state: AppState) -> Router {
    let spotify = Router::new()
        .route("/authuser", get(api::auth_user))
        .route("/login", get(api::callback))
        .route("/visitorstatus", get(api::visitor_status))
        .route("/session", get(api::session))
        .route("/getprofile/{userid}", get(api::user_profile))
        .route("/getmyprofile", get(api::my_profile))
        .route("/getmyprofile/{format}", get(api::my_profile_format))
        .route("/getplaylists/{userid}", get(api::user_playlists))
        .route("/getmyplaylists/{limit}", get(api::my_playlists))
        .route("/getmyplaylists/{limit}/{format}", get(api::my_playlists_format))
        .route("/search/{query}", get(api::search))
        .route("/search/{query}/{format}", get(api::search_format))
        .route("/searchartists/{query}", get(api::search_artists))
        .route(
            "/searchartists/{query}/{format}",
            get(api::search_artists_format),
        );

    Router::new()
        .route("/health", get(api::health))
        .nest(api::API_PREFIX, spotify)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the proxy on `settings.server_addr` until Ctrl-C.
pub async fn start_api_server(settings: Settings) -> Res<()> {
    let addr = SocketAddr::from_str(&settings.server_addr)
        .map_err(|e| format!("Failed to parse server address: {}", e))?;

    let state = AppState::from_settings(settings)?;
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.shutdown();
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
