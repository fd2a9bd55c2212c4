use axum::{extract::State, response::Json};
use axum_extra::extract::CookieJar;

use crate::{
    server::AppState,
    types::{SessionInfo, VisitorStatus},
};

use super::{ensure_session, session_from};

pub async fn visitor_status(State(state): State<AppState>, jar: CookieJar) -> Json<VisitorStatus> {
    let status = match session_from(&jar) {
        Some(id) => state.store.contains(&id).await,
        None => false,
    };
    Json(VisitorStatus { status })
}

pub async fn session(jar: CookieJar) -> (CookieJar, Json<SessionInfo>) {
    let (jar, session_id) = ensure_session(jar);
    (jar, Json(SessionInfo { session_id }))
}
