use std::sync::Arc;

use crate::{
    error::ProxyError,
    spotify::{SearchApi, SearchType},
    types::{AlbumItem, Artist, ArtistList, ArtistRef, SearchContext, SearchResult, TrackItem},
    utils::normalize_name,
};

use super::SessionStore;

/// Picks one track out of a Spotify search, preferring the reference artist.
pub struct SearchResolver {
    store: Arc<dyn SessionStore>,
    search: Arc<dyn SearchApi>,
    open_url: String,
}

impl SearchResolver {
    pub fn new(store: Arc<dyn SessionStore>, search: Arc<dyn SearchApi>, open_url: &str) -> Self {
        SearchResolver {
            store,
            search,
            open_url: open_url.trim_end_matches('/').to_string(),
        }
    }

    /// Searches tracks for `query` with the token of `session_id` and returns
    /// the first one credited to `context.reference_artist_name`, or the
    /// first track when none is.
    ///
    /// # Errors
    ///
    /// - [`ProxyError::InvalidParameter`] for a blank query
    /// - [`ProxyError::Unauthenticated`] when the session has no token
    /// - [`ProxyError::EmptyResult`] when Spotify returns no tracks
    /// - [`ProxyError::UpstreamError`] when the call or its payload fails
    pub async fn resolve(
        &self,
        query: &str,
        session_id: &str,
        context: &SearchContext,
    ) -> Result<SearchResult, ProxyError> {
        let query = checked_query(query)?;
        let token = self.store.get(session_id).await?;

        let response = self.search.search(&token, query, SearchType::Track).await?;
        let items = response.tracks.map(|p| p.items).unwrap_or_default();

        let result = resolve_track(&items, &context.reference_artist_name, query)?;
        tracing::debug!(
            query,
            reference = %context.reference_artist_name,
            artist = %result.artist_name,
            track = %result.track_name,
            "Resolved search"
        );
        Ok(result)
    }

    /// Searches albums for `query` and lists the lead artist of each one.
    pub async fn resolve_artists(
        &self,
        query: &str,
        session_id: &str,
    ) -> Result<ArtistList, ProxyError> {
        let query = checked_query(query)?;
        let token = self.store.get(session_id).await?;

        let response = self.search.search(&token, query, SearchType::Album).await?;
        let items = response.albums.map(|p| p.items).unwrap_or_default();

        collect_artists(&items, &self.open_url, query)
    }
}

fn checked_query(query: &str) -> Result<&str, ProxyError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ProxyError::InvalidParameter(
            "The search query must not be empty.".to_string(),
        ));
    }
    Ok(query)
}

/// First-match-wins selection over search results.
///
/// Items are scanned in order, and each item's artists in order; the first
/// artist whose normalized name equals the normalized `reference_artist`
/// decides the result. Without a match the first item and its first artist
/// are returned. A reference that normalizes to nothing never matches.
///
/// # Errors
///
/// - [`ProxyError::EmptyResult`] when `items` is empty
/// - [`ProxyError::UpstreamError`] when the fallback item lists no artists
pub fn resolve_track(
    items: &[TrackItem],
    reference_artist: &str,
    query: &str,
) -> Result<SearchResult, ProxyError> {
    let first = items
        .first()
        .ok_or_else(|| ProxyError::EmptyResult(query.to_string()))?;

    let reference = normalize_name(reference_artist);
    if !reference.is_empty() {
        for item in items {
            for artist in &item.artists {
                if normalize_name(&artist.name) == reference {
                    return Ok(search_result(item, artist));
                }
            }
        }
    }

    // fallback, which may name an artist other than the reference
    let artist = first.artists.first().ok_or_else(|| {
        ProxyError::UpstreamError(format!("track '{}' lists no artists", first.name))
    })?;
    Ok(search_result(first, artist))
}

fn search_result(item: &TrackItem, artist: &ArtistRef) -> SearchResult {
    SearchResult {
        artist_name: artist.name.clone(),
        artist_uri: artist.uri.clone(),
        track_name: item.name.clone(),
        track_url: item.external_urls.spotify.clone().unwrap_or_default(),
        track_uri: item.uri.clone(),
    }
}

/// One [`Artist`] per album item, taken from the album's lead artist, with
/// its web link built under `open_url`. Albums without artists are skipped.
///
/// # Errors
///
/// [`ProxyError::EmptyResult`] when `items` is empty.
pub fn collect_artists(
    items: &[AlbumItem],
    open_url: &str,
    query: &str,
) -> Result<ArtistList, ProxyError> {
    if items.is_empty() {
        return Err(ProxyError::EmptyResult(query.to_string()));
    }

    let artists = items
        .iter()
        .filter_map(|album| album.artists.first())
        .map(|artist| Artist {
            name: artist.name.clone(),
            uri: artist_link(artist, open_url),
        })
        .collect();

    Ok(ArtistList { artists })
}

fn artist_link(artist: &ArtistRef, open_url: &str) -> String {
    let id = artist
        .id
        .as_deref()
        .or_else(|| artist.uri.rsplit(':').next())
        .unwrap_or_default();

    if id.is_empty() {
        return artist.uri.clone();
    }
    format!("{}/artist/{}", open_url.trim_end_matches('/'), id)
}
