//! JSON and XML rendering of the entities the proxy returns.
//!
//! Field names in both formats are the entity's attribute names; XML
//! documents use the root element given by [`Entity::ROOT`].

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{
    error::ProxyError,
    types::{ArtistList, Playlists, Profile, SearchResult, SessionInfo, VisitorStatus},
};

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const XML_CONTENT_TYPE: &str = "application/xml";

/// A value that can be rendered by [`Format`].
pub trait Entity: Serialize {
    /// Root element name of the XML rendering.
    const ROOT: &'static str;
}

impl Entity for SearchResult {
    const ROOT: &'static str = "searchResult";
}

impl Entity for Profile {
    const ROOT: &'static str = "profile";
}

impl Entity for Playlists {
    const ROOT: &'static str = "playlists";
}

impl Entity for ArtistList {
    const ROOT: &'static str = "artists";
}

impl Entity for VisitorStatus {
    const ROOT: &'static str = "visitorStatus";
}

impl Entity for SessionInfo {
    const ROOT: &'static str = "session";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Xml,
}

impl Format {
    pub fn content_type(&self) -> &'static str {
        match self {
            Format::Json => JSON_CONTENT_TYPE,
            Format::Xml => XML_CONTENT_TYPE,
        }
    }

    pub fn render<T: Entity>(&self, entity: &T) -> Result<String, ProxyError> {
        match self {
            Format::Json => to_json(entity),
            Format::Xml => to_xml(entity),
        }
    }
}

impl FromStr for Format {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("json") {
            Ok(Format::Json)
        } else if s.eq_ignore_ascii_case("xml") {
            Ok(Format::Xml)
        } else {
            Err(ProxyError::InvalidParameter(format!(
                "Unknown format '{}'. Only XML and JSON are valid.",
                s
            )))
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => f.write_str("json"),
            Format::Xml => f.write_str("xml"),
        }
    }
}

pub fn to_json<T: Entity>(entity: &T) -> Result<String, ProxyError> {
    serde_json::to_string(entity).map_err(|e| ProxyError::Render(format!("JSON: {}", e)))
}

pub fn to_xml<T: Entity>(entity: &T) -> Result<String, ProxyError> {
    quick_xml::se::to_string_with_root(T::ROOT, entity)
        .map_err(|e| ProxyError::Render(format!("XML: {}", e)))
}
