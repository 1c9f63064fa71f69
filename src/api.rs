//! Wire types for the Arcaload catalog backend.
//!
//! Every response body is JSON. Mutating endpoints answer with a `message`
//! meant for the user on both success and failure.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ArcaloadError, Result};

/// Backend endpoint paths
pub mod endpoints {
    use super::EntityId;

    pub const ADD_GAME: &str = "/admin/api/game/add";
    pub const REQUEST_GAME: &str = "/request-game";
    pub const SEARCH: &str = "/search";
    pub const GAMES: &str = "/api/games";
    pub const REQUESTS: &str = "/api/requests";
    pub const STATS: &str = "/api/stats";

    pub fn delete_game(id: EntityId) -> String {
        format!("/admin/api/game/{id}/delete")
    }

    pub fn update_request(id: EntityId) -> String {
        format!("/admin/api/request/{id}/update")
    }

    pub fn game_detail(id: EntityId) -> String {
        format!("/api/games/{id}")
    }
}

/// Opaque identifier of a backend-owned catalog item.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = ArcaloadError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(EntityId)
            .map_err(|_| ArcaloadError::Validation(format!("invalid id '{s}'")))
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        EntityId(id)
    }
}

/// One row of `GET /search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub genre: String,
}

/// Body of `GET /search`. `results` is mandatory: a body without it is a
/// failed search, not an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}

/// Status of a user-submitted catalog request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Added,
    Rejected,
}

pub const VALID_REQUEST_STATUSES: &[&str] = &["pending", "added", "rejected"];

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Added => write!(f, "added"),
            RequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for RequestStatus {
    type Err = ArcaloadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "added" => Ok(RequestStatus::Added),
            "rejected" => Ok(RequestStatus::Rejected),
            _ => Err(ArcaloadError::Validation(format!(
                "invalid request status '{}', expected one of: {}",
                s,
                VALID_REQUEST_STATUSES.join(", ")
            ))),
        }
    }
}

/// A catalog entry as serialized by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub cover_image_url: String,
    #[serde(default)]
    pub download_link: String,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A user request for a game missing from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRequest {
    pub id: EntityId,
    pub game_title: String,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `GET /api/games`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GamePage {
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u64,
    #[serde(default)]
    pub current_page: u64,
}

/// `GET /api/requests`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestPage {
    #[serde(default)]
    pub requests: Vec<GameRequest>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u64,
    #[serde(default)]
    pub current_page: u64,
}

/// `GET /api/stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    #[serde(default)]
    pub total_games: u64,
    #[serde(default)]
    pub total_downloads: u64,
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub pending_requests: u64,
    #[serde(default)]
    pub unique_genres: u64,
}

/// Reply shape shared by all mutating endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}
