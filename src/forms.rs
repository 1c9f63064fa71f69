//! Form field state captured at submission time

use serde_json::{Map, Value};

/// Fields of the admin "add game" form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameForm {
    pub title: String,
    pub genre: String,
    pub description: String,
    pub cover_image_url: String,
    pub download_link: String,
}

impl GameForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }

    /// Request body, sent as typed; the server does its own validation
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("title".into(), Value::from(self.title.as_str()));
        payload.insert("genre".into(), Value::from(self.genre.as_str()));
        payload.insert("description".into(), Value::from(self.description.as_str()));
        payload.insert(
            "cover_image_url".into(),
            Value::from(self.cover_image_url.as_str()),
        );
        payload.insert(
            "download_link".into(),
            Value::from(self.download_link.as_str()),
        );
        payload
    }
}

/// Fields of the public "request a game" form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestForm {
    pub game_title: String,
    pub user_email: String,
}

impl RequestForm {
    pub fn new(game_title: impl Into<String>, user_email: impl Into<String>) -> Self {
        Self {
            game_title: game_title.into(),
            user_email: user_email.into(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
