//! In-page anchors and deep links to catalog entries

use std::fmt;

use crate::api::EntityId;

const GAME_HASH_PREFIX: &str = "game-";

/// A location hash that points at one catalog entry, e.g. `#game-42`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeepLink {
    pub game: EntityId,
}

impl DeepLink {
    pub fn game(id: EntityId) -> Self {
        Self { game: id }
    }

    /// The hash without its leading `#`
    pub fn fragment(&self) -> String {
        format!("{GAME_HASH_PREFIX}{}", self.game)
    }

    /// Parse `#game-42` or `game-42`
    pub fn parse(hash: &str) -> Option<Self> {
        let fragment = hash.strip_prefix('#').unwrap_or(hash);
        let id = fragment.strip_prefix(GAME_HASH_PREFIX)?;
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        id.parse::<u64>().ok().map(|id| DeepLink::game(EntityId(id)))
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.fragment())
    }
}

/// Resolve an in-page anchor href to the section it scrolls to.
///
/// Only `#name` hrefs whose target exists among `anchors` resolve.
pub fn scroll_target<'a>(href: &str, anchors: &[&'a str]) -> Option<&'a str> {
    let name = href.strip_prefix('#')?;
    if name.is_empty() {
        return None;
    }
    anchors.iter().copied().find(|anchor| *anchor == name)
}
