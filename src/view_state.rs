//! Tab and modal visibility state
//!
//! Tabs form a flat exclusive-choice set: at most one panel and one nav item
//! are active. Modals are independent open/closed flags. Closing is always
//! safe and idempotent, and cross-modal exclusivity is not enforced.

use std::collections::BTreeSet;
use std::fmt;

/// The admin dialog used to add a game
pub const ADD_GAME_MODAL: &str = "add-game-modal";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Name of a tab panel, e.g. `games` for the `games-tab` panel
    TabId
);
string_id!(
    /// Identifier of a modal dialog
    ModalId
);
string_id!(
    /// The nav element that triggered a tab switch
    NavItemId
);

impl TabId {
    /// DOM-style id of the panel this tab shows
    pub fn panel_id(&self) -> String {
        format!("{}-tab", self.0)
    }
}

/// Where a pointer interaction landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// The dimmed area around a modal's content
    Backdrop(ModalId),
    /// Anything inside a modal's content box
    ModalContent(ModalId),
    SearchInput,
    SearchResults,
    Elsewhere,
}

/// Keyboard input relevant to view state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Char(char),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    panels: BTreeSet<TabId>,
    active_tab: Option<TabId>,
    active_nav: Option<NavItemId>,
    open_modals: BTreeSet<ModalId>,
}

impl ViewState {
    pub fn new<I, T>(panels: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TabId>,
    {
        Self {
            panels: panels.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Layout of the admin dashboard, with the games tab showing
    pub fn admin_dashboard() -> Self {
        let mut state = Self::new(["games", "requests"]);
        state.activate_tab(&TabId::from("games"), &NavItemId::from("nav-games"));
        state
    }

    pub fn active_tab(&self) -> Option<&TabId> {
        self.active_tab.as_ref()
    }

    pub fn active_nav(&self) -> Option<&NavItemId> {
        self.active_nav.as_ref()
    }

    /// Show `tab` and highlight `trigger`, hiding every other tab.
    ///
    /// A tab without a panel is ignored: nothing changes and `false` is
    /// returned.
    pub fn activate_tab(&mut self, tab: &TabId, trigger: &NavItemId) -> bool {
        if !self.panels.contains(tab) {
            tracing::debug!("no panel '{}', tab switch ignored", tab.panel_id());
            return false;
        }
        self.active_tab = Some(tab.clone());
        self.active_nav = Some(trigger.clone());
        true
    }

    /// Idempotent
    pub fn open_modal(&mut self, modal: &ModalId) {
        self.open_modals.insert(modal.clone());
    }

    /// Hide `modal`. Returns whether it was open.
    pub fn close_modal(&mut self, modal: &ModalId) -> bool {
        self.open_modals.remove(modal)
    }

    pub fn is_modal_open(&self, modal: &ModalId) -> bool {
        self.open_modals.contains(modal)
    }

    pub fn open_modals(&self) -> impl Iterator<Item = &ModalId> {
        self.open_modals.iter()
    }

    pub fn any_modal_open(&self) -> bool {
        !self.open_modals.is_empty()
    }

    /// Close every open modal at once. Returns the ones that were closed.
    pub fn close_all_modals(&mut self) -> Vec<ModalId> {
        std::mem::take(&mut self.open_modals).into_iter().collect()
    }

    /// A click on an open modal's backdrop closes that modal. Clicks on its
    /// content, or anywhere else, leave modals alone.
    pub fn pointer_down(&mut self, target: &PointerTarget) -> Option<ModalId> {
        match target {
            PointerTarget::Backdrop(modal) if self.close_modal(modal) => Some(modal.clone()),
            _ => None,
        }
    }

    /// The cancel key closes all open modals
    pub fn key_down(&mut self, key: Key) -> Vec<ModalId> {
        match key {
            Key::Escape => self.close_all_modals(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modal(id: &str) -> ModalId {
        ModalId::from(id)
    }

    #[test]
    fn test_activate_tab_switches_exclusively() {
        let mut state = ViewState::admin_dashboard();
        assert_eq!(state.active_tab(), Some(&TabId::from("games")));

        assert!(state.activate_tab(&TabId::from("requests"), &NavItemId::from("nav-requests")));
        assert_eq!(state.active_tab(), Some(&TabId::from("requests")));
        assert_eq!(state.active_nav(), Some(&NavItemId::from("nav-requests")));
    }

    #[test]
    fn test_activate_unknown_tab_is_noop() {
        let mut state = ViewState::admin_dashboard();
        let before = state.clone();

        assert!(!state.activate_tab(&TabId::from("library"), &NavItemId::from("nav-library")));
        assert_eq!(state, before);
        assert_eq!(state.active_tab(), Some(&TabId::from("games")));
        assert_eq!(state.active_nav(), Some(&NavItemId::from("nav-games")));
    }

    #[test]
    fn test_panel_id_suffix() {
        assert_eq!(TabId::from("library").panel_id(), "library-tab");
    }

    #[test]
    fn test_open_and_close_modal_idempotent() {
        let mut state = ViewState::default();
        state.open_modal(&modal(ADD_GAME_MODAL));
        state.open_modal(&modal(ADD_GAME_MODAL));
        assert_eq!(state.open_modals().count(), 1);

        assert!(state.close_modal(&modal(ADD_GAME_MODAL)));
        assert!(!state.close_modal(&modal(ADD_GAME_MODAL)));
        assert!(!state.is_modal_open(&modal(ADD_GAME_MODAL)));
    }

    #[test]
    fn test_backdrop_click_closes_only_that_modal() {
        let mut state = ViewState::default();
        state.open_modal(&modal("a"));
        state.open_modal(&modal("b"));

        assert_eq!(state.pointer_down(&PointerTarget::ModalContent(modal("a"))), None);
        assert!(state.is_modal_open(&modal("a")));

        assert_eq!(
            state.pointer_down(&PointerTarget::Backdrop(modal("a"))),
            Some(modal("a"))
        );
        assert!(!state.is_modal_open(&modal("a")));
        assert!(state.is_modal_open(&modal("b")));
    }

    #[test]
    fn test_backdrop_click_on_closed_modal_does_nothing() {
        let mut state = ViewState::default();
        assert_eq!(state.pointer_down(&PointerTarget::Backdrop(modal("a"))), None);
    }

    #[test]
    fn test_escape_closes_all_modals() {
        let mut state = ViewState::default();
        state.open_modal(&modal("a"));
        state.open_modal(&modal("b"));

        assert!(state.key_down(Key::Char('x')).is_empty());
        let closed = state.key_down(Key::Escape);
        assert_eq!(closed.len(), 2);
        assert!(!state.any_modal_open());

        assert!(state.key_down(Key::Escape).is_empty());
    }
}
