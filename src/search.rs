//! Debounced search-as-you-type
//!
//! Keystrokes restart a quiet-period timer. When the timer survives, the
//! current text is evaluated: short text hides the results panel, anything
//! else issues one `GET /search` tagged with a fresh sequence number. A
//! response only renders if its tag is still the latest sequence; results of
//! overtaken queries are dropped no matter when they arrive. In-flight
//! requests are never cancelled, only ignored.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::AbortHandle;

use crate::api::{EntityId, SearchHit, SearchResponse, endpoints};
use crate::navigation::DeepLink;
use crate::notify::Severity;
use crate::state::SharedState;
use crate::transport::{ApiRequest, Transport};
use crate::view_state::PointerTarget;

/// Quiet period after the last keystroke before a query is evaluated
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Shorter text hides the panel instead of querying
pub const MIN_QUERY_CHARS: usize = 2;

pub const NO_RESULTS_MESSAGE: &str = "No games found";
pub const SEARCH_ERROR_MESSAGE: &str = "Error during search";

/// Input and sequencing state of the search box
#[derive(Debug, Default)]
pub struct SearchSession {
    query_text: String,
    /// Bumped by every evaluation; tags outgoing queries
    sequence: u64,
    /// Bumped by every keystroke; identifies the live debounce timer
    input_generation: u64,
    pending: Option<AbortHandle>,
    in_flight: usize,
}

impl SearchSession {
    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Whether a response tagged `sequence` may still render
    pub fn is_current(&self, sequence: u64) -> bool {
        self.sequence == sequence
    }

    pub fn has_pending_evaluation(&self) -> bool {
        self.pending.is_some()
    }

    /// Queries sent and not yet answered, stale ones included
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_settled(&self) -> bool {
        self.pending.is_none() && self.in_flight == 0
    }

    fn record_input(&mut self, text: &str) -> u64 {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        self.query_text = text.to_string();
        self.input_generation += 1;
        self.input_generation
    }

    fn begin_evaluation(&mut self, generation: u64) -> Option<u64> {
        if generation != self.input_generation {
            return None;
        }
        self.pending = None;
        self.sequence += 1;
        Some(self.sequence)
    }
}

/// One rendered match, linked to its catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub id: EntityId,
    pub title: String,
    pub genre: String,
    pub link: DeepLink,
}

impl From<SearchHit> for ResultRow {
    fn from(hit: SearchHit) -> Self {
        Self {
            link: DeepLink::game(hit.id),
            id: hit.id,
            title: hit.title,
            genre: hit.genre,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PanelContent {
    #[default]
    Blank,
    /// Empty-state message for a query with no matches
    Empty(String),
    Rows(Vec<ResultRow>),
}

/// The dropdown under the search box
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsPanel {
    visible: bool,
    content: PanelContent,
    rendered_sequence: Option<u64>,
}

impl ResultsPanel {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> &PanelContent {
        &self.content
    }

    pub fn rows(&self) -> &[ResultRow] {
        match &self.content {
            PanelContent::Rows(rows) => rows,
            _ => &[],
        }
    }

    /// Sequence of the query whose results are on display
    pub fn rendered_sequence(&self) -> Option<u64> {
        self.rendered_sequence
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    fn render(&mut self, sequence: u64, hits: Vec<SearchHit>) {
        self.content = if hits.is_empty() {
            PanelContent::Empty(NO_RESULTS_MESSAGE.to_string())
        } else {
            PanelContent::Rows(hits.into_iter().map(ResultRow::from).collect())
        };
        self.rendered_sequence = Some(sequence);
        self.visible = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub min_query_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: SEARCH_DEBOUNCE,
            min_query_chars: MIN_QUERY_CHARS,
        }
    }
}

pub struct SearchPipeline<T: Transport> {
    transport: Arc<T>,
    state: SharedState,
    settings: SearchSettings,
}

impl<T: Transport> Clone for SearchPipeline<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            state: Arc::clone(&self.state),
            settings: self.settings,
        }
    }
}

impl<T: Transport> SearchPipeline<T> {
    pub fn new(transport: Arc<T>, state: SharedState, settings: SearchSettings) -> Self {
        Self {
            transport,
            state,
            settings,
        }
    }

    /// Record a keystroke and restart the quiet-period timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_input(&self, text: impl Into<String>) {
        let text = text.into();
        let mut state = self.state.lock();
        let generation = state.search.record_input(&text);

        let pipeline = self.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(pipeline.settings.debounce).await;
            if let Some(sequence) = pipeline.evaluate(generation, &text) {
                pipeline.run_query(text, sequence).await;
            }
        });
        state.search.pending = Some(task.abort_handle());
    }

    /// Hide the panel when the pointer lands outside the input and the panel
    pub fn pointer_down(&self, target: &PointerTarget) {
        if !matches!(
            target,
            PointerTarget::SearchInput | PointerTarget::SearchResults
        ) {
            self.state.lock().results.hide();
        }
    }

    /// Wait until no evaluation is pending and no query is in flight
    pub async fn settled(&self) {
        const POLL: Duration = Duration::from_millis(10);
        loop {
            let settled = self.state.lock().search.is_settled();
            if settled {
                return;
            }
            tokio::time::sleep(POLL).await;
        }
    }

    /// Returns the sequence to query with, or `None` when no query is needed
    fn evaluate(&self, generation: u64, text: &str) -> Option<u64> {
        let mut state = self.state.lock();
        let sequence = state.search.begin_evaluation(generation)?;

        if text.chars().count() < self.settings.min_query_chars {
            tracing::debug!("search #{sequence}: '{text}' too short, hiding results");
            state.results.hide();
            return None;
        }

        state.search.in_flight += 1;
        Some(sequence)
    }

    async fn run_query(&self, text: String, sequence: u64) {
        tracing::debug!("search #{sequence}: querying '{text}'");
        let request = ApiRequest::get(endpoints::SEARCH).with_query("q", text.as_str());
        let outcome = match self.transport.send(request).await {
            Ok(response) => response.parse::<SearchResponse>(),
            Err(e) => Err(e),
        };

        let mut state = self.state.lock();
        state.search.in_flight = state.search.in_flight.saturating_sub(1);

        if !state.search.is_current(sequence) {
            tracing::debug!(
                "search #{sequence}: dropping stale response, latest is #{}",
                state.search.sequence()
            );
            return;
        }

        match outcome {
            Ok(response) => {
                tracing::debug!(
                    "search #{sequence}: rendering {} result(s)",
                    response.results.len()
                );
                state.results.render(sequence, response.results);
            }
            Err(e) => {
                tracing::warn!("search #{sequence} failed: {e}");
                state
                    .notifications
                    .notify(SEARCH_ERROR_MESSAGE, Severity::Error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::DEFAULT_TOAST_LIFETIME;
    use crate::state::UiState;
    use crate::transport::scripted::{Reply, ScriptedTransport};
    use crate::view_state::ViewState;
    use serde_json::json;
    use tokio::time::{Instant, sleep};

    fn setup() -> (
        SearchPipeline<ScriptedTransport>,
        SharedState,
        Arc<ScriptedTransport>,
    ) {
        let transport = Arc::new(ScriptedTransport::new());
        let state = UiState::new(ViewState::default(), DEFAULT_TOAST_LIFETIME).shared();
        let pipeline = SearchPipeline::new(
            Arc::clone(&transport),
            Arc::clone(&state),
            SearchSettings::default(),
        );
        (pipeline, state, transport)
    }

    fn hits(items: &[(u64, &str, &str)]) -> Reply {
        let results: Vec<_> = items
            .iter()
            .map(|(id, title, genre)| json!({"id": id, "title": title, "genre": genre}))
            .collect();
        Reply::ok(json!({ "results": results }))
    }

    fn rendered_ids(state: &SharedState) -> Vec<u64> {
        state.lock().results.rows().iter().map(|r| r.id.0).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystroke_burst_fires_one_query_after_quiet_period() {
        let (pipeline, _state, transport) = setup();
        transport.reply("/search", hits(&[]));

        let start = Instant::now();
        for (i, text) in ["z", "ze", "zel", "zeld", "zelda"].iter().enumerate() {
            if i > 0 {
                sleep(Duration::from_millis(50)).await;
            }
            pipeline.on_input(*text);
        }

        // Last keystroke at +200ms; nothing fires before +500ms
        sleep(Duration::from_millis(299)).await;
        assert_eq!(transport.call_count(), 0);

        sleep(Duration::from_millis(2)).await;
        let calls = transport.calls();
        assert_eq!(calls.len(), 1, "exactly one query per settled pause");
        assert_eq!(calls[0].at - start, Duration::from_millis(500));
        assert_eq!(calls[0].request.query_param("q"), Some("zelda"));

        sleep(Duration::from_secs(2)).await;
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_order_responses_keep_latest_results() {
        let (pipeline, state, transport) = setup();
        let first = transport.defer("/search");
        let second = transport.defer("/search");

        pipeline.on_input("ha");
        sleep(Duration::from_millis(301)).await;
        pipeline.on_input("had");
        sleep(Duration::from_millis(301)).await;
        assert_eq!(transport.call_count(), 2);
        assert_eq!(state.lock().search.in_flight(), 2);

        second
            .send(hits(&[(1, "Hades", "Roguelike")]))
            .unwrap();
        sleep(Duration::from_millis(1)).await;
        assert_eq!(rendered_ids(&state), vec![1]);

        first
            .send(hits(&[(2, "Half-Life", "Shooter")]))
            .unwrap();
        sleep(Duration::from_millis(1)).await;

        let state = state.lock();
        assert_eq!(state.results.rows().len(), 1);
        assert_eq!(state.results.rows()[0].id, EntityId(1));
        assert_eq!(state.results.rendered_sequence(), Some(2));
        assert!(state.search.is_settled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_character_never_queries() {
        let (pipeline, state, transport) = setup();

        pipeline.on_input("a");
        sleep(Duration::from_secs(1)).await;
        pipeline.on_input("b");
        sleep(Duration::from_millis(10)).await;
        pipeline.on_input("c");
        sleep(Duration::from_secs(1)).await;

        assert_eq!(transport.call_count(), 0);
        assert!(!state.lock().results.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_input_hides_visible_results() {
        let (pipeline, state, transport) = setup();
        transport.reply("/search", hits(&[(4, "Celeste", "Platformer")]));

        pipeline.on_input("ce");
        sleep(Duration::from_millis(400)).await;
        assert!(state.lock().results.is_visible());

        pipeline.on_input("c");
        sleep(Duration::from_millis(400)).await;
        assert!(!state.lock().results.is_visible());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_input_discards_in_flight_query() {
        let (pipeline, state, transport) = setup();
        let slow = transport.defer("/search");

        pipeline.on_input("ha");
        sleep(Duration::from_millis(301)).await;
        pipeline.on_input("");
        sleep(Duration::from_millis(301)).await;

        slow.send(hits(&[(1, "Hades", "Roguelike")])).unwrap();
        sleep(Duration::from_millis(1)).await;

        let state = state.lock();
        assert!(!state.results.is_visible());
        assert!(state.results.rows().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_results_show_message() {
        let (pipeline, state, transport) = setup();
        transport.reply("/search", hits(&[]));

        pipeline.on_input("zzz");
        sleep(Duration::from_millis(400)).await;

        let state = state.lock();
        assert!(state.results.is_visible());
        assert_eq!(
            state.results.content(),
            &PanelContent::Empty(NO_RESULTS_MESSAGE.to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rows_link_to_their_entries() {
        let (pipeline, state, transport) = setup();
        transport.reply(
            "/search",
            hits(&[(7, "Hollow Knight", "Metroidvania"), (9, "Hades", "Roguelike")]),
        );

        pipeline.on_input("ho");
        sleep(Duration::from_millis(400)).await;

        let state = state.lock();
        let rows = state.results.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Hollow Knight");
        assert_eq!(rows[0].genre, "Metroidvania");
        assert_eq!(rows[0].link.to_string(), "#game-7");
        assert_eq!(rows[1].link.to_string(), "#game-9");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_notifies_and_keeps_results() {
        let (pipeline, state, transport) = setup();
        transport.reply("/search", hits(&[(3, "Celeste", "Platformer")]));
        transport.reply("/search", Reply::Fail("connection refused".into()));

        pipeline.on_input("cel");
        sleep(Duration::from_millis(400)).await;
        pipeline.on_input("cele");
        sleep(Duration::from_millis(400)).await;

        let mut state = state.lock();
        assert_eq!(state.results.rows().len(), 1);
        assert_eq!(state.results.rows()[0].id, EntityId(3));
        let toast = state.notifications.latest().unwrap();
        assert_eq!(toast.message, SEARCH_ERROR_MESSAGE);
        assert_eq!(toast.severity, Severity::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_body_counts_as_failure() {
        let (pipeline, state, transport) = setup();
        transport.reply("/search", Reply::Json(500, json!({"message": "boom"})));

        pipeline.on_input("cel");
        sleep(Duration::from_millis(400)).await;

        let mut state = state.lock();
        assert!(!state.results.is_visible());
        assert_eq!(
            state.notifications.latest().map(|n| n.message),
            Some(SEARCH_ERROR_MESSAGE.to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_failure_is_not_surfaced() {
        let (pipeline, state, transport) = setup();
        let slow = transport.defer("/search");
        transport.reply("/search", hits(&[(1, "Hades", "Roguelike")]));

        pipeline.on_input("ha");
        sleep(Duration::from_millis(301)).await;
        pipeline.on_input("had");
        sleep(Duration::from_millis(301)).await;

        slow.send(Reply::Fail("timeout".into())).unwrap();
        sleep(Duration::from_millis(1)).await;

        let state = state.lock();
        assert_eq!(state.notifications.total_posted(), 0);
        assert_eq!(rendered_ids_locked(&state), vec![1]);
    }

    fn rendered_ids_locked(state: &crate::state::UiState) -> Vec<u64> {
        state.results.rows().iter().map(|r| r.id.0).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_pointer_outside_hides_panel() {
        let (pipeline, state, transport) = setup();
        transport.reply("/search", hits(&[(1, "Hades", "Roguelike")]));

        pipeline.on_input("ha");
        sleep(Duration::from_millis(400)).await;
        assert!(state.lock().results.is_visible());

        pipeline.pointer_down(&PointerTarget::SearchInput);
        pipeline.pointer_down(&PointerTarget::SearchResults);
        assert!(state.lock().results.is_visible());

        pipeline.pointer_down(&PointerTarget::Elsewhere);
        assert!(!state.lock().results.is_visible());
        assert_eq!(rendered_ids(&state), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_waits_for_query() {
        let (pipeline, state, transport) = setup();
        transport.reply("/search", hits(&[(1, "Hades", "Roguelike")]));

        pipeline.on_input("hades");
        assert!(state.lock().search.has_pending_evaluation());
        pipeline.settled().await;

        assert!(state.lock().search.is_settled());
        assert_eq!(rendered_ids(&state), vec![1]);
    }
}
