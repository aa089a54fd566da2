//! View-state controller.
//!
//! [`Browser`] owns every piece of session state: the show catalog, the
//! episode cache, the active mode and the filtered view over the active
//! list. The terminal shell feeds it key-driven operations and gateway
//! completions and reads back what to draw.
//!
//! Episode fetches are tagged with a [`FetchTicket`]. Switching to another
//! show, or back to the show list, bumps the generation so a late completion
//! for an abandoned show only fills the cache and never changes the view.

use crate::cache::EpisodeCache;
use crate::error::FetchFailure;
use crate::filter::{find_by_id, normalize_term, text_filter};
use crate::gateway::{FetchTicket, GatewayEvent};
use crate::types::{Card, Episode, ItemKind, Listable, Show};
use log::{debug, info, warn};

const LOADING_SHOWS: &str = "Loading shows...";
const LOADING_EPISODES: &str = "Loading episodes...";

/// Which list is being browsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Shows,
    /// Episodes of the show with this identifier
    Episodes(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Loading,
    Error,
}

/// Banner contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub severity: Severity,
}

impl Status {
    fn loading(message: &str) -> Self {
        Self {
            message: message.to_string(),
            severity: Severity::Loading,
        }
    }

    fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            severity: Severity::Error,
        }
    }
}

/// Borrowed view of whichever list is active.
enum ActiveList<'a> {
    Shows(&'a [Show]),
    Episodes(&'a [Episode]),
}

impl ActiveList<'_> {
    fn len(&self) -> usize {
        match self {
            ActiveList::Shows(items) => items.len(),
            ActiveList::Episodes(items) => items.len(),
        }
    }

    fn text_filter(&self, term: &str) -> Vec<usize> {
        match self {
            ActiveList::Shows(items) => text_filter(items, term),
            ActiveList::Episodes(items) => text_filter(items, term),
        }
    }

    fn find(&self, id: u32) -> Option<usize> {
        match self {
            ActiveList::Shows(items) => find_by_id(items, id),
            ActiveList::Episodes(items) => find_by_id(items, id),
        }
    }

    fn card(&self, index: usize) -> Option<Card> {
        match self {
            ActiveList::Shows(items) => items.get(index).map(Listable::to_card),
            ActiveList::Episodes(items) => items.get(index).map(Listable::to_card),
        }
    }

    fn entry(&self, index: usize) -> Option<(u32, String)> {
        match self {
            ActiveList::Shows(items) => items.get(index).map(|s| (s.id, s.to_display())),
            ActiveList::Episodes(items) => items.get(index).map(|e| (e.id, e.to_display())),
        }
    }
}

/// Session state and the operations that drive it.
#[derive(Debug)]
pub struct Browser {
    shows: Vec<Show>,
    cache: EpisodeCache,
    mode: Mode,
    /// Positions in the active list currently on screen
    displayed: Vec<usize>,
    filter_text: String,
    /// Identifier picked from the item picker, if any
    selected_item: Option<u32>,
    /// Value of the show picker
    picked_show: Option<u32>,
    reset_visible: bool,
    status: Option<Status>,
    generation: u64,
    pending: Option<FetchTicket>,
}

impl Default for Browser {
    fn default() -> Self {
        Self::new()
    }
}

impl Browser {
    /// Start in show mode, waiting for the catalog.
    pub fn new() -> Self {
        Self {
            shows: Vec::new(),
            cache: EpisodeCache::new(),
            mode: Mode::Shows,
            displayed: Vec::new(),
            filter_text: String::new(),
            selected_item: None,
            picked_show: None,
            reset_visible: false,
            status: Some(Status::loading(LOADING_SHOWS)),
            generation: 0,
            pending: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn kind(&self) -> ItemKind {
        match self.mode {
            Mode::Shows => ItemKind::Shows,
            Mode::Episodes(_) => ItemKind::Episodes,
        }
    }

    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    pub fn cache(&self) -> &EpisodeCache {
        &self.cache
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn selected_item(&self) -> Option<u32> {
        self.selected_item
    }

    pub fn picked_show(&self) -> Option<u32> {
        self.picked_show
    }

    pub fn reset_visible(&self) -> bool {
        self.reset_visible
    }

    /// The episode request currently awaited, if any.
    pub fn pending(&self) -> Option<FetchTicket> {
        self.pending
    }

    /// The show whose episodes are on screen.
    pub fn active_show(&self) -> Option<&Show> {
        match self.mode {
            Mode::Shows => None,
            Mode::Episodes(id) => self.shows.iter().find(|s| s.id == id),
        }
    }

    fn active(&self) -> ActiveList<'_> {
        match self.mode {
            Mode::Shows => ActiveList::Shows(&self.shows),
            Mode::Episodes(id) => ActiveList::Episodes(self.cache.get(id).unwrap_or(&[])),
        }
    }

    /// Size of the unfiltered active list.
    pub fn total_len(&self) -> usize {
        self.active().len()
    }

    pub fn displayed_len(&self) -> usize {
        self.displayed.len()
    }

    /// "Showing X of Y shows|episodes".
    pub fn count_label(&self) -> String {
        format!(
            "Showing {} of {} {}",
            self.displayed_len(),
            self.total_len(),
            self.kind().label()
        )
    }

    /// Placeholder text of the filter input.
    pub fn search_placeholder(&self) -> &'static str {
        match self.kind() {
            ItemKind::Shows => "Search shows...",
            ItemKind::Episodes => "Search episodes...",
        }
    }

    /// Cards for the displayed items, in display order.
    pub fn visible_cards(&self) -> Vec<Card> {
        let active = self.active();
        self.displayed
            .iter()
            .filter_map(|&i| active.card(i))
            .collect()
    }

    /// Identifiers of the displayed items, in display order.
    pub fn visible_ids(&self) -> Vec<u32> {
        let active = self.active();
        self.displayed
            .iter()
            .filter_map(|&i| active.entry(i).map(|(id, _)| id))
            .collect()
    }

    /// `(id, label)` for every item of the unfiltered active list.
    pub fn item_picker_options(&self) -> Vec<(u32, String)> {
        let active = self.active();
        (0..active.len()).filter_map(|i| active.entry(i)).collect()
    }

    /// `(id, name)` for every show.
    pub fn show_picker_options(&self) -> Vec<(u32, String)> {
        self.shows.iter().map(|s| (s.id, s.to_display())).collect()
    }

    /// Feed a gateway completion into the state machine.
    pub fn handle_event(&mut self, event: GatewayEvent) {
        match event {
            GatewayEvent::Shows(result) => self.on_shows_loaded(result),
            GatewayEvent::Episodes { ticket, result } => self.on_episodes_loaded(ticket, result),
        }
    }

    /// Catalog completion. A failure leaves any loaded shows untouched.
    pub fn on_shows_loaded(&mut self, result: Result<Vec<Show>, FetchFailure>) {
        match result {
            Ok(shows) => {
                self.shows = shows;
                if self.status.as_ref().map(|s| s.message.as_str()) == Some(LOADING_SHOWS) {
                    self.status = None;
                }
                if self.mode == Mode::Shows {
                    // keep whatever was typed while the catalog was loading
                    let term = self.filter_text.clone();
                    self.apply_text_filter(&term);
                }
            }
            Err(failure) => {
                warn!("{}", failure);
                self.status = Some(Status::error(failure.user_message()));
            }
        }
    }

    /// Enter episode mode for `show_id`.
    ///
    /// A cached show switches immediately and returns `None`. Otherwise the
    /// returned ticket must be handed to the gateway; the switch happens when
    /// its completion arrives. `None` is also returned when that show is
    /// already being fetched.
    pub fn select_show(&mut self, show_id: u32) -> Option<FetchTicket> {
        self.picked_show = Some(show_id);

        if self.cache.contains(show_id) {
            debug!("Show {} served from cache", show_id);
            self.supersede_pending();
            self.enter_episodes(show_id);
            return None;
        }

        if let Some(ticket) = self.pending {
            if ticket.show_id == show_id {
                debug!("Show {} already being fetched", show_id);
                return None;
            }
        }

        self.generation += 1;
        let ticket = FetchTicket {
            show_id,
            generation: self.generation,
        };
        self.pending = Some(ticket);
        self.status = Some(Status::loading(LOADING_EPISODES));
        Some(ticket)
    }

    /// Episode completion.
    ///
    /// Successful results are cached even when superseded; only the current
    /// ticket may change the view or the banner.
    pub fn on_episodes_loaded(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Episode>, FetchFailure>,
    ) {
        let current = self.pending == Some(ticket);

        match result {
            Ok(episodes) => {
                self.cache.insert(ticket.show_id, episodes);
                if current {
                    self.pending = None;
                    self.enter_episodes(ticket.show_id);
                } else {
                    debug!(
                        "Discarding superseded episodes for show {} (generation {})",
                        ticket.show_id, ticket.generation
                    );
                }
            }
            Err(failure) => {
                warn!("{}", failure);
                if current {
                    self.pending = None;
                    self.status = Some(Status::error(failure.user_message()));
                }
            }
        }
    }

    /// Return to the show list, dropping all episode view state.
    pub fn back_to_shows(&mut self) {
        self.supersede_pending();
        self.mode = Mode::Shows;
        self.picked_show = None;
        self.reset_view();
    }

    /// Replace the displayed items with `items`, positions into the active
    /// list.
    pub fn render_list(&mut self, items: Vec<usize>) {
        let total = self.total_len();
        self.displayed = items.into_iter().filter(|&i| i < total).collect();
    }

    /// Show only items matching `term`; clears any exact selection.
    pub fn apply_text_filter(&mut self, term: &str) {
        self.filter_text = term.to_string();
        self.selected_item = None;
        self.reset_visible = !normalize_term(term).is_empty();
        let hits = self.active().text_filter(term);
        self.render_list(hits);
    }

    /// Narrow the view to the item with `item_id`; clears the text filter.
    ///
    /// An identifier not in the active list leaves the view as it was.
    pub fn apply_exact_selection(&mut self, item_id: u32) {
        let Some(index) = self.active().find(item_id) else {
            debug!("No {} with id {}", self.kind().label(), item_id);
            return;
        };
        self.filter_text.clear();
        self.selected_item = Some(item_id);
        self.reset_visible = true;
        self.render_list(vec![index]);
    }

    /// Clear filter and selection and show the full active list.
    pub fn reset_view(&mut self) {
        self.filter_text.clear();
        self.selected_item = None;
        self.reset_visible = false;
        let all = (0..self.total_len()).collect();
        self.render_list(all);
    }

    fn enter_episodes(&mut self, show_id: u32) {
        info!("Browsing episodes of show {}", show_id);
        self.mode = Mode::Episodes(show_id);
        self.picked_show = Some(show_id);
        if self.status.as_ref().is_some_and(|s| s.severity == Severity::Loading) {
            self.status = None;
        }
        self.reset_view();
    }

    fn supersede_pending(&mut self) {
        if let Some(ticket) = self.pending.take() {
            debug!("Superseding fetch for show {}", ticket.show_id);
            self.generation += 1;
            if self
                .status
                .as_ref()
                .is_some_and(|s| s.message == LOADING_EPISODES)
            {
                self.status = None;
            }
        }
    }
}
