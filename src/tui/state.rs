//! Application state management and input handling.

use crate::browser::{Browser, Mode};
use crate::config::Keybindings;
use crate::gateway::GatewayEvent;
use crate::types::ItemKind;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

use super::types::{Action, Focus, Picker, PickerKind};

/// Application state for the TUI.
pub struct App {
    /// Session state and view-state operations
    pub browser: Browser,
    /// Where typed keys go
    pub focus: Focus,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Cursor over the displayed cards
    pub list_state: ListState,
    /// Open selector popup
    pub picker: Option<Picker>,
    /// Whether help modal is shown
    pub show_help: bool,
    /// Custom keybindings
    pub keybindings: Keybindings,
}

impl App {
    /// Create a new App with default state.
    pub fn new(keybindings: Keybindings) -> Self {
        Self {
            browser: Browser::new(),
            focus: Focus::List,
            should_quit: false,
            list_state: ListState::default(),
            picker: None,
            show_help: false,
            keybindings,
        }
    }

    /// Keep the cursor inside the displayed list.
    ///
    /// Call after anything that may have changed what is displayed.
    pub fn sync_selection(&mut self) {
        let len = self.browser.displayed_len();
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            None => self.list_state.select(Some(0)),
            Some(_) => {}
        }
    }

    /// Move the cursor back to the first card.
    fn rewind(&mut self) {
        self.list_state.select(None);
        self.sync_selection();
    }

    /// Identifier of the card under the cursor.
    pub fn highlighted_id(&self) -> Option<u32> {
        let i = self.list_state.selected()?;
        self.browser.visible_ids().get(i).copied()
    }

    /// Apply a gateway completion.
    ///
    /// A completion that switches the mode opens the new list at the top.
    pub fn handle_event(&mut self, event: GatewayEvent) {
        let before = self.browser.mode();
        self.browser.handle_event(event);
        if self.browser.mode() != before {
            self.rewind();
        } else {
            self.sync_selection();
        }
    }

    /// Handle keyboard input and return an action.
    pub fn handle_input(&mut self, key: KeyEvent) -> Action {
        // Global quit with Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Action::Quit;
        }

        // Handle help modal
        if self.show_help {
            if key.code == KeyCode::Esc
                || self.keybindings.matches(&self.keybindings.help, &key)
                || self.keybindings.matches(&self.keybindings.quit, &key)
            {
                self.show_help = false;
            }
            return Action::None;
        }

        if self.picker.is_some() {
            return self.handle_picker_input(key);
        }

        if self.focus == Focus::Filter {
            return self.handle_filter_input(key);
        }

        self.handle_list_input(key)
    }

    fn handle_filter_input(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.focus = Focus::List;
            }
            KeyCode::Char(c) => {
                let mut term = self.browser.filter_text().to_string();
                term.push(c);
                self.browser.apply_text_filter(&term);
                self.rewind();
            }
            KeyCode::Backspace => {
                let mut term = self.browser.filter_text().to_string();
                term.pop();
                self.browser.apply_text_filter(&term);
                self.rewind();
            }
            _ => {}
        }
        Action::None
    }

    fn handle_picker_input(&mut self, key: KeyEvent) -> Action {
        let Some(picker) = self.picker.as_mut() else {
            return Action::None;
        };

        if key.code == KeyCode::Esc {
            self.picker = None;
        } else if self.keybindings.matches(&self.keybindings.up, &key) {
            let i = picker.state.selected().unwrap_or(0);
            if i > 0 {
                picker.state.select(Some(i - 1));
            }
        } else if self.keybindings.matches(&self.keybindings.down, &key) {
            let i = picker.state.selected().unwrap_or(0);
            if i < picker.options.len().saturating_sub(1) {
                picker.state.select(Some(i + 1));
            }
        } else if self.keybindings.matches(&self.keybindings.select, &key) {
            let kind = picker.kind;
            let choice = picker.current();
            self.picker = None;
            if let Some(id) = choice {
                return match kind {
                    PickerKind::Item => {
                        self.browser.apply_exact_selection(id);
                        self.rewind();
                        Action::None
                    }
                    PickerKind::Show => self.select_show(id),
                };
            }
        }
        Action::None
    }

    fn handle_list_input(&mut self, key: KeyEvent) -> Action {
        if self.keybindings.matches(&self.keybindings.up, &key) {
            let i = self.list_state.selected().unwrap_or(0);
            if i > 0 {
                self.list_state.select(Some(i - 1));
            }
            Action::None
        } else if self.keybindings.matches(&self.keybindings.down, &key) {
            let i = self.list_state.selected().unwrap_or(0);
            if i < self.browser.displayed_len().saturating_sub(1) {
                self.list_state.select(Some(i + 1));
            }
            Action::None
        } else if self.keybindings.matches(&self.keybindings.select, &key) {
            // only show cards lead somewhere
            match (self.browser.kind(), self.highlighted_id()) {
                (ItemKind::Shows, Some(id)) => self.select_show(id),
                _ => Action::None,
            }
        } else if self.keybindings.matches(&self.keybindings.filter, &key) {
            self.focus = Focus::Filter;
            Action::None
        } else if self.keybindings.matches(&self.keybindings.pick_item, &key) {
            let options = self.browser.item_picker_options();
            let current = self.browser.selected_item();
            self.picker = Some(Picker::new(PickerKind::Item, options, current));
            Action::None
        } else if self.keybindings.matches(&self.keybindings.pick_show, &key) {
            let options = self.browser.show_picker_options();
            let current = self.browser.picked_show();
            self.picker = Some(Picker::new(PickerKind::Show, options, current));
            Action::None
        } else if self.keybindings.matches(&self.keybindings.reset, &key) {
            self.browser.reset_view();
            self.rewind();
            Action::None
        } else if self.keybindings.matches(&self.keybindings.back, &key) {
            if matches!(self.browser.mode(), Mode::Episodes(_)) || self.browser.pending().is_some() {
                self.browser.back_to_shows();
                self.rewind();
            }
            Action::None
        } else if self.keybindings.matches(&self.keybindings.help, &key) {
            self.show_help = true;
            Action::None
        } else if self.keybindings.matches(&self.keybindings.quit, &key) {
            self.should_quit = true;
            Action::Quit
        } else {
            Action::None
        }
    }

    fn select_show(&mut self, show_id: u32) -> Action {
        let before = self.browser.mode();
        let ticket = self.browser.select_show(show_id);
        if self.browser.mode() != before {
            self.rewind();
        }
        match ticket {
            Some(ticket) => Action::FetchEpisodes(ticket),
            None => Action::None,
        }
    }
}
