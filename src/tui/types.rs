//! TUI type definitions for focus, popups, and actions.

use crate::gateway::FetchTicket;
use ratatui::widgets::ListState;

/// Where typed keys go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Navigating the card list
    List,
    /// Editing the filter input
    Filter,
}

/// Which selector control a picker stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    /// Narrows the active list to one item
    Item,
    /// Switches to another show's episodes
    Show,
}

/// An open selector popup.
#[derive(Debug, Clone)]
pub struct Picker {
    pub kind: PickerKind,
    /// `(id, label)` pairs in list order
    pub options: Vec<(u32, String)>,
    pub state: ListState,
}

impl Picker {
    /// Open a picker with `current` highlighted when present.
    pub fn new(kind: PickerKind, options: Vec<(u32, String)>, current: Option<u32>) -> Self {
        let mut state = ListState::default();
        let index = current
            .and_then(|id| options.iter().position(|(oid, _)| *oid == id))
            .unwrap_or(0);
        if !options.is_empty() {
            state.select(Some(index));
        }
        Self {
            kind,
            options,
            state,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            PickerKind::Item => "Select an item",
            PickerKind::Show => "Select a show",
        }
    }

    /// Identifier under the cursor.
    pub fn current(&self) -> Option<u32> {
        self.state
            .selected()
            .and_then(|i| self.options.get(i))
            .map(|(id, _)| *id)
    }
}

/// Work the event loop must do on behalf of the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No action, continue running
    None,
    /// Quit the application
    Quit,
    /// Hand this episode request to the gateway
    FetchEpisodes(FetchTicket),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<(u32, String)> {
        vec![(1, "One".to_string()), (2, "Two".to_string()), (3, "Three".to_string())]
    }

    #[test]
    fn test_picker_highlights_current() {
        let picker = Picker::new(PickerKind::Show, options(), Some(2));
        assert_eq!(picker.current(), Some(2));
    }

    #[test]
    fn test_picker_defaults_to_first() {
        let picker = Picker::new(PickerKind::Item, options(), Some(42));
        assert_eq!(picker.current(), Some(1));
    }

    #[test]
    fn test_empty_picker_has_no_selection() {
        let picker = Picker::new(PickerKind::Item, Vec::new(), None);
        assert_eq!(picker.current(), None);
    }
}
