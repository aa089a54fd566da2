//! UI rendering functions for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::state::App;
use super::types::{Focus, Picker};
use crate::browser::{Mode, Severity};
use crate::types::{Card, ItemKind};

/// Draw the UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Status banner
            Constraint::Length(3), // Filter bar
            Constraint::Min(0),    // Cards
            Constraint::Length(3), // Footer
        ])
        .split(size);

    draw_header(frame, app, chunks[0]);
    draw_status(frame, app, chunks[1]);
    draw_filter_bar(frame, app, chunks[2]);
    draw_cards(frame, app, chunks[3]);
    draw_footer(frame, app, chunks[4]);

    if let Some(picker) = app.picker.as_mut() {
        draw_picker(frame, picker);
    }

    if app.show_help {
        draw_help_modal(frame);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let context = match app.browser.mode() {
        Mode::Shows => Span::styled("[shows]", Style::default().fg(Color::Cyan)),
        Mode::Episodes(id) => {
            let name = app
                .browser
                .active_show()
                .map(|s| s.display_name().to_string())
                .unwrap_or_else(|| format!("show {}", id));
            Span::styled(format!("[{}]", name), Style::default().fg(Color::Yellow))
        }
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "tvmaze-browser",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        context,
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let Some(status) = app.browser.status() else {
        return;
    };
    let style = match status.severity {
        Severity::Loading => Style::default().fg(Color::Yellow),
        Severity::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };
    frame.render_widget(Paragraph::new(status.message.as_str()).style(style), area);
}

fn draw_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Filter;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let term = app.browser.filter_text();
    let (text, text_style) = if term.is_empty() {
        (
            app.browser.search_placeholder(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (term, Style::default().fg(Color::White))
    };

    let filter = Paragraph::new(text).style(text_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(app.browser.count_label())
            .border_style(border_style),
    );

    frame.render_widget(filter, area);

    if focused {
        frame.set_cursor_position((area.x + term.chars().count() as u16 + 1, area.y + 1));
    }
}

fn draw_cards(frame: &mut Frame, app: &mut App, area: Rect) {
    let cards = app.browser.visible_cards();
    let title = app.browser.kind().label();

    if cards.is_empty() {
        let empty = Paragraph::new(app.browser.kind().empty_placeholder())
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(empty, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let episodes = app.browser.kind() == ItemKind::Episodes;
    let items: Vec<ListItem> = cards
        .iter()
        .map(|card| {
            let mut line = Vec::new();
            // SxxEyy code
            if let (true, Some(code)) = (episodes, card.meta.first()) {
                line.push(Span::styled(
                    format!("{} ", code),
                    Style::default().fg(Color::Cyan),
                ));
            }
            line.push(Span::raw(card.title.clone()));
            ListItem::new(Line::from(line))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], &mut app.list_state);

    let selected = app.list_state.selected().and_then(|i| cards.get(i));
    draw_card_details(frame, selected, chunks[1]);
}

fn draw_card_details(frame: &mut Frame, card: Option<&Card>, area: Rect) {
    let Some(card) = card else {
        frame.render_widget(
            Block::default().borders(Borders::ALL).title("Details"),
            area,
        );
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            card.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];
    lines.extend(card.meta.iter().map(|m| Line::raw(m.clone())));
    lines.push(Line::raw(""));
    lines.push(Line::raw(card.summary.clone()));
    lines.push(Line::raw(""));
    if let Some(image) = &card.image {
        lines.push(Line::from(Span::styled(
            format!("Image: {}", image),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if !card.link.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("View on TVMaze: {}", card.link),
            Style::default().fg(Color::Blue),
        )));
    }

    let details = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(Wrap { trim: true });

    frame.render_widget(details, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = if app.focus == Focus::Filter {
        "[Enter/Esc] done  [Bksp] delete".to_string()
    } else {
        let mut hints = vec!["[↑↓] navigate", "[/] filter", "[p] pick"];
        match app.browser.mode() {
            Mode::Shows => hints.push("[Enter] episodes"),
            Mode::Episodes(_) => hints.push("[b] back to shows"),
        }
        hints.push("[s] show");
        if app.browser.reset_visible() {
            hints.push("[r] reset");
        }
        hints.push("[?] help");
        hints.push("[q] quit");
        hints.join("  ")
    };

    let footer = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

fn draw_picker(frame: &mut Frame, picker: &mut Picker) {
    let area = centered_rect(50, 60, frame.area());
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = picker
        .options
        .iter()
        .map(|(_, label)| ListItem::new(label.as_str()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(picker.title())
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut picker.state);
}

fn draw_help_modal(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let content = "\
Navigation
──────────
  j / ↓       Move down
  k / ↑       Move up
  Enter       Open episodes of a show

Filtering
─────────
  /           Filter the current list
  Enter/Esc   Leave the filter
  p           Pick one item of the current list
  r           Reset filter and pick

Shows
─────
  s           Pick a show
  b / Bksp    Back to the show list

  ?           Show/hide this help
  q / Ctrl+C  Quit

Press ? to close";

    let help_text = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(help_text, area);
}

/// Helper function to create a centered rect.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Keybindings;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app_with_shows() -> App {
        let mut app = App::new(Keybindings::default());
        let shows = serde_json::from_str(
            r#"[{"id": 2, "name": "Alpha", "genres": ["Drama"]}, {"id": 1, "name": "Zeta"}]"#,
        )
        .unwrap();
        app.browser.on_shows_loaded(Ok(shows));
        app.sync_selection();
        app
    }

    #[test]
    fn test_draw_shows_count_and_cards() {
        let mut app = app_with_shows();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Showing 2 of 2 shows"));
        assert!(text.contains("Alpha"));
        assert!(text.contains("Genres: Drama"));
        assert!(text.contains("Search shows..."));
    }

    #[test]
    fn test_draw_empty_placeholder() {
        let mut app = app_with_shows();
        app.browser.apply_text_filter("nothing");
        app.sync_selection();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("No shows found"));
        assert!(text.contains("Showing 0 of 2 shows"));
    }

    #[test]
    fn test_draw_loading_banner() {
        let mut app = App::new(Keybindings::default());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        assert!(buffer_text(&terminal).contains("Loading shows..."));
    }
}
