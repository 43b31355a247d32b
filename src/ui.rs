//! Terminal UI using ratatui
//!
//! Pure rendering over the app state; every color comes from the palette
//! derived from the current theme flag.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::{App, RequestState};

/// Colors resolved from the dark/light flag
struct Palette {
    fg: Color,
    dim: Color,
    accent: Color,
    highlight_bg: Color,
}

fn palette(dark: bool) -> Palette {
    if dark {
        Palette {
            fg: Color::White,
            dim: Color::Gray,
            accent: Color::Cyan,
            highlight_bg: Color::Rgb(35, 35, 45),
        }
    } else {
        Palette {
            fg: Color::Black,
            dim: Color::DarkGray,
            accent: Color::Blue,
            highlight_bg: Color::Rgb(215, 225, 240),
        }
    }
}

/// Draw the main UI
pub fn draw_ui(f: &mut Frame, app: &App) {
    let colors = palette(app.theme.is_dark());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query input
            Constraint::Min(10),   // Banner + results
            Constraint::Length(4), // Help bar + status line
        ])
        .split(f.area());

    draw_input(f, app, &colors, chunks[0]);

    match &app.state {
        RequestState::Idle => draw_notice(
            f,
            &colors,
            chunks[1],
            "Enter a job description or paste a JD URL to get assessment recommendations",
            colors.dim,
        ),
        RequestState::Loading => draw_notice(
            f,
            &colors,
            chunks[1],
            "⏳ Analyzing your query and finding the best assessments...",
            Color::Yellow,
        ),
        RequestState::Error(message) => draw_notice(
            f,
            &colors,
            chunks[1],
            &format!("❌ Error: {}", message),
            Color::Red,
        ),
        RequestState::Empty => draw_notice(
            f,
            &colors,
            chunks[1],
            "No recommendations found. Please try a different query.",
            Color::Yellow,
        ),
        RequestState::Results(_) => draw_results(f, app, &colors, chunks[1]),
    }

    draw_help_bar(f, app, &colors, chunks[2]);
}

/// Draw the query input field
fn draw_input(f: &mut Frame, app: &App, colors: &Palette, area: Rect) {
    let editable = !app.is_loading();

    let border_style = if editable {
        Style::default().fg(colors.accent)
    } else {
        Style::default().fg(colors.dim)
    };

    let text_style = if editable {
        Style::default().fg(colors.fg)
    } else {
        Style::default().fg(colors.dim)
    };

    let input = Paragraph::new(app.input.as_str()).style(text_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                " 🔍 Job description ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ))
            .border_style(border_style),
    );

    f.render_widget(input, area);

    if editable {
        let cursor_x = input_cursor_x(&app.input, area.width);
        f.set_cursor_position((area.x + cursor_x, area.y + 1));
    }
}

/// Cursor column within the input box, clamped to the inner width
fn input_cursor_x(input: &str, box_width: u16) -> u16 {
    let max = box_width.saturating_sub(2) as usize;
    (input.chars().count() + 1).min(max) as u16
}

/// Draw a single-message banner (hint, loading, error, or empty notice)
fn draw_notice(f: &mut Frame, colors: &Palette, area: Rect, message: &str, fg: Color) {
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(fg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.dim)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

/// Draw the count banner and the recommendations table
fn draw_results(f: &mut Frame, app: &App, colors: &Palette, area: Rect) {
    let recommendations = app.results();
    if recommendations.is_empty() {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    let count = recommendations.len();
    let banner = Paragraph::new(format!(
        "✓ Found {} relevant assessment{}",
        count,
        if count != 1 { "s" } else { "" }
    ))
    .style(Style::default().fg(Color::Green))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    f.render_widget(banner, chunks[0]);

    let url_width = chunks[1].width.saturating_sub(50) as usize;

    let rows: Vec<Row> = recommendations
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let style = if i == app.selected_index {
                Style::default()
                    .bg(colors.highlight_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("{:2}.", i + 1))
                    .style(Style::default().fg(Color::Yellow)),
                Cell::from(truncate(&rec.assessment_name, 40))
                    .style(Style::default().fg(colors.fg)),
                Cell::from(truncate(&rec.assessment_url, url_width.max(20)))
                    .style(Style::default().fg(colors.accent)),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec!["#", "Assessment Name", "URL"])
        .style(
            Style::default()
                .fg(colors.dim)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(42),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                " 📊 Recommended Assessments ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ))
            .border_style(Style::default().fg(colors.accent)),
    );

    f.render_widget(table, chunks[1]);
}

/// Draw the help bar with the status line underneath
fn draw_help_bar(f: &mut Frame, app: &App, colors: &Palette, area: Rect) {
    let keys = match app.state {
        RequestState::Loading => "⏳ Please wait... │ Ctrl+Q: Quit",
        RequestState::Results(_) => {
            "Enter: New search │ ↑/↓: Navigate │ Ctrl+O: Open in browser │ Ctrl+T: Theme │ Ctrl+Q: Quit"
        }
        _ => "Enter: Get recommendations │ Esc: Clear │ Ctrl+T: Theme │ Ctrl+Q: Quit",
    };

    let text = if app.status_message.is_empty() {
        keys.to_string()
    } else {
        format!("{}\n{}", keys, app.status_message)
    };

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(colors.accent))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.dim)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

/// Truncate string to max length
fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();

    if char_count <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_truncate_long_string_gets_ellipsis() {
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }

    #[test]
    fn test_cursor_stays_inside_input_box() {
        // One column in from the left border for short input
        assert_eq!(input_cursor_x("", 40), 1);
        assert_eq!(input_cursor_x("abc", 40), 4);
        // Input wider than the box never crosses the right border
        assert_eq!(input_cursor_x(&"x".repeat(100), 40), 38);
        assert_eq!(input_cursor_x("abc", 0), 0);
    }

    #[test]
    fn test_palette_differs_by_theme() {
        assert_ne!(palette(true).fg, palette(false).fg);
    }
}
