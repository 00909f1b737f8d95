use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, LineGauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, Control, Status},
    render::{classify_session, runs, CharClass},
    session::Phase,
};

const HORIZONTAL_MARGIN: u16 = 2;
const TAB: &str = "    ";
const NEWLINE_MARKER: &str = "↵";

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(1), // controls
                Constraint::Length(4), // readouts
                Constraint::Length(1), // progress
                Constraint::Min(3),    // reference text
                Constraint::Length(1), // status
            ])
            .split(area);

        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        Paragraph::new(Span::styled("Coding Speed Test", bold_style))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        render_controls(self, chunks[1], buf);
        render_readouts(self, chunks[2], buf);

        let session = self.session();
        LineGauge::default()
            .filled_style(Style::default().fg(Color::Green))
            .unfilled_style(Style::default().add_modifier(Modifier::DIM))
            .ratio(session.progress())
            .render(chunks[3], buf);

        render_reference(self, chunks[4], buf);
        render_status(self, chunks[5], buf);

        if let Some(prompt) = self.path_prompt() {
            let popup = centered(area, 60, 3);
            Clear.render(popup, buf);

            let (before, after) = split_at_char(&prompt.text(), prompt.cursor());
            let caret = after.chars().next().map_or(" ".to_string(), String::from);
            let rest: String = after.chars().skip(1).collect();
            Paragraph::new(Line::from(vec![
                Span::raw(before),
                Span::styled(caret, Style::default().add_modifier(Modifier::REVERSED)),
                Span::raw(rest),
            ]))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Upload file (enter to load, esc to cancel)"),
            )
            .render(popup, buf);
        }
    }
}

fn render_controls(app: &App, area: Rect, buf: &mut Buffer) {
    let spans = Control::ALL
        .iter()
        .flat_map(|control| {
            let style = if control.is_enabled(app.session()) {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
            };
            [
                Span::styled(format!("[{} {}]", control.shortcut(), control), style),
                Span::raw("  "),
            ]
        })
        .collect::<Vec<_>>();

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_readouts(app: &App, area: Rect, buf: &mut Buffer) {
    let session = app.session();
    let metrics = session.metrics();

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let readouts = [
        (format!("{}s", session.elapsed_secs()), "Time"),
        (metrics.wpm.to_string(), "WPM"),
        (format!("{}%", metrics.accuracy), "Accuracy"),
    ];

    for ((value, label), col) in readouts.into_iter().zip(cols.iter()) {
        Paragraph::new(vec![
            Line::from(Span::styled(
                value,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(label, Style::default().fg(Color::Gray))),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
        .render(*col, buf);
    }
}

fn class_style(class: CharClass) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match class {
        CharClass::Untyped => bold.add_modifier(Modifier::DIM),
        CharClass::Correct => bold.fg(Color::Green),
        CharClass::Incorrect => bold.fg(Color::Red),
    }
}

fn display_segment(segment: &str, class: CharClass) -> String {
    let segment = segment.replace('\t', TAB);
    match class {
        CharClass::Incorrect => segment.replace(' ', "·"),
        _ => segment,
    }
}

/// Build the colorized reference text as one `Line` per source line.
/// Also returns the line index holding the caret.
pub fn reference_lines(app: &App) -> (Vec<Line<'static>>, usize) {
    let glyphs = classify_session(app.session());
    let visible_whitespace = app.config().visible_whitespace;

    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut caret_line = 0;

    for run in runs(&glyphs) {
        let mut style = class_style(run.class);
        if run.caret {
            style = style.add_modifier(Modifier::REVERSED);
            caret_line = lines.len();
        }

        let mut segments = run.text.split('\n').peekable();
        while let Some(segment) = segments.next() {
            if !segment.is_empty() {
                current.push(Span::styled(display_segment(segment, run.class), style));
            }
            if segments.peek().is_some() {
                if visible_whitespace || run.class == CharClass::Incorrect {
                    current.push(Span::styled(NEWLINE_MARKER, style));
                } else if run.caret {
                    current.push(Span::styled(" ", style));
                }
                lines.push(Line::from(std::mem::take(&mut current)));
            }
        }
    }
    lines.push(Line::from(current));

    (lines, caret_line)
}

fn render_reference(app: &App, area: Rect, buf: &mut Buffer) {
    let session = app.session();
    let title = match session.phase() {
        Phase::Empty => "Code".to_string(),
        phase => format!("Code ({})", phase.to_string().to_lowercase()),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if session.phase() == Phase::Empty {
        Paragraph::new(Span::styled(
            "Upload a file to start the test",
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .block(block)
        .render(area, buf);
        return;
    }

    let inner = block.inner(area);
    let (lines, caret_line) = reference_lines(app);
    let scroll = scroll_offset(&lines, caret_line, inner.width, inner.height);

    Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .render(area, buf);
}

/// Rows to scroll so the caret line sits in the middle of the panel.
///
/// Wrapped rows are estimated from display width, which is close enough for
/// code where most lines fit.
pub fn scroll_offset(lines: &[Line], caret_line: usize, width: u16, height: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let rows_before: usize = lines
        .iter()
        .take(caret_line)
        .map(|line| {
            let w: usize = line.spans.iter().map(|s| s.content.width()).sum();
            w.div_ceil(width as usize).max(1)
        })
        .sum();

    rows_before
        .saturating_sub(height as usize / 2)
        .min(u16::MAX as usize) as u16
}

fn render_status(app: &App, area: Rect, buf: &mut Buffer) {
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let (text, style) = match app.status() {
        Some(Status::Error(msg)) => (msg.clone(), Style::default().fg(Color::Red)),
        Some(Status::Info(msg)) => (msg.clone(), italic.fg(Color::Cyan)),
        None if app.session().is_running() => ("(esc) reset / (^c) quit".to_string(), italic),
        None => ("(u)pload / (s)tart / (r)eset / (q)uit".to_string(), italic),
    };
    Paragraph::new(Span::styled(text, style)).render(area, buf);
}

fn split_at_char(s: &str, idx: usize) -> (String, String) {
    let before: String = s.chars().take(idx).collect();
    let after: String = s.chars().skip(idx).collect();
    (before, after)
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| f.render_widget(app, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn type_chars(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[test]
    fn test_empty_screen_shows_placeholder_and_readouts() {
        let app = App::new(Config::default());
        let content = draw(&app);

        assert!(content.contains("Coding Speed Test"));
        assert!(content.contains("Upload a file to start the test"));
        assert!(content.contains("0s"));
        assert!(content.contains("WPM"));
        assert!(content.contains("100%"));
    }

    #[test]
    fn test_running_screen_shows_reference() {
        let mut app = App::new(Config::default());
        app.load_text("let x = 1;");
        app.start();
        type_chars(&mut app, "let");
        app.tick();

        let content = draw(&app);
        assert!(content.contains("let x = 1;"));
        assert!(content.contains("1s"));
        assert!(content.contains("Code (running)"));
    }

    #[test]
    fn test_prompt_overlay() {
        let mut app = App::new(Config::default());
        app.press(Control::Upload);
        type_chars(&mut app, "a.txt");

        let content = draw(&app);
        assert!(content.contains("Upload file"));
        assert!(content.contains("a.txt"));
    }

    #[test]
    fn test_reference_lines_split_on_newlines() {
        let mut app = App::new(Config {
            visible_whitespace: false,
            ..Config::default()
        });
        app.load_text("ab\ncd\n");
        let (lines, caret_line) = reference_lines(&app);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].to_string(), "ab");
        assert_eq!(lines[1].to_string(), "cd");
        assert_eq!(caret_line, 0);
    }

    #[test]
    fn test_reference_lines_mark_caret_and_errors() {
        let mut app = App::new(Config {
            visible_whitespace: false,
            ..Config::default()
        });
        app.load_text("a b\nc");
        app.start();
        type_chars(&mut app, "a_bx");

        let (lines, caret_line) = reference_lines(&app);
        // the wrong space shows as a dot, the wrong newline as a marker
        assert_eq!(lines[0].to_string(), format!("a·b{NEWLINE_MARKER}"));
        assert_eq!(caret_line, 1);

        let caret_span = &lines[1].spans[0];
        assert_eq!(caret_span.content, "c");
        assert!(caret_span.style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_tabs_expand() {
        assert_eq!(display_segment("\tx", CharClass::Correct), "    x");
    }

    #[test]
    fn test_scroll_offset_keeps_caret_visible() {
        let lines: Vec<Line> = (0..40).map(|i| Line::from(format!("line {i}"))).collect();
        assert_eq!(scroll_offset(&lines, 0, 40, 10), 0);
        assert_eq!(scroll_offset(&lines, 4, 40, 10), 0);
        assert_eq!(scroll_offset(&lines, 30, 40, 10), 25);
        assert_eq!(scroll_offset(&lines, 30, 0, 10), 0);
    }
}
