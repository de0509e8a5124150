//! Contextual help bar component.
//!
//! Displays a status segment followed by context-sensitive keyboard hints at
//! the bottom of the screen.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::events::{get_context_hints, KeyContext};
use crate::ui::theme::theme;

/// Render the help bar: `status` on the left, then the hints for `context`.
pub fn render_context_help(frame: &mut Frame, area: Rect, status: &str, context: KeyContext) {
    frame.render_widget(Paragraph::new(help_line(status, context)), area);
}

fn help_line(status: &str, context: KeyContext) -> Line<'static> {
    let mut spans = Vec::new();
    if !status.is_empty() {
        spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().fg(Color::Black).bg(theme().highlight),
        ));
        spans.push(Span::raw(" "));
    }
    spans.extend(parse_hints_to_spans(get_context_hints(context)));
    Line::from(spans)
}

/// Split hint text into spans, highlighting the bracketed keys.
fn parse_hints_to_spans(hints: &str) -> Vec<Span<'static>> {
    let key_style = Style::default().fg(theme().highlight);
    let text_style = Style::default().fg(theme().muted);

    let mut spans = Vec::new();
    let mut rest = hints;
    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find(']').map(|i| open + i) else {
            break;
        };
        if open > 0 {
            spans.push(Span::styled(rest[..open].to_string(), text_style));
        }
        spans.push(Span::styled(rest[open..=close].to_string(), key_style));
        rest = &rest[close + 1..];
    }
    if !rest.is_empty() {
        spans.push(Span::styled(rest.to_string(), text_style));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_parse_hints_to_spans_simple() {
        let spans = parse_hints_to_spans("[j/k] move");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].content, "[j/k]");
    }

    #[test]
    fn test_parse_hints_to_spans_multiple_keys() {
        // [j/k], " move  ", [enter], " drop"
        let spans = parse_hints_to_spans("[j/k] move  [enter] drop");
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[2].content, "[enter]");
    }

    #[test]
    fn test_parse_hints_to_spans_edge_cases() {
        assert!(parse_hints_to_spans("").is_empty());
        assert_eq!(parse_hints_to_spans("just text").len(), 1);
        assert_eq!(parse_hints_to_spans("[open").len(), 1);
    }

    #[test]
    fn test_help_line_includes_status() {
        let line = help_line("2 selected", KeyContext::Browsing);
        assert_eq!(line.spans[0].content, " 2 selected ");

        let line = help_line("", KeyContext::Moving);
        assert_eq!(line.spans[0].content, "[j/k]");
    }

    #[test]
    fn test_render_context_help() {
        let mut terminal = Terminal::new(TestBackend::new(60, 1)).unwrap();
        terminal
            .draw(|frame| render_context_help(frame, frame.area(), "ok", KeyContext::Moving))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = (0..buffer.area.width)
            .map(|x| buffer[(x, 0)].symbol().to_string())
            .collect();
        assert!(text.starts_with(" ok  [j/k]"));
    }
}
