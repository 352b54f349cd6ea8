use crate::catalog::pagination::{PageMarker, PageWindow};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the page strip: range summary, prev/next and the page markers
pub fn draw_pagination(frame: &mut Frame, area: Rect, window: &PageWindow) {
  let dim = Style::default().fg(Color::DarkGray);
  let enabled = |on: bool| if on { Style::default().fg(Color::Cyan) } else { dim };

  let mut spans = vec![
    Span::styled(
      format!(" {}-{} of {} ", window.start, window.end, window.total_items),
      Style::default().fg(Color::White),
    ),
    Span::raw(" "),
    Span::styled("‹ prev", enabled(window.has_prev())),
    Span::raw(" "),
  ];

  for marker in &window.markers {
    match marker {
      PageMarker::Page(page) if *page == window.current => spans.push(Span::styled(
        format!(" {} ", page),
        Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
      )),
      PageMarker::Page(page) => {
        spans.push(Span::styled(format!(" {} ", page), Style::default().fg(Color::White)))
      }
      PageMarker::Ellipsis => spans.push(Span::styled(" … ", dim)),
    }
  }

  spans.push(Span::raw(" "));
  spans.push(Span::styled("next ›", enabled(window.has_next())));

  frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
