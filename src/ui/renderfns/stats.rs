use super::utils::format_currency;
use crate::catalog::stats::DealStats;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// One-line summary of the whole catalog
pub fn draw_stats(frame: &mut Frame, area: Rect, stats: &DealStats) {
  let label = Style::default().fg(Color::DarkGray);
  let value = Style::default().fg(Color::White).bold();

  let line = Line::from(vec![
    Span::styled(" Deals ", label),
    Span::styled(stats.total.to_string(), value),
    Span::styled("   Closed ", label),
    Span::styled(stats.closed.to_string(), Style::default().fg(Color::Green).bold()),
    Span::styled("   Invested ", label),
    Span::styled(format_currency(stats.total_invested), value),
    Span::styled("   Success rate ", label),
    Span::styled(format!("{}%", stats.success_rate), value),
  ]);

  frame.render_widget(Paragraph::new(line), area);
}
