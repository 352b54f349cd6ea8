use crate::catalog::filter::status_label;
use crate::deals::types::Deal;
use crate::ui::renderfns::{format_currency, format_percent, status_color};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Every field of one deal
pub struct DealDetailView {
  deal: Deal,
  scroll: u16,
}

impl DealDetailView {
  pub fn new(deal: Deal) -> Self {
    Self { deal, scroll: 0 }
  }

  fn lines(&self) -> Vec<Line<'_>> {
    let deal = &self.deal;
    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::DarkGray));

    let mut lines = vec![
      Line::from(vec![
        label("Company:     "),
        Span::styled(deal.company.as_str(), Style::default().fg(Color::Cyan).bold()),
      ]),
      Line::from(vec![label("Id:          "), Span::raw(deal.id.as_str())]),
      Line::from(vec![
        label("Episode:     "),
        Span::raw(format!("Season {}, episode {}", deal.season, deal.episode)),
      ]),
      Line::from(vec![label("Category:    "), Span::raw(deal.category.as_str())]),
      Line::from(vec![
        label("Status:      "),
        Span::styled(
          status_label(deal.closed_deal),
          Style::default().fg(status_color(deal.closed_deal)).bold(),
        ),
      ]),
      Line::from(vec![
        label("Pitched by:  "),
        Span::raw(join_or_dash(&deal.participants)),
      ]),
      Line::from(vec![
        label("Investors:   "),
        Span::raw(join_or_dash(&deal.investors)),
      ]),
      Line::from(""),
      Line::from(vec![
        label("Asked:       "),
        Span::raw(format!(
          "{} for {}",
          format_currency(deal.amount_requested),
          format_percent(deal.equity_offered)
        )),
      ]),
    ];

    if deal.closed_deal {
      lines.push(Line::from(vec![
        label("Negotiated:  "),
        Span::styled(
          format!(
            "{} for {}",
            format_currency(deal.amount_negotiated),
            format_percent(deal.equity_negotiated)
          ),
          Style::default().fg(Color::Green),
        ),
      ]));
    }

    if !deal.proposal_type.is_empty() {
      lines.push(Line::from(vec![
        label("Proposal:    "),
        Span::raw(deal.proposal_type.as_str()),
      ]));
    }

    lines.push(Line::from(""));
    if deal.description.is_empty() {
      lines.push(Line::styled("No description", Style::default().fg(Color::DarkGray)));
    } else {
      lines.push(Line::from(deal.description.as_str()));
    }

    lines
  }
}

fn join_or_dash(names: &[String]) -> String {
  if names.is_empty() {
    "-".to_string()
  } else {
    names.join(", ")
  }
}

impl View for DealDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.scroll = self.scroll.saturating_add(1);
        ViewAction::None
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.scroll = self.scroll.saturating_sub(1);
        ViewAction::None
      }
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(format!(" {} ", self.deal.company))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let paragraph = Paragraph::new(self.lines())
      .block(block)
      .wrap(Wrap { trim: true })
      .scroll((self.scroll, 0));
    frame.render_widget(paragraph, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.deal.company.clone()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("j/k", "scroll").with_priority(20),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
