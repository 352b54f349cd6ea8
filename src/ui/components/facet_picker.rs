use super::KeyResult;
use crate::catalog::facets::Facets;
use crate::catalog::filter::{FacetKind, FilterState};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

/// Events emitted by the facet picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetPickerEvent {
  /// Add or remove a value from a dimension
  Toggled(FacetKind, String),
  /// Drop every selected value of a dimension
  Cleared(FacetKind),
  Closed,
}

/// Multi-select overlay over the filter dimensions.
///
/// `h`/`l` switch dimension, `j`/`k` move, space toggles, `c` clears the
/// dimension, Esc or Enter closes. Toggles apply immediately.
#[derive(Debug, Clone, Default)]
pub struct FacetPicker {
  active: bool,
  facets: Facets,
  kind: usize,
  selected: usize,
}

impl FacetPicker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Show the picker over the values present in the catalog
  pub fn show(&mut self, facets: Facets) {
    self.active = true;
    self.facets = facets;
    self.selected = 0;
  }

  pub fn hide(&mut self) {
    self.active = false;
  }

  pub fn current_kind(&self) -> FacetKind {
    FacetKind::ALL[self.kind % FacetKind::ALL.len()]
  }

  fn values(&self) -> Vec<String> {
    self.facets.values(self.current_kind())
  }

  fn switch_kind(&mut self, forward: bool) {
    let n = FacetKind::ALL.len();
    self.kind = if forward {
      (self.kind + 1) % n
    } else {
      (self.kind + n - 1) % n
    };
    self.selected = 0;
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FacetPickerEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('f') => {
        self.hide();
        KeyResult::Event(FacetPickerEvent::Closed)
      }
      KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
        self.switch_kind(true);
        KeyResult::Handled
      }
      KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
        self.switch_kind(false);
        KeyResult::Handled
      }
      KeyCode::Char('j') | KeyCode::Down => {
        let len = self.values().len();
        if len > 0 {
          self.selected = (self.selected + 1) % len;
        }
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        let len = self.values().len();
        if len > 0 {
          self.selected = (self.selected + len - 1) % len;
        }
        KeyResult::Handled
      }
      KeyCode::Char(' ') => match self.values().into_iter().nth(self.selected) {
        Some(value) => KeyResult::Event(FacetPickerEvent::Toggled(self.current_kind(), value)),
        None => KeyResult::Handled,
      },
      KeyCode::Char('c') => KeyResult::Event(FacetPickerEvent::Cleared(self.current_kind())),
      _ => KeyResult::Handled,
    }
  }

  /// Render the picker overlay; `filters` marks the selected values
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect, filters: &FilterState) {
    if !self.active {
      return;
    }

    let values = self.values();
    let kind = self.current_kind();

    let max_len = values.iter().map(|v| v.chars().count()).max().unwrap_or(0);
    let width = (max_len as u16 + 10)
      .max(56)
      .min(area.width.saturating_sub(4));
    let height = (values.len() as u16 + 4)
      .max(6)
      .min(area.height.saturating_sub(2));

    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Filters ")
      .title_bottom(" space:toggle  c:clear  h/l:dimension  esc:close ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height < 2 {
      return;
    }

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
      .split(inner);

    // Dimension tabs with selection counts
    let mut tabs = Vec::new();
    for (i, k) in FacetKind::ALL.iter().enumerate() {
      let count = filters.selected_count(*k);
      let label = if count > 0 {
        format!(" {} ({}) ", k.label(), count)
      } else {
        format!(" {} ", k.label())
      };
      let style = if i == self.kind % FacetKind::ALL.len() {
        Style::default().fg(Color::Black).bg(Color::Cyan).bold()
      } else {
        Style::default().fg(Color::Cyan)
      };
      tabs.push(Span::styled(label, style));
    }
    frame.render_widget(Paragraph::new(Line::from(tabs)), chunks[0]);

    if values.is_empty() {
      frame.render_widget(
        Paragraph::new(" No values").style(Style::default().fg(Color::DarkGray)),
        chunks[2],
      );
      return;
    }

    let items: Vec<ListItem> = values
      .iter()
      .map(|value| {
        let (mark, style) = if filters.is_selected(kind, value) {
          ("[x] ", Style::default().fg(Color::Green))
        } else {
          ("[ ] ", Style::default().fg(Color::White))
        };
        ListItem::new(Line::from(vec![
          Span::styled(mark, style),
          Span::styled(value.clone(), style),
        ]))
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected.min(values.len() - 1)));

    frame.render_stateful_widget(list, chunks[2], &mut state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::test_support::catalog;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_inactive_picker_ignores_keys() {
    let mut picker = FacetPicker::new();
    assert_eq!(picker.handle_key(key(KeyCode::Char(' '))), KeyResult::NotHandled);
  }

  #[test]
  fn test_toggle_value_in_dimension() {
    let mut picker = FacetPicker::new();
    picker.show(Facets::from_deals(&catalog()));
    assert_eq!(picker.current_kind(), FacetKind::Season);

    picker.handle_key(key(KeyCode::Char('j')));
    assert_eq!(
      picker.handle_key(key(KeyCode::Char(' '))),
      KeyResult::Event(FacetPickerEvent::Toggled(FacetKind::Season, "2".to_string()))
    );

    picker.handle_key(key(KeyCode::Char('l')));
    assert_eq!(picker.current_kind(), FacetKind::Category);
    assert_eq!(
      picker.handle_key(key(KeyCode::Char(' '))),
      KeyResult::Event(FacetPickerEvent::Toggled(FacetKind::Category, "Food".to_string()))
    );
  }

  #[test]
  fn test_dimension_switch_wraps() {
    let mut picker = FacetPicker::new();
    picker.show(Facets::default());
    picker.handle_key(key(KeyCode::Char('h')));
    assert_eq!(picker.current_kind(), FacetKind::Investor);
    assert_eq!(
      picker.handle_key(key(KeyCode::Char('c'))),
      KeyResult::Event(FacetPickerEvent::Cleared(FacetKind::Investor))
    );
  }

  #[test]
  fn test_escape_closes() {
    let mut picker = FacetPicker::new();
    picker.show(Facets::default());
    assert_eq!(
      picker.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(FacetPickerEvent::Closed)
    );
    assert!(!picker.is_active());
  }
}
