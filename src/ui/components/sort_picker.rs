use super::KeyResult;
use crate::catalog::sort::SortSpec;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// Events emitted by sort picker that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortPickerEvent {
  /// `None` restores the catalog's own order
  Selected(Option<SortSpec>),
  Cancelled,
}

/// Overlay listing the preset sort orders
#[derive(Debug, Clone, Default)]
pub struct SortPicker {
  active: bool,
  options: Vec<Option<SortSpec>>,
  selected: usize,
}

impl SortPicker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Show the picker with the current order highlighted
  pub fn show(&mut self, current: Option<&SortSpec>) {
    self.options = std::iter::once(None)
      .chain(SortSpec::presets().into_iter().map(Some))
      .collect();
    self.selected = self
      .options
      .iter()
      .position(|o| o.as_ref() == current)
      .unwrap_or(0);
    self.active = true;
  }

  pub fn hide(&mut self) {
    self.active = false;
    self.options.clear();
    self.selected = 0;
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SortPickerEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => {
        self.hide();
        KeyResult::Event(SortPickerEvent::Cancelled)
      }
      KeyCode::Enter => {
        let choice = self.options.get(self.selected).copied();
        self.hide();
        match choice {
          Some(sort) => KeyResult::Event(SortPickerEvent::Selected(sort)),
          None => KeyResult::Event(SortPickerEvent::Cancelled),
        }
      }
      KeyCode::Char('j') | KeyCode::Down => {
        if !self.options.is_empty() {
          self.selected = (self.selected + 1) % self.options.len();
        }
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        if !self.options.is_empty() {
          self.selected = if self.selected == 0 {
            self.options.len() - 1
          } else {
            self.selected - 1
          };
        }
        KeyResult::Handled
      }
      _ => KeyResult::Handled,
    }
  }

  fn label(option: &Option<SortSpec>) -> String {
    match option {
      Some(sort) => sort.label(),
      None => "Default order".to_string(),
    }
  }

  /// Render the sort picker overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active || self.options.is_empty() {
      return;
    }

    let max_len = self
      .options
      .iter()
      .map(|o| Self::label(o).chars().count())
      .max()
      .unwrap_or(10);
    let width = (max_len as u16 + 6).max(24).min(area.width.saturating_sub(4));
    let height = (self.options.len() as u16 + 2).min(area.height.saturating_sub(4)).max(3);

    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Sort By ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let items: Vec<ListItem> = self
      .options
      .iter()
      .map(|option| {
        ListItem::new(Line::from(Span::styled(
          Self::label(option),
          Style::default().fg(Color::Cyan),
        )))
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected));

    frame.render_stateful_widget(list, inner, &mut state);
  }
}
