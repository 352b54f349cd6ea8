use crate::commands::AppCommand;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }
}

/// Actions that a view can request in response to user input
pub enum ViewAction {
  None,
  /// Push a new view onto the stack
  Push(Box<dyn View>),
  /// Pop current view from stack (go back); popping the root quits
  Pop,
}

/// Result of offering a palette command to a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
  Applied,
  /// The command applies here but its argument was refused
  Rejected(String),
  /// The view has no use for the command
  Ignored,
}

/// Trait for view behavior
///
/// Views handle their own overlays (search, pickers) and return actions for
/// the App to execute: App → View → Components. Views that load data
/// asynchronously hold a `Query<T>` and poll it in `tick()`.
pub trait View {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

  fn render(&mut self, frame: &mut Frame, area: Rect);

  fn breadcrumb_label(&self) -> String;

  /// Whether an overlay with a text field is open, so `:` must not open
  /// the command palette
  fn captures_input(&self) -> bool {
    false
  }

  fn on_command(&mut self, _command: &AppCommand) -> CommandOutcome {
    CommandOutcome::Ignored
  }

  /// Short load status for the header, e.g. where the data came from
  fn status(&self) -> Option<String> {
    None
  }

  /// Called on each tick to allow views to poll async queries
  fn tick(&mut self) {}

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
