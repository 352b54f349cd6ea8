use crate::commands::{self, AppCommand};
use crate::config::Config;
use crate::deals::cached_client::{CachedDealsClient, LoadMode};
use crate::event::{Event, EventHandler};
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::view::{CommandOutcome, ShortcutInfo, View, ViewAction};
use crate::ui::views::DealListView;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tracing::{debug, info};

const TICK_RATE: Duration = Duration::from_millis(250);

/// Main application state
pub struct App {
  /// Navigation stack - the deal list is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// Command palette (after pressing :)
  command: CommandInput,

  /// Last command error, shown in the footer until the next key
  message: Option<String>,

  title: String,
  api_url: String,

  should_quit: bool,
}

impl App {
  pub fn new(config: &Config, client: CachedDealsClient, mode: LoadMode) -> Self {
    Self::with_root(
      config,
      Box::new(DealListView::new(client, config.page_size, mode)),
    )
  }

  fn with_root(config: &Config, root: Box<dyn View>) -> Self {
    Self {
      view_stack: vec![root],
      command: CommandInput::new(),
      message: None,
      title: config.display_title(),
      api_url: config.api.url.clone(),
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = self.event_loop().await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(&mut self) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut events = EventHandler::new(TICK_RATE);

    while !self.should_quit() {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }

    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {
        for view in &mut self.view_stack {
          view.tick();
        }
      }
      Event::Resize(width, height) => debug!(width, height, "terminal resized"),
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    self.message = None;

    // The palette only opens when the view is not typing into an overlay
    let view_captures = self
      .view_stack
      .last()
      .is_some_and(|view| view.captures_input());
    if self.command.is_active() || !view_captures {
      match self.command.handle_key(key) {
        KeyResult::Event(CommandEvent::Submitted(line)) => {
          self.execute(&line);
          return;
        }
        KeyResult::Handled | KeyResult::Event(CommandEvent::Cancelled) => return,
        KeyResult::NotHandled => {}
      }
    }

    let action = match self.view_stack.last_mut() {
      Some(view) => view.handle_key(key),
      None => return,
    };
    self.apply(action);
  }

  fn apply(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => self.view_stack.push(view),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  fn execute(&mut self, line: &str) {
    let command = match commands::parse(line) {
      Ok(command) => command,
      Err(e) => {
        self.message = Some(e.to_string());
        return;
      }
    };
    info!(?command, "running command");

    // Every command acts on the deal list
    self.view_stack.truncate(1);

    match command {
      AppCommand::Quit => self.should_quit = true,
      AppCommand::Deals => {}
      command => {
        let Some(root) = self.view_stack.first_mut() else {
          return;
        };
        match root.on_command(&command) {
          CommandOutcome::Applied => {}
          CommandOutcome::Rejected(reason) => self.message = Some(reason),
          CommandOutcome::Ignored => self.message = Some(format!("{}: not available here", line)),
        }
      }
    }
  }

  // Accessors for UI rendering
  pub fn current_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
    self.view_stack.last_mut()
  }

  pub fn command_input(&self) -> &CommandInput {
    &self.command
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn api_url(&self) -> &str {
    &self.api_url
  }

  pub fn message(&self) -> Option<&str> {
    self.message.as_deref()
  }

  /// Status of the topmost view that reports one
  pub fn status(&self) -> Option<String> {
    self.view_stack.iter().rev().find_map(|view| view.status())
  }

  pub fn shortcuts(&self) -> Vec<ShortcutInfo> {
    self
      .view_stack
      .last()
      .map(|view| view.shortcuts())
      .unwrap_or_default()
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|view| view.breadcrumb_label())
      .collect()
  }

  pub fn should_quit(&self) -> bool {
    self.should_quit
  }
}
