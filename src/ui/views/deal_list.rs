use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use tracing::debug;

use crate::catalog::browser::Browser;
use crate::commands::AppCommand;
use crate::deals::cached_client::{CachedDealsClient, LoadMode, LoadSource, LoadedDeals};
use crate::deals::types::Deal;
use crate::query::{Query, QueryState};
use crate::ui::components::{
  FacetPicker, FacetPickerEvent, KeyResult, SearchEvent, SearchInput, SortPicker, SortPickerEvent,
};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{
  draw_pagination, draw_stats, format_age, format_currency, format_percent, status_color, truncate,
};
use crate::ui::view::{CommandOutcome, ShortcutInfo, View, ViewAction};
use crate::ui::views::DealDetailView;

/// Root view: the paginated, filterable deal table
pub struct DealListView {
  query: Query<LoadedDeals>,
  /// Next load skips the snapshot
  force_refresh: Arc<AtomicBool>,
  browser: Browser,
  table_state: TableState,
  search: SearchInput,
  facet_picker: FacetPicker,
  sort_picker: SortPicker,
}

impl DealListView {
  pub fn new(client: CachedDealsClient, page_size: usize, mode: LoadMode) -> Self {
    let force_refresh = Arc::new(AtomicBool::new(mode == LoadMode::Refresh));

    let refresh_flag = force_refresh.clone();
    let mut query = Query::new(move || {
      let client = client.clone();
      let mode = if refresh_flag.swap(false, Ordering::SeqCst) {
        LoadMode::Refresh
      } else {
        LoadMode::CacheFirst
      };
      async move { Ok(client.load(mode).await) }
    });

    query.fetch();

    Self {
      query,
      force_refresh,
      browser: Browser::new(page_size),
      table_state: TableState::default(),
      search: SearchInput::new(),
      facet_picker: FacetPicker::new(),
      sort_picker: SortPicker::new(),
    }
  }

  fn refresh(&mut self) {
    self.force_refresh.store(true, Ordering::SeqCst);
    self.query.refetch();
  }

  fn loaded(&self) -> Option<&LoadedDeals> {
    self.query.data()
  }

  fn page_changed(&mut self, changed: bool) {
    if changed {
      self.table_state.select(Some(0));
    }
  }

  fn selected_deal(&self) -> Option<Deal> {
    let idx = self.table_state.selected()?;
    self.browser.view_model().items.get(idx).map(|d| (*d).clone())
  }

  fn render_table(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Stats
        Constraint::Min(3),    // Table
        Constraint::Length(1), // Pages
      ])
      .split(area);

    let page = self.browser.view_model();
    draw_stats(frame, chunks[0], &page.stats);

    let mut title = match self.query.state() {
      QueryState::Loading => format!(" Deals ({}/{}) (loading...) ", page.visible, page.stats.total),
      _ => format!(" Deals ({}/{}) ", page.visible, page.stats.total),
    };
    if let Some(summary) = self.browser.filters().summary() {
      title.push_str(&format!("[{}] ", summary));
    }
    if let Some(sort) = self.browser.sort() {
      title.push_str(&format!("[{}] ", sort.label()));
    }

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if page.items.is_empty() {
      let content = if self.query.is_loading() {
        "Loading deals..."
      } else if self.browser.deals().is_empty() {
        "No deals found. Press 'r' to reload."
      } else {
        "No deals match the current filters. Press 'c' to clear them."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, chunks[1]);
      draw_pagination(frame, chunks[2], &page.window);
      return;
    }

    let header = Row::new(vec![
      "Company", "Ep.", "Category", "Status", "Asked", "Equity", "Investors",
    ])
    .style(Style::default().fg(Color::Yellow).bold());

    let rows: Vec<Row> = page
      .items
      .iter()
      .map(|deal| {
        let status = if deal.closed_deal { "Closed" } else { "No deal" };
        Row::new(vec![
          Cell::from(truncate(&deal.company, 28)).style(Style::default().fg(Color::Cyan)),
          Cell::from(format!("S{}E{}", deal.season, deal.episode)),
          Cell::from(truncate(&deal.category, 18)),
          Cell::from(status).style(Style::default().fg(status_color(deal.closed_deal))),
          Cell::from(format_currency(deal.amount_requested)),
          Cell::from(format_percent(deal.equity_offered)),
          Cell::from(truncate(&deal.investors.join(", "), 40)),
        ])
      })
      .collect();

    let widths = [
      Constraint::Length(28),
      Constraint::Length(7),
      Constraint::Length(18),
      Constraint::Length(8),
      Constraint::Length(15),
      Constraint::Length(7),
      Constraint::Min(10),
    ];

    let len = rows.len();
    let window = page.window.clone();

    let table = Table::new(rows, widths)
      .header(header)
      .block(block)
      .row_highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    ensure_valid_selection(&mut self.table_state, len);
    frame.render_stateful_widget(table, chunks[1], &mut self.table_state);
    draw_pagination(frame, chunks[2], &window);
  }

  // Key handling helpers for or_else chain pattern
  fn handle_overlays(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match self.facet_picker.handle_key(key) {
      KeyResult::Handled | KeyResult::Event(FacetPickerEvent::Closed) => {
        return Some(ViewAction::None)
      }
      KeyResult::Event(FacetPickerEvent::Toggled(kind, value)) => {
        self.browser.toggle_facet(kind, &value);
        self.page_changed(true);
        return Some(ViewAction::None);
      }
      KeyResult::Event(FacetPickerEvent::Cleared(kind)) => {
        self.browser.update_filters(|filters| filters.clear_facet(kind));
        self.page_changed(true);
        return Some(ViewAction::None);
      }
      KeyResult::NotHandled => {}
    }

    match self.sort_picker.handle_key(key) {
      KeyResult::Handled | KeyResult::Event(SortPickerEvent::Cancelled) => {
        return Some(ViewAction::None)
      }
      KeyResult::Event(SortPickerEvent::Selected(sort)) => {
        self.browser.set_sort(sort);
        self.page_changed(true);
        return Some(ViewAction::None);
      }
      KeyResult::NotHandled => {}
    }

    let current = self.browser.filters().search.clone();
    match self.search.handle_key(key, &current) {
      KeyResult::Handled | KeyResult::Event(SearchEvent::Submitted) => Some(ViewAction::None),
      KeyResult::Event(SearchEvent::Changed(text)) => {
        self.browser.set_search(&text);
        self.page_changed(true);
        Some(ViewAction::None)
      }
      KeyResult::NotHandled => None,
    }
  }

  fn handle_navigation(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.table_state.select_next();
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.table_state.select_previous();
      }
      KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => {
        let changed = self.browser.next_page();
        self.page_changed(changed);
      }
      KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => {
        let changed = self.browser.prev_page();
        self.page_changed(changed);
      }
      KeyCode::Char('g') | KeyCode::Home => {
        let changed = self.browser.first_page();
        self.page_changed(changed);
      }
      KeyCode::Char('G') | KeyCode::End => {
        let changed = self.browser.last_page();
        self.page_changed(changed);
      }
      _ => return None,
    }
    Some(ViewAction::None)
  }

  fn handle_actions(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match key.code {
      KeyCode::Enter => self
        .selected_deal()
        .map(|deal| ViewAction::Push(Box::new(DealDetailView::new(deal)))),
      KeyCode::Char('f') => {
        self.facet_picker.show(self.browser.facets());
        Some(ViewAction::None)
      }
      KeyCode::Char('s') => {
        self.sort_picker.show(self.browser.sort());
        Some(ViewAction::None)
      }
      KeyCode::Char('c') => {
        // Nothing to clear; stay on the current page
        if self.browser.filters().is_empty() && self.browser.sort().is_none() {
          return Some(ViewAction::None);
        }
        self.browser.clear_filters();
        self.page_changed(true);
        Some(ViewAction::None)
      }
      KeyCode::Char('r') => {
        self.refresh();
        Some(ViewAction::None)
      }
      KeyCode::Char('q') | KeyCode::Esc => Some(ViewAction::Pop),
      _ => None,
    }
  }
}

impl View for DealListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    self
      .handle_overlays(key)
      .or_else(|| self.handle_navigation(key))
      .or_else(|| self.handle_actions(key))
      .unwrap_or(ViewAction::None)
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_table(frame, area);
    self.search.render_overlay(frame, area);
    self.sort_picker.render_overlay(frame, area);
    self
      .facet_picker
      .render_overlay(frame, area, self.browser.filters());
  }

  fn breadcrumb_label(&self) -> String {
    format!("Deals [page {}/{}]", self.browser.page(), self.browser.total_pages().max(1))
  }

  fn captures_input(&self) -> bool {
    self.search.is_active() || self.facet_picker.is_active() || self.sort_picker.is_active()
  }

  fn on_command(&mut self, command: &AppCommand) -> CommandOutcome {
    match command {
      AppCommand::Sort(sort) => self.browser.set_sort(*sort),
      AppCommand::MinInvestment(min) => {
        let max = self.browser.filters().max_investment;
        self.browser.set_investment_bounds(*min, max);
      }
      AppCommand::MaxInvestment(max) => {
        let min = self.browser.filters().min_investment;
        self.browser.set_investment_bounds(min, *max);
      }
      AppCommand::Page(page) => {
        if !self.browser.go_to_page(*page) {
          return CommandOutcome::Rejected(format!(
            "page {} out of range (1-{})",
            page,
            self.browser.total_pages()
          ));
        }
      }
      AppCommand::Clear => self.browser.clear_filters(),
      AppCommand::Refresh => self.refresh(),
      AppCommand::Deals | AppCommand::Quit => return CommandOutcome::Ignored,
    }
    self.page_changed(true);
    CommandOutcome::Applied
  }

  fn status(&self) -> Option<String> {
    if self.query.is_loading() {
      return Some("loading...".to_string());
    }
    if let Some(e) = self.query.error() {
      return Some(format!("load failed: {}", e));
    }
    let loaded = self.loaded()?;
    Some(match loaded.source {
      LoadSource::Cache => match loaded.age(Utc::now()) {
        Some(age) => format!("loaded from cache ({})", format_age(age)),
        None => "loaded from cache".to_string(),
      },
      LoadSource::Network => "loaded from API".to_string(),
      LoadSource::Failed => "load failed".to_string(),
    })
  }

  fn tick(&mut self) {
    if self.query.poll() {
      if let Some(loaded) = self.query.data() {
        debug!(
          generation = self.query.generation(),
          count = loaded.deals.len(),
          "deal list updated"
        );
        let deals = loaded.deals.clone();
        self.browser.set_deals(deals);
        self.page_changed(true);
      }
    }
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "search").with_priority(20),
      ShortcutInfo::new("f", "filter").with_priority(30),
      ShortcutInfo::new("s", "sort").with_priority(40),
      ShortcutInfo::new("n/p", "page").with_priority(50),
      ShortcutInfo::new("c", "clear").with_priority(60),
      ShortcutInfo::new("r", "refresh").with_priority(70),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ]
  }
}
