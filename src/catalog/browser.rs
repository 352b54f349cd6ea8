//! Browsing state over the loaded catalog.
//!
//! `Browser` owns the deals together with the filters, sort and current
//! page. All mutation goes through it so the visible list and the page stay
//! consistent: every filter or sort change re-runs the pipeline and returns
//! to page 1.

use tracing::debug;

use crate::deals::types::Deal;

use super::facets::Facets;
use super::filter::{apply_indices, FacetKind, FilterState};
use super::pagination::{paginate, total_pages, PageWindow};
use super::sort::SortSpec;
use super::stats::DealStats;

/// Everything a view needs to draw one page
#[derive(Debug, Clone)]
pub struct DealPage<'a> {
  pub items: Vec<&'a Deal>,
  pub window: PageWindow,
  /// Over the whole catalog, not just the filtered set
  pub stats: DealStats,
  /// Deals passing the current filters
  pub visible: usize,
}

#[derive(Debug, Clone)]
pub struct Browser {
  deals: Vec<Deal>,
  filters: FilterState,
  sort: Option<SortSpec>,
  /// Indices into `deals`, filtered and sorted
  visible: Vec<usize>,
  page: usize,
  page_size: usize,
}

impl Browser {
  pub fn new(page_size: usize) -> Self {
    Self {
      deals: Vec::new(),
      filters: FilterState::default(),
      sort: None,
      visible: Vec::new(),
      page: 1,
      page_size: page_size.max(1),
    }
  }

  /// Replace the catalog. Filters and sort are kept.
  pub fn set_deals(&mut self, deals: Vec<Deal>) {
    self.deals = deals;
    self.reapply();
  }

  pub fn deals(&self) -> &[Deal] {
    &self.deals
  }

  pub fn filters(&self) -> &FilterState {
    &self.filters
  }

  pub fn sort(&self) -> Option<&SortSpec> {
    self.sort.as_ref()
  }

  pub fn page(&self) -> usize {
    self.page
  }

  pub fn total_pages(&self) -> usize {
    total_pages(self.visible.len(), self.page_size)
  }

  pub fn visible_len(&self) -> usize {
    self.visible.len()
  }

  pub fn update_filters(&mut self, f: impl FnOnce(&mut FilterState)) {
    f(&mut self.filters);
    self.reapply();
  }

  pub fn set_search(&mut self, search: &str) {
    if self.filters.search != search {
      self.update_filters(|filters| filters.search = search.to_string());
    }
  }

  pub fn toggle_facet(&mut self, kind: FacetKind, value: &str) -> bool {
    let changed = self.filters.toggle(kind, value);
    if changed {
      self.reapply();
    }
    changed
  }

  pub fn set_investment_bounds(&mut self, min: Option<f64>, max: Option<f64>) {
    self.update_filters(|filters| {
      filters.min_investment = min;
      filters.max_investment = max;
    });
  }

  pub fn set_sort(&mut self, sort: Option<SortSpec>) {
    self.sort = sort;
    self.reapply();
  }

  /// Drop every filter and the sort order
  pub fn clear_filters(&mut self) {
    self.filters.clear();
    self.sort = None;
    self.reapply();
  }

  /// Jump to a 1-based page. Returns false, leaving the page unchanged,
  /// when the page does not exist.
  pub fn go_to_page(&mut self, page: usize) -> bool {
    if page == 0 || page > self.total_pages() {
      return false;
    }
    self.page = page;
    true
  }

  pub fn next_page(&mut self) -> bool {
    self.go_to_page(self.page + 1)
  }

  pub fn prev_page(&mut self) -> bool {
    self.go_to_page(self.page.saturating_sub(1))
  }

  pub fn first_page(&mut self) -> bool {
    self.go_to_page(1)
  }

  pub fn last_page(&mut self) -> bool {
    self.go_to_page(self.total_pages())
  }

  pub fn view_model(&self) -> DealPage<'_> {
    let (indices, window) = match paginate(&self.visible, self.page_size, self.page) {
      Ok(page) => (page.items, page.window),
      // Every mutation keeps the page in range
      Err(e) => {
        debug!(error = %e, page = self.page, "page out of range");
        (
          &[][..],
          PageWindow {
            total_items: self.visible.len(),
            total_pages: self.total_pages(),
            current: self.page,
            start: 0,
            end: 0,
            markers: Vec::new(),
          },
        )
      }
    };

    DealPage {
      items: indices.iter().map(|&i| &self.deals[i]).collect(),
      window,
      stats: DealStats::from_deals(&self.deals),
      visible: self.visible_len(),
    }
  }

  pub fn facets(&self) -> Facets {
    Facets::from_deals(&self.deals)
  }

  fn reapply(&mut self) {
    self.visible = apply_indices(&self.deals, &self.filters, self.sort.as_ref());
    self.page = 1;
    debug!(
      visible = self.visible.len(),
      total = self.deals.len(),
      "filters applied"
    );
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::sort::SortField;
  use crate::catalog::test_support::{catalog, deal};

  fn big_catalog(n: u32) -> Vec<Deal> {
    (1..=n).map(|i| deal(1, i, &format!("Company {i:02}"))).collect()
  }

  fn companies(page: &DealPage<'_>) -> Vec<String> {
    page.items.iter().map(|d| d.company.clone()).collect()
  }

  #[test]
  fn test_paging_through_catalog() {
    let mut browser = Browser::new(10);
    browser.set_deals(big_catalog(25));

    assert_eq!(browser.total_pages(), 3);
    assert!(browser.last_page());
    let page = browser.view_model();
    assert_eq!(page.items.len(), 5);
    assert_eq!((page.window.start, page.window.end), (21, 25));
    assert_eq!(page.items[0].company, "Company 21");

    assert!(!browser.next_page());
    assert_eq!(browser.page(), 3);
    assert!(browser.prev_page());
    assert_eq!(browser.page(), 2);
    assert!(browser.first_page());
    assert!(!browser.prev_page());
    assert_eq!(browser.page(), 1);
  }

  #[test]
  fn test_go_to_page_rejects_out_of_range() {
    let mut browser = Browser::new(10);
    browser.set_deals(big_catalog(25));
    browser.go_to_page(2);

    assert!(!browser.go_to_page(0));
    assert!(!browser.go_to_page(4));
    assert_eq!(browser.page(), 2);
  }

  #[test]
  fn test_filter_change_resets_page() {
    let mut browser = Browser::new(2);
    browser.set_deals(catalog());
    assert!(browser.go_to_page(2));

    browser.set_search("b");
    assert_eq!(browser.page(), 1);

    assert!(browser.go_to_page(2));
    browser.set_sort(Some(SortSpec::desc(SortField::Company)));
    assert_eq!(browser.page(), 1);

    browser.go_to_page(2);
    browser.toggle_facet(FacetKind::Category, "Tech");
    assert_eq!(browser.page(), 1);
  }

  #[test]
  fn test_view_model_reflects_filters_and_sort() {
    let mut browser = Browser::new(10);
    browser.set_deals(catalog());
    browser.toggle_facet(FacetKind::Category, "Tech");
    browser.set_sort(Some(SortSpec::desc(SortField::AmountRequested)));

    let page = browser.view_model();
    assert_eq!(companies(&page), vec!["Bolt", "Bytefy"]);
    assert_eq!(page.visible, 2);
    assert_eq!(page.stats.total, 4);
    assert_eq!(page.window.total_items, 2);
  }

  #[test]
  fn test_investment_bounds() {
    let mut browser = Browser::new(10);
    browser.set_deals(catalog());
    browser.set_investment_bounds(Some(100_000.0), None);

    let page = browser.view_model();
    assert!(page.items.iter().all(|d| d.amount_requested >= 100_000.0));
    assert_eq!(page.visible, 3);
  }

  #[test]
  fn test_clear_filters_restores_everything() {
    let mut browser = Browser::new(10);
    browser.set_deals(catalog());
    browser.set_search("zzz");
    browser.set_sort(Some(SortSpec::asc(SortField::Company)));
    assert_eq!(browser.visible_len(), 0);

    browser.clear_filters();
    assert!(browser.filters().is_empty());
    assert!(browser.sort().is_none());
    assert_eq!(browser.visible_len(), 4);
    assert_eq!(companies(&browser.view_model())[0], "Bytefy");
  }

  #[test]
  fn test_empty_catalog_view_model() {
    let mut browser = Browser::new(10);
    browser.set_deals(Vec::new());

    let page = browser.view_model();
    assert!(page.items.is_empty());
    assert_eq!(page.window.total_pages, 0);
    assert_eq!(page.stats, DealStats::default());
    assert!(!browser.next_page());
    assert!(!browser.last_page());
  }

  #[test]
  fn test_reload_keeps_filters() {
    let mut browser = Browser::new(10);
    browser.set_deals(catalog());
    browser.toggle_facet(FacetKind::Season, "2");

    browser.set_deals(catalog());
    assert_eq!(browser.visible_len(), 2);
    assert_eq!(browser.facets().seasons, vec![1, 2]);
  }
}
