//! Filter state and the filter/sort pipeline.

use std::collections::BTreeSet;

use crate::deals::types::Deal;

use super::sort::SortSpec;

pub const STATUS_CLOSED: &str = "Closed";
pub const STATUS_OPEN: &str = "Not closed";

pub fn status_label(closed: bool) -> &'static str {
  if closed {
    STATUS_CLOSED
  } else {
    STATUS_OPEN
  }
}

/// A filter dimension with a discrete set of selectable values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetKind {
  Season,
  Category,
  Status,
  Participant,
  Investor,
}

impl FacetKind {
  pub const ALL: [FacetKind; 5] = [
    FacetKind::Season,
    FacetKind::Category,
    FacetKind::Status,
    FacetKind::Participant,
    FacetKind::Investor,
  ];

  pub fn label(&self) -> &'static str {
    match self {
      FacetKind::Season => "Season",
      FacetKind::Category => "Category",
      FacetKind::Status => "Status",
      FacetKind::Participant => "Participant",
      FacetKind::Investor => "Investor",
    }
  }
}

/// Everything the user has narrowed the catalog by.
///
/// Dimensions combine with AND; an empty dimension does not constrain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
  pub search: String,
  pub seasons: BTreeSet<u32>,
  pub categories: BTreeSet<String>,
  /// `true` selects closed deals, `false` the ones without a deal
  pub status: BTreeSet<bool>,
  pub participants: BTreeSet<String>,
  pub investors: BTreeSet<String>,
  /// Inclusive bounds on `amount_requested`
  pub min_investment: Option<f64>,
  pub max_investment: Option<f64>,
}

impl FilterState {
  pub fn is_empty(&self) -> bool {
    self.search.is_empty()
      && self.seasons.is_empty()
      && self.categories.is_empty()
      && self.status.is_empty()
      && self.participants.is_empty()
      && self.investors.is_empty()
      && self.min_investment.is_none()
      && self.max_investment.is_none()
  }

  pub fn clear(&mut self) {
    *self = Self::default();
  }

  /// `term` is the already lower-cased search string
  fn matches(&self, deal: &Deal, term: &str) -> bool {
    if !term.is_empty() && !matches_search(deal, term) {
      return false;
    }
    if !self.seasons.is_empty() && !self.seasons.contains(&deal.season) {
      return false;
    }
    if !self.categories.is_empty() && !self.categories.contains(&deal.category) {
      return false;
    }
    if !self.status.is_empty() && !self.status.contains(&deal.closed_deal) {
      return false;
    }
    if !self.participants.is_empty()
      && !deal.participants.iter().any(|p| self.participants.contains(p))
    {
      return false;
    }
    if !self.investors.is_empty() && !deal.investors.iter().any(|i| self.investors.contains(i)) {
      return false;
    }
    if self.min_investment.is_some_and(|min| deal.amount_requested < min) {
      return false;
    }
    if self.max_investment.is_some_and(|max| deal.amount_requested > max) {
      return false;
    }
    true
  }

  /// Add or remove a facet value. Returns false when the value does not
  /// belong to the dimension (e.g. a non-numeric season).
  pub fn toggle(&mut self, kind: FacetKind, value: &str) -> bool {
    match kind {
      FacetKind::Season => match value.parse::<u32>() {
        Ok(season) => toggle_in(&mut self.seasons, season),
        Err(_) => return false,
      },
      FacetKind::Category => toggle_in(&mut self.categories, value.to_string()),
      FacetKind::Status => match parse_status(value) {
        Some(closed) => toggle_in(&mut self.status, closed),
        None => return false,
      },
      FacetKind::Participant => toggle_in(&mut self.participants, value.to_string()),
      FacetKind::Investor => toggle_in(&mut self.investors, value.to_string()),
    }
    true
  }

  pub fn is_selected(&self, kind: FacetKind, value: &str) -> bool {
    match kind {
      FacetKind::Season => value
        .parse::<u32>()
        .is_ok_and(|s| self.seasons.contains(&s)),
      FacetKind::Category => self.categories.contains(value),
      FacetKind::Status => parse_status(value).is_some_and(|c| self.status.contains(&c)),
      FacetKind::Participant => self.participants.contains(value),
      FacetKind::Investor => self.investors.contains(value),
    }
  }

  pub fn clear_facet(&mut self, kind: FacetKind) {
    match kind {
      FacetKind::Season => self.seasons.clear(),
      FacetKind::Category => self.categories.clear(),
      FacetKind::Status => self.status.clear(),
      FacetKind::Participant => self.participants.clear(),
      FacetKind::Investor => self.investors.clear(),
    }
  }

  pub fn selected_count(&self, kind: FacetKind) -> usize {
    match kind {
      FacetKind::Season => self.seasons.len(),
      FacetKind::Category => self.categories.len(),
      FacetKind::Status => self.status.len(),
      FacetKind::Participant => self.participants.len(),
      FacetKind::Investor => self.investors.len(),
    }
  }

  /// Short human summary of the active filters, for the list title
  pub fn summary(&self) -> Option<String> {
    let mut parts = Vec::new();
    if !self.search.is_empty() {
      parts.push(format!("\"{}\"", self.search));
    }
    for kind in FacetKind::ALL {
      let count = self.selected_count(kind);
      if count > 0 {
        parts.push(format!("{}: {}", kind.label(), count));
      }
    }
    if let Some(min) = self.min_investment {
      parts.push(format!("min {}", min));
    }
    if let Some(max) = self.max_investment {
      parts.push(format!("max {}", max));
    }
    if parts.is_empty() {
      None
    } else {
      Some(parts.join(", "))
    }
  }
}

fn toggle_in<T: Ord>(set: &mut BTreeSet<T>, value: T) {
  if !set.remove(&value) {
    set.insert(value);
  }
}

fn parse_status(value: &str) -> Option<bool> {
  match value {
    STATUS_CLOSED => Some(true),
    STATUS_OPEN => Some(false),
    _ => None,
  }
}

fn contains_ci(haystack: &str, term: &str) -> bool {
  haystack.to_lowercase().contains(term)
}

fn matches_search(deal: &Deal, term: &str) -> bool {
  contains_ci(&deal.company, term)
    || contains_ci(&deal.category, term)
    || deal.participants.iter().any(|p| contains_ci(p, term))
    || deal.investors.iter().any(|i| contains_ci(i, term))
    || contains_ci(&deal.description, term)
}

/// Indices into `deals` of the records that pass `filters`, in sort order.
pub fn apply_indices(deals: &[Deal], filters: &FilterState, sort: Option<&SortSpec>) -> Vec<usize> {
  let term = filters.search.to_lowercase();
  let mut indices: Vec<usize> = deals
    .iter()
    .enumerate()
    .filter(|(_, deal)| filters.matches(deal, &term))
    .map(|(i, _)| i)
    .collect();

  // sort_by is stable
  if let Some(sort) = sort {
    indices.sort_by(|&a, &b| sort.compare(&deals[a], &deals[b]));
  }
  indices
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::sort::SortField;
  use crate::catalog::test_support::{catalog, deal};

  fn apply<'a>(deals: &'a [Deal], filters: &FilterState, sort: Option<&SortSpec>) -> Vec<&'a Deal> {
    apply_indices(deals, filters, sort)
      .into_iter()
      .map(|i| &deals[i])
      .collect()
  }

  fn companies(deals: &[&Deal]) -> Vec<String> {
    deals.iter().map(|d| d.company.clone()).collect()
  }

  #[test]
  fn test_empty_filter_keeps_input_order() {
    let deals = catalog();
    let result = apply(&deals, &FilterState::default(), None);
    assert_eq!(result.len(), deals.len());
    assert!(result.iter().zip(deals.iter()).all(|(a, b)| *a == b));
  }

  #[test]
  fn test_dimensions_combine_with_and() {
    let deals = catalog();
    let mut filters = FilterState::default();
    filters.seasons.insert(1);
    filters.categories.insert("Tech".to_string());

    let result = apply(&deals, &filters, None);
    assert!(!result.is_empty());
    assert!(result
      .iter()
      .all(|d| d.season == 1 && d.category == "Tech"));
    assert_eq!(companies(&result), vec!["Bytefy"]);
  }

  #[test]
  fn test_search_is_case_insensitive_substring() {
    let mut deals = catalog();
    deals[0].category = "Technology".to_string();

    let filters = FilterState {
      search: "tech".to_string(),
      ..Default::default()
    };
    let result = apply(&deals, &filters, None);
    assert!(result.iter().any(|d| d.category == "Technology"));
  }

  #[test]
  fn test_search_covers_people_and_description() {
    let deals = catalog();

    let by_investor = FilterState {
      search: "JOÃO".to_string(),
      ..Default::default()
    };
    assert_eq!(companies(&apply(&deals, &by_investor, None)), vec!["Bytefy"]);

    let by_description = FilterState {
      search: "vegan".to_string(),
      ..Default::default()
    };
    assert_eq!(companies(&apply(&deals, &by_description, None)), vec!["Leafy"]);

    let by_company = FilterState {
      search: "bolt".to_string(),
      ..Default::default()
    };
    assert_eq!(companies(&apply(&deals, &by_company, None)), vec!["Bolt"]);

    let by_participant = FilterState {
      search: "Caio".to_string(),
      ..Default::default()
    };
    assert_eq!(companies(&apply(&deals, &by_participant, None)), vec!["Bolt"]);
  }

  #[test]
  fn test_people_filters_need_any_overlap() {
    let deals = catalog();
    let mut filters = FilterState::default();
    filters.participants.insert("Bia".to_string());
    filters.participants.insert("Nobody".to_string());

    let result = apply(&deals, &filters, None);
    assert_eq!(companies(&result), vec!["Leafy", "Bolt"]);
  }

  #[test]
  fn test_investment_bounds_are_inclusive() {
    let deals = catalog();
    let filters = FilterState {
      min_investment: Some(100_000.0),
      max_investment: Some(500_000.0),
      ..Default::default()
    };

    let result = apply(&deals, &filters, None);
    assert!(result
      .iter()
      .all(|d| (100_000.0..=500_000.0).contains(&d.amount_requested)));
    assert!(result.iter().any(|d| d.amount_requested == 100_000.0));
    assert!(result.iter().any(|d| d.amount_requested == 500_000.0));
  }

  #[test]
  fn test_status_filter() {
    let deals = catalog();
    let mut filters = FilterState::default();
    assert!(filters.toggle(FacetKind::Status, STATUS_CLOSED));

    let result = apply(&deals, &filters, None);
    assert!(result.iter().all(|d| d.closed_deal));
    assert_eq!(result.len(), deals.iter().filter(|d| d.closed_deal).count());
  }

  #[test]
  fn test_sort_is_stable() {
    let mut deals = vec![deal(2, 1, "A"), deal(1, 1, "B"), deal(2, 2, "C"), deal(1, 2, "D")];
    for d in &mut deals {
      d.category = "Food".to_string();
    }

    let asc = apply(&deals, &FilterState::default(), Some(&SortSpec::asc(SortField::Season)));
    assert_eq!(companies(&asc), vec!["B", "D", "A", "C"]);

    let desc = apply(&deals, &FilterState::default(), Some(&SortSpec::desc(SortField::Season)));
    assert_eq!(companies(&desc), vec!["A", "C", "B", "D"]);

    let by_category = apply(&deals, &FilterState::default(), Some(&SortSpec::asc(SortField::Category)));
    assert_eq!(companies(&by_category), vec!["A", "B", "C", "D"]);
  }

  #[test]
  fn test_toggle_and_selection() {
    let mut filters = FilterState::default();
    assert!(filters.toggle(FacetKind::Season, "3"));
    assert!(filters.is_selected(FacetKind::Season, "3"));
    assert!(filters.toggle(FacetKind::Season, "3"));
    assert!(!filters.is_selected(FacetKind::Season, "3"));

    assert!(!filters.toggle(FacetKind::Season, "three"));
    assert!(!filters.toggle(FacetKind::Status, "maybe"));
    assert!(filters.is_empty());

    filters.toggle(FacetKind::Investor, "Ana");
    assert_eq!(filters.selected_count(FacetKind::Investor), 1);
    assert_eq!(filters.summary().as_deref(), Some("Investor: 1"));
    filters.clear_facet(FacetKind::Investor);
    assert!(filters.is_empty());
    filters.toggle(FacetKind::Investor, "Ana");

    filters.clear();
    assert!(filters.is_empty());
    assert_eq!(filters.summary(), None);
  }
}
