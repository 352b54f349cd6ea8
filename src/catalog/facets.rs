use std::collections::BTreeSet;

use crate::deals::types::Deal;

use super::filter::{FacetKind, STATUS_CLOSED, STATUS_OPEN};

/// Distinct values present in the catalog, per filter dimension, sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
  pub seasons: Vec<u32>,
  pub categories: Vec<String>,
  pub participants: Vec<String>,
  pub investors: Vec<String>,
}

impl Facets {
  pub fn from_deals(deals: &[Deal]) -> Self {
    let mut seasons = BTreeSet::new();
    let mut categories = BTreeSet::new();
    let mut participants = BTreeSet::new();
    let mut investors = BTreeSet::new();

    for deal in deals {
      seasons.insert(deal.season);
      categories.insert(deal.category.as_str());
      participants.extend(deal.participants.iter().map(String::as_str));
      investors.extend(deal.investors.iter().map(String::as_str));
    }

    let owned = |set: BTreeSet<&str>| set.into_iter().map(str::to_string).collect();

    Self {
      seasons: seasons.into_iter().collect(),
      categories: owned(categories),
      participants: owned(participants),
      investors: owned(investors),
    }
  }

  /// Selectable values for a dimension, as shown in the picker
  pub fn values(&self, kind: FacetKind) -> Vec<String> {
    match kind {
      FacetKind::Season => self.seasons.iter().map(u32::to_string).collect(),
      FacetKind::Category => self.categories.clone(),
      FacetKind::Status => vec![STATUS_CLOSED.to_string(), STATUS_OPEN.to_string()],
      FacetKind::Participant => self.participants.clone(),
      FacetKind::Investor => self.investors.clone(),
    }
  }
}
