//! Sort specifications over deal fields.
//!
//! The textual form is the field name, optionally suffixed with `-desc`
//! (`amount_requested-desc`). Sorting is stable, and a descending sort swaps
//! the comparator's arguments, so equal keys keep their relative order in
//! both directions.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::deals::types::Deal;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortParseError {
  #[error("sort field is empty")]
  Empty,
  #[error("unknown sort field '{0}'")]
  UnknownField(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
  Id,
  Company,
  Category,
  Season,
  Episode,
  ClosedDeal,
  Participants,
  Investors,
  AmountRequested,
  EquityOffered,
  AmountNegotiated,
  EquityNegotiated,
  ProposalType,
  Description,
}

impl SortField {
  pub const ALL: [SortField; 14] = [
    SortField::Id,
    SortField::Company,
    SortField::Category,
    SortField::Season,
    SortField::Episode,
    SortField::ClosedDeal,
    SortField::Participants,
    SortField::Investors,
    SortField::AmountRequested,
    SortField::EquityOffered,
    SortField::AmountNegotiated,
    SortField::EquityNegotiated,
    SortField::ProposalType,
    SortField::Description,
  ];

  /// Record field name, as used in sort specs
  pub fn name(&self) -> &'static str {
    match self {
      SortField::Id => "id",
      SortField::Company => "company",
      SortField::Category => "category",
      SortField::Season => "season",
      SortField::Episode => "episode",
      SortField::ClosedDeal => "closed_deal",
      SortField::Participants => "participants",
      SortField::Investors => "investors",
      SortField::AmountRequested => "amount_requested",
      SortField::EquityOffered => "equity_offered",
      SortField::AmountNegotiated => "amount_negotiated",
      SortField::EquityNegotiated => "equity_negotiated",
      SortField::ProposalType => "proposal_type",
      SortField::Description => "description",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      SortField::Id => "Id",
      SortField::Company => "Company",
      SortField::Category => "Category",
      SortField::Season => "Season",
      SortField::Episode => "Episode",
      SortField::ClosedDeal => "Status",
      SortField::Participants => "Participants",
      SortField::Investors => "Investors",
      SortField::AmountRequested => "Amount requested",
      SortField::EquityOffered => "Equity offered",
      SortField::AmountNegotiated => "Amount negotiated",
      SortField::EquityNegotiated => "Equity negotiated",
      SortField::ProposalType => "Proposal type",
      SortField::Description => "Description",
    }
  }

  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|f| f.name() == name)
  }

  /// Ascending comparison of two deals on this field
  fn compare(&self, a: &Deal, b: &Deal) -> Ordering {
    match self {
      SortField::Id => cmp_text(&a.id, &b.id),
      SortField::Company => cmp_text(&a.company, &b.company),
      SortField::Category => cmp_text(&a.category, &b.category),
      SortField::Season => a.season.cmp(&b.season),
      SortField::Episode => a.episode.cmp(&b.episode),
      SortField::ClosedDeal => a.closed_deal.cmp(&b.closed_deal),
      SortField::Participants => cmp_text(&a.participants.join(","), &b.participants.join(",")),
      SortField::Investors => cmp_text(&a.investors.join(","), &b.investors.join(",")),
      SortField::AmountRequested => a.amount_requested.total_cmp(&b.amount_requested),
      SortField::EquityOffered => a.equity_offered.total_cmp(&b.equity_offered),
      SortField::AmountNegotiated => a.amount_negotiated.total_cmp(&b.amount_negotiated),
      SortField::EquityNegotiated => a.equity_negotiated.total_cmp(&b.equity_negotiated),
      SortField::ProposalType => cmp_text(&a.proposal_type, &b.proposal_type),
      SortField::Description => cmp_text(&a.description, &b.description),
    }
  }
}

/// Case-insensitive text comparison
fn cmp_text(a: &str, b: &str) -> Ordering {
  a.chars()
    .flat_map(char::to_lowercase)
    .cmp(b.chars().flat_map(char::to_lowercase))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
  #[default]
  Asc,
  Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
  pub field: SortField,
  pub direction: SortDirection,
}

impl SortSpec {
  pub fn asc(field: SortField) -> Self {
    Self {
      field,
      direction: SortDirection::Asc,
    }
  }

  pub fn desc(field: SortField) -> Self {
    Self {
      field,
      direction: SortDirection::Desc,
    }
  }

  pub fn compare(&self, a: &Deal, b: &Deal) -> Ordering {
    match self.direction {
      SortDirection::Asc => self.field.compare(a, b),
      SortDirection::Desc => self.field.compare(b, a),
    }
  }

  pub fn label(&self) -> String {
    match self.direction {
      SortDirection::Asc => format!("{} ↑", self.field.label()),
      SortDirection::Desc => format!("{} ↓", self.field.label()),
    }
  }

  /// Orders offered by the sort picker
  pub fn presets() -> Vec<SortSpec> {
    vec![
      SortSpec::asc(SortField::Company),
      SortSpec::desc(SortField::Company),
      SortSpec::asc(SortField::Season),
      SortSpec::desc(SortField::Season),
      SortSpec::desc(SortField::AmountRequested),
      SortSpec::asc(SortField::AmountRequested),
      SortSpec::desc(SortField::EquityOffered),
      SortSpec::desc(SortField::AmountNegotiated),
      SortSpec::asc(SortField::Category),
    ]
  }
}

impl fmt::Display for SortSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.direction {
      SortDirection::Asc => write!(f, "{}", self.field.name()),
      SortDirection::Desc => write!(f, "{}-desc", self.field.name()),
    }
  }
}

impl FromStr for SortSpec {
  type Err = SortParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim().to_lowercase();
    let (name, direction) = match s.strip_suffix("-desc") {
      Some(name) => (name, SortDirection::Desc),
      None => (s.strip_suffix("-asc").unwrap_or(&s), SortDirection::Asc),
    };

    if name.is_empty() {
      return Err(SortParseError::Empty);
    }

    let field =
      SortField::from_name(name).ok_or_else(|| SortParseError::UnknownField(name.to_string()))?;

    Ok(Self { field, direction })
  }
}
