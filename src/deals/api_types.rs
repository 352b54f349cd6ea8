//! Serde types matching the deals API payloads.
//!
//! These are kept apart from the domain `Deal` because the wire shape folds
//! season, episode and company into the composite `id`.

use serde::{Deserialize, Serialize};

use super::id::{DealId, DealIdError};
use super::types::Deal;

fn dash() -> String {
  "-".to_string()
}

// ============================================================================
// Stored record, as returned by GET /deals and POST /deals
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealItem {
  pub id: String,
  #[serde(default = "dash")]
  pub category: String,
  #[serde(default)]
  pub closed_deal: bool,
  #[serde(default)]
  pub participants: Vec<String>,
  #[serde(default)]
  pub investors: Vec<String>,
  #[serde(default)]
  pub amount_requested: f64,
  #[serde(default)]
  pub equity_offered: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub amount_negotiated: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub equity_negotiated: Option<f64>,
  #[serde(default = "dash")]
  pub proposal_type: String,
  #[serde(default)]
  pub description: String,
}

impl DealItem {
  /// Split the composite id and build the domain record.
  pub fn into_deal(self) -> Result<Deal, DealIdError> {
    let key = DealId::parse(&self.id)?;

    Ok(Deal {
      id: self.id,
      season: key.season,
      episode: key.episode,
      company: key.company,
      category: self.category,
      closed_deal: self.closed_deal,
      participants: self.participants,
      investors: self.investors,
      amount_requested: self.amount_requested,
      equity_offered: self.equity_offered,
      amount_negotiated: self.amount_negotiated.unwrap_or_default(),
      equity_negotiated: self.equity_negotiated.unwrap_or_default(),
      proposal_type: self.proposal_type,
      description: self.description,
    })
  }
}

// ============================================================================
// Write payload for POST /deals
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDeal {
  pub season: u32,
  pub episode: u32,
  pub company: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
  pub closed_deal: bool,
  #[serde(default)]
  pub participants: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub investors: Option<Vec<String>>,
  pub amount_requested: f64,
  pub equity_offered: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub amount_negotiated: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub equity_negotiated: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub proposal_type: Option<String>,
  #[serde(default)]
  pub description: String,
}

impl NewDeal {
  /// Composite id for this deal. Fails when the id would not read back as the
  /// same season, episode and company, e.g. a `#` in the company name.
  pub fn deal_id(&self) -> Result<DealId, DealIdError> {
    DealId::new(self.season, self.episode, self.company.clone())
      .to_string()
      .parse()
  }

  /// Build the record the write endpoint persists: synthesized id, `"-"` for
  /// missing category and proposal type, no investors when absent.
  pub fn into_item(self) -> Result<DealItem, DealIdError> {
    let id = self.deal_id()?;
    Ok(DealItem {
      id: id.to_string(),
      category: self.category.unwrap_or_else(dash),
      closed_deal: self.closed_deal,
      participants: self.participants,
      investors: self.investors.unwrap_or_default(),
      amount_requested: self.amount_requested,
      equity_offered: self.equity_offered,
      amount_negotiated: self.amount_negotiated,
      equity_negotiated: self.equity_negotiated,
      proposal_type: self.proposal_type.unwrap_or_else(dash),
      description: self.description,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn acme() -> NewDeal {
    NewDeal {
      season: 5,
      episode: 2,
      company: "Acme".to_string(),
      category: None,
      closed_deal: true,
      participants: vec!["Ana".to_string()],
      investors: None,
      amount_requested: 500_000.0,
      equity_offered: 10.0,
      amount_negotiated: Some(400_000.0),
      equity_negotiated: Some(20.0),
      proposal_type: None,
      description: "Rockets".to_string(),
    }
  }

  #[test]
  fn test_into_item_synthesizes_id_and_defaults() {
    let item = acme().into_item().unwrap();
    assert_eq!(item.id, "5#2#Acme");
    assert_eq!(item.category, "-");
    assert_eq!(item.proposal_type, "-");
    assert!(item.investors.is_empty());
  }

  #[test]
  fn test_written_item_parses_back() {
    let deal = acme().into_item().unwrap().into_deal().unwrap();
    assert_eq!(deal.season, 5);
    assert_eq!(deal.episode, 2);
    assert_eq!(deal.company, "Acme");
    assert_eq!(deal.amount_negotiated, 400_000.0);
  }

  #[test]
  fn test_item_defaults_when_fields_missing() {
    let item: DealItem = serde_json::from_str(r#"{"id": "1#3#Bikes", "closed_deal": false}"#).unwrap();
    assert_eq!(item.category, "-");
    assert_eq!(item.proposal_type, "-");
    assert!(item.investors.is_empty());
    assert!(item.participants.is_empty());
    assert_eq!(item.amount_negotiated, None);

    let deal = item.into_deal().unwrap();
    assert_eq!(deal.amount_negotiated, 0.0);
  }

  #[test]
  fn test_malformed_id_is_rejected() {
    let item: DealItem = serde_json::from_str(r#"{"id": "no-separators"}"#).unwrap();
    assert!(item.into_deal().is_err());
  }

  #[test]
  fn test_separator_in_company_is_rejected() {
    let deal = NewDeal {
      company: "A#B Labs".to_string(),
      ..acme()
    };
    assert!(matches!(deal.deal_id(), Err(DealIdError::SeparatorCount(_))));
    assert!(deal.into_item().is_err());
  }

  #[test]
  fn test_zero_season_is_rejected() {
    let deal = NewDeal { season: 0, ..acme() };
    assert!(matches!(
      deal.deal_id(),
      Err(DealIdError::InvalidNumber { part: "season", .. })
    ));
  }

  #[test]
  fn test_blank_company_is_rejected() {
    let deal = NewDeal {
      company: "   ".to_string(),
      ..acme()
    };
    assert!(deal.into_item().is_err());
  }

  #[test]
  fn test_new_deal_skips_absent_optionals() {
    let json = serde_json::to_value(acme()).unwrap();
    assert!(json.get("category").is_none());
    assert!(json.get("investors").is_none());
    assert_eq!(json["company"], "Acme");
  }
}
