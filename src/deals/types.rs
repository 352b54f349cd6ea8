use serde::{Deserialize, Serialize};

/// A pitch from the show, whether or not a deal was closed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
  pub id: String,
  pub season: u32,
  pub episode: u32,
  pub company: String,
  pub category: String,
  pub closed_deal: bool,
  pub participants: Vec<String>,
  pub investors: Vec<String>,
  pub amount_requested: f64,
  /// Percentage, 0-100
  pub equity_offered: f64,
  pub amount_negotiated: f64,
  pub equity_negotiated: f64,
  pub proposal_type: String,
  pub description: String,
}
