use crate::deals::types::Deal;

/// Summary figures over a set of deals
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DealStats {
  pub total: usize,
  pub closed: usize,
  /// Sum of `amount_negotiated` over closed deals
  pub total_invested: f64,
  /// Closed deals as a rounded percentage of all deals
  pub success_rate: u32,
}

impl DealStats {
  pub fn from_deals<'a>(deals: impl IntoIterator<Item = &'a Deal>) -> Self {
    let mut stats = Self::default();
    for deal in deals {
      stats.total += 1;
      if deal.closed_deal {
        stats.closed += 1;
        stats.total_invested += deal.amount_negotiated;
      }
    }

    if stats.total > 0 {
      stats.success_rate = (stats.closed as f64 / stats.total as f64 * 100.0).round() as u32;
    }
    stats
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::test_support::{catalog, deal};

  #[test]
  fn test_stats_over_catalog() {
    let stats = DealStats::from_deals(&catalog());
    assert_eq!(stats.total, 4);
    assert_eq!(stats.closed, 2);
    assert_eq!(stats.total_invested, 1_200_000.0);
    assert_eq!(stats.success_rate, 50);
  }

  #[test]
  fn test_open_deals_do_not_count_as_invested() {
    let mut open = deal(1, 1, "Open");
    open.amount_negotiated = 999.0;
    let stats = DealStats::from_deals([&open]);
    assert_eq!(stats.total_invested, 0.0);
    assert_eq!(stats.success_rate, 0);
  }

  #[test]
  fn test_success_rate_rounds() {
    let mut deals = vec![deal(1, 1, "A"), deal(1, 2, "B"), deal(1, 3, "C")];
    deals[0].closed_deal = true;
    deals[1].closed_deal = true;
    // 2/3 = 66.67%
    assert_eq!(DealStats::from_deals(&deals).success_rate, 67);
  }

  #[test]
  fn test_empty_set() {
    assert_eq!(DealStats::from_deals(&[]), DealStats::default());
  }
}
