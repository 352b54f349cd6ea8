//! Composite deal keys of the form `season#episode#company`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SEPARATOR: char = '#';

/// Why a deal key could not be split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DealIdError {
  #[error("deal id '{0}' must have exactly two '#' separators")]
  SeparatorCount(String),
  #[error("deal id '{id}' has an invalid {part}: '{value}'")]
  InvalidNumber {
    id: String,
    part: &'static str,
    value: String,
  },
  #[error("deal id '{0}' has an empty company")]
  EmptyCompany(String),
}

/// Structured form of a deal's storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DealId {
  pub season: u32,
  pub episode: u32,
  pub company: String,
}

impl DealId {
  pub fn new(season: u32, episode: u32, company: impl Into<String>) -> Self {
    Self {
      season,
      episode,
      company: company.into(),
    }
  }

  /// Split a raw key. Anything other than exactly three parts with positive
  /// season/episode numbers and a company name is rejected.
  pub fn parse(raw: &str) -> Result<Self, DealIdError> {
    let parts: Vec<&str> = raw.split(SEPARATOR).collect();
    let [season, episode, company] = parts.as_slice() else {
      return Err(DealIdError::SeparatorCount(raw.to_string()));
    };

    let season = parse_positive(raw, "season", season)?;
    let episode = parse_positive(raw, "episode", episode)?;

    if company.trim().is_empty() {
      return Err(DealIdError::EmptyCompany(raw.to_string()));
    }

    Ok(Self::new(season, episode, *company))
  }
}

fn parse_positive(raw: &str, part: &'static str, value: &str) -> Result<u32, DealIdError> {
  match value.trim().parse::<u32>() {
    Ok(n) if n > 0 => Ok(n),
    _ => Err(DealIdError::InvalidNumber {
      id: raw.to_string(),
      part,
      value: value.to_string(),
    }),
  }
}

impl fmt::Display for DealId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}{sep}{}{sep}{}",
      self.season,
      self.episode,
      self.company,
      sep = SEPARATOR
    )
  }
}

impl FromStr for DealId {
  type Err = DealIdError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display_builds_key() {
    let id = DealId::new(5, 2, "Acme");
    assert_eq!(id.to_string(), "5#2#Acme");
  }

  #[test]
  fn test_parse_key() {
    let id: DealId = "5#2#Acme".parse().unwrap();
    assert_eq!(id.season, 5);
    assert_eq!(id.episode, 2);
    assert_eq!(id.company, "Acme");
  }

  #[test]
  fn test_company_with_spaces() {
    let id = DealId::parse("3#11#Bolo de Pote da Vó").unwrap();
    assert_eq!(id.company, "Bolo de Pote da Vó");
  }

  #[test]
  fn test_wrong_separator_count() {
    assert!(matches!(
      DealId::parse("5#Acme"),
      Err(DealIdError::SeparatorCount(_))
    ));
    assert!(matches!(
      DealId::parse("5#2#Acme#Labs"),
      Err(DealIdError::SeparatorCount(_))
    ));
  }

  #[test]
  fn test_non_numeric_season() {
    let err = DealId::parse("five#2#Acme").unwrap_err();
    assert!(matches!(
      err,
      DealIdError::InvalidNumber { part: "season", .. }
    ));
  }

  #[test]
  fn test_zero_episode_rejected() {
    let err = DealId::parse("5#0#Acme").unwrap_err();
    assert!(matches!(
      err,
      DealIdError::InvalidNumber {
        part: "episode",
        ..
      }
    ));
  }

  #[test]
  fn test_empty_company() {
    assert!(matches!(
      DealId::parse("5#2#"),
      Err(DealIdError::EmptyCompany(_))
    ));
  }
}
