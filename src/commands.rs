//! Command palette: available commands, parsing and autocomplete.

use thiserror::Error;

use crate::catalog::sort::{SortParseError, SortSpec};

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  /// Argument hint shown next to the name
  pub args: &'static str,
  pub description: &'static str,
}

pub const COMMANDS: &[Command] = &[
  Command {
    name: "deals",
    aliases: &["d", "home"],
    args: "",
    description: "Back to the deal list",
  },
  Command {
    name: "sort",
    aliases: &["o", "order"],
    args: "[field[-desc]]",
    description: "Sort by a field, no argument for default order",
  },
  Command {
    name: "min",
    aliases: &["from"],
    args: "[amount]",
    description: "Minimum amount requested",
  },
  Command {
    name: "max",
    aliases: &["to"],
    args: "[amount]",
    description: "Maximum amount requested",
  },
  Command {
    name: "page",
    aliases: &["p", "goto"],
    args: "<n>",
    description: "Jump to a page",
  },
  Command {
    name: "clear",
    aliases: &["c", "reset"],
    args: "",
    description: "Clear filters and sort",
  },
  Command {
    name: "refresh",
    aliases: &["r", "reload"],
    args: "",
    description: "Reload deals from the API",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    args: "",
    description: "Exit sharkdeck",
  },
];

/// A parsed palette command
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
  Deals,
  Sort(Option<SortSpec>),
  MinInvestment(Option<f64>),
  MaxInvestment(Option<f64>),
  Page(usize),
  Clear,
  Refresh,
  Quit,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
  #[error("no command given")]
  Empty,
  #[error("unknown command '{0}'")]
  Unknown(String),
  #[error("'{name}' needs an argument: {name} {usage}")]
  MissingArgument {
    name: &'static str,
    usage: &'static str,
  },
  #[error("'{name}' does not take arguments")]
  UnexpectedArgument { name: &'static str },
  #[error("invalid amount '{0}'")]
  InvalidAmount(String),
  #[error("invalid page '{0}'")]
  InvalidPage(String),
  #[error(transparent)]
  Sort(#[from] SortParseError),
}

/// Resolve a command word by exact name, alias or unique name prefix
pub fn resolve(word: &str) -> Option<&'static Command> {
  let word = word.to_lowercase();

  if let Some(cmd) = COMMANDS
    .iter()
    .find(|c| c.name == word || c.aliases.contains(&word.as_str()))
  {
    return Some(cmd);
  }

  let mut prefixed = COMMANDS.iter().filter(|c| c.name.starts_with(&word));
  match (prefixed.next(), prefixed.next()) {
    (Some(cmd), None) if !word.is_empty() => Some(cmd),
    _ => None,
  }
}

/// Parse a full palette line such as `sort amount_requested-desc`
pub fn parse(input: &str) -> Result<AppCommand, CommandError> {
  let mut parts = input.split_whitespace();
  let word = parts.next().ok_or(CommandError::Empty)?;
  let arg = parts.collect::<Vec<_>>().join(" ");
  let arg = Some(arg.as_str()).filter(|a| !a.is_empty());

  let cmd = resolve(word).ok_or_else(|| CommandError::Unknown(word.to_string()))?;

  let no_args = |command: AppCommand| match arg {
    Some(_) => Err(CommandError::UnexpectedArgument { name: cmd.name }),
    None => Ok(command),
  };

  match cmd.name {
    "deals" => no_args(AppCommand::Deals),
    "clear" => no_args(AppCommand::Clear),
    "refresh" => no_args(AppCommand::Refresh),
    "quit" => no_args(AppCommand::Quit),
    "sort" => Ok(AppCommand::Sort(arg.map(str::parse::<SortSpec>).transpose()?)),
    "min" => Ok(AppCommand::MinInvestment(arg.map(parse_amount).transpose()?)),
    "max" => Ok(AppCommand::MaxInvestment(arg.map(parse_amount).transpose()?)),
    "page" => {
      let arg = arg.ok_or(CommandError::MissingArgument {
        name: cmd.name,
        usage: cmd.args,
      })?;
      match arg.parse::<usize>() {
        Ok(page) if page > 0 => Ok(AppCommand::Page(page)),
        _ => Err(CommandError::InvalidPage(arg.to_string())),
      }
    }
    other => Err(CommandError::Unknown(other.to_string())),
  }
}

/// Parse an amount written the Brazilian way: `R$ 1.500.000`, `250000,50`,
/// or with a `k`/`m` multiplier (`500k`).
pub fn parse_amount(input: &str) -> Result<f64, CommandError> {
  let invalid = || CommandError::InvalidAmount(input.to_string());

  let lowered = input.trim().to_lowercase();
  let cleaned: String = lowered
    .strip_prefix("r$")
    .unwrap_or(&lowered)
    .chars()
    .filter(|c| !c.is_whitespace() && *c != '.' && *c != '_')
    .map(|c| if c == ',' { '.' } else { c })
    .collect();

  let (number, multiplier) = if let Some(n) = cleaned.strip_suffix('k') {
    (n, 1_000.0)
  } else if let Some(n) = cleaned.strip_suffix('m') {
    (n, 1_000_000.0)
  } else {
    (cleaned.as_str(), 1.0)
  };

  let value: f64 = number.parse().map_err(|_| invalid())?;
  if !value.is_finite() || value < 0.0 {
    return Err(invalid());
  }
  Ok(value * multiplier)
}

/// Get autocomplete suggestions for the command word of `input`
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input
    .split_whitespace()
    .next()
    .unwrap_or_default()
    .to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = COMMANDS
    .iter()
    .filter_map(|cmd| {
      let priority = if cmd.name == input_lower {
        0
      } else if cmd.aliases.contains(&input_lower.as_str()) {
        1
      } else if cmd.name.starts_with(&input_lower) {
        2
      } else if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
        3
      } else if cmd.name.contains(&input_lower) {
        4
      } else {
        return None;
      };
      Some((cmd, priority))
    })
    .collect();

  matches.sort_by_key(|(_, priority)| *priority);
  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::sort::SortField;

  #[test]
  fn test_parse_plain_commands() {
    assert_eq!(parse("quit"), Ok(AppCommand::Quit));
    assert_eq!(parse("q"), Ok(AppCommand::Quit));
    assert_eq!(parse("  refresh "), Ok(AppCommand::Refresh));
    assert_eq!(parse("reset"), Ok(AppCommand::Clear));
    assert_eq!(parse("DEALS"), Ok(AppCommand::Deals));
  }

  #[test]
  fn test_parse_unique_prefix() {
    assert_eq!(parse("ref"), Ok(AppCommand::Refresh));
    // "m" is ambiguous between min and max
    assert_eq!(parse("m 10"), Err(CommandError::Unknown("m".to_string())));
  }

  #[test]
  fn test_parse_sort() {
    assert_eq!(
      parse("sort amount_requested-desc"),
      Ok(AppCommand::Sort(Some(SortSpec::desc(SortField::AmountRequested))))
    );
    assert_eq!(parse("sort"), Ok(AppCommand::Sort(None)));
    assert_eq!(
      parse("sort rating"),
      Err(CommandError::Sort(SortParseError::UnknownField(
        "rating".to_string()
      )))
    );
  }

  #[test]
  fn test_parse_bounds() {
    assert_eq!(
      parse("min 1.500.000"),
      Ok(AppCommand::MinInvestment(Some(1_500_000.0)))
    );
    assert_eq!(parse("max 500k"), Ok(AppCommand::MaxInvestment(Some(500_000.0))));
    assert_eq!(parse("max"), Ok(AppCommand::MaxInvestment(None)));
    assert_eq!(
      parse("min lots"),
      Err(CommandError::InvalidAmount("lots".to_string()))
    );
  }

  #[test]
  fn test_parse_page() {
    assert_eq!(parse("page 3"), Ok(AppCommand::Page(3)));
    assert_eq!(
      parse("page"),
      Err(CommandError::MissingArgument {
        name: "page",
        usage: "<n>"
      })
    );
    assert_eq!(parse("page 0"), Err(CommandError::InvalidPage("0".to_string())));
  }

  #[test]
  fn test_parse_errors() {
    assert_eq!(parse(""), Err(CommandError::Empty));
    assert_eq!(parse("boards"), Err(CommandError::Unknown("boards".to_string())));
    assert_eq!(
      parse("quit now"),
      Err(CommandError::UnexpectedArgument { name: "quit" })
    );
  }

  #[test]
  fn test_parse_amount_formats() {
    assert_eq!(parse_amount("R$ 1.500.000"), Ok(1_500_000.0));
    assert_eq!(parse_amount("250000,50"), Ok(250_000.5));
    assert_eq!(parse_amount("1,5m"), Ok(1_500_000.0));
    assert_eq!(parse_amount("100_000"), Ok(100_000.0));
    assert_eq!(parse_amount("r$ 500k"), Ok(500_000.0));
    assert_eq!(parse_amount("R$2M"), Ok(2_000_000.0));
    assert!(parse_amount("-5").is_err());
    assert!(parse_amount("").is_err());
  }

  #[test]
  fn test_suggestions() {
    assert_eq!(get_suggestions("").len(), COMMANDS.len());
    assert_eq!(get_suggestions("sort")[0].name, "sort");
    assert_eq!(get_suggestions("r")[0].name, "refresh");
    assert_eq!(get_suggestions("pa")[0].name, "page");
    // Only the command word is matched
    assert_eq!(get_suggestions("sort comp")[0].name, "sort");
    assert!(get_suggestions("zzz").is_empty());
  }
}
