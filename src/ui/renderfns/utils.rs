use chrono::Duration;
use ratatui::prelude::Color;

/// Truncate a string to at most `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Whole reais with `.` thousand separators: `R$ 1.500.000`
pub fn format_currency(amount: f64) -> String {
  let rounded = amount.round();
  let sign = if rounded < 0.0 { "-" } else { "" };
  let digits = format!("{:.0}", rounded.abs());

  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push('.');
    }
    grouped.push(c);
  }

  format!("{}R$ {}", sign, grouped)
}

/// Percentage with at most one decimal, comma as decimal separator
pub fn format_percent(value: f64) -> String {
  let tenths = (value * 10.0).round() / 10.0;
  if tenths.fract() == 0.0 {
    format!("{:.0}%", tenths)
  } else {
    format!("{:.1}%", tenths).replace('.', ",")
  }
}

/// Coarse "how long ago" for snapshot ages
pub fn format_age(age: Duration) -> String {
  if age.num_hours() > 0 {
    format!("{}h ago", age.num_hours())
  } else if age.num_minutes() > 0 {
    format!("{}m ago", age.num_minutes())
  } else {
    "just now".to_string()
  }
}

pub fn status_color(closed: bool) -> Color {
  if closed {
    Color::Green
  } else {
    Color::Red
  }
}
