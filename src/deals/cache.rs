//! Caching implementations for deal types.

use crate::cache::Cacheable;

use super::types::Deal;

impl Cacheable for Deal {
  fn entity_type() -> &'static str {
    "sharkdeck"
  }
}
