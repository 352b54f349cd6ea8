pub mod footer;
pub mod header;
pub mod pagination;
pub mod stats;
pub mod utils;

pub use footer::draw_footer;
pub use header::draw_header;
pub use pagination::draw_pagination;
pub use stats::draw_stats;
pub use utils::{format_age, format_currency, format_percent, status_color, truncate};
