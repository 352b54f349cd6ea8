mod deal_detail;
mod deal_list;

pub use deal_detail::DealDetailView;
pub use deal_list::DealListView;
