pub mod api_types;
mod cache;
pub mod cached_client;
pub mod client;
pub mod id;
pub mod types;
