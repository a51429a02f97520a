pub mod client;
pub mod persistence;
pub mod search_params;
