pub mod stats_api_client;
