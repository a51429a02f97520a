pub mod ticket_stats_service;
