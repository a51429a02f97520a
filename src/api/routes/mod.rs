//! API route declarations (e.g., /api/v1/*)

pub mod ticket_stats_routes;
