//! HTTP controllers

pub mod ticket_stats;
