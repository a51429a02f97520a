//! Ticket statistics: rollup choice, range selection, display filtering.

pub mod chart;
pub mod filter;
pub mod label;
pub mod rollup;
pub mod selection;
pub mod service;
pub mod view;
