//! Users dashboard library modules.
//!
//! A client-side data layer for a remote users collection: a REST client,
//! two interchangeable store engines, and page-number pagination with a
//! location feedback loop.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use config::DashboardSettings;
