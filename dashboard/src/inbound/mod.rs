//! Inbound adapters driving the domain.
//!
//! - **cli**: the `users-dashboard` command-line surface

pub mod cli;
