//! HTTP outbound adapters.
//!
//! This module provides the reqwest implementation of the `UsersRemote` port.

mod dto;
mod users_http;

pub use users_http::HttpUsersRemote;
