//! Domain ports for the hexagonal boundary.

mod page_location;
mod users_remote;
mod users_store;

#[cfg(test)]
pub use page_location::MockPageLocation;
pub use page_location::{HistoryMode, PageLocation};
#[cfg(test)]
pub use users_remote::MockUsersRemote;
pub use users_remote::{UsersRemote, UsersRemoteError};
pub use users_store::UsersStore;
