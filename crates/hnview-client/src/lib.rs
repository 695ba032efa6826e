//! View-model layer of hnview
//!
//! Every fetch of a post or a reply goes through a [`Registry`], which keeps
//! exactly one loader per id, so each item is fetched at most once per
//! registry. Loaders publish their state through a [`StateCell`] that
//! presentation code can read or subscribe to.

pub mod cell;
pub mod entity;
pub mod index;
pub mod registry;

#[cfg(test)]
mod test_util;

pub use self::cell::{StateCell, Subscription};
pub use self::entity::{Entity, EntityLoader, EntityState, PostLoader, ReplyLoader};
pub use self::index::{DEFAULT_PAGE_SIZE, IndexLoader, IndexState};
pub use self::registry::Registry;
