//! Data-aggregation layer for the reading-goals admin dashboard.
//!
//! Each module maps one dashboard read path onto the document store: goal
//! listing with the memoized group-name join, the group directory, the user
//! directory, the dashboard counters, and invite deep-link resolution. All
//! reads go through the [`DocumentStore`] trait so the transport can be
//! substituted in tests.

pub mod dashboard;
pub mod dates;
pub mod goals;
pub mod groups;
pub mod links;
pub mod users;

mod fields;
mod group_names;

#[cfg(test)]
mod test_utils;

pub use firestore_rest::{DocumentStore, FirestoreError};
