//! Core record types exchanged with the host application
//!
//! These are the in-memory shapes the data-access collaborator hands us
//! and the identity type used throughout the browse forest.

pub mod records;

pub use records::{ApproverEntry, DoaItem, NodeId};
