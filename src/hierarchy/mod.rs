//! Hierarchy reconstruction
//!
//! Turns the flat, possibly-inconsistent item list into a browsable
//! forest: duplicate codes disambiguated by document-order proximity,
//! missing ancestors scaffolded with synthetic placeholders, roots
//! ordered numerically.

pub mod builder;
pub mod code;
pub mod node;

pub use builder::build_forest;
pub use node::{DoaForest, DoaNode};
