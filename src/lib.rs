//! doa-reference - Delegation of Authority reference core
//!
//! The browsable heart of the DOA application: reconstructs the approval
//! hierarchy from the flat register of dot-coded items, normalizes
//! per-node approver chains for display, and manages the admin reference
//! records (roles, countries, users, thresholds) in memory.
//!
//! The two core computations are pure and synchronous: rebuilding the
//! forest for the same items and filters always yields the same result,
//! so hosts may re-run them per render without coordination.
//!
//! ## Quick start
//!
//! ```rust
//! use doa_reference::browse::BrowseFilter;
//! use doa_reference::hierarchy::build_forest;
//! use doa_reference::models::DoaItem;
//!
//! let items = vec![
//!     DoaItem { id: 1, code: "1".into(), sort_order: 1, ..Default::default() },
//!     DoaItem { id: 2, code: "1.1".into(), sort_order: 2, ..Default::default() },
//! ];
//! let forest = build_forest(&items, &BrowseFilter::default());
//! assert_eq!(forest.roots.len(), 1);
//! assert_eq!(forest.roots[0].children[0].code, "1.1");
//! ```

// Core error handling
pub mod error;

// Input records and node identity
pub mod models;

// Hierarchy reconstruction (the browse forest)
pub mod hierarchy;

// Approver-chain normalization
pub mod approvers;

// Function-name normalization and dropdown seeding
pub mod lookup;

// Admin records registry
pub mod registry;

// Browse-session filter and expand/collapse state
pub mod browse;

// Runtime configuration
pub mod config;

// Public re-exports for host applications
pub use approvers::{normalize_approvers, parse_action_token, ActionGroup, ActionToken};
pub use browse::{BrowseFilter, BrowseState};
pub use config::BrowseConfig;
pub use error::{RegistryError, RegistryResult};
pub use hierarchy::{build_forest, DoaForest, DoaNode};
pub use models::{ApproverEntry, DoaItem, NodeId};
pub use registry::RegistryStore;
