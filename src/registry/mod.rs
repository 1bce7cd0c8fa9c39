//! Admin records registry
//!
//! Records management for the reference data the DOA application
//! administers: approval roles, countries, users, and approval
//! thresholds. Persistence is a separate collaborator; this registry is
//! the in-memory layer with the CRUD and validation semantics.

pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use store::RegistryStore;

/// An approval role (e.g. "CFO", "Country Manager"). `rank` orders roles
/// in admin listings, lowest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRole {
    pub id: i64,
    pub name: String,
    pub rank: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A country the delegation matrix applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    /// ISO 3166-1 alpha-2, stored upper-cased
    pub iso_code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An application user with their assigned roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoaUser {
    pub id: i64,
    pub display_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_id: Option<i64>,
    pub role_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An approval threshold: the amount up to which a role may approve in a
/// country. Amounts are integer minor units (cents) in `currency`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalThreshold {
    pub id: i64,
    pub country_id: i64,
    pub role_id: i64,
    pub currency: String,
    pub limit_minor: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
