//! In-memory registry store
//!
//! Owns the four record families and their id counters. Validation is
//! enforced here: name/ISO uniqueness, foreign ids, and refusal to
//! delete records that are still referenced.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::registry::{ApprovalRole, ApprovalThreshold, Country, DoaUser};

/// Typed CRUD over the admin record families. Ids are assigned from
/// per-family monotonic counters owned by the store.
#[derive(Debug, Default)]
pub struct RegistryStore {
    roles: BTreeMap<i64, ApprovalRole>,
    countries: BTreeMap<i64, Country>,
    users: BTreeMap<i64, DoaUser>,
    thresholds: BTreeMap<i64, ApprovalThreshold>,
    counters: BTreeMap<&'static str, i64>,
}

impl RegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self, family: &'static str) -> i64 {
        let counter = self.counters.entry(family).or_insert(0);
        *counter += 1;
        *counter
    }

    // =========================================================================
    // ROLES
    // =========================================================================

    pub fn create_role(&mut self, name: &str, rank: i32) -> RegistryResult<ApprovalRole> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::EmptyField { field: "role name" });
        }
        if self.role_name_taken(name, None) {
            return Err(RegistryError::DuplicateRoleName { name: name.into() });
        }

        let now = Utc::now();
        let role = ApprovalRole {
            id: self.next_id("role"),
            name: name.to_string(),
            rank,
            created_at: now,
            updated_at: now,
        };
        debug!(id = role.id, name = %role.name, "created role");
        self.roles.insert(role.id, role.clone());
        Ok(role)
    }

    pub fn role(&self, id: i64) -> Option<&ApprovalRole> {
        self.roles.get(&id)
    }

    /// Roles ordered by rank, then name.
    pub fn list_roles(&self) -> Vec<&ApprovalRole> {
        let mut roles: Vec<&ApprovalRole> = self.roles.values().collect();
        roles.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.name.cmp(&b.name)));
        roles
    }

    pub fn update_role(&mut self, id: i64, name: &str, rank: i32) -> RegistryResult<ApprovalRole> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::EmptyField { field: "role name" });
        }
        if self.role_name_taken(name, Some(id)) {
            return Err(RegistryError::DuplicateRoleName { name: name.into() });
        }
        let role = self
            .roles
            .get_mut(&id)
            .ok_or(RegistryError::UnknownRole { id })?;
        role.name = name.to_string();
        role.rank = rank;
        role.updated_at = Utc::now();
        Ok(role.clone())
    }

    pub fn delete_role(&mut self, id: i64) -> RegistryResult<()> {
        if !self.roles.contains_key(&id) {
            return Err(RegistryError::UnknownRole { id });
        }
        let referenced = self.users.values().any(|u| u.role_ids.contains(&id))
            || self.thresholds.values().any(|t| t.role_id == id);
        if referenced {
            return Err(RegistryError::RoleInUse { id });
        }
        self.roles.remove(&id);
        Ok(())
    }

    fn role_name_taken(&self, name: &str, exclude: Option<i64>) -> bool {
        self.roles
            .values()
            .filter(|r| Some(r.id) != exclude)
            .any(|r| r.name.eq_ignore_ascii_case(name))
    }

    // =========================================================================
    // COUNTRIES
    // =========================================================================

    pub fn create_country(&mut self, iso_code: &str, name: &str) -> RegistryResult<Country> {
        let iso_code = iso_code.trim().to_uppercase();
        if iso_code.is_empty() {
            return Err(RegistryError::EmptyField { field: "ISO code" });
        }
        if self
            .countries
            .values()
            .any(|c| c.iso_code.eq_ignore_ascii_case(&iso_code))
        {
            return Err(RegistryError::DuplicateIsoCode { iso_code });
        }

        let now = Utc::now();
        let country = Country {
            id: self.next_id("country"),
            iso_code,
            name: name.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        debug!(id = country.id, iso = %country.iso_code, "created country");
        self.countries.insert(country.id, country.clone());
        Ok(country)
    }

    pub fn country(&self, id: i64) -> Option<&Country> {
        self.countries.get(&id)
    }

    /// Countries ordered by ISO code.
    pub fn list_countries(&self) -> Vec<&Country> {
        let mut countries: Vec<&Country> = self.countries.values().collect();
        countries.sort_by(|a, b| a.iso_code.cmp(&b.iso_code));
        countries
    }

    pub fn delete_country(&mut self, id: i64) -> RegistryResult<()> {
        if !self.countries.contains_key(&id) {
            return Err(RegistryError::UnknownCountry { id });
        }
        let referenced = self.users.values().any(|u| u.country_id == Some(id))
            || self.thresholds.values().any(|t| t.country_id == id);
        if referenced {
            return Err(RegistryError::CountryInUse { id });
        }
        self.countries.remove(&id);
        Ok(())
    }

    // =========================================================================
    // USERS
    // =========================================================================

    pub fn create_user(
        &mut self,
        display_name: &str,
        email: &str,
        country_id: Option<i64>,
        role_ids: Vec<i64>,
    ) -> RegistryResult<DoaUser> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(RegistryError::EmptyField {
                field: "display name",
            });
        }
        self.check_user_references(country_id, &role_ids)?;

        let now = Utc::now();
        let user = DoaUser {
            id: self.next_id("user"),
            display_name: display_name.to_string(),
            email: email.trim().to_string(),
            country_id,
            role_ids,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn user(&self, id: i64) -> Option<&DoaUser> {
        self.users.get(&id)
    }

    pub fn list_users(&self) -> Vec<&DoaUser> {
        self.users.values().collect()
    }

    pub fn update_user_roles(&mut self, id: i64, role_ids: Vec<i64>) -> RegistryResult<DoaUser> {
        self.check_user_references(None, &role_ids)?;
        let user = self
            .users
            .get_mut(&id)
            .ok_or(RegistryError::UnknownUser { id })?;
        user.role_ids = role_ids;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    pub fn delete_user(&mut self, id: i64) -> RegistryResult<()> {
        self.users
            .remove(&id)
            .map(|_| ())
            .ok_or(RegistryError::UnknownUser { id })
    }

    fn check_user_references(
        &self,
        country_id: Option<i64>,
        role_ids: &[i64],
    ) -> RegistryResult<()> {
        if let Some(cid) = country_id {
            if !self.countries.contains_key(&cid) {
                return Err(RegistryError::UnknownCountry { id: cid });
            }
        }
        for rid in role_ids {
            if !self.roles.contains_key(rid) {
                return Err(RegistryError::UnknownRole { id: *rid });
            }
        }
        Ok(())
    }

    // =========================================================================
    // THRESHOLDS
    // =========================================================================

    pub fn create_threshold(
        &mut self,
        country_id: i64,
        role_id: i64,
        currency: &str,
        limit_minor: i64,
    ) -> RegistryResult<ApprovalThreshold> {
        if limit_minor < 0 {
            return Err(RegistryError::NegativeLimit { limit_minor });
        }
        if !self.countries.contains_key(&country_id) {
            return Err(RegistryError::UnknownCountry { id: country_id });
        }
        if !self.roles.contains_key(&role_id) {
            return Err(RegistryError::UnknownRole { id: role_id });
        }

        let now = Utc::now();
        let threshold = ApprovalThreshold {
            id: self.next_id("threshold"),
            country_id,
            role_id,
            currency: currency.trim().to_uppercase(),
            limit_minor,
            created_at: now,
            updated_at: now,
        };
        self.thresholds.insert(threshold.id, threshold.clone());
        Ok(threshold)
    }

    pub fn threshold(&self, id: i64) -> Option<&ApprovalThreshold> {
        self.thresholds.get(&id)
    }

    /// Thresholds for one country, ordered by role rank via the role
    /// listing order.
    pub fn thresholds_for_country(&self, country_id: i64) -> Vec<&ApprovalThreshold> {
        let mut result: Vec<&ApprovalThreshold> = self
            .thresholds
            .values()
            .filter(|t| t.country_id == country_id)
            .collect();
        result.sort_by_key(|t| {
            self.roles
                .get(&t.role_id)
                .map(|r| r.rank)
                .unwrap_or(i32::MAX)
        });
        result
    }

    pub fn update_threshold_limit(
        &mut self,
        id: i64,
        limit_minor: i64,
    ) -> RegistryResult<ApprovalThreshold> {
        if limit_minor < 0 {
            return Err(RegistryError::NegativeLimit { limit_minor });
        }
        let threshold = self
            .thresholds
            .get_mut(&id)
            .ok_or(RegistryError::UnknownThreshold { id })?;
        threshold.limit_minor = limit_minor;
        threshold.updated_at = Utc::now();
        Ok(threshold.clone())
    }

    pub fn delete_threshold(&mut self, id: i64) -> RegistryResult<()> {
        self.thresholds
            .remove(&id)
            .map(|_| ())
            .ok_or(RegistryError::UnknownThreshold { id })
    }
}
