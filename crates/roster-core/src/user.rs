//! The authenticated caller and its roles.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// A granted authority.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
pub enum Role {
  #[serde(rename = "ROLE_USER")]
  #[strum(serialize = "ROLE_USER")]
  User,
  #[serde(rename = "ROLE_ADMIN")]
  #[strum(serialize = "ROLE_ADMIN")]
  Admin,
}

/// The signed-in user, as reported by `GET /api/currentUser`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
  pub email: String,
  pub roles: BTreeSet<Role>,
}

impl CurrentUser {
  pub fn new(email: impl Into<String>, admin: bool) -> Self {
    let mut roles = BTreeSet::from([Role::User]);
    if admin {
      roles.insert(Role::Admin);
    }
    Self { email: email.into(), roles }
  }

  pub fn has_role(&self, role: Role) -> bool { self.roles.contains(&role) }

  /// The capability check gating every mutation affordance.
  pub fn is_admin(&self) -> bool { self.has_role(Role::Admin) }
}
