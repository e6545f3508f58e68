//! Shop user accounts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use gigashop_core::{UserId, UserRole};

/// A registered shop user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: NaiveDate,
    pub is_active: bool,
}
