//! Principal roles for the administrative surface.
//!
//! Token issuance lives outside this system; the API only verifies bearer
//! tokens and gates operations on the role carried in the claims.

use serde::{Deserialize, Serialize};

/// Role of an authenticated principal, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// A client with bookings of their own
    Client,
    /// Operations staff
    Staff,
    /// Full administrative access
    Admin,
}

impl UserRole {
    /// Staff and admins manage booking lifecycles and moderate content.
    pub fn can_manage_bookings(&self) -> bool {
        *self >= Self::Staff
    }

    /// Only admins mutate the service catalog.
    pub fn is_admin(&self) -> bool {
        *self == Self::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ordering() {
        assert!(UserRole::Admin > UserRole::Staff);
        assert!(UserRole::Staff > UserRole::Client);
        assert!(UserRole::Staff.can_manage_bookings());
        assert!(!UserRole::Client.can_manage_bookings());
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Staff.is_admin());
    }
}
