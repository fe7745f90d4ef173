use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Portal role. Roles form a strict creation hierarchy: a superadmin may
/// create admins, trainers and students; an admin may create trainers and
/// students; trainers and students may create nobody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Trainer,
    Admin,
    Superadmin,
}

impl Role {
    /// Returns true if `self` is allowed to create accounts of `target` rank.
    pub fn can_create(self, target: Role) -> bool {
        match self {
            Role::Superadmin => matches!(target, Role::Admin | Role::Trainer | Role::Student),
            Role::Admin => matches!(target, Role::Trainer | Role::Student),
            Role::Trainer | Role::Student => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Student => "student",
            Role::Trainer => "trainer",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        };
        write!(f, "{}", s)
    }
}

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
}

/// A portal user.
///
/// The role is immutable after creation in the normal flow. There is no
/// password field: credentials are handled by the server exclusively, and
/// the facade refuses to create users while offline rather than persisting
/// anything credential-shaped locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub joined_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_score: Option<f64>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            role,
            status: UserStatus::Active,
            joined_at: Utc::now(),
            performance_score: None,
        }
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_performance_score(mut self, score: f64) -> Self {
        self.performance_score = Some(score);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy_table() {
        // superadmin creates everything below itself, never a peer
        assert!(Role::Superadmin.can_create(Role::Admin));
        assert!(Role::Superadmin.can_create(Role::Trainer));
        assert!(Role::Superadmin.can_create(Role::Student));
        assert!(!Role::Superadmin.can_create(Role::Superadmin));

        assert!(Role::Admin.can_create(Role::Trainer));
        assert!(Role::Admin.can_create(Role::Student));
        assert!(!Role::Admin.can_create(Role::Admin));
        assert!(!Role::Admin.can_create(Role::Superadmin));

        assert!(!Role::Trainer.can_create(Role::Student));
        assert!(!Role::Student.can_create(Role::Student));
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Superadmin).unwrap(), "\"superadmin\"");
        let role: Role = serde_json::from_str("\"trainer\"").unwrap();
        assert_eq!(role, Role::Trainer);
    }

    #[test]
    fn test_user_new_defaults() {
        let user = User::new("Ada", "ada@example.com", Role::Student);
        assert_eq!(user.status, UserStatus::Active);
        assert!(user.performance_score.is_none());
        assert_eq!(user.role, Role::Student);
    }

    #[test]
    fn test_user_json_has_no_password_field() {
        let user = User::new("Ada", "ada@example.com", Role::Student);
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"joinedAt\""));
    }
}
