use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public part of the user returned on registration and `/auth/users/me/`.
#[derive(Debug, Serialize)]
pub struct UserOut {
    pub id: i64,
    pub username: String,
    pub is_active: bool,
}

impl From<User> for UserOut {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_active: user.is_active,
        }
    }
}

/// Staff-only listing row; adds the audit fields to the public shape.
#[derive(Debug, Serialize)]
pub struct UserListItem {
    pub id: i64,
    pub username: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login: Option<OffsetDateTime>,
    pub is_staff: bool,
}

impl From<User> for UserListItem {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_active: user.is_active,
            last_login: user.last_login,
            is_staff: user.is_staff,
        }
    }
}

/// Response returned after login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Request body for staff self-elevation.
#[derive(Debug, Deserialize)]
pub struct StaffCodeRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct StaffStatusResponse {
    #[serde(rename = "Status Staff")]
    pub status_staff: bool,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_to_skip_0_limit_20() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.skip, 0);
        assert_eq!(p.limit, 20);
    }

    #[test]
    fn pagination_accepts_explicit_values() {
        let p: Pagination = serde_json::from_str(r#"{"skip": 5, "limit": 1}"#).unwrap();
        assert_eq!(p.skip, 5);
        assert_eq!(p.limit, 1);
    }

    #[test]
    fn staff_status_uses_the_spaced_wire_key() {
        let json = serde_json::to_string(&StaffStatusResponse { status_staff: true }).unwrap();
        assert_eq!(json, r#"{"Status Staff":true}"#);
    }

    #[test]
    fn user_out_never_carries_a_password() {
        let user = User {
            id: 1,
            username: "testuser".into(),
            password_hash: "argon2-hash".into(),
            is_active: true,
            is_staff: false,
            last_login: None,
        };
        let json = serde_json::to_string(&UserOut::from(user)).unwrap();
        assert!(json.contains("testuser"));
        assert!(!json.contains("argon2-hash"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn list_item_exposes_staff_flag_and_last_login() {
        let user = User {
            id: 2,
            username: "staffer".into(),
            password_hash: "h".into(),
            is_active: true,
            is_staff: true,
            last_login: Some(time::macros::datetime!(2024-01-15 09:30 UTC)),
        };
        let json = serde_json::to_string(&UserListItem::from(user)).unwrap();
        assert!(json.contains(r#""is_staff":true"#));
        assert!(json.contains("2024-01-15T09:30:00Z"));
    }
}
