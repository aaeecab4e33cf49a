use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::models::team::TeamInfo;

pub const ROLE_EMPLOYEE: &str = "employee";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_ADMIN: &str = "admin";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 .-]{6,20}$").expect("valid phone pattern"));

/// Credentials for `POST auth/login`. The backend accepts either a username
/// or an email next to the password.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoginRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
}

impl LoginRequest {
    pub fn with_username(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            email: None,
            password: password.into(),
        }
    }

    pub fn with_email(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: None,
            email: Some(email.into()),
            password: password.into(),
        }
    }
}

/// Profile returned by `GET auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub user_uuid: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserProfile {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles
            .iter()
            .any(|candidate| candidate.trim().eq_ignore_ascii_case(role))
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Inactive,
    Disabled,
    Pending,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Disabled => "disabled",
            UserStatus::Pending => "pending",
        };
        f.write_str(label)
    }
}

/// Full user row from `GET users` and `GET users/{uuid}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub uuid: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub work_session_status: Option<String>,
    #[serde(default)]
    pub teams: Vec<TeamInfo>,
    #[serde(default)]
    pub weekly_rate: Option<i64>,
    #[serde(default)]
    pub weekly_rate_name: Option<String>,
    #[serde(default)]
    pub first_day_of_week: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub phone_number: String,
    pub roles: Vec<String>,
}

impl RegisterInput {
    /// Field-level checks mirrored from the registration form; every failing
    /// field is reported in `details`.
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = serde_json::Map::new();

        if self.first_name.trim().is_empty() {
            errors.insert("first_name".into(), json!("first name is required"));
        }
        if self.last_name.trim().is_empty() {
            errors.insert("last_name".into(), json!("last name is required"));
        }
        if self.username.trim().is_empty() {
            errors.insert("username".into(), json!("username is required"));
        }
        if !EMAIL_PATTERN.is_match(self.email.trim()) {
            errors.insert("email".into(), json!("email is invalid"));
        }
        if !self.phone_number.trim().is_empty() && !PHONE_PATTERN.is_match(self.phone_number.trim())
        {
            errors.insert("phone_number".into(), json!("phone number is invalid"));
        }
        if self.roles.is_empty() {
            errors.insert("roles".into(), json!("at least one role is required"));
        } else if let Some(unknown) = self.roles.iter().find(|role| !is_known_role(role)) {
            errors.insert("roles".into(), json!(format!("unknown role {unknown}")));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation_with_details(
                "registration form is invalid",
                serde_json::Value::Object(errors),
            ))
        }
    }
}

fn is_known_role(role: &str) -> bool {
    [ROLE_EMPLOYEE, ROLE_MANAGER, ROLE_ADMIN]
        .iter()
        .any(|known| known.eq_ignore_ascii_case(role.trim()))
}

/// Partial update for `PUT users`; `None` fields are left out of the body.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UserUpdateInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_rate_uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_day_of_week: Option<i32>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub(crate) struct UserUpdateBody<'a> {
    pub uuid: &'a str,
    #[serde(flatten)]
    pub input: &'a UserUpdateInput,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserStatusUpdate {
    pub user_uuid: String,
    pub status: UserStatus,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PasswordResetPayload {
    pub user_email: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PasswordChangePayload {
    pub new_password: String,
    pub user_uuid: String,
}

/// Generic `{ "message": "..." }` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
