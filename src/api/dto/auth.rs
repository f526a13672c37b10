/*
 * Responsibility
 * - login / register の request/response DTO
 * - validate() で形式チェック (欠落フィールドは空文字扱い → 400 の field map)
 */
use serde::{Deserialize, Serialize};

use crate::api::dto::FieldErrors;
use crate::error::AppError;
use crate::repos::Role;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Omitted → `AUTH_DEFAULT_TYPE`.
    #[serde(default)]
    pub auth_type: Option<String>,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::default();
        errors.require("username", &self.username);
        errors.require("password", &self.password);
        errors.finish()
    }

    /// Blank is treated the same as absent.
    pub fn auth_type(&self) -> Option<&str> {
        self.auth_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Always "Bearer"
    pub token_type: &'static str,
    /// Seconds until expiry.
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "fullName")]
    pub name: String,
    pub role: Option<String>,
}

impl RegisterRequest {
    /// Returns the role to assign (USER when omitted).
    pub fn validate(&self) -> Result<Role, AppError> {
        self.check(false)
    }

    /// Accounts created by an admin must name their role.
    pub fn validate_for_admin(&self) -> Result<Role, AppError> {
        self.check(true)
    }

    fn check(&self, role_required: bool) -> Result<Role, AppError> {
        let mut errors = FieldErrors::default();
        errors.require("username", &self.username);
        errors.require("password", &self.password);
        errors.require("name", &self.name);
        errors.require("email", &self.email);
        if !self.email.contains('@') {
            errors.add("email", "must be a well-formed email address");
        }

        let role = match self.role.as_deref().map(str::trim) {
            None | Some("") => {
                if role_required {
                    errors.add("role", "must not be null");
                }
                Role::User
            }
            Some(raw) => raw.parse::<Role>().unwrap_or_else(|_| {
                errors.add("role", "must be USER or ADMIN");
                Role::User
            }),
        };

        errors.finish().map(|()| role)
    }
}
