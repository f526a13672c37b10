/*
 * Responsibility
 * - /users 系の request/response DTO
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::dto::FieldErrors;
use crate::error::AppError;
use crate::repos::{PrincipalRecord, ProfileUpdate, Role};
use crate::services::auth::AuthenticatedPrincipal;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub roles: Vec<String>,
}

impl From<&AuthenticatedPrincipal> for MeResponse {
    fn from(p: &AuthenticatedPrincipal) -> Self {
        Self {
            username: p.username().to_string(),
            roles: p.roles().iter().cloned().collect(),
        }
    }
}

// password_hash は返さない
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<PrincipalRecord> for UserResponse {
    fn from(r: PrincipalRecord) -> Self {
        Self {
            id: r.id,
            username: r.username,
            email: r.email,
            name: r.name,
            role: r.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub message: &'static str,
    pub data: UserResponse,
}

/// PUT /users/me. `email` omitted → unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::default();
        errors.require("name", &self.name);
        if let Some(email) = &self.email
            && !email.contains('@')
        {
            errors.add("email", "must be a well-formed email address");
        }
        errors.finish()
    }
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
        }
    }
}
