//! Shared fixtures for unit tests: in-memory directory seeded with one USER and one ADMIN.
use std::sync::Arc;

use axum::Router;
use chrono::Duration;

use crate::app;
use crate::config::Config;
use crate::repos::{InMemoryPrincipalRepo, NewPrincipal, PrincipalDirectory, Role};
use crate::services::password::{CredentialVerifier, test_verifier};
use crate::state::AppState;

pub(crate) const SECRET: &str = "0123456789abcdef0123456789abcdef";
pub(crate) const USER_PASSWORD: &str = "123";
pub(crate) const ADMIN_PASSWORD: &str = "admin-pass";

pub(crate) struct TestApp {
    pub state: AppState,
    pub config: Config,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some(SECRET.to_string()),
            _ => None,
        })
        .unwrap();

        let directory = Arc::new(InMemoryPrincipalRepo::new());
        let verifier = Arc::new(test_verifier());
        for (username, password, role) in [
            ("user", USER_PASSWORD, Role::User),
            ("admin", ADMIN_PASSWORD, Role::Admin),
        ] {
            directory
                .create(NewPrincipal {
                    username: username.to_string(),
                    password_hash: verifier.hash(password).unwrap(),
                    email: format!("{username}@test.com"),
                    name: username.to_string(),
                    role,
                })
                .await
                .unwrap();
        }

        let state = app::assemble_state(&config, directory, verifier).unwrap();
        Self { state, config }
    }

    /// Signs a token directly, skipping the login flow.
    pub fn token_for(&self, username: &str) -> String {
        self.state
            .codec
            .issue(username, Duration::minutes(5))
            .unwrap()
            .token
    }

    pub fn router(&self) -> Router {
        app::build_router(self.state.clone(), &self.config)
    }
}
