use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use r2s_auth::{app, config::Config};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret-0123456789";

pub struct TestApp {
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("response body is not JSON")
    }
}

/// In-memory directory, cheap Argon2 parameters.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(&[]).await
}

/// Same as `spawn_app`, with extra configuration entries taking precedence.
pub async fn spawn_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let config = Config::from_lookup(|key| {
        if let Some((_, value)) = overrides.iter().find(|(k, _)| *k == key) {
            return Some(value.to_string());
        }
        let value = match key {
            "JWT_SECRET" => SECRET,
            "ARGON2_M_COST" => "64",
            "ARGON2_T_COST" => "1",
            _ => return None,
        };
        Some(value.to_string())
    })
    .expect("Failed to build configuration");

    let state = app::build_state(&config)
        .await
        .expect("Failed to build application state");

    TestApp {
        router: app::build_router(state, &config),
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let res = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .expect("Failed to execute request.");

        let status = res.status();
        let headers = res.headers().clone();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn post_login(&self, body: Value) -> TestResponse {
        self.send(Method::POST, "/api/auth/login", None, Some(body))
            .await
    }

    pub async fn post_register(&self, body: Value) -> TestResponse {
        self.send(Method::POST, "/api/auth/register", None, Some(body))
            .await
    }

    pub async fn get_as(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send_as(Method::GET, uri, token, None).await
    }

    pub async fn send_as(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let authorization = token.map(|t| format!("Bearer {t}"));
        self.send(method, uri, authorization.as_deref(), body).await
    }

    pub async fn register(&self, username: &str, password: &str, role: Option<&str>) {
        let res = self
            .post_register(json!({
                "username": username,
                "password": password,
                "email": format!("{username}@test.com"),
                "name": username,
                "role": role,
            }))
            .await;
        assert_eq!(res.status, StatusCode::OK, "register failed: {}", res.body);
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let res = self
            .post_login(json!({ "username": username, "password": password }))
            .await;
        assert_eq!(res.status, StatusCode::OK, "login failed: {}", res.body);
        res.json()["token"].as_str().unwrap().to_string()
    }
}
