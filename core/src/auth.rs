use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::MessageResponse;
use serde::{Deserialize, Serialize};

/// Account record as the backend reports it. The session itself lives in
/// an HTTP-only cookie that the client carries automatically.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub trust_level: i32,
    #[serde(default)]
    pub is_admin: bool,
}

/// Which sign-in methods the deployment has enabled.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub local_auth_enabled: bool,
    pub linuxdo_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUrlResponse {
    pub auth_url: String,
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Serialize)]
struct LocalLoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SetAdminRequest<'a> {
    user_id: &'a str,
    is_admin: bool,
}

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi { client: self }
    }
}

impl AuthApi<'_> {
    pub async fn config(&self) -> Result<AuthConfig, ApiError> {
        self.client.get_json("auth/config").await
    }

    /// Username/password sign-in. The session cookie lands in the shared
    /// cookie store on success.
    pub async fn local_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        self.client
            .post_json("auth/local/login", &LocalLoginRequest { username, password })
            .await
    }

    /// Authorization URL for the OAuth flow; the browser completes it.
    pub async fn authorization_url(&self) -> Result<AuthUrlResponse, ApiError> {
        self.client.get_json("auth/linuxdo/url").await
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.client.get_json("auth/user").await
    }

    pub async fn logout(&self) -> Result<MessageResponse, ApiError> {
        self.client.post_json("auth/logout", &()).await
    }
}

impl UsersApi<'_> {
    pub async fn current(&self) -> Result<User, ApiError> {
        self.client.get_json("users/current").await
    }

    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        self.client.get_json("users").await
    }

    pub async fn get(&self, user_id: &str) -> Result<User, ApiError> {
        self.client.get_json(&format!("users/{user_id}")).await
    }

    pub async fn set_admin(&self, user_id: &str, is_admin: bool) -> Result<(), ApiError> {
        self.client
            .post_empty("users/set-admin", &SetAdminRequest { user_id, is_admin })
            .await
    }

    pub async fn delete(&self, user_id: &str) -> Result<(), ApiError> {
        self.client.delete_empty(&format!("users/{user_id}")).await
    }
}
