//! Login, logout and the current user.

use crate::client::OctoPrintClient;
use crate::error::Result;
use crate::model::one_or_many;
use crate::protocol::paths;
use crate::resources::access::User;
use serde::{Deserialize, Serialize};

/// Response of `POST /api/login`: the user record plus session data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginUser {
    /// The logged in user
    #[serde(flatten)]
    pub user: User,
    /// Session id, used to authenticate the push channel
    pub session: Option<String>,
    /// Whether OctoPrint considers the client external to its network
    #[serde(rename = "_is_external_client", default)]
    pub is_external_client: bool,
    /// How the login was performed (`apikey`, `password`, ...)
    #[serde(rename = "_login_mechanism")]
    pub login_mechanism: Option<String>,
}

impl LoginUser {
    /// The `user:session` token for [`PushSession::authenticate`](crate::push::PushSession::authenticate).
    pub fn auth_token(&self) -> Option<String> {
        self.session
            .as_ref()
            .map(|session| format!("{}:{}", self.user.name, session))
    }
}

/// Response of `GET /api/currentuser`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentUser {
    /// User name, `None` for anonymous access
    pub name: Option<String>,
    /// Permission keys
    #[serde(default, deserialize_with = "one_or_many")]
    pub permissions: Vec<String>,
    /// Group keys
    #[serde(default, deserialize_with = "one_or_many")]
    pub groups: Vec<String>,
}

impl CurrentUser {
    /// Whether the request was made anonymously.
    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    user: &'a str,
    pass: &'a str,
    remember: bool,
}

#[derive(Debug, Serialize)]
struct Passive {
    passive: bool,
}

/// Handle for authentication endpoints.
pub struct AuthApi<'a> {
    client: &'a OctoPrintClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a OctoPrintClient) -> Self {
        Self { client }
    }

    /// Log in with user name and password.
    pub async fn login(&self, user: &str, pass: &str, remember: bool) -> Result<LoginUser> {
        self.client
            .post(paths::LOGIN, &Credentials { user, pass, remember })
            .await
    }

    /// Log in with the configured API key and obtain a session.
    pub async fn passive_login(&self) -> Result<LoginUser> {
        self.client.post(paths::LOGIN, &Passive { passive: true }).await
    }

    /// `POST /api/logout`
    pub async fn logout(&self) -> Result<()> {
        self.client.post_command(paths::LOGOUT, &serde_json::json!({})).await
    }

    /// `GET /api/currentuser`
    pub async fn current_user(&self) -> Result<CurrentUser> {
        self.client.get(paths::CURRENT_USER).await
    }
}
