use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Role;

/// Authenticated user profile as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

/// Token + user payload delivered by login, register, and OAuth flows.
///
/// OAuth variants obtain this same document out-of-band (deep link /
/// popup callback) and hand it to `Portal::login_with_credentials`.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

/// The one authenticated identity of the running client.
///
/// Owned exclusively by the session manager; everything else sees it
/// through read access or a cloned copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub refresh_token: Option<String>,
    pub user: User,
}

impl From<CredentialsResponse> for Session {
    fn from(credentials: CredentialsResponse) -> Self {
        Self {
            token: credentials.access_token,
            refresh_token: credentials.refresh_token,
            user: credentials.user,
        }
    }
}
