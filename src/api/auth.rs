//! Authentication endpoints.

use serde::Serialize;

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::{CredentialsResponse, User};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
    full_name: &'a str,
}

#[derive(Serialize)]
struct ChangePasswordRequest<'a> {
    old_password: &'a str,
    new_password: &'a str,
}

pub async fn login(
    client: &ApiClient,
    email: &str,
    password: &str,
) -> Result<CredentialsResponse, ApiError> {
    client
        .post("/auth/login", &LoginRequest { email, password })
        .await
}

pub async fn register(
    client: &ApiClient,
    email: &str,
    password: &str,
    full_name: &str,
) -> Result<CredentialsResponse, ApiError> {
    client
        .post(
            "/auth/register",
            &RegisterRequest {
                email,
                password,
                full_name,
            },
        )
        .await
}

/// Identity check against the bearer token. Also the revalidation call
/// behind startup restore.
pub async fn me(client: &ApiClient) -> Result<User, ApiError> {
    client.get("/auth/me").await
}

pub async fn change_password(
    client: &ApiClient,
    old_password: &str,
    new_password: &str,
) -> Result<(), ApiError> {
    client
        .post_empty(
            "/auth/change-password",
            &ChangePasswordRequest {
                old_password,
                new_password,
            },
        )
        .await
}
