//! Account API client: login, registration, profiles, account data,
//! follows, and moderation actions.

use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{
    RegisterResult, Role, UserData, UserDataUpdate, UserProfile, UserSummary,
};

use super::{user_segment, Gateway};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordUpdateRequest<'a> {
    old_password: &'a str,
    new_password: &'a str,
}

/// Client for the `/account` endpoints.
///
/// Everything account related: login, logout-side effects are handled by
/// the session holder; this client only speaks HTTP.
#[derive(Clone)]
pub struct AccountClient {
    gateway: Arc<Gateway>,
}

impl AccountClient {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// The underlying gateway, used by the session holder to wire up
    /// credential storage and 401 invalidation.
    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    /// Exchange credentials for a bearer token.
    ///
    /// The response body is the raw token text. A 401 here means "wrong
    /// credentials" and is surfaced to the caller without touching the
    /// current session.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let token = self
            .gateway
            .post_text_passthrough("/account/login", &LoginRequest { username, password })
            .await?;
        Ok(token.trim().to_string())
    }

    /// Register a new user.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<RegisterResult, ApiError> {
        self.gateway
            .post_json("/account/register", &LoginRequest { username, password })
            .await
    }

    /// Probe whether the stored credential is still accepted.
    ///
    /// The 401 of this endpoint is interpreted by the session holder, so
    /// it passes through without invalidating.
    pub async fn status(&self) -> Result<bool, ApiError> {
        self.gateway.get_json_passthrough("/account/status").await
    }

    /// Public profile of a user, or of the logged-in user when `None`.
    pub async fn profile(&self, username: Option<&str>) -> Result<UserProfile, ApiError> {
        let path = format!("/account/{}/profile", user_segment(username));
        self.gateway.get_json(&path).await
    }

    /// Private account data of the logged-in user.
    pub async fn my_data(&self) -> Result<UserData, ApiError> {
        self.gateway.get_json("/account/me/data").await
    }

    /// Update account data; moderators can pass another username.
    pub async fn update_data(
        &self,
        username: Option<&str>,
        update: &UserDataUpdate,
    ) -> Result<UserData, ApiError> {
        let path = format!("/account/{}/data", user_segment(username));
        self.gateway.patch_json(&path, update).await
    }

    /// Change a username. The server revokes the session afterwards, so
    /// callers are expected to log out and back in.
    pub async fn change_username(
        &self,
        new_username: &str,
        username: Option<&str>,
    ) -> Result<(), ApiError> {
        let path = format!("/account/{}/username", user_segment(username));
        self.gateway.put_unit(&path, &new_username).await
    }

    /// Change a password. Same re-login expectation as
    /// [`change_username`](Self::change_username).
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        username: Option<&str>,
    ) -> Result<(), ApiError> {
        let path = format!("/account/{}/password", user_segment(username));
        self.gateway
            .put_unit(
                &path,
                &PasswordUpdateRequest {
                    old_password,
                    new_password,
                },
            )
            .await
    }

    /// Follow (`true`) or unfollow (`false`) a user. Returns the target's
    /// updated profile.
    pub async fn set_follow(
        &self,
        target_username: &str,
        follow: bool,
    ) -> Result<UserProfile, ApiError> {
        let path = format!(
            "/account/me/following/{}",
            urlencoding::encode(target_username)
        );
        if follow {
            self.gateway.post_empty(&path).await
        } else {
            self.gateway.delete_json(&path).await
        }
    }

    /// Users following the given user (or the logged-in user).
    pub async fn followers(&self, username: Option<&str>) -> Result<Vec<UserSummary>, ApiError> {
        let path = format!("/account/{}/followers", user_segment(username));
        self.gateway.get_json(&path).await
    }

    /// Users the given user (or the logged-in user) follows.
    pub async fn following(&self, username: Option<&str>) -> Result<Vec<UserSummary>, ApiError> {
        let path = format!("/account/{}/following", user_segment(username));
        self.gateway.get_json(&path).await
    }

    /// Set a user's role. Moderation authority is checked server-side.
    pub async fn update_role(&self, username: &str, role: Role) -> Result<UserProfile, ApiError> {
        let path = format!("/account/{}/role", urlencoding::encode(username));
        self.gateway.put_json(&path, &role).await
    }

    /// Delete a user account. Deleting the logged-in account is followed
    /// by a logout at the session level.
    pub async fn delete_user(&self, username: &str) -> Result<(), ApiError> {
        let path = format!("/account/{}", urlencoding::encode(username));
        self.gateway.delete_unit(&path).await
    }
}
