//! Authentication endpoints.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns the pipeline's `ApiError` untouched; recovery policy
//! (invalidate, retry, swallow) belongs to the session.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::rc::Rc;

use super::error::ApiError;
use super::pipeline::RequestPipeline;
use super::transport::Transport;
use super::types::{CurrentUser, LoginGrant, LoginRequest, RegisterRequest, UserInfo};

pub(crate) const LOGIN_PATH: &str = "/auth/login";
pub(crate) const REGISTER_PATH: &str = "/auth/register";
pub(crate) const LOGOUT_PATH: &str = "/auth/logout";
pub(crate) const CURRENT_USER_PATH: &str = "/auth/info";

/// Server-side authentication operations consumed by the session.
#[allow(async_fn_in_trait)]
pub trait AuthApi {
    async fn login(&self, username: &str, password: &str) -> Result<LoginGrant, ApiError>;
    async fn register(&self, username: &str, password: &str, nickname: Option<&str>) -> Result<UserInfo, ApiError>;
    /// Revoke the current credential server-side.
    async fn logout(&self) -> Result<(), ApiError>;
    async fn current_user(&self) -> Result<CurrentUser, ApiError>;
}

/// [`AuthApi`] over the shared request pipeline.
pub struct HttpAuthApi<T> {
    pipeline: Rc<RequestPipeline<T>>,
}

impl<T> HttpAuthApi<T> {
    pub fn new(pipeline: Rc<RequestPipeline<T>>) -> Self {
        Self { pipeline }
    }
}

impl<T: Transport> AuthApi for HttpAuthApi<T> {
    async fn login(&self, username: &str, password: &str) -> Result<LoginGrant, ApiError> {
        self.pipeline.post(LOGIN_PATH, &LoginRequest { username, password }).await
    }

    async fn register(&self, username: &str, password: &str, nickname: Option<&str>) -> Result<UserInfo, ApiError> {
        let nickname = nickname.map(str::trim).filter(|n| !n.is_empty());
        self.pipeline
            .post(REGISTER_PATH, &RegisterRequest { username, password, nickname })
            .await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.pipeline.post_empty(LOGOUT_PATH).await
    }

    async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        self.pipeline.get(CURRENT_USER_PATH).await
    }
}
