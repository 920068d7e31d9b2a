//! Request pipeline wrapped around every outbound API call.
//!
//! ARCHITECTURE
//! ============
//! Outbound: attach the current credential header and the JSON content type
//! (except for multipart bodies, whose boundary header the transport sets).
//! Inbound: unwrap the `{code, message, data}` envelope, or classify the
//! transport failure, surface it once through the notifier, and reject.
//!
//! A 401 additionally emits [`CredentialRejected`]; the session decides what
//! invalidation means. The pipeline holds no session internals.

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;

use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::envelope::unwrap_body;
use super::error::ApiError;
use super::events::{CredentialRejected, CredentialRejections};
use super::transport::{
    HttpMethod, HttpRequest, JSON_CONTENT_TYPE, MultipartForm, RequestBody, Transport, TransportError,
};
use crate::config::ClientConfig;
use crate::util::notify::Notifier;

/// Read access to the credential presented on outbound requests.
pub trait CredentialSource {
    fn credential(&self) -> Option<String>;
}

pub struct RequestPipeline<T> {
    transport: T,
    config: ClientConfig,
    credentials: Rc<dyn CredentialSource>,
    notifier: Rc<dyn Notifier>,
    rejections: Rc<CredentialRejections>,
}

impl<T: Transport> RequestPipeline<T> {
    pub fn new(
        transport: T,
        config: ClientConfig,
        credentials: Rc<dyn CredentialSource>,
        notifier: Rc<dyn Notifier>,
        rejections: Rc<CredentialRejections>,
    ) -> Self {
        Self { transport, config, credentials, notifier, rejections }
    }

    /// Hub that receives one event per 401 response.
    #[must_use]
    pub fn rejections(&self) -> &Rc<CredentialRejections> {
        &self.rejections
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.execute(HttpMethod::Get, path, RequestBody::Empty).await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = match serde_json::to_value(body) {
            Ok(value) => RequestBody::Json(value),
            Err(e) => return Err(self.fail(ApiError::request(e.to_string()), &self.config.api_url(path), false)),
        };
        self.execute(HttpMethod::Post, path, body).await
    }

    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.execute(HttpMethod::Post, path, RequestBody::Empty).await
    }

    pub async fn post_multipart<R: DeserializeOwned>(&self, path: &str, form: MultipartForm) -> Result<R, ApiError> {
        self.execute(HttpMethod::Post, path, RequestBody::Multipart(form)).await
    }

    /// Send one request through both interceptor stages.
    ///
    /// # Errors
    ///
    /// Business errors for non-success envelopes, transport errors otherwise.
    pub async fn execute<R: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: RequestBody,
    ) -> Result<R, ApiError> {
        let request = self.prepare(method, path, body);
        let url = request.url.clone();
        let had_credential = request.header(&self.config.credential_header).is_some();

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(TransportError::NoResponse(detail)) => {
                return Err(self.fail(ApiError::Network { detail }, &url, had_credential));
            }
            Err(TransportError::Build(message)) => {
                return Err(self.fail(ApiError::request(message), &url, had_credential));
            }
        };

        if !response.ok() {
            return Err(self.fail(ApiError::from_status(response.status), &url, had_credential));
        }

        unwrap_body(&response.body).inspect_err(|err| {
            if let ApiError::Decode(detail) = err {
                log::warn!("undecodable response from {url}: {detail}");
            }
        })
    }

    pub(crate) fn prepare(&self, method: HttpMethod, path: &str, body: RequestBody) -> HttpRequest {
        let mut headers = Vec::new();
        if !body.is_multipart() {
            headers.push(("Content-Type".to_owned(), JSON_CONTENT_TYPE.to_owned()));
        }
        if let Some(token) = self.credentials.credential().filter(|t| !t.is_empty()) {
            headers.push((self.config.credential_header.clone(), token));
        }
        HttpRequest { method, url: self.config.api_url(path), headers, body }
    }

    /// Surface a transport failure once and hand it back for rejection.
    fn fail(&self, err: ApiError, url: &str, had_credential: bool) -> ApiError {
        log::warn!("request to {url} failed: {err:?}");
        if err.is_unauthorized() {
            self.rejections.emit(&CredentialRejected { url: url.to_owned(), had_credential });
        }
        self.notifier.error(&err.to_string());
        err
    }
}
