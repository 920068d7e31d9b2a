//! HTTP transport boundary.
//!
//! The pipeline builds an [`HttpRequest`] and hands it to a [`Transport`].
//! In the browser this is `gloo-net`; tests script responses instead.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

/// Content type forced on JSON and empty bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// One named part of a multipart form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file part.
    #[must_use]
    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        self.parts.push(FormPart {
            name: name.to_owned(),
            filename: Some(filename.to_owned()),
            content_type: Some(content_type.to_owned()),
            bytes,
        });
        self
    }

    /// Append a plain text part.
    #[must_use]
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.push(FormPart {
            name: name.to_owned(),
            filename: None,
            content_type: None,
            bytes: value.as_bytes().to_vec(),
        });
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

impl RequestBody {
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request was sent but no response arrived (offline, CORS, timeout).
    #[error("no response: {0}")]
    NoResponse(String),
    /// The request could not be constructed.
    #[error("{0}")]
    Build(String),
}

/// Sends a prepared request. Single-threaded; futures need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(feature = "csr")]
pub use browser::BrowserTransport;

#[cfg(feature = "csr")]
mod browser {
    use super::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody, Transport, TransportError};

    /// `gloo-net` transport with a per-request timeout.
    #[derive(Clone, Debug)]
    pub struct BrowserTransport {
        timeout_ms: u32,
    }

    impl BrowserTransport {
        #[must_use]
        pub fn new(timeout_ms: u32) -> Self {
            Self { timeout_ms }
        }
    }

    fn form_data(form: &MultipartForm) -> Result<web_sys::FormData, TransportError> {
        let build_err = |e: wasm_bindgen::JsValue| TransportError::Build(format!("{e:?}"));
        let data = web_sys::FormData::new().map_err(build_err)?;
        for part in &form.parts {
            match &part.filename {
                Some(filename) => {
                    let array = js_sys::Array::new();
                    array.push(&js_sys::Uint8Array::from(part.bytes.as_slice()));
                    let options = web_sys::BlobPropertyBag::new();
                    if let Some(content_type) = &part.content_type {
                        options.set_type(content_type);
                    }
                    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&array, &options)
                        .map_err(build_err)?;
                    data.append_with_blob_and_filename(&part.name, &blob, filename)
                        .map_err(build_err)?;
                }
                None => {
                    let value = String::from_utf8_lossy(&part.bytes);
                    data.append_with_str(&part.name, &value).map_err(build_err)?;
                }
            }
        }
        Ok(data)
    }

    impl Transport for BrowserTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let mut builder = match request.method {
                HttpMethod::Get => gloo_net::http::Request::get(&request.url),
                HttpMethod::Post => gloo_net::http::Request::post(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            let prepared = match &request.body {
                RequestBody::Empty => builder.build(),
                RequestBody::Json(value) => builder.body(value.to_string()),
                RequestBody::Multipart(form) => builder.body(form_data(form)?),
            }
            .map_err(|e| TransportError::Build(e.to_string()))?;

            let send = Box::pin(prepared.send());
            let timeout = Box::pin(gloo_timers::future::TimeoutFuture::new(self.timeout_ms));
            let resp = match futures::future::select(send, timeout).await {
                futures::future::Either::Left((result, _)) => {
                    result.map_err(|e| TransportError::NoResponse(e.to_string()))?
                }
                futures::future::Either::Right(((), _)) => {
                    return Err(TransportError::NoResponse(format!(
                        "timeout of {}ms exceeded",
                        self.timeout_ms
                    )));
                }
            };
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Ok(HttpResponse { status, body })
        }
    }
}
