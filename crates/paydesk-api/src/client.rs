// Payroll API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer injection and
// `{ data: ... }` envelope unwrapping. Resource endpoints live in
// `crate::resources` as inherent methods so this module stays focused
// on transport mechanics.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use bytes::Bytes;
use reqwest::multipart::Form;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Error body shape: `{"message": "..."}` alongside a non-2xx status.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Async client for the payroll REST API.
///
/// Every method performs exactly one HTTP request and returns the
/// unwrapped `data` payload. No retries, no caching.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    /// Bearer credential attached to authenticated calls.
    bearer: ArcSwapOption<SecretString>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` using the given transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        Ok(Self {
            http,
            base_url,
            bearer: ArcSwapOption::empty(),
        })
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Credential management ────────────────────────────────────────

    /// Attach a bearer credential to all subsequent authenticated calls.
    pub fn set_bearer(&self, token: SecretString) {
        debug!("storing bearer credential");
        self.bearer.store(Some(Arc::new(token)));
    }

    /// Drop the bearer credential.
    pub fn clear_bearer(&self) {
        self.bearer.store(None);
    }

    pub fn has_bearer(&self) -> bool {
        self.bearer.load().is_some()
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.bearer.load_full() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a path (e.g. `"/employes/12/activer"`) onto the base URL,
    /// keeping any path prefix the base URL carries.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, Error> {
        let data = self.get_value(path, query).await?;
        decode(data)
    }

    pub(crate) async fn get_value(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={query:?}");

        let builder = self.authorize(self.http.get(url).query(query));
        self.send(builder).await
    }

    /// Like [`get_value`](Self::get_value) but leaves any `data` field in
    /// place, for payloads whose own shape uses that key.
    pub(crate) async fn get_raw(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={query:?}");

        let builder = self.authorize(self.http.get(url).query(query));
        self.send_raw(builder).await
    }

    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Bytes, Error> {
        let url = self.url(path)?;
        debug!("GET {url} (binary)");

        let resp = self.authorize(self.http.get(url)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(parse_error(status, resp).await);
        }
        Ok(resp.bytes().await?)
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let builder = self.authorize(self.http.post(url).json(body));
        decode(self.send(builder).await?)
    }

    /// POST without authentication (login).
    pub(crate) async fn post_anonymous<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("POST {url} (anonymous)");

        self.send(self.http.post(url).json(body)).await
    }

    pub(crate) async fn post_empty(&self, path: &str) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let builder = self.authorize(self.http.post(url));
        self.send(builder).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url} (multipart)");

        let builder = self.authorize(self.http.post(url).multipart(form));
        decode(self.send(builder).await?)
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let builder = self.authorize(self.http.put(url).json(body));
        decode(self.send(builder).await?)
    }

    pub(crate) async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url} (multipart)");

        let builder = self.authorize(self.http.put(url).multipart(form));
        decode(self.send(builder).await?)
    }

    pub(crate) async fn patch<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PATCH {url}");

        let builder = self.authorize(self.http.patch(url));
        decode(self.send(builder).await?)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let builder = self.authorize(self.http.delete(url));
        self.send(builder).await.map(|_| ())
    }

    // ── Response handling ────────────────────────────────────────────

    /// Send the request and return the unwrapped envelope payload.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<Value, Error> {
        self.send_raw(builder).await.map(unwrap_envelope)
    }

    /// Send the request and return the parsed body untouched.
    async fn send_raw(&self, builder: reqwest::RequestBuilder) -> Result<Value, Error> {
        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            trace!(%status, "empty response body");
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview = body_preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}

const PREVIEW_CHARS: usize = 200;

/// First `PREVIEW_CHARS` characters of a body, cut on a char boundary.
fn body_preview(body: &str) -> &str {
    body.char_indices()
        .nth(PREVIEW_CHARS)
        .map_or(body, |(end, _)| &body[..end])
}

/// Strip the `{ data: ... }` envelope. Bodies without a non-null `data`
/// field are returned as-is.
pub(crate) fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("data").is_some_and(|d| !d.is_null()) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Deserialize an unwrapped payload into a typed record. An empty body
/// decodes like `{}`, so mutations answering 204 still yield a record.
pub(crate) fn decode<T: DeserializeOwned>(data: Value) -> Result<T, Error> {
    let data = if data.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        data
    };
    serde_json::from_value(data.clone()).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: data.to_string(),
    })
}

async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&raw)
        .ok()
        .and_then(|body| body.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| match status.canonical_reason() {
            Some(reason) => format!("HTTP {}: {reason}", status.as_u16()),
            None => format!("HTTP {}", status.as_u16()),
        });

    debug!(status = status.as_u16(), %message, "request rejected");
    Error::Request {
        status: Some(status.as_u16()),
        message,
    }
}
