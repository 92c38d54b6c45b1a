//! Authenticated handle on the Trello REST API.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::{Config, Credentials, DEFAULT_BASE_URL};
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::transport::{HttpMethod, HttpRequest, RequestBody, ReqwestTransport, Transport};
use crate::trello::{Board, Card, Checklist, List, Member, Notification, Organization, Token};

/// Query parameters, sent in order.
pub type Params<'a> = &'a [(&'a str, &'a str)];

/// Shared connection to Trello.
///
/// Cloning is cheap; every entity keeps a clone of the connection that
/// created it. The connection holds no per-request state.
#[derive(Clone)]
pub struct Connection {
  inner: Arc<Inner>,
}

struct Inner {
  credentials: Credentials,
  base_url: String,
  transport: Box<dyn Transport>,
}

impl Connection {
  /// Connection to the public API over the default HTTP transport.
  pub fn new(credentials: Credentials) -> Self {
    Self::with_transport(credentials, ReqwestTransport::new())
  }

  pub fn with_transport(credentials: Credentials, transport: impl Transport + 'static) -> Self {
    Self::with_base_url(credentials, transport, DEFAULT_BASE_URL)
  }

  pub fn with_base_url(
    credentials: Credentials,
    transport: impl Transport + 'static,
    base_url: &str,
  ) -> Self {
    Self {
      inner: Arc::new(Inner {
        credentials,
        base_url: base_url.trim_end_matches('/').to_string(),
        transport: Box::new(transport),
      }),
    }
  }

  /// Build a connection from a loaded config, reading the token from the environment.
  pub fn from_config(config: &Config) -> Result<Self> {
    Ok(Self::with_base_url(
      config.credentials()?,
      ReqwestTransport::new(),
      &config.trello.base_url,
    ))
  }

  pub fn credentials(&self) -> &Credentials {
    &self.inner.credentials
  }

  pub fn base_url(&self) -> &str {
    &self.inner.base_url
  }

  /// Full request URL for `path` with `params` and the credential pair in the query.
  pub fn url(&self, path: &str, params: Params<'_>) -> Result<Url> {
    let mut url = if path.starts_with('/') {
      Url::parse(&format!("{}{}", self.inner.base_url, path))?
    } else {
      Url::parse(&format!("{}/{}", self.inner.base_url, path))?
    };

    url
      .query_pairs_mut()
      .extend_pairs(params.iter().copied())
      .append_pair("key", &self.inner.credentials.api_key)
      .append_pair("token", &self.inner.credentials.oauth_token);

    Ok(url)
  }

  /// Send one request and return the raw response body.
  ///
  /// Any non-2xx status becomes `Error::Remote`.
  pub fn request(
    &self,
    method: HttpMethod,
    path: &str,
    params: Params<'_>,
    body: Option<RequestBody>,
  ) -> Result<Vec<u8>> {
    let url = self.url(path, params)?;
    debug!(%method, path = url.path(), "Sending request");

    let response = self.inner.transport.send(HttpRequest { method, url, body })?;

    if !response.is_success() {
      let body = String::from_utf8_lossy(&response.body).into_owned();
      warn!(%method, path, status = response.status, "Remote returned an error");
      return Err(Error::Remote {
        status: response.status,
        body,
      });
    }

    Ok(response.body)
  }

  pub fn get(&self, path: &str, params: Params<'_>) -> Result<Vec<u8>> {
    self.request(HttpMethod::Get, path, params, None)
  }

  pub fn post(&self, path: &str, params: Params<'_>, body: Option<RequestBody>) -> Result<Vec<u8>> {
    self.request(HttpMethod::Post, path, params, body)
  }

  pub fn put(&self, path: &str, params: Params<'_>) -> Result<Vec<u8>> {
    self.request(HttpMethod::Put, path, params, None)
  }

  pub fn delete(&self, path: &str, params: Params<'_>) -> Result<Vec<u8>> {
    self.request(HttpMethod::Delete, path, params, None)
  }

  /// GET `path` and parse the body as JSON.
  pub fn get_json(&self, path: &str) -> Result<Value> {
    let body = self.get(path, &[])?;
    Ok(serde_json::from_slice(&body)?)
  }

  /// POST `path` and parse the body as JSON.
  pub fn post_json(&self, path: &str, params: Params<'_>, body: Option<RequestBody>) -> Result<Value> {
    let body = self.post(path, params, body)?;
    Ok(serde_json::from_slice(&body)?)
  }

  /// Unhydrated entity of any type. Performs no I/O.
  pub fn entity<T: Entity>(&self, id: &str) -> T {
    T::lazy(self.clone(), id)
  }

  pub fn board(&self, id: &str) -> Board {
    self.entity(id)
  }

  pub fn card(&self, id: &str) -> Card {
    self.entity(id)
  }

  pub fn list(&self, id: &str) -> List {
    self.entity(id)
  }

  pub fn checklist(&self, id: &str) -> Checklist {
    self.entity(id)
  }

  pub fn member(&self, id: &str) -> Member {
    self.entity(id)
  }

  pub fn notification(&self, id: &str) -> Notification {
    self.entity(id)
  }

  pub fn organization(&self, id: &str) -> Organization {
    self.entity(id)
  }

  pub fn token(&self, token: &str) -> Token {
    self.entity(token)
  }

  /// The member whose credentials this connection uses.
  pub fn me(&self) -> Member {
    self.member("me")
  }
}

impl fmt::Debug for Connection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Connection")
      .field("base_url", &self.inner.base_url)
      .field("credentials", &self.inner.credentials)
      .finish_non_exhaustive()
  }
}
