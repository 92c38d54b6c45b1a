//! HTTP transport boundary.
//!
//! Requests and responses are plain data so the connection can be driven by
//! any `Transport`; the default one executes them with a blocking reqwest
//! client. A transport only reports what the server said: interpreting the
//! status code is the connection's job.

use std::fmt;

use url::Url;

use crate::error::{Error, Result};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
  Get,
  Post,
  Put,
  Delete,
}

impl HttpMethod {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Get => "GET",
      Self::Post => "POST",
      Self::Put => "PUT",
      Self::Delete => "DELETE",
    }
  }
}

impl fmt::Display for HttpMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Request payload. Everything else travels in the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
  /// A single file sent as a multipart upload under the `file` part.
  File { filename: String, bytes: Vec<u8> },
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
  pub method: HttpMethod,
  pub url: Url,
  pub body: Option<RequestBody>,
}

impl HttpRequest {
  /// Value of a query parameter, if present.
  pub fn query_param(&self, name: &str) -> Option<String> {
    self
      .url
      .query_pairs()
      .find(|(k, _)| k == name)
      .map(|(_, v)| v.into_owned())
  }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
  pub status: u16,
  pub body: Vec<u8>,
}

impl HttpResponse {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

/// Executes one HTTP request per call.
pub trait Transport: Send + Sync {
  fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Transport backed by `reqwest::blocking::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
  client: reqwest::blocking::Client,
}

impl ReqwestTransport {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_client(client: reqwest::blocking::Client) -> Self {
    Self { client }
  }
}

impl Transport for ReqwestTransport {
  fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
    let method = match request.method {
      HttpMethod::Get => reqwest::Method::GET,
      HttpMethod::Post => reqwest::Method::POST,
      HttpMethod::Put => reqwest::Method::PUT,
      HttpMethod::Delete => reqwest::Method::DELETE,
    };

    let mut builder = self.client.request(method, request.url);
    if let Some(RequestBody::File { filename, bytes }) = request.body {
      let part = reqwest::blocking::multipart::Part::bytes(bytes).file_name(filename);
      builder = builder.multipart(reqwest::blocking::multipart::Form::new().part("file", part));
    }

    let response = builder
      .send()
      .map_err(|e| Error::Transport(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response
      .bytes()
      .map_err(|e| Error::Transport(format!("Failed to read response body: {}", e)))?;

    Ok(HttpResponse {
      status,
      body: body.to_vec(),
    })
  }
}
