//! Native implementations of the `platform` seams: HTTP over `reqwest`,
//! a navigator that only reports, and a `tokio` clock.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use std::time::Duration;

use platform::{ApiError, FormPart, HttpRequest, HttpResponse, Method, Navigator, RequestBody, Timer, Transport};

/// `reqwest` client with the configured per-request timeout.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// The TLS backend failed to initialize.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

fn classify(err: reqwest::Error) -> ApiError {
    if err.is_timeout() { ApiError::Timeout } else { ApiError::Network(err.to_string()) }
}

fn method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn form(parts: Vec<FormPart>) -> Result<reqwest::multipart::Form, ApiError> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File { name, file_name, content_type, bytes } => {
                let file = reqwest::multipart::Part::bytes(bytes).file_name(file_name).mime_str(&content_type).map_err(classify)?;
                form.part(name, file)
            }
        };
    }
    Ok(form)
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.client.request(method(request.method), &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(parts) => builder.multipart(form(parts)?),
        };

        tracing::debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;
        tracing::debug!(status, "response received");
        Ok(HttpResponse::new(status, body))
    }
}

/// There is nothing to navigate in a terminal: the "current path" is fixed
/// per command and a redirect becomes a hint on stderr.
#[derive(Clone, Copy, Debug)]
pub struct TerminalNavigator {
    path: &'static str,
}

impl TerminalNavigator {
    pub fn at(path: &'static str) -> Self {
        Self { path }
    }
}

impl Navigator for TerminalNavigator {
    fn current_path(&self) -> String {
        self.path.to_owned()
    }

    fn redirect(&self, path: &str) {
        tracing::warn!(target_path = path, "session expired; sign in again with `lll signin`");
    }
}

/// Monotonic clock starting at construction.
#[derive(Clone, Copy, Debug)]
pub struct TokioTimer {
    origin: tokio::time::Instant,
}

impl Default for TokioTimer {
    fn default() -> Self {
        Self { origin: tokio::time::Instant::now() }
    }
}

impl Timer for TokioTimer {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
