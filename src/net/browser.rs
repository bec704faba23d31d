//! `platform` seams backed by browser APIs.
//!
//! Client-side (csr): real `fetch`, `localStorage` and `window.location`.
//! Native builds: inert stubs so the crate still builds and unit tests run
//! without a browser.
//!
//! ERROR HANDLING
//! ==============
//! Fetch failures become `ApiError::Network`, a fetch that outlives the
//! configured timeout becomes `ApiError::Timeout`. Storage and navigation
//! failures are logged and swallowed; the app keeps running in memory.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "browser_test.rs"]
mod browser_test;

use std::time::Duration;

use platform::{ApiClient, ApiError, HttpRequest, HttpResponse, KeyValueStore, Navigator, SessionStore, Timer, Transport, WalletContext};

pub type WebApi = ApiClient<FetchTransport, BrowserStorage, BrowserNavigator>;
pub type WebSession = SessionStore<FetchTransport, BrowserStorage, BrowserNavigator>;
pub type WebWallet = WalletContext<FetchTransport, BrowserStorage, BrowserNavigator>;

/// Milliseconds for `gloo-timers`, saturating at `u32::MAX`.
fn timeout_millis(timeout: Duration) -> u32 {
    u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX)
}

/// HTTP over the browser `fetch` API with a client-side timeout.
#[derive(Clone, Debug)]
pub struct FetchTransport {
    timeout: Duration,
}

impl FetchTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        #[cfg(feature = "csr")]
        {
            use futures::future::{Either, select};

            let fetch = std::pin::pin!(fetch(request));
            let deadline = std::pin::pin!(gloo_timers::future::TimeoutFuture::new(timeout_millis(self.timeout)));
            match select(fetch, deadline).await {
                Either::Left((result, _)) => result,
                Either::Right(((), _)) => Err(ApiError::Timeout),
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (request, timeout_millis(self.timeout));
            Err(ApiError::Network("fetch is only available in the browser".to_owned()))
        }
    }
}

#[cfg(feature = "csr")]
async fn fetch(request: HttpRequest) -> Result<HttpResponse, ApiError> {
    use gloo_net::http::{Method as HttpMethod, RequestBuilder};
    use platform::{Method, RequestBody};

    let method = match request.method {
        Method::Get => HttpMethod::GET,
        Method::Post => HttpMethod::POST,
        Method::Put => HttpMethod::PUT,
        Method::Delete => HttpMethod::DELETE,
    };
    let mut builder = RequestBuilder::new(&request.url).method(method);
    if !request.query.is_empty() {
        builder = builder.query(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }

    let network = |e: gloo_net::Error| ApiError::Network(e.to_string());
    let built = match request.body {
        RequestBody::Empty => builder.build().map_err(network)?,
        RequestBody::Json(value) => builder
            .header("Content-Type", "application/json")
            .body(value.to_string())
            .map_err(network)?,
        RequestBody::Multipart(parts) => builder.body(form_data(&parts)?).map_err(network)?,
    };

    let response = built.send().await.map_err(network)?;
    let status = response.status();
    let body = response.text().await.map_err(network)?;
    Ok(HttpResponse::new(status, body))
}

#[cfg(feature = "csr")]
fn form_data(parts: &[platform::FormPart]) -> Result<web_sys::FormData, ApiError> {
    use platform::FormPart;

    let js = |e: wasm_bindgen::JsValue| ApiError::Network(format!("{e:?}"));
    let form = web_sys::FormData::new().map_err(js)?;
    for part in parts {
        match part {
            FormPart::Text { name, value } => form.append_with_str(name, value).map_err(js)?,
            FormPart::File { name, file_name, content_type, bytes } => {
                let chunks = js_sys::Array::new();
                chunks.push(&js_sys::Uint8Array::from(bytes.as_slice()));
                let options = web_sys::BlobPropertyBag::new();
                options.set_type(content_type);
                let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&chunks, &options).map_err(js)?;
                form.append_with_blob_and_filename(name, &blob, file_name).map_err(js)?;
            }
        }
    }
    Ok(form)
}

/// `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            local_storage()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            None
        }
    }

    fn set(&self, key: &str, value: &str) {
        #[cfg(feature = "csr")]
        {
            if let Some(storage) = local_storage() {
                if storage.set_item(key, value).is_err() {
                    log::warn!("localStorage write failed for {key}");
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (key, value);
        }
    }

    fn remove(&self, key: &str) {
        #[cfg(feature = "csr")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.remove_item(key);
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
        }
    }
}

/// `window.location`. Redirects are full page loads so every context
/// restarts from the cleared credentials.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn current_path(&self) -> String {
        #[cfg(feature = "csr")]
        {
            web_sys::window().and_then(|w| w.location().pathname().ok()).unwrap_or_else(|| "/".to_owned())
        }
        #[cfg(not(feature = "csr"))]
        {
            "/".to_owned()
        }
    }

    fn redirect(&self, path: &str) {
        #[cfg(feature = "csr")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(path);
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = path;
        }
    }
}

/// `Date.now()` clock and `setTimeout` sleeps.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    fn now(&self) -> Duration {
        #[cfg(feature = "csr")]
        {
            Duration::from_secs_f64(js_sys::Date::now().max(0.0) / 1000.0)
        }
        #[cfg(not(feature = "csr"))]
        {
            Duration::ZERO
        }
    }

    async fn sleep(&self, duration: Duration) {
        #[cfg(feature = "csr")]
        {
            gloo_timers::future::sleep(duration).await;
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = duration;
        }
    }
}
