//! HTTP driver implementation
//!
//! This module speaks the W3C WebDriver protocol (with Appium extensions) to a
//! remote endpoint over a blocking HTTP client.

use super::traits::*;
use super::types::*;
use crate::error::RemoteErrorKind;
use crate::locator::By;
use crate::session::SessionConfig;
use crate::Error;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Driver backed by a W3C HTTP endpoint
#[derive(Debug)]
pub struct HttpDriver {
    http: Client,
    base_url: String,
    session_id: String,
    capabilities: Value,
    active: AtomicBool,
}

impl HttpDriver {
    /// Open a new session on the endpoint described by `config`
    pub fn connect(config: &SessionConfig) -> Result<Self, Error> {
        let http = Client::builder().timeout(config.command_timeout).build()?;
        let base_url = config.endpoint.trim_end_matches('/').to_string();

        info!(
            "Creating {} session at {}",
            config.platform.name(),
            base_url
        );

        let body = serde_json::to_value(NewSessionRequest::new(config.capabilities.clone()))?;
        let value = Self::send(http.post(format!("{}/session", base_url)).json(&body))?;
        let created: NewSessionValue = serde_json::from_value(value)?;

        info!("Session {} created", created.session_id);

        Ok(Self {
            http,
            base_url,
            session_id: created.session_id,
            capabilities: created.capabilities,
            active: AtomicBool::new(true),
        })
    }

    /// URL of a session-scoped endpoint
    fn session_url(&self, path: &str) -> String {
        if path.is_empty() {
            format!("{}/session/{}", self.base_url, self.session_id)
        } else {
            format!("{}/session/{}/{}", self.base_url, self.session_id, path)
        }
    }

    fn element_url(&self, element: &ElementId, path: &str) -> String {
        self.session_url(&format!("element/{}/{}", element, path))
    }

    fn call(&self, method: Method, url: String, body: Option<Value>) -> Result<Value, Error> {
        if !self.is_active() {
            return Err(Error::session_closed(self.session_id.clone()));
        }

        debug!("{} {}", method, url);
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let result = Self::send(request);
        if let Err(Error::Remote {
            kind: RemoteErrorKind::InvalidSessionId,
            ..
        }) = &result
        {
            warn!("Session {} no longer exists on the endpoint", self.session_id);
            self.active.store(false, Ordering::SeqCst);
        }
        result
    }

    /// Send a request and unwrap the `value` envelope
    fn send(request: RequestBuilder) -> Result<Value, Error> {
        let response = request.send()?;
        let status = response.status();
        let text = response.text()?;

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            let envelope: W3cResponse<Value> = serde_json::from_str(&text)?;
            return Ok(envelope.value);
        }

        match serde_json::from_str::<W3cResponse<W3cErrorValue>>(&text) {
            Ok(envelope) => {
                debug!("Remote error {}: {}", envelope.value.error, envelope.value.message);
                Err(Error::remote(&envelope.value.error, envelope.value.message))
            }
            Err(_) => Err(Error::remote(
                "unknown error",
                format!("HTTP {}: {}", status, text),
            )),
        }
    }

    fn get_bool(&self, element: &ElementId, path: &str) -> Result<bool, Error> {
        let value = self.call(Method::GET, self.element_url(element, path), None)?;
        value
            .as_bool()
            .ok_or_else(|| Error::internal(format!("Expected boolean from {}, got {}", path, value)))
    }
}

impl RemoteDriver for HttpDriver {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn capabilities(&self) -> &Value {
        &self.capabilities
    }

    fn find_elements(&self, by: &By) -> Result<Vec<ElementId>, Error> {
        let body = serde_json::to_value(FindElementsRequest {
            using: by.strategy.as_w3c(),
            value: &by.value,
        })?;
        let value = self.call(Method::POST, self.session_url("elements"), Some(body))?;

        let elements = value
            .as_array()
            .map(|items| items.iter().filter_map(ElementId::from_value).collect())
            .unwrap_or_default();
        Ok(elements)
    }

    fn is_displayed(&self, element: &ElementId) -> Result<bool, Error> {
        self.get_bool(element, "displayed")
    }

    fn is_enabled(&self, element: &ElementId) -> Result<bool, Error> {
        self.get_bool(element, "enabled")
    }

    fn text(&self, element: &ElementId) -> Result<String, Error> {
        let value = self.call(Method::GET, self.element_url(element, "text"), None)?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn rect(&self, element: &ElementId) -> Result<Rect, Error> {
        let value = self.call(Method::GET, self.element_url(element, "rect"), None)?;
        Ok(serde_json::from_value(value)?)
    }

    fn clear(&self, element: &ElementId) -> Result<(), Error> {
        self.call(Method::POST, self.element_url(element, "clear"), Some(json!({})))?;
        Ok(())
    }

    fn click(&self, element: &ElementId) -> Result<(), Error> {
        self.call(Method::POST, self.element_url(element, "click"), Some(json!({})))?;
        Ok(())
    }

    fn send_text(&self, element: &ElementId, text: &str) -> Result<(), Error> {
        let body = serde_json::to_value(SendTextRequest { text })?;
        self.call(Method::POST, self.element_url(element, "value"), Some(body))?;
        Ok(())
    }

    fn execute(&self, command: &str, params: Value) -> Result<Value, Error> {
        let body = serde_json::to_value(ExecuteRequest {
            script: command,
            args: vec![params],
        })?;
        self.call(Method::POST, self.session_url("execute/sync"), Some(body))
    }

    fn screenshot(&self) -> Result<Vec<u8>, Error> {
        let value = self.call(Method::GET, self.session_url("screenshot"), None)?;
        let encoded = value
            .as_str()
            .ok_or_else(|| Error::internal("Screenshot response is not a string"))?;
        BASE64
            .decode(encoded)
            .map_err(|e| Error::internal(format!("Invalid screenshot data: {}", e)))
    }

    fn close(&self) -> Result<(), Error> {
        if !self.active.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        info!("Deleting session {}", self.session_id);
        let request = self.http.delete(self.session_url(""));
        Self::send(request)?;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Factory that opens [`HttpDriver`] sessions
#[derive(Debug, Clone, Default)]
pub struct HttpDriverFactory;

impl DriverFactory for HttpDriverFactory {
    fn open(&self, config: &SessionConfig) -> Result<Arc<dyn RemoteDriver>, Error> {
        Ok(Arc::new(HttpDriver::connect(config)?))
    }
}

/// Whether the endpoint at `base_url` answers `GET /status`
pub fn endpoint_ready(base_url: &str, timeout: Duration) -> bool {
    let client = match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            warn!("Failed to build status client: {}", e);
            return false;
        }
    };

    match client
        .get(format!("{}/status", base_url.trim_end_matches('/')))
        .send()
    {
        Ok(response) => response.status().is_success(),
        Err(e) => {
            debug!("Endpoint not ready: {}", e);
            false
        }
    }
}
