use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::webdriver::browser::{Browser, BrowserLauncher};
use crate::webdriver::session::Session;

/// Key under which W3C drivers return element handles.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

const COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct WireError {
    error: String,
    #[serde(default)]
    message: String,
}

/// Sends one WebDriver command and unwraps the `value` member of the reply.
pub(crate) async fn command(
    http: &Client,
    method: Method,
    url: &str,
    body: Option<JsonValue>,
) -> Result<JsonValue> {
    tracing::debug!(%method, url, "webdriver command");
    let mut request = http.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    let mut reply: JsonValue = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(_) if !status.is_success() => {
            return Err(Error::WebDriver {
                error: "unknown error".to_string(),
                message: format!("HTTP {}: {}", status, text),
            })
        }
        Err(e) => return Err(e.into()),
    };
    let value = reply
        .get_mut("value")
        .map(JsonValue::take)
        .unwrap_or(JsonValue::Null);

    if !status.is_success() {
        return Err(match serde_json::from_value::<WireError>(value) {
            Ok(e) => Error::WebDriver {
                error: e.error,
                message: e.message,
            },
            Err(_) => Error::WebDriver {
                error: "unknown error".to_string(),
                message: format!("HTTP {}: {}", status, text),
            },
        });
    }
    Ok(value)
}

/// Chrome session settings sent as `goog:chromeOptions`.
#[derive(Debug, Clone)]
pub struct ChromeOptions {
    pub headless: bool,
    pub extra_args: Vec<String>,
}

impl Default for ChromeOptions {
    fn default() -> Self {
        Self {
            headless: true,
            extra_args: Vec::new(),
        }
    }
}

impl ChromeOptions {
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--window-size=1920,1080".to_string(),
        ];
        if self.headless {
            args.push("--headless=new".to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }

    pub fn capabilities(&self) -> JsonValue {
        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": self.args() }
                }
            }
        })
    }
}

/// Entry point to a WebDriver server such as chromedriver.
#[derive(Clone)]
pub struct WebDriverClient {
    http: Client,
    base_url: String,
    options: ChromeOptions,
}

impl WebDriverClient {
    pub fn new(base_url: &str, options: ChromeOptions) -> Result<Self> {
        let http = Client::builder().timeout(COMMAND_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            options,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.webdriver_url,
            ChromeOptions {
                headless: config.headless,
                extra_args: Vec::new(),
            },
        )
    }

    pub async fn new_session(&self) -> Result<Session> {
        let url = format!("{}/session", self.base_url);
        let value = command(
            &self.http,
            Method::POST,
            &url,
            Some(self.options.capabilities()),
        )
        .await?;
        let id = value
            .get("sessionId")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| Error::WebDriver {
                error: "session not created".to_string(),
                message: format!("no sessionId in reply: {}", value),
            })?
            .to_string();

        tracing::info!(session = %id, headless = self.options.headless, "browser session started");
        let session = Session::new(self.http.clone(), &self.base_url, id);
        if !self.options.headless {
            if let Err(e) = session.maximize().await {
                tracing::warn!(error = %e, "could not maximize browser window");
            }
        }
        Ok(session)
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverClient {
    async fn launch(&self) -> Result<Box<dyn Browser>> {
        Ok(Box::new(self.new_session().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_flag_controls_args() {
        let headed = ChromeOptions {
            headless: false,
            extra_args: vec!["--lang=es".into()],
        };
        let args = headed.args();
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("--headless")));
        assert_eq!(args.last().map(String::as_str), Some("--lang=es"));

        let caps = ChromeOptions::default().capabilities();
        let args = &caps["capabilities"]["alwaysMatch"]["goog:chromeOptions"]["args"];
        assert!(args
            .as_array()
            .unwrap()
            .iter()
            .any(|a| a == "--headless=new"));
    }
}
