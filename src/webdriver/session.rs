use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::{json, Value as JsonValue};

use crate::error::{Error, Result};
use crate::webdriver::browser::{Browser, ElementRef};
use crate::webdriver::client::{command, ELEMENT_KEY};
use crate::webdriver::locator::Locator;

/// One live WebDriver session.
pub struct Session {
    http: Client,
    id: String,
    url: String,
}

impl Session {
    pub(crate) fn new(http: Client, base_url: &str, id: String) -> Self {
        let url = format!("{}/session/{}", base_url, id);
        Self { http, id, url }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    async fn get(&self, path: &str) -> Result<JsonValue> {
        command(&self.http, Method::GET, &format!("{}{}", self.url, path), None).await
    }

    async fn post(&self, path: &str, body: JsonValue) -> Result<JsonValue> {
        command(
            &self.http,
            Method::POST,
            &format!("{}{}", self.url, path),
            Some(body),
        )
        .await
    }

    pub async fn maximize(&self) -> Result<()> {
        self.post("/window/maximize", json!({})).await?;
        Ok(())
    }

    async fn get_string(&self, path: &str) -> Result<String> {
        let value = self.get(path).await?;
        match value {
            JsonValue::String(s) => Ok(s),
            other => Err(unexpected(path, &other)),
        }
    }

    async fn get_bool(&self, path: &str) -> Result<bool> {
        let value = self.get(path).await?;
        value.as_bool().ok_or_else(|| unexpected(path, &value))
    }
}

fn unexpected(path: &str, value: &JsonValue) -> Error {
    Error::WebDriver {
        error: "unexpected reply".to_string(),
        message: format!("{} returned {}", path, value),
    }
}

fn element_ref(value: &JsonValue) -> Result<ElementRef> {
    value
        .get(ELEMENT_KEY)
        .and_then(JsonValue::as_str)
        .map(|id| ElementRef(id.to_string()))
        .ok_or_else(|| unexpected("/elements", value))
}

#[async_trait]
impl Browser for Session {
    async fn goto(&self, url: &str) -> Result<()> {
        self.post("/url", json!({ "url": url })).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        self.get_string("/url").await
    }

    async fn page_source(&self) -> Result<String> {
        self.get_string("/source").await
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
        let value = self.post("/elements", locator.to_wire()).await?;
        match value {
            JsonValue::Array(items) => items.iter().map(element_ref).collect(),
            other => Err(unexpected("/elements", &other)),
        }
    }

    async fn type_text(&self, element: &ElementRef, text: &str) -> Result<()> {
        self.post(
            &format!("/element/{}/value", element.0),
            json!({ "text": text }),
        )
        .await?;
        Ok(())
    }

    async fn click(&self, element: &ElementRef) -> Result<()> {
        self.post(&format!("/element/{}/click", element.0), json!({}))
            .await?;
        Ok(())
    }

    async fn text(&self, element: &ElementRef) -> Result<String> {
        self.get_string(&format!("/element/{}/text", element.0)).await
    }

    async fn is_interactable(&self, element: &ElementRef) -> Result<bool> {
        let displayed = self
            .get_bool(&format!("/element/{}/displayed", element.0))
            .await?;
        if !displayed {
            return Ok(false);
        }
        self.get_bool(&format!("/element/{}/enabled", element.0))
            .await
    }

    async fn quit(&self) -> Result<()> {
        command(&self.http, Method::DELETE, &self.url, None).await?;
        tracing::info!(session = %self.id, "browser session closed");
        Ok(())
    }
}
