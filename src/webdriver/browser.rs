use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::webdriver::locator::Locator;

/// Driver-assigned handle of an element, stable for the element's lifetime in the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef(pub String);

/// The browser operations the verifier needs.
///
/// `find_all` returns an empty list when nothing matches; it never fails for absence.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;
    async fn current_url(&self) -> Result<String>;
    async fn page_source(&self) -> Result<String>;
    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>>;
    async fn type_text(&self, element: &ElementRef, text: &str) -> Result<()>;
    async fn click(&self, element: &ElementRef) -> Result<()>;
    async fn text(&self, element: &ElementRef) -> Result<String>;
    /// Displayed and enabled.
    async fn is_interactable(&self, element: &ElementRef) -> Result<bool>;
    async fn quit(&self) -> Result<()>;
}

/// Opens fresh browser sessions, one per scenario.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn Browser>>;
}

const PAGE_EXCERPT_CHARS: usize = 4000;

/// Where the browser was and what it showed when a scenario failed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    pub current_url: Option<String>,
    pub page_source: Option<String>,
}

impl Diagnostics {
    /// Best effort: a failing driver yields empty fields, never an error.
    pub async fn capture(browser: &dyn Browser) -> Self {
        let current_url = match browser.current_url().await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(error = %e, "could not read current URL for diagnostics");
                None
            }
        };
        let page_source = match browser.page_source().await {
            Ok(source) => Some(source),
            Err(e) => {
                tracing::warn!(error = %e, "could not read page source for diagnostics");
                None
            }
        };
        Self {
            current_url,
            page_source,
        }
    }

    pub fn page_excerpt(&self) -> Option<String> {
        self.page_source
            .as_ref()
            .map(|s| s.chars().take(PAGE_EXCERPT_CHARS).collect())
    }
}
