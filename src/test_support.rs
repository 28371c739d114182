//! In-memory browser for unit tests. Elements are matched by their CSS selector;
//! clicks can be scripted to change the page.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::pages::toast;
use crate::webdriver::{Browser, BrowserLauncher, ElementRef, Locator};

type Reaction = Box<dyn FnMut(&mut FakeState) + Send>;

#[derive(Default)]
pub struct FakeState {
    pub url: String,
    pub source: String,
    pub typed: Vec<(ElementRef, String)>,
    pub clicked: Vec<ElementRef>,
    pub quit: bool,
    elements: Vec<(String, ElementRef)>,
    texts: HashMap<ElementRef, String>,
    reactions: HashMap<ElementRef, Reaction>,
    next_id: u32,
}

impl FakeState {
    pub fn add(&mut self, locator: &Locator, text: &str) -> ElementRef {
        self.next_id += 1;
        let element = ElementRef(format!("el-{}", self.next_id));
        self.elements.push((locator.css_selector(), element.clone()));
        self.texts.insert(element.clone(), text.to_string());
        element
    }

    pub fn toast_success(&mut self, text: &str) -> ElementRef {
        self.add(&Locator::class(toast::SUCCESS_CLASS), text)
    }

    pub fn toast_error(&mut self, text: &str) -> ElementRef {
        self.add(&Locator::class(toast::ERROR_CLASS), text)
    }

    pub fn navigate(&mut self, path: &str) {
        self.url = format!("http://localhost:5173{}", path);
    }

    /// Values typed into the element found by `locator`.
    pub fn typed_into(&self, locator: &Locator) -> Vec<String> {
        let selector = locator.css_selector();
        self.typed
            .iter()
            .filter(|(element, _)| {
                self.elements
                    .iter()
                    .any(|(s, e)| s == &selector && e == element)
            })
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[derive(Default)]
pub struct FakeBrowser {
    state: Mutex<FakeState>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page exposing every element of the registration, login and vacancy forms.
    pub fn portal() -> Self {
        let browser = Self::new();
        browser.with(|s| {
            for id in [
                "rol",
                "username",
                "email",
                "password",
                "confirmPassword",
                "first_name",
                "last_name",
                "telefono",
                "ciudad",
                "experiencia",
                "formacion",
                "habilidades",
                "empresa",
                "cargo",
                "sitio_web",
                "login-button",
                "form-button",
                "titulo-vacante",
                "ubicacion-vacante",
                "descripcion-vacante",
                "requisitos-vacante",
                "tipo-contrato-vacante",
                "publish-vacancy-button",
            ] {
                s.add(&Locator::id(id), "");
            }
            for role in ["candidato", "reclutador"] {
                s.add(
                    &Locator::css(format!("[id=\"rol\"] option[value=\"{}\"]", role)),
                    role,
                );
            }
            s.add(&Locator::css("button[type='submit']"), "Registrarse");
        });
        browser
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    /// Runs `reaction` every time the element found by `locator` is clicked.
    pub fn on_click(&self, locator: &Locator, reaction: impl FnMut(&mut FakeState) + Send + 'static) {
        self.with(|s| {
            let selector = locator.css_selector();
            let existing = s
                .elements
                .iter()
                .find(|(sel, _)| sel == &selector)
                .map(|(_, e)| e.clone());
            let element = match existing {
                Some(element) => element,
                None => s.add(locator, ""),
            };
            s.reactions.insert(element, Box::new(reaction));
        });
    }

    fn known(&self, element: &ElementRef) -> Result<()> {
        self.with(|s| {
            if s.elements.iter().any(|(_, e)| e == element) {
                Ok(())
            } else {
                Err(Error::WebDriver {
                    error: "stale element reference".into(),
                    message: element.0.clone(),
                })
            }
        })
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn goto(&self, url: &str) -> Result<()> {
        self.with(|s| s.url = url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.with(|s| s.url.clone()))
    }

    async fn page_source(&self) -> Result<String> {
        Ok(self.with(|s| s.source.clone()))
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
        let selector = locator.css_selector();
        Ok(self.with(|s| {
            s.elements
                .iter()
                .filter(|(sel, _)| sel == &selector)
                .map(|(_, e)| e.clone())
                .collect()
        }))
    }

    async fn type_text(&self, element: &ElementRef, text: &str) -> Result<()> {
        self.known(element)?;
        self.with(|s| s.typed.push((element.clone(), text.to_string())));
        Ok(())
    }

    async fn click(&self, element: &ElementRef) -> Result<()> {
        self.known(element)?;
        self.with(|s| {
            s.clicked.push(element.clone());
            if let Some(mut reaction) = s.reactions.remove(element) {
                reaction(s);
                s.reactions.insert(element.clone(), reaction);
            }
        });
        Ok(())
    }

    async fn text(&self, element: &ElementRef) -> Result<String> {
        self.known(element)?;
        Ok(self.with(|s| s.texts.get(element).cloned().unwrap_or_default()))
    }

    async fn is_interactable(&self, element: &ElementRef) -> Result<bool> {
        self.known(element)?;
        Ok(true)
    }

    async fn quit(&self) -> Result<()> {
        self.with(|s| s.quit = true);
        Ok(())
    }
}

#[async_trait]
impl Browser for Arc<FakeBrowser> {
    async fn goto(&self, url: &str) -> Result<()> {
        (**self).goto(url).await
    }

    async fn current_url(&self) -> Result<String> {
        (**self).current_url().await
    }

    async fn page_source(&self) -> Result<String> {
        (**self).page_source().await
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
        (**self).find_all(locator).await
    }

    async fn type_text(&self, element: &ElementRef, text: &str) -> Result<()> {
        (**self).type_text(element, text).await
    }

    async fn click(&self, element: &ElementRef) -> Result<()> {
        (**self).click(element).await
    }

    async fn text(&self, element: &ElementRef) -> Result<String> {
        (**self).text(element).await
    }

    async fn is_interactable(&self, element: &ElementRef) -> Result<bool> {
        (**self).is_interactable(element).await
    }

    async fn quit(&self) -> Result<()> {
        (**self).quit().await
    }
}

/// Hands out the same shared browser for every launch, or fails every launch.
pub struct FakeLauncher {
    pub browser: Option<Arc<FakeBrowser>>,
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn Browser>> {
        match &self.browser {
            Some(browser) => Ok(Box::new(browser.clone())),
            None => Err(Error::WebDriver {
                error: "session not created".into(),
                message: "chrome not reachable".into(),
            }),
        }
    }
}

pub fn config() -> Config {
    Config::from_lookup(|_| None).unwrap()
}
