use crate::dto::login_dto::Credentials;
use crate::error::Result;
use crate::pages::{fill, wait_clickable, wait_present};
use crate::webdriver::{Browser, Locator, Wait};

pub const PATH: &str = "/login";
pub const USERNAME_ID: &str = "username";
pub const PASSWORD_ID: &str = "password";
pub const LOGIN_BUTTON_ID: &str = "login-button";

pub struct LoginPage<'a> {
    browser: &'a dyn Browser,
    wait: &'a Wait,
}

impl<'a> LoginPage<'a> {
    pub fn new(browser: &'a dyn Browser, wait: &'a Wait) -> Self {
        Self { browser, wait }
    }

    pub async fn open(&self, url: &str) -> Result<()> {
        self.browser.goto(url).await?;
        wait_present(self.browser, self.wait, &Locator::id(USERNAME_ID)).await?;
        Ok(())
    }

    pub async fn fill(&self, credentials: &Credentials) -> Result<()> {
        fill(self.browser, self.wait, USERNAME_ID, &credentials.username).await?;
        fill(self.browser, self.wait, PASSWORD_ID, &credentials.password).await
    }

    pub async fn submit(&self) -> Result<()> {
        let button = wait_clickable(self.browser, self.wait, &Locator::id(LOGIN_BUTTON_ID)).await?;
        self.browser.click(&button).await
    }
}
