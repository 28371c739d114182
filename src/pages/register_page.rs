use crate::dto::registration_dto::RegistrationForm;
use crate::error::Result;
use crate::models::user::Role;
use crate::pages::{fill, wait_clickable, wait_present};
use crate::webdriver::{Browser, Locator, Wait};

pub const PATH: &str = "/registro/";
pub const ROLE_SELECT_ID: &str = "rol";
pub const SUBMIT_SELECTOR: &str = "button[type='submit']";

pub struct RegisterPage<'a> {
    browser: &'a dyn Browser,
    wait: &'a Wait,
}

impl<'a> RegisterPage<'a> {
    pub fn new(browser: &'a dyn Browser, wait: &'a Wait) -> Self {
        Self { browser, wait }
    }

    pub async fn open(&self, url: &str) -> Result<()> {
        self.browser.goto(url).await?;
        wait_present(self.browser, self.wait, &Locator::id(ROLE_SELECT_ID)).await?;
        Ok(())
    }

    pub async fn select_role(&self, role: Role) -> Result<()> {
        let option = Locator::css(format!(
            "[id=\"{}\"] option[value=\"{}\"]",
            ROLE_SELECT_ID,
            role.as_str()
        ));
        let option = wait_present(self.browser, self.wait, &option).await?;
        self.browser.click(&option).await
    }

    /// Selects the role first: the role decides which profile inputs exist.
    pub async fn fill(&self, form: &RegistrationForm) -> Result<()> {
        self.select_role(form.role()).await?;
        for (id, value) in form.fields() {
            fill(self.browser, self.wait, id, value).await?;
        }
        Ok(())
    }

    pub async fn submit(&self) -> Result<()> {
        let button = wait_clickable(self.browser, self.wait, &Locator::css(SUBMIT_SELECTOR)).await?;
        self.browser.click(&button).await
    }
}
