use crate::dto::vacancy_dto::VacancyForm;
use crate::error::Result;
use crate::pages::{fill, wait_clickable, wait_present};
use crate::webdriver::{Browser, Locator, Wait};

pub const FORM_BUTTON_ID: &str = "form-button";
pub const TITLE_ID: &str = "titulo-vacante";
pub const CONTRACT_TYPE_ID: &str = "tipo-contrato-vacante";
pub const PUBLISH_BUTTON_ID: &str = "publish-vacancy-button";

/// The recruiter dashboard and its "new vacancy" form.
pub struct VacancyPage<'a> {
    browser: &'a dyn Browser,
    wait: &'a Wait,
}

impl<'a> VacancyPage<'a> {
    pub fn new(browser: &'a dyn Browser, wait: &'a Wait) -> Self {
        Self { browser, wait }
    }

    /// Resolves once the dashboard shows its "new vacancy" button.
    pub async fn wait_dashboard(&self) -> Result<()> {
        wait_present(self.browser, self.wait, &Locator::id(FORM_BUTTON_ID)).await?;
        Ok(())
    }

    pub async fn open_form(&self) -> Result<()> {
        let button = wait_clickable(self.browser, self.wait, &Locator::id(FORM_BUTTON_ID)).await?;
        self.browser.click(&button).await?;
        wait_present(self.browser, self.wait, &Locator::id(TITLE_ID)).await?;
        Ok(())
    }

    pub async fn fill(&self, form: &VacancyForm) -> Result<()> {
        for (id, value) in form.text_fields() {
            fill(self.browser, self.wait, id, value).await?;
        }
        // typing into a <select> picks the option whose label starts with the text
        fill(self.browser, self.wait, CONTRACT_TYPE_ID, &form.tipo_contrato).await
    }

    pub async fn publish(&self) -> Result<()> {
        let button =
            wait_clickable(self.browser, self.wait, &Locator::id(PUBLISH_BUTTON_ID)).await?;
        self.browser.click(&button).await
    }
}
