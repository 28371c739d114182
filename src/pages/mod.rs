//! Page objects for the portal UI. Element ids and class names live here and nowhere else.

pub mod login_page;
pub mod register_page;
pub mod toast;
pub mod vacancy_page;

use crate::error::{Error, Result};
use crate::webdriver::{Browser, ElementRef, Locator, Wait};

pub async fn wait_present(browser: &dyn Browser, wait: &Wait, locator: &Locator) -> Result<ElementRef> {
    let what = format!("{} to be present", locator);
    wait.until(&what, move || async move {
        Ok::<_, Error>(browser.find_all(locator).await?.into_iter().next())
    })
    .await
}

pub async fn wait_clickable(
    browser: &dyn Browser,
    wait: &Wait,
    locator: &Locator,
) -> Result<ElementRef> {
    let what = format!("{} to be clickable", locator);
    wait.until(&what, move || async move {
        for element in browser.find_all(locator).await? {
            if browser.is_interactable(&element).await? {
                return Ok(Some(element));
            }
        }
        Ok::<_, Error>(None)
    })
    .await
}

pub async fn wait_url_contains(browser: &dyn Browser, wait: &Wait, fragment: &str) -> Result<String> {
    let what = format!("URL to contain {:?}", fragment);
    wait.until(&what, move || async move {
        let url = browser.current_url().await?;
        Ok::<_, Error>(url.contains(fragment).then_some(url))
    })
    .await
}

/// Types `value` into the input with element id `id`. Empty values are left untouched.
pub async fn fill(browser: &dyn Browser, wait: &Wait, id: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    let input = wait_present(browser, wait, &Locator::id(id)).await?;
    browser.type_text(&input, value).await
}
