use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::models::signal::{Signal, SignalKind};
use crate::webdriver::{Browser, ElementRef, Locator, Wait};

pub const SUCCESS_CLASS: &str = "Toastify__toast--success";
pub const ERROR_CLASS: &str = "Toastify__toast--error";

fn locator(kind: SignalKind) -> Locator {
    match kind {
        SignalKind::Success => Locator::class(SUCCESS_CLASS),
        SignalKind::Error => Locator::class(ERROR_CLASS),
    }
}

/// Handles of every toast currently on the page, of either kind.
pub async fn snapshot(browser: &dyn Browser) -> Result<HashSet<ElementRef>> {
    let mut seen = HashSet::new();
    for kind in [SignalKind::Success, SignalKind::Error] {
        seen.extend(browser.find_all(&locator(kind)).await?);
    }
    Ok(seen)
}

/// Waits for the first toast of either kind that is not in `seen`.
///
/// Toasts linger for a few seconds, so the caller snapshots before submitting and
/// anything already on screen is ignored. A toast counts once it has text.
pub async fn await_new(browser: &dyn Browser, wait: &Wait, seen: &HashSet<ElementRef>) -> Result<Signal> {
    wait.until("a new success or error toast", move || async move {
        for kind in [SignalKind::Success, SignalKind::Error] {
            for element in browser.find_all(&locator(kind)).await? {
                if seen.contains(&element) {
                    continue;
                }
                let text = browser.text(&element).await?;
                if !text.trim().is_empty() {
                    return Ok(Some(Signal {
                        kind,
                        text: text.trim().to_string(),
                    }));
                }
            }
        }
        Ok::<_, Error>(None)
    })
    .await
}
