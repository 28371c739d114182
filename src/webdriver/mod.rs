//! Minimal W3C WebDriver client and the browser abstraction the verifier drives.

pub mod browser;
pub mod client;
pub mod locator;
pub mod session;
pub mod wait;

pub use browser::{Browser, BrowserLauncher, Diagnostics, ElementRef};
pub use client::{ChromeOptions, WebDriverClient};
pub use locator::Locator;
pub use wait::Wait;
