pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod pages;
pub mod services;
pub mod utils;
pub mod webdriver;

#[cfg(test)]
mod test_support;

pub use crate::services::suite_service::{ScenarioKind, Suite};
