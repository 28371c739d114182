use serde_json::{json, Value as JsonValue};
use std::fmt;

/// How an element is found. Everything is sent to the driver as a CSS selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Id(String),
    ClassName(String),
    Css(String),
}

impl Locator {
    pub fn id(id: impl Into<String>) -> Self {
        Locator::Id(id.into())
    }

    pub fn class(name: impl Into<String>) -> Self {
        Locator::ClassName(name.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn css_selector(&self) -> String {
        match self {
            // attribute form avoids escaping ids such as `confirmPassword` or `titulo-vacante`
            Locator::Id(id) => format!("[id=\"{}\"]", escape_quotes(id)),
            Locator::ClassName(name) => format!(".{}", name),
            Locator::Css(selector) => selector.clone(),
        }
    }

    /// Body of a W3C "Find Element(s)" request.
    pub fn to_wire(&self) -> JsonValue {
        json!({ "using": "css selector", "value": self.css_selector() })
    }
}

fn escape_quotes(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "#{}", id),
            Locator::ClassName(name) => write!(f, ".{}", name),
            Locator::Css(selector) => f.write_str(selector),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_use_attribute_selectors() {
        assert_eq!(Locator::id("titulo-vacante").css_selector(), "[id=\"titulo-vacante\"]");
        assert_eq!(Locator::id("a\"b").css_selector(), "[id=\"a\\\"b\"]");
    }

    #[test]
    fn wire_form_is_css() {
        let wire = Locator::class("Toastify__toast--error").to_wire();
        assert_eq!(wire["using"], "css selector");
        assert_eq!(wire["value"], ".Toastify__toast--error");
    }
}
