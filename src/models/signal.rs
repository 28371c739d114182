use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Success,
    Error,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Success => f.write_str("success toast"),
            SignalKind::Error => f.write_str("error toast"),
        }
    }
}

/// A toast observed on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub text: String,
}

/// What a submission is expected to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedOutcome {
    /// A success toast containing one of `phrases`. The first phrase is the
    /// current copy; later ones are tolerated wordings.
    Success { phrases: Vec<String> },
    /// An error toast, containing `phrase` when given.
    ValidationError { phrase: Option<String> },
}

/// How an observed signal compares with the expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalMatch {
    Exact,
    /// Accepted through a tolerated alternative phrase.
    Drifted(String),
    Mismatch,
}

impl ExpectedOutcome {
    pub fn success<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExpectedOutcome::Success {
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }

    pub fn validation_error(phrase: impl Into<String>) -> Self {
        ExpectedOutcome::ValidationError {
            phrase: Some(phrase.into()),
        }
    }

    pub fn any_validation_error() -> Self {
        ExpectedOutcome::ValidationError { phrase: None }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExpectedOutcome::Success { .. })
    }

    pub fn kind(&self) -> SignalKind {
        match self {
            ExpectedOutcome::Success { .. } => SignalKind::Success,
            ExpectedOutcome::ValidationError { .. } => SignalKind::Error,
        }
    }

    pub fn check(&self, signal: &Signal) -> SignalMatch {
        if signal.kind != self.kind() {
            return SignalMatch::Mismatch;
        }
        match self {
            ExpectedOutcome::Success { phrases } => {
                match phrases.iter().position(|p| signal.text.contains(p.as_str())) {
                    Some(0) => SignalMatch::Exact,
                    Some(i) => SignalMatch::Drifted(phrases[i].clone()),
                    None if phrases.is_empty() => SignalMatch::Exact,
                    None => SignalMatch::Mismatch,
                }
            }
            ExpectedOutcome::ValidationError { phrase: None } => SignalMatch::Exact,
            ExpectedOutcome::ValidationError { phrase: Some(p) } => {
                if signal.text.contains(p.as_str()) {
                    SignalMatch::Exact
                } else {
                    SignalMatch::Mismatch
                }
            }
        }
    }
}

impl fmt::Display for ExpectedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedOutcome::Success { phrases } => {
                write!(f, "success toast containing one of {:?}", phrases)
            }
            ExpectedOutcome::ValidationError { phrase: Some(p) } => {
                write!(f, "error toast containing {:?}", p)
            }
            ExpectedOutcome::ValidationError { phrase: None } => f.write_str("error toast"),
        }
    }
}
