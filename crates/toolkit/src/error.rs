use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, InputError>;

/// One failing location inside a validated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: Vec<String>,
    pub message: String,
}

impl Issue {
    pub fn root(message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
        }
    }

    pub fn at<I, S>(path: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            path: path.into_iter().map(|segment| segment.to_string()).collect(),
            message: message.into(),
        }
    }

    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.dotted_path(), self.message)
        }
    }
}

/// A named input did not match its schema. Carries every issue, not only the first.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid value for input '{input}': {value}{}", render_issues(.issues))]
pub struct ValidationError {
    pub input: String,
    pub value: String,
    pub issues: Vec<Issue>,
}

impl ValidationError {
    pub fn new(input: impl Into<String>, value: impl Into<String>, issues: Vec<Issue>) -> Self {
        Self {
            input: input.into(),
            value: value.into(),
            issues,
        }
    }
}

fn render_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|issue| format!("\n  - {issue}"))
        .collect()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Input required and not supplied: {0}")]
    Missing(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_lists_every_issue_on_its_own_line() {
        let err = ValidationError::new(
            "workflow-context",
            "1, 2",
            vec![
                Issue::at(["0"], "1 is not of type \"string\""),
                Issue::root("something else"),
            ],
        );
        assert_eq!(
            err.to_string(),
            "Invalid value for input 'workflow-context': 1, 2\n  - 0: 1 is not of type \"string\"\n  - something else"
        );
    }

    #[test]
    fn nested_paths_are_dotted() {
        let issue = Issue::at(["1", "job"], "too short");
        assert_eq!(issue.to_string(), "1.job: too short");
    }
}
