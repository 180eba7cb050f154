use crate::context::WorkflowContext;
use jobctx_toolkit::{InputSchema, Issue, Typed};
use serde_json::{json, Value};
use std::collections::VecDeque;

pub const CHAIN_SHAPE: &str =
    r#"Value must match the schema: "<JOB_NAME>", [<MATRIX_JSON>], [<JOB_NAME>", [<MATRIX_JSON>], ...]"#;

/// Parses `"caller", {"os": "linux"}, "root-caller"` into an ancestor chain,
/// immediate caller first.
pub struct WorkflowContextChainParser {
    entries: Typed<Vec<WorkflowContext>>,
}

impl WorkflowContextChainParser {
    pub fn new() -> Self {
        Self {
            entries: Typed::new(),
        }
    }
}

impl Default for WorkflowContextChainParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSchema for WorkflowContextChainParser {
    type Output = Vec<WorkflowContext>;

    fn parse(&self, raw: &str) -> Result<Vec<WorkflowContext>, Vec<Issue>> {
        let decoded: Value = serde_json::from_str(&format!("[{raw}]"))
            .map_err(|err| vec![Issue::root(format!("{CHAIN_SHAPE} (invalid JSON: {err})"))])?;
        let Value::Array(items) = decoded else {
            return Err(vec![Issue::root(CHAIN_SHAPE)]);
        };

        let misplaced: Vec<Issue> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| !matches!(item, Value::String(_) | Value::Object(_) | Value::Null))
            .map(|(idx, item)| Issue::at([idx], format!("{item} is not a job name or matrix object")))
            .collect();
        if !misplaced.is_empty() {
            return Err(misplaced);
        }

        let mut items = VecDeque::from(items);
        let mut chain = Vec::new();
        while let Some(item) = items.pop_front() {
            let Value::String(job) = item else {
                return Err(vec![Issue::root(CHAIN_SHAPE)]);
            };
            let matrix = match items.front() {
                Some(Value::Object(_) | Value::Null) => items.pop_front().unwrap_or(Value::Null),
                _ => Value::Null,
            };
            chain.push(json!({ "job": job, "matrix": matrix }));
        }

        self.entries.decode(Value::Array(chain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Matrix;
    use pretty_assertions::assert_eq;

    fn parse(raw: &str) -> Result<Vec<WorkflowContext>, Vec<Issue>> {
        WorkflowContextChainParser::new().parse(raw)
    }

    fn matrix(value: Value) -> Matrix {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn alternating_jobs_and_matrices() {
        let chain = parse(r#""build", {"os":"linux"}, "deploy""#).unwrap();
        assert_eq!(
            chain,
            vec![
                WorkflowContext::new("build", Some(matrix(json!({"os": "linux"})))),
                WorkflowContext::new("deploy", None),
            ]
        );
    }

    #[test]
    fn single_job_without_matrix() {
        assert_eq!(parse(r#""release""#).unwrap(), vec![WorkflowContext::new("release", None)]);
    }

    #[test]
    fn explicit_null_matrix_is_consumed() {
        let chain = parse(r#""build", null, "deploy", {"env": "prod"}"#).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0], WorkflowContext::new("build", None));
        assert_eq!(chain[1].matrix, Some(matrix(json!({"env": "prod"}))));
    }

    #[test]
    fn multiline_matrix_json_is_accepted() {
        let raw = "\"build\", {\n  \"os\": \"linux\",\n  \"node\": 20\n}";
        let chain = parse(raw).unwrap();
        assert_eq!(chain[0].matrix, Some(matrix(json!({"os": "linux", "node": 20}))));
    }

    #[test]
    fn leading_matrix_reports_required_shape() {
        let issues = parse(r#"{"os":"linux"}, "build""#).unwrap_err();
        assert_eq!(issues, vec![Issue::root(CHAIN_SHAPE)]);
    }

    #[test]
    fn consecutive_matrices_report_required_shape() {
        let issues = parse(r#""build", {"a":1}, {"b":2}"#).unwrap_err();
        assert_eq!(issues, vec![Issue::root(CHAIN_SHAPE)]);
    }

    #[test]
    fn scalars_are_rejected_with_their_index() {
        let issues = parse(r#""build", 3, "deploy", [1]"#).unwrap_err();
        let paths: Vec<String> = issues.iter().map(Issue::dotted_path).collect();
        assert_eq!(paths, vec!["1", "3"]);
    }

    #[test]
    fn malformed_json_mentions_required_shape() {
        let issues = parse(r#""build" {"os":"linux"}"#).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.starts_with(CHAIN_SHAPE));
    }

    #[test]
    fn empty_job_name_fails_strict_validation() {
        let issues = parse(r#""", "deploy""#).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].dotted_path(), "0.job");
    }
}
