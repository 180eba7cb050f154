//! Two-phase schema validation for action inputs.
//!
//! Inputs always arrive as plain strings. A schema first checks the string itself;
//! when the only complaint is that a structured value was expected at the root, the
//! text is decoded as YAML (which also accepts JSON) and checked again.

use crate::error::Issue;
use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError as SchemaError, Validator};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

/// Converts a raw (already trimmed, non-empty) input string into a typed value.
pub trait InputSchema {
    type Output;

    fn parse(&self, raw: &str) -> Result<Self::Output, Vec<Issue>>;
}

/// Schema derived from a Rust type via `schemars`.
pub struct Typed<T> {
    validator: Result<Validator, String>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Typed<T>
where
    T: JsonSchema + DeserializeOwned,
{
    pub fn new() -> Self {
        let schema = schemars::schema_for!(T).to_value();
        let validator = jsonschema::validator_for(&schema)
            .map_err(|err| format!("invalid schema for {}: {err}", T::schema_name()));
        Self {
            validator,
            _marker: PhantomData,
        }
    }

    /// Validates an already structured value, collecting every issue.
    pub fn check(&self, value: &Value) -> Result<(), Vec<Issue>> {
        let issues: Vec<Issue> = self
            .validator()?
            .iter_errors(value)
            .map(|err| to_issue(&err))
            .collect();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }

    /// Validates then deserializes a structured value.
    pub fn decode(&self, value: Value) -> Result<T, Vec<Issue>> {
        self.check(&value)?;
        serde_json::from_value(value).map_err(|err| vec![Issue::root(err.to_string())])
    }

    fn validator(&self) -> Result<&Validator, Vec<Issue>> {
        self.validator
            .as_ref()
            .map_err(|err| vec![Issue::root(err.clone())])
    }
}

impl<T> Default for Typed<T>
where
    T: JsonSchema + DeserializeOwned,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InputSchema for Typed<T>
where
    T: JsonSchema + DeserializeOwned,
{
    type Output = T;

    fn parse(&self, raw: &str) -> Result<T, Vec<Issue>> {
        let direct = Value::String(raw.to_string());
        let failures: Vec<(Issue, bool)> = self
            .validator()?
            .iter_errors(&direct)
            .map(|err| (to_issue(&err), is_plain_string_mismatch(&err)))
            .collect();

        if failures.is_empty() {
            return serde_json::from_value(direct).map_err(|err| vec![Issue::root(err.to_string())]);
        }
        if !failures.iter().all(|(_, mismatch)| *mismatch) {
            return Err(failures.into_iter().map(|(issue, _)| issue).collect());
        }

        log::debug!("input is not a plain string value, decoding as YAML");
        let decoded: Value = serde_yaml::from_str(raw)
            .map_err(|err| vec![Issue::root(format!("value is not valid YAML or JSON: {err}"))])?;
        self.decode(decoded)
    }
}

/// Root-level shape mismatch: the schema wanted something other than a string.
fn is_plain_string_mismatch(err: &SchemaError<'_>) -> bool {
    err.instance_path.to_string().is_empty()
        && matches!(
            err.kind,
            ValidationErrorKind::Type { .. }
                | ValidationErrorKind::AnyOf { .. }
                | ValidationErrorKind::OneOfNotValid { .. }
        )
}

fn to_issue(err: &SchemaError<'_>) -> Issue {
    let pointer = err.instance_path.to_string();
    let path = pointer
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"));
    Issue::at(path, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, JsonSchema, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Target {
        #[schemars(length(min = 1))]
        name: String,
        replicas: u32,
    }

    #[test]
    fn plain_string_schema_accepts_raw_text() {
        let schema = Typed::<String>::new();
        assert_eq!(schema.parse("- a").unwrap(), "- a");
    }

    #[test]
    fn yaml_list_is_decoded_through_fallback() {
        let schema = Typed::<Vec<String>>::new();
        assert_eq!(schema.parse("- a\n- b").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn json_is_accepted_by_the_yaml_fallback() {
        let schema = Typed::<Vec<String>>::new();
        assert_eq!(schema.parse(r#"["a", "b"]"#).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn invalid_fallback_text_reports_decode_failure() {
        let schema = Typed::<Vec<String>>::new();
        let issues = schema.parse("- a\n  - : [b").unwrap_err();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("not valid YAML"), "{issues:?}");
    }

    #[test]
    fn scalar_text_still_fails_after_fallback() {
        let schema = Typed::<Vec<String>>::new();
        let issues = schema.parse("a").unwrap_err();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].path.is_empty());
        assert!(issues[0].message.contains("array"), "{issues:?}");
    }

    #[test]
    fn every_failing_field_is_reported() {
        let schema = Typed::<Vec<Target>>::new();
        let issues = schema
            .parse("- name: ''\n  replicas: -1\n- name: web\n  replicas: 2\n  extra: true")
            .unwrap_err();
        let paths: Vec<String> = issues.iter().map(Issue::dotted_path).collect();
        assert!(paths.contains(&"0.name".to_string()), "{issues:?}");
        assert!(paths.contains(&"0.replicas".to_string()), "{issues:?}");
        assert!(paths.contains(&"1".to_string()), "{issues:?}");
    }

    #[test]
    fn structured_values_decode_into_the_target_type() {
        let schema = Typed::<Target>::new();
        assert_eq!(
            schema.parse("name: web\nreplicas: 3").unwrap(),
            Target {
                name: "web".to_string(),
                replicas: 3
            }
        );
    }
}
