use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Matrix values of one job instance, in the order the workflow wrote them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Matrix(pub Map<String, Value>);

impl Matrix {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Scalar leaves, depth first, rendered the way the job list displays them.
    pub fn flat_values(&self) -> Vec<String> {
        let mut out = Vec::new();
        for value in self.0.values() {
            collect_leaves(value, &mut out);
        }
        out
    }
}

impl From<Map<String, Value>> for Matrix {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn collect_leaves(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => map.values().for_each(|v| collect_leaves(v, out)),
        Value::Array(items) => items.iter().for_each(|v| collect_leaves(v, out)),
        Value::String(s) => out.push(s.clone()),
        Value::Number(n) => out.push(render_number(n)),
        Value::Bool(b) => out.push(b.to_string()),
        Value::Null => out.push(String::new()),
    }
}

fn render_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// One caller job in a reusable-workflow chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct WorkflowContext {
    #[schemars(length(min = 1))]
    pub job: String,
    #[serde(default)]
    pub matrix: Option<Matrix>,
}

impl WorkflowContext {
    pub fn new(job: impl Into<String>, matrix: Option<Matrix>) -> Self {
        Self {
            job: job.into(),
            matrix,
        }
    }
}
