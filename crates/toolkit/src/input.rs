use crate::error::{InputError, Result, ValidationError};
use crate::schema::InputSchema;
use std::collections::HashMap;
use std::sync::Arc;

/// Where raw input strings come from.
pub trait InputSource: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

/// Inputs handed to the step by the runner as `INPUT_<NAME>` variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvInputs;

impl InputSource for EnvInputs {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(input_env_key(name)).ok()
    }
}

impl InputSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// Environment variable the runner uses for an input name.
pub fn input_env_key(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

#[derive(Clone)]
pub struct InputResolver {
    source: Arc<dyn InputSource>,
}

impl InputResolver {
    pub fn new(source: impl InputSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn from_env() -> Self {
        Self::new(EnvInputs)
    }

    /// Trimmed input value; `None` when unset or blank.
    pub fn raw(&self, name: &str) -> Option<String> {
        self.source
            .get(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn required(&self, name: &str) -> Result<String> {
        self.raw(name)
            .ok_or_else(|| InputError::Missing(name.to_string()))
    }

    /// Parses an input through `schema`. Blank inputs resolve to `None` without
    /// consulting the schema.
    pub fn resolve<S: InputSchema>(&self, name: &str, schema: &S) -> Result<Option<S::Output>> {
        let Some(raw) = self.raw(name) else {
            return Ok(None);
        };
        log::debug!("resolving input '{name}'");
        schema
            .parse(&raw)
            .map(Some)
            .map_err(|issues| ValidationError::new(name, raw, issues).into())
    }

    pub fn resolve_required<S: InputSchema>(&self, name: &str, schema: &S) -> Result<S::Output> {
        self.resolve(name, schema)?
            .ok_or_else(|| InputError::Missing(name.to_string()))
    }
}

impl std::fmt::Debug for InputResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputResolver").finish_non_exhaustive()
    }
}
