use crate::error::EnvironmentError;
use jobctx_github::{Url, DEFAULT_API_URL, DEFAULT_GRAPHQL_URL};

const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Run identity as seen from inside the executing job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionContext {
    pub owner: String,
    pub repo: String,
    pub run_id: u64,
    pub run_attempt: u32,
    pub sha: String,
    pub server_url: Url,
    pub api_url: String,
    pub graphql_url: String,
    pub runner_name: String,
}

impl ActionContext {
    pub fn from_env() -> Result<Self, EnvironmentError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EnvironmentError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |name: &'static str| get(name).ok_or(EnvironmentError::Missing(name));

        let repository = required("GITHUB_REPOSITORY")?;
        let (owner, repo) = repository
            .split_once('/')
            .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty() && !repo.contains('/'))
            .ok_or_else(|| EnvironmentError::Invalid {
                name: "GITHUB_REPOSITORY",
                value: repository.clone(),
                reason: "expected <owner>/<repo>".to_string(),
            })?;

        let server_raw = get("GITHUB_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let server_url = Url::parse(server_raw.trim_end_matches('/')).map_err(|err| {
            EnvironmentError::Invalid {
                name: "GITHUB_SERVER_URL",
                value: server_raw.clone(),
                reason: err.to_string(),
            }
        })?;

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            run_id: parse_number("GITHUB_RUN_ID", required("GITHUB_RUN_ID")?)?,
            run_attempt: parse_number("GITHUB_RUN_ATTEMPT", required("GITHUB_RUN_ATTEMPT")?)?,
            sha: required("GITHUB_SHA")?,
            server_url,
            api_url: get("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            graphql_url: get("GITHUB_GRAPHQL_URL")
                .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string()),
            runner_name: required("RUNNER_NAME")?,
        })
    }

    /// `owner/repo`
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Server URL extended by the given path segments.
    pub fn server_link(&self, segments: &[&str]) -> String {
        let mut url = self.server_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.to_string()
    }

    pub fn workflow_run_url(&self) -> String {
        self.server_link(&[
            &self.owner,
            &self.repo,
            "actions",
            "runs",
            &self.run_id.to_string(),
        ])
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, EnvironmentError>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|err: T::Err| EnvironmentError::Invalid {
        name,
        reason: err.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn runner_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("GITHUB_REPOSITORY", "octo/app"),
            ("GITHUB_RUN_ID", "5"),
            ("GITHUB_RUN_ATTEMPT", "2"),
            ("GITHUB_SHA", "abc123"),
            ("GITHUB_SERVER_URL", "https://github.com"),
            ("RUNNER_NAME", "GitHub Actions 7"),
        ])
    }

    fn context_from(env: &HashMap<&'static str, &'static str>) -> Result<ActionContext, EnvironmentError> {
        ActionContext::from_lookup(|name| env.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn reads_run_identity() {
        let ctx = context_from(&runner_env()).unwrap();
        assert_eq!(ctx.repository(), "octo/app");
        assert_eq!(ctx.run_id, 5);
        assert_eq!(ctx.run_attempt, 2);
        assert_eq!(ctx.runner_name, "GitHub Actions 7");
        assert_eq!(ctx.api_url, DEFAULT_API_URL);
        assert_eq!(ctx.workflow_run_url(), "https://github.com/octo/app/actions/runs/5");
    }

    #[test]
    fn missing_attempt_is_reported_by_name() {
        let mut env = runner_env();
        env.remove("GITHUB_RUN_ATTEMPT");
        let err = context_from(&env).unwrap_err();
        assert_eq!(err.to_string(), "Environment variable GITHUB_RUN_ATTEMPT is required but not set");
    }

    #[test]
    fn non_numeric_run_id_is_invalid() {
        let mut env = runner_env();
        env.insert("GITHUB_RUN_ID", "latest");
        let err = context_from(&env).unwrap_err();
        assert!(matches!(err, EnvironmentError::Invalid { name: "GITHUB_RUN_ID", .. }), "{err}");
    }

    #[test]
    fn repository_needs_owner_and_name() {
        let mut env = runner_env();
        env.insert("GITHUB_REPOSITORY", "octo");
        assert!(context_from(&env).is_err());
    }

    #[test]
    fn enterprise_server_links_keep_their_host() {
        let mut env = runner_env();
        env.insert("GITHUB_SERVER_URL", "https://ghe.example.com/");
        let ctx = context_from(&env).unwrap();
        assert_eq!(
            ctx.server_link(&["octo", "app", "deployments", "prod eu"]),
            "https://ghe.example.com/octo/app/deployments/prod%20eu"
        );
    }
}
