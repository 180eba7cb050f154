use crate::api::GitHubApi;
use crate::error::{ApiError, Result};
use crate::types::{DeploymentNode, DeploymentSummary, JobDescriptor, RawDeployment};
use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const JOBS_PER_PAGE: u8 = 100;

const DEPLOYMENT_NODES_QUERY: &str = r#"query($ids: [ID!]!) {
  nodes(ids: $ids) {
    ... on Deployment {
      id
      databaseId
      commitOid
      createdAt
      task
      state
      latestEnvironment
      latestStatus {
        logUrl
        environmentUrl
      }
    }
  }
}"#;

#[derive(Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub graphql_url: String,
    pub token: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// `GitHubApi` on top of `octocrab`, authenticated with the workflow token.
#[derive(Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
    graphql_url: Url,
}

#[derive(Serialize)]
struct JobsQuery {
    per_page: u8,
}

#[derive(Serialize)]
struct DeploymentsQuery<'a> {
    sha: &'a str,
    task: &'a str,
    per_page: u8,
}

impl GitHubClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api_url = parse_url(&config.api_url)?;
        let graphql_url = parse_url(&config.graphql_url)?;

        let octocrab = Octocrab::builder()
            .base_uri(api_url.as_str().trim_end_matches('/'))
            .map_err(|err| ApiError::Config(format!("invalid api url '{api_url}': {err}")))?
            .personal_token(config.token)
            .set_connect_timeout(Some(config.timeout))
            .set_read_timeout(Some(config.timeout))
            .build()?;

        Ok(Self {
            octocrab,
            graphql_url,
        })
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn list_jobs_for_run_attempt(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
        attempt: u32,
    ) -> Result<Vec<JobDescriptor>> {
        let route = format!("/repos/{owner}/{repo}/actions/runs/{run_id}/attempts/{attempt}/jobs");
        log::debug!("GET {route}");
        let first: Page<JobDescriptor> = self
            .octocrab
            .get(
                &route,
                Some(&JobsQuery {
                    per_page: JOBS_PER_PAGE,
                }),
            )
            .await?;
        let jobs = self.octocrab.all_pages(first).await?;
        log::debug!("run {run_id} attempt {attempt} has {} jobs", jobs.len());
        Ok(jobs)
    }

    async fn list_deployments(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        task: &str,
        per_page: u8,
    ) -> Result<Vec<DeploymentSummary>> {
        let route = format!("/repos/{owner}/{repo}/deployments");
        log::debug!("GET {route} (sha {sha}, task {task})");
        let first: Page<RawDeployment> = self
            .octocrab
            .get(&route, Some(&DeploymentsQuery { sha, task, per_page }))
            .await?;
        let deployments = self.octocrab.all_pages(first).await?;
        Ok(deployments.into_iter().map(DeploymentSummary::from).collect())
    }

    async fn deployment_nodes(&self, ids: &[String]) -> Result<Vec<DeploymentNode>> {
        let body = json!({
            "query": DEPLOYMENT_NODES_QUERY,
            "variables": { "ids": ids },
        });
        log::debug!("POST {} ({} deployment nodes)", self.graphql_url, ids.len());
        // Enterprise servers do not serve GraphQL under the REST base path.
        let payload: GraphQlResponse<NodesData> = self
            .octocrab
            .post(self.graphql_url.as_str(), Some(&body))
            .await?;

        let errors = payload.errors.unwrap_or_default();
        if !errors.is_empty() {
            return Err(ApiError::GraphQl(errors.into_iter().map(|e| e.message).collect()));
        }
        let data = payload
            .data
            .ok_or_else(|| ApiError::Decode("GraphQL response without data".to_string()))?;
        Ok(data.nodes.into_iter().flatten().collect())
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct NodesData {
    nodes: Vec<Option<DeploymentNode>>,
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|err| ApiError::Config(format!("invalid url '{raw}': {err}")))
}
