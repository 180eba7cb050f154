use crate::context::ActionContext;
use async_trait::async_trait;
use jobctx_github::{
    ApiError, DeploymentNode, DeploymentState, DeploymentStatusNode, DeploymentSummary, GitHubApi,
    JobDescriptor, Result, Url,
};
use jobctx_toolkit::InputResolver;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) fn fake_context() -> ActionContext {
    ActionContext {
        owner: "octo".to_string(),
        repo: "app".to_string(),
        run_id: 5,
        run_attempt: 1,
        sha: "abc123".to_string(),
        server_url: Url::parse("https://github.com").unwrap(),
        api_url: "https://api.github.com".to_string(),
        graphql_url: "https://api.github.com/graphql".to_string(),
        runner_name: "runner-1".to_string(),
    }
}

pub(crate) fn inputs(pairs: &[(&str, &str)]) -> InputResolver {
    InputResolver::new(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    )
}

pub(crate) fn bot_deployment(node_id: &str) -> DeploymentSummary {
    DeploymentSummary {
        node_id: node_id.to_string(),
        creator_login: Some("github-actions[bot]".to_string()),
        app_slug: Some("github-actions".to_string()),
    }
}

pub(crate) fn in_progress_node(id: u64, log_url: &str) -> DeploymentNode {
    DeploymentNode {
        id: Some(format!("DE_{id}")),
        database_id: Some(id),
        commit_oid: Some("abc123".to_string()),
        created_at: Some("2024-05-01T10:00:00Z".to_string()),
        task: Some("deploy".to_string()),
        state: Some(DeploymentState::InProgress),
        latest_environment: Some("production".to_string()),
        latest_status: Some(DeploymentStatusNode {
            log_url: Some(log_url.to_string()),
            environment_url: Some("https://app.example.com".to_string()),
        }),
    }
}

/// In-memory `GitHubApi` that counts calls.
#[derive(Default)]
pub(crate) struct FakeGitHub {
    jobs: Vec<JobDescriptor>,
    jobs_status: Option<u16>,
    deployments: Vec<DeploymentSummary>,
    deployments_status: Option<u16>,
    nodes: Vec<DeploymentNode>,
    job_calls: AtomicUsize,
    deployment_calls: AtomicUsize,
    node_calls: AtomicUsize,
    largest_node_batch: AtomicUsize,
}

impl FakeGitHub {
    pub(crate) fn with_jobs(jobs: &[(u64, &str)]) -> Self {
        Self {
            jobs: jobs
                .iter()
                .map(|(id, name)| JobDescriptor::new(*id, *name))
                .collect(),
            ..Self::default()
        }
    }

    pub(crate) fn failing_jobs(mut self, status: u16) -> Self {
        self.jobs_status = Some(status);
        self
    }

    pub(crate) fn failing_deployments(mut self, status: u16) -> Self {
        self.deployments_status = Some(status);
        self
    }

    pub(crate) fn with_deployments(mut self, deployments: Vec<DeploymentSummary>, nodes: Vec<DeploymentNode>) -> Self {
        self.deployments = deployments;
        self.nodes = nodes;
        self
    }

    pub(crate) fn job_calls(&self) -> usize {
        self.job_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn deployment_calls(&self) -> usize {
        self.deployment_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn node_calls(&self) -> usize {
        self.node_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn largest_node_batch(&self) -> usize {
        self.largest_node_batch.load(Ordering::SeqCst)
    }
}

fn status_error(status: u16) -> ApiError {
    ApiError::Status {
        status,
        message: "fake failure".to_string(),
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn list_jobs_for_run_attempt(
        &self,
        _owner: &str,
        _repo: &str,
        _run_id: u64,
        _attempt: u32,
    ) -> Result<Vec<JobDescriptor>> {
        self.job_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        match self.jobs_status {
            Some(status) => Err(status_error(status)),
            None => Ok(self.jobs.clone()),
        }
    }

    async fn list_deployments(
        &self,
        _owner: &str,
        _repo: &str,
        _sha: &str,
        _task: &str,
        _per_page: u8,
    ) -> Result<Vec<DeploymentSummary>> {
        self.deployment_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        match self.deployments_status {
            Some(status) => Err(status_error(status)),
            None => Ok(self.deployments.clone()),
        }
    }

    async fn deployment_nodes(&self, ids: &[String]) -> Result<Vec<DeploymentNode>> {
        self.node_calls.fetch_add(1, Ordering::SeqCst);
        self.largest_node_batch.fetch_max(ids.len(), Ordering::SeqCst);
        Ok(self
            .nodes
            .iter()
            .filter(|node| node.id.as_ref().is_some_and(|id| ids.contains(id)))
            .cloned()
            .collect())
    }
}
