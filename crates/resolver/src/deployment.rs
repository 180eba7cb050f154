use crate::context::ActionContext;
use crate::error::{listing_error, ConsistencyError, Result};
use crate::job::JobResolver;
use jobctx_github::{
    DeploymentNode, DeploymentState, DeploymentSummary, GitHubApi, Url, MAX_NODES_PER_QUERY,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::OnceCell;

pub const DEPLOY_TASK: &str = "deploy";
const DEPLOYMENTS_PER_PAGE: u8 = 100;

static JOB_LOG_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/([^/]+)/([^/]+)/actions/runs/(\d+)/job/(\d+)/?$").expect("job log path pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentDescriptor {
    pub id: u64,
    pub environment: String,
    pub url: String,
    pub workflow_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_url: Option<String>,
}

/// Finds the in-progress deployment whose status log points at the current job.
/// "No deployment" is a regular, cached outcome.
pub struct DeploymentResolver {
    api: Arc<dyn GitHubApi>,
    jobs: Arc<JobResolver>,
    current: OnceCell<Option<DeploymentDescriptor>>,
}

impl DeploymentResolver {
    pub fn new(api: Arc<dyn GitHubApi>, jobs: Arc<JobResolver>) -> Self {
        Self {
            api,
            jobs,
            current: OnceCell::new(),
        }
    }

    pub async fn resolve_current_deployment(&self) -> Result<Option<&DeploymentDescriptor>> {
        self.current
            .get_or_try_init(|| self.fetch_current_deployment())
            .await
            .map(Option::as_ref)
    }

    async fn fetch_current_deployment(&self) -> Result<Option<DeploymentDescriptor>> {
        let job = self.jobs.resolve_current_job().await?;
        let ctx = self.jobs.context();

        let listed = self
            .api
            .list_deployments(&ctx.owner, &ctx.repo, &ctx.sha, DEPLOY_TASK, DEPLOYMENTS_PER_PAGE)
            .await
            .map_err(|err| listing_error(err, "deployments", "read"))?;
        let ids: Vec<String> = listed
            .into_iter()
            .filter(DeploymentSummary::performed_by_bot)
            .map(|deployment| deployment.node_id)
            .collect();
        if ids.is_empty() {
            log::info!("No deployments by the workflow token for {}", ctx.sha);
            return Ok(None);
        }

        let mut nodes = Vec::with_capacity(ids.len());
        for batch in ids.chunks(MAX_NODES_PER_QUERY) {
            nodes.extend(self.api.deployment_nodes(batch).await?);
        }
        let log_target = JobLogTarget::new(ctx, job.id);
        let matched = nodes
            .into_iter()
            .filter(|node| is_in_progress_deploy(node, &ctx.sha))
            .find(|node| {
                node.latest_status
                    .as_ref()
                    .and_then(|status| status.log_url.as_deref())
                    .is_some_and(|url| log_target.matches(url))
            });

        let Some(node) = matched else {
            log::info!("No in-progress deployment is attached to job {}", job.id);
            return Ok(None);
        };
        let deployment = describe(ctx, node)?;
        log::info!(
            "Resolved deployment {} to environment '{}'",
            deployment.id,
            deployment.environment
        );
        Ok(Some(deployment))
    }
}

fn is_in_progress_deploy(node: &DeploymentNode, sha: &str) -> bool {
    node.commit_oid.as_deref() == Some(sha)
        && node.task.as_deref() == Some(DEPLOY_TASK)
        && node.state == Some(DeploymentState::InProgress)
}

/// `{server}/{owner}/{repo}/actions/runs/{run_id}/job/{job_id}`
struct JobLogTarget<'a> {
    server: &'a Url,
    repository: String,
    run_id: u64,
    job_id: u64,
}

impl<'a> JobLogTarget<'a> {
    fn new(ctx: &'a ActionContext, job_id: u64) -> Self {
        Self {
            server: &ctx.server_url,
            repository: ctx.repository(),
            run_id: ctx.run_id,
            job_id,
        }
    }

    fn matches(&self, raw: &str) -> bool {
        let Ok(url) = Url::parse(raw) else {
            return false;
        };
        if url.origin() != self.server.origin() {
            return false;
        }
        let Some(caps) = JOB_LOG_PATH.captures(url.path()) else {
            return false;
        };
        format!("{}/{}", &caps[1], &caps[2]) == self.repository
            && caps[3].parse::<u64>().ok() == Some(self.run_id)
            && caps[4].parse::<u64>().ok() == Some(self.job_id)
    }
}

fn describe(ctx: &ActionContext, node: DeploymentNode) -> Result<DeploymentDescriptor> {
    let label = node.id.clone().unwrap_or_else(|| "<unknown>".to_string());
    let missing = |field: &'static str| ConsistencyError {
        deployment: label.clone(),
        field,
    };

    let status = node.latest_status.ok_or_else(|| missing("latestStatus"))?;
    let environment = node
        .latest_environment
        .ok_or_else(|| missing("latestEnvironment"))?;
    let id = node.database_id.ok_or_else(|| missing("databaseId"))?;

    Ok(DeploymentDescriptor {
        id,
        url: ctx.server_link(&[&ctx.owner, &ctx.repo, "deployments", &environment]),
        environment,
        workflow_url: ctx.workflow_run_url(),
        log_url: status.log_url,
        environment_url: status.environment_url,
    })
}
