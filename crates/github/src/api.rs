use crate::error::Result;
use crate::types::{DeploymentNode, DeploymentSummary, JobDescriptor};
use async_trait::async_trait;

/// Upper bound GitHub puts on the `ids` argument of a `nodes` query.
pub const MAX_NODES_PER_QUERY: usize = 100;

/// The GitHub calls the resolvers depend on. Listing methods return the complete,
/// already paginated result set.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn list_jobs_for_run_attempt(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
        attempt: u32,
    ) -> Result<Vec<JobDescriptor>>;

    async fn list_deployments(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        task: &str,
        per_page: u8,
    ) -> Result<Vec<DeploymentSummary>>;

    /// Extended deployment fields for at most [`MAX_NODES_PER_QUERY`] GraphQL node
    /// ids, in one query.
    async fn deployment_nodes(&self, ids: &[String]) -> Result<Vec<DeploymentNode>>;
}
