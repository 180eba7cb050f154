use crate::context::ActionContext;
use crate::error::{listing_error, NotFoundError, Result};
use jobctx_github::{GitHubApi, JobDescriptor};
use jobctx_toolkit::{InputResolver, Typed};
use jobctx_workflow::{JobIdentity, Matrix, WorkflowContextChainParser};
use std::sync::Arc;
use tokio::sync::OnceCell;

pub const JOB_NAME_INPUT: &str = "job-name";
pub const JOB_MATRIX_INPUT: &str = "#job-matrix";
pub const WORKFLOW_CONTEXT_INPUT: &str = "workflow-context";

/// Finds the job this process runs in. The first successful lookup is kept for
/// the lifetime of the resolver; concurrent callers share one in-flight lookup.
pub struct JobResolver {
    api: Arc<dyn GitHubApi>,
    context: Arc<ActionContext>,
    inputs: InputResolver,
    current: OnceCell<JobDescriptor>,
}

impl JobResolver {
    pub fn new(api: Arc<dyn GitHubApi>, context: Arc<ActionContext>, inputs: InputResolver) -> Self {
        Self {
            api,
            context,
            inputs,
            current: OnceCell::new(),
        }
    }

    pub fn context(&self) -> &ActionContext {
        &self.context
    }

    pub async fn resolve_current_job(&self) -> Result<&JobDescriptor> {
        self.current.get_or_try_init(|| self.fetch_current_job()).await
    }

    /// Job name, matrix and caller chain from the step inputs.
    pub fn identity(&self) -> Result<JobIdentity> {
        let job = self.inputs.required(JOB_NAME_INPUT)?;
        let matrix = self
            .inputs
            .resolve(JOB_MATRIX_INPUT, &Typed::<Option<Matrix>>::new())?
            .flatten();
        let ancestor_chain = self
            .inputs
            .resolve(WORKFLOW_CONTEXT_INPUT, &WorkflowContextChainParser::new())?
            .unwrap_or_default();
        Ok(JobIdentity {
            job,
            matrix,
            ancestor_chain,
        })
    }

    async fn fetch_current_job(&self) -> Result<JobDescriptor> {
        let ctx = &self.context;
        let jobs = self
            .api
            .list_jobs_for_run_attempt(&ctx.owner, &ctx.repo, ctx.run_id, ctx.run_attempt)
            .await
            .map_err(|err| listing_error(err, "actions", "read"))?;

        let name = self.identity()?.absolute_name();
        log::debug!(
            "looking for job '{name}' among {} jobs of run {} attempt {}",
            jobs.len(),
            ctx.run_id,
            ctx.run_attempt
        );

        let job = jobs
            .into_iter()
            .find(|job| job.name == name)
            .ok_or(NotFoundError { name })?;
        log::info!("Resolved current job '{}' (id {})", job.name, job.id);
        Ok(job)
    }
}
