//! # jobctx resolver
//!
//! Works out which job of the workflow run this process belongs to, and which
//! in-progress deployment (if any) that job is performing.
//!
//! ## Architecture
//!
//! ```text
//! ActionContext (env) ─┐
//! InputResolver ───────┼──> JobResolver ──> list jobs of run attempt
//!                      │        │              └─ match absolute job name
//!                      │        ▼
//!                      └──> DeploymentResolver ──> list deployments (sha, task=deploy)
//!                                                   ├─ keep workflow-token deployments
//!                                                   ├─ GraphQL nodes (state, latest status)
//!                                                   └─ match status log URL to the job
//! ```
//!
//! Both resolvers memoize their first successful result for their own lifetime.

mod context;
mod deployment;
mod error;
mod job;
#[cfg(test)]
mod testing;

pub use context::ActionContext;
pub use deployment::{DeploymentDescriptor, DeploymentResolver, DEPLOY_TASK};
pub use error::{
    ConsistencyError, EnvironmentError, NotFoundError, PermissionError, ResolveError, Result,
    PERMISSIONS_DOC_URL,
};
pub use job::{JobResolver, JOB_MATRIX_INPUT, JOB_NAME_INPUT, WORKFLOW_CONTEXT_INPUT};
