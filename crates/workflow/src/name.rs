use crate::context::{Matrix, WorkflowContext};

/// Everything needed to reproduce the display name the job list shows for a job.
#[derive(Debug, Clone, Default)]
pub struct JobIdentity {
    pub job: String,
    pub matrix: Option<Matrix>,
    pub ancestor_chain: Vec<WorkflowContext>,
}

impl JobIdentity {
    pub fn absolute_name(&self) -> String {
        absolute_job_name(&self.job, self.matrix.as_ref(), &self.ancestor_chain)
    }
}

/// `job (v1, v2)` when the matrix has scalar leaves, otherwise just `job`.
pub fn display_name(job: &str, matrix: Option<&Matrix>) -> String {
    let values = matrix.map(Matrix::flat_values).unwrap_or_default();
    if values.is_empty() {
        job.to_string()
    } else {
        format!("{job} ({})", values.join(", "))
    }
}

/// Prefixes each caller's display name, so the last chain entry ends up leftmost.
pub fn absolute_job_name(job: &str, matrix: Option<&Matrix>, chain: &[WorkflowContext]) -> String {
    chain.iter().fold(display_name(job, matrix), |name, caller| {
        format!("{} / {name}", display_name(&caller.job, caller.matrix.as_ref()))
    })
}
