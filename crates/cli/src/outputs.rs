use anyhow::{Context as AnyhowContext, Result};
use jobctx_github::JobDescriptor;
use jobctx_resolver::DeploymentDescriptor;
use jobctx_toolkit::command;

/// Step outputs collected before anything is written.
#[derive(Debug, Default)]
pub(crate) struct Outputs {
    pairs: Vec<(&'static str, String)>,
}

impl Outputs {
    pub(crate) fn job(&mut self, job: &JobDescriptor) {
        self.push("job-id", job.id.to_string());
        self.push("job-name", job.name.clone());
        if let Some(url) = &job.html_url {
            self.push("job-url", url.clone());
        }
    }

    pub(crate) fn deployment(&mut self, deployment: &DeploymentDescriptor) {
        self.push("deployment-id", deployment.id.to_string());
        self.push("deployment-environment", deployment.environment.clone());
        self.push("deployment-url", deployment.url.clone());
        self.push("deployment-workflow-url", deployment.workflow_url.clone());
        if let Some(url) = &deployment.log_url {
            self.push("deployment-log-url", url.clone());
        }
        if let Some(url) = &deployment.environment_url {
            self.push("deployment-environment-url", url.clone());
        }
    }

    fn push(&mut self, name: &'static str, value: String) {
        self.pairs.push((name, value));
    }

    pub(crate) fn publish(&self) -> Result<()> {
        for (name, value) in &self.pairs {
            log::debug!("output {name}={value}");
            command::set_output(name, value)
                .with_context(|| format!("Failed to write step output '{name}'"))?;
        }
        Ok(())
    }
}
