use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    jobctx_cli::main_entry().await
}
