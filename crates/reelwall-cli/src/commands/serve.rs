use super::Context;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use reelwall_config::PathManager;
use reelwall_server::AppState;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// `--log-file` without a value means the default log location
pub fn log_file_path(arg: Option<&Path>) -> PathBuf {
    match arg {
        Some(path) => path.to_path_buf(),
        None => PathManager::default().server_log_file(),
    }
}

fn bind_address(arg: Option<String>, configured: &str) -> Result<SocketAddr> {
    let raw = arg.unwrap_or_else(|| configured.to_string());
    raw.parse()
        .map_err(|_| eyre!("Invalid bind address '{}', expected HOST:PORT", raw))
}

pub async fn run_serve(bind: Option<String>, output: &Output) -> Result<()> {
    let ctx = Context::load()?;
    let addr = bind_address(bind, &ctx.config.server.bind)?;
    let source = ctx.source(None)?;

    output.info(format!("Reelwall proxy starting on http://{} (ctrl-c to stop)", addr));
    reelwall_server::serve(addr, AppState::new(source, ctx.config.search.clone()))
        .await
        .map_err(|e| eyre!("Server error: {}", e))?;

    output.success("Server stopped");
    Ok(())
}
