use super::Context;
use crate::output::{breakdown_json, Output};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use reelwall_core::{to_breakdown, total_label};
use reelwall_models::MediaKind;

pub async fn run_runtime(id: u64, kind: &str, server: Option<String>, output: &Output) -> Result<()> {
    let kind: MediaKind = kind.parse().map_err(|e: String| eyre!(e))?;
    if !kind.has_runtime() {
        return Err(eyre!("Unsupported media type: {}", kind));
    }

    let ctx = Context::load()?;
    let source = ctx.source(server.as_deref())?;
    let minutes = source
        .lookup_runtime(id, kind)
        .await
        .map_err(|e| eyre!("Error fetching runtime data: {}", e))?;
    let breakdown = to_breakdown(minutes);

    if !output.is_human() {
        output.json(&breakdown_json(minutes, &breakdown));
        return Ok(());
    }

    output.info(format!(
        "{} {}: {} minutes ({})",
        kind.as_str().bright_black(),
        id.bold(),
        minutes,
        total_label(&breakdown).bright_cyan()
    ));
    Ok(())
}
