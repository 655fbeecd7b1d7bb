use super::{prompts, Context};
use crate::output::{results_table, section_header, watchlist_table, Output};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use reelwall_core::{AddOutcome, AddRejected, Controller, LayoutEngine, SearchOutcome, Viewport};
use reelwall_models::MediaSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    Add,
    Remove,
    Details,
    ToggleWatchList,
    Quit,
}

impl Action {
    const ALL: [Action; 6] = [
        Action::Search,
        Action::Add,
        Action::Remove,
        Action::Details,
        Action::ToggleWatchList,
        Action::Quit,
    ];

    fn label(&self, watchlist_open: bool) -> &'static str {
        match self {
            Action::Search => "Search",
            Action::Add => "Add to watch-list",
            Action::Remove => "Remove from watch-list",
            Action::Details => "Show details",
            Action::ToggleWatchList if watchlist_open => "Hide watch-list",
            Action::ToggleWatchList => "Show watch-list",
            Action::Quit => "Quit",
        }
    }
}

fn result_label(summary: &MediaSummary) -> String {
    format!("{} ({}, {})", summary.title, summary.media_type, summary.release_date)
}

pub async fn run_browse(server: Option<String>, output: &Output) -> Result<()> {
    if !output.is_human() {
        return Err(eyre!("browse is interactive and only supports --output human"));
    }

    let ctx = Context::load()?;
    let source = ctx.source(server.as_deref())?;
    let controller = Controller::new(
        source,
        LayoutEngine::from_config(&ctx.config.layout),
        Viewport::default(),
    );

    output.info(section_header("Reelwall"));
    output.info(format!("Source: {}", controller.source_name().bright_black()));
    // Opening view shows the default search term's results
    run_search(&controller, "", output).await;

    loop {
        let watchlist_open = controller.with_session(|s| s.is_watchlist_open()).await;
        let labels: Vec<&str> = Action::ALL.iter().map(|a| a.label(watchlist_open)).collect();
        let choice = prompts::prompt_select("What next?", &labels, 0)?;

        match Action::ALL[choice] {
            Action::Search => {
                let query = prompts::prompt_string("Search", None)?;
                run_search(&controller, &query, output).await;
            }
            Action::Add => add(&controller, output).await?,
            Action::Remove => remove(&controller, output).await?,
            Action::Details => details(&controller, output).await?,
            Action::ToggleWatchList => {
                controller.toggle_watchlist_panel().await;
            }
            Action::Quit => break,
        }

        if controller.with_session(|s| s.is_watchlist_open()).await {
            print_watchlist(&controller, output).await;
        }
    }

    let total = controller.with_session(|s| s.total_breakdown()).await;
    output.info(format!(
        "Session ended. Watch-list total: {}",
        reelwall_core::total_label(&total)
    ));
    Ok(())
}

async fn run_search(controller: &Controller, query: &str, output: &Output) {
    match controller.search(query).await {
        SearchOutcome::Applied { results, placed } => {
            let table = controller.with_session(|s| results_table(s.results())).await;
            output.table(&table);
            output.info(
                format!("{} results, {} posters placed", results, placed)
                    .bright_black()
                    .to_string(),
            );
        }
        SearchOutcome::Stale => {}
        SearchOutcome::Failed => output.error("Error fetching results, keeping the previous results"),
    }
}

async fn pick_result(controller: &Controller, prompt: &str, output: &Output) -> Result<Option<MediaSummary>> {
    let results = controller.with_session(|s| s.results().to_vec()).await;
    if results.is_empty() {
        output.warn("No results on screen, search first");
        return Ok(None);
    }
    let labels: Vec<String> = results.iter().map(result_label).collect();
    let index = prompts::prompt_select(prompt, &labels, 0)?;
    Ok(results.into_iter().nth(index))
}

async fn add(controller: &Controller, output: &Output) -> Result<()> {
    let Some(summary) = pick_result(controller, "Add which title?", output).await? else {
        return Ok(());
    };
    match controller.add(&summary).await {
        AddOutcome::Added(entry) => {
            output.success(format!("Added {} ({})", entry.title, entry.runtime_label()));
        }
        AddOutcome::Rejected(AddRejected::AlreadyListed) => {
            output.warn(format!("{} is already on the watch-list", summary.title));
        }
        AddOutcome::Rejected(AddRejected::Pending) => {
            output.warn(format!("Still looking up {}", summary.title));
        }
        AddOutcome::NotInResults => output.warn("That title is no longer on screen"),
    }
    Ok(())
}

async fn remove(controller: &Controller, output: &Output) -> Result<()> {
    let entries = controller.with_session(|s| s.watchlist().to_vec()).await;
    if entries.is_empty() {
        output.warn("Watch-list is empty");
        return Ok(());
    }
    let labels: Vec<String> = entries
        .iter()
        .map(|e| format!("{} ({})", e.title, e.runtime_label()))
        .collect();
    let index = prompts::prompt_select("Remove which title?", &labels, 0)?;
    if let Some(removed) = controller.remove(entries[index].id).await {
        output.success(format!("Removed {}", removed.title));
    }
    Ok(())
}

async fn details(controller: &Controller, output: &Output) -> Result<()> {
    let Some(summary) = pick_result(controller, "Details for which title?", output).await? else {
        return Ok(());
    };
    if let Some(selected) = controller.select(summary.id).await {
        output.info(section_header(&selected.title));
        output.info(format!("{} {}", "Released:".bold(), selected.release_date));
        output.info(format!("{} {}", "Type:".bold(), selected.media_type));
        output.info(format!("{} {}", "Poster:".bold(), selected.poster_url.bright_black()));
        output.info(format!("\n{}\n", selected.overview));
    }
    controller.clear_selection().await;
    Ok(())
}

async fn print_watchlist(controller: &Controller, output: &Output) {
    let (entries, total) = controller
        .with_session(|s| (s.watchlist().to_vec(), s.total_breakdown()))
        .await;
    output.info(section_header("Watch-list"));
    if entries.is_empty() {
        output.info("Nothing added yet".bright_black().to_string());
        return;
    }
    output.table(&watchlist_table(&entries, &total));
}
