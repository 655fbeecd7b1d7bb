use clap::ValueEnum;
use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use reelwall_core::{total_label, LayoutPass, Rect};
use reelwall_models::{MediaSummary, RuntimeBreakdown, WatchListEntry};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{} {}", "✓".green(), msg.as_ref()),
            _ => self.print_json(&json!({ "type": "success", "message": msg.as_ref() })),
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Shown even in quiet mode
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            _ => self.print_json(&json!({ "type": "error", "message": msg.as_ref() })),
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            _ => self.print_json(&json!({ "type": "info", "message": msg.as_ref() })),
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{} {}", "⚠".yellow(), msg.as_ref()),
            _ => self.print_json(&json!({ "type": "warning", "message": msg.as_ref() })),
        }
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format != OutputFormat::Human {
            return;
        }
        self.print_json(data);
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(data).unwrap_or_default()),
            OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(data).unwrap_or_default()),
            OutputFormat::Human => println!("{}", data),
        }
    }

    pub fn table(&self, table: &Table) {
        if !self.quiet {
            println!("{}", table);
        }
    }
}

pub fn section_header(title: &str) -> String {
    format!("\n{}\n{}", title.bold().bright_cyan(), "─".repeat(title.chars().count()).bright_cyan())
}

fn styled_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        header
            .into_iter()
            .map(|h| Cell::new(h).fg(Color::Cyan).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

pub fn results_table(results: &[MediaSummary]) -> Table {
    let mut table = styled_table(vec!["#", "ID", "Type", "Title", "Released"]);
    for (index, result) in results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(result.id),
            Cell::new(result.media_type),
            Cell::new(truncate(&result.title, 48)),
            Cell::new(&result.release_date),
        ]);
    }
    table
}

/// Positions relative to the canvas, with unplaced items listed last
pub fn layout_table(results: &[MediaSummary], pass: &LayoutPass<usize>, canvas: &Rect) -> Table {
    let mut table = styled_table(vec!["Title", "Left", "Top", "Width", "Height"]);
    for (index, rect) in pass.placed() {
        let Some(result) = results.get(*index) else { continue };
        let rect = rect.relative_to(canvas);
        table.add_row(vec![
            Cell::new(truncate(&result.title, 40)),
            Cell::new(rect.left),
            Cell::new(rect.top),
            Cell::new(rect.width),
            Cell::new(rect.height),
        ]);
    }
    for index in pass.unplaced() {
        let Some(result) = results.get(*index) else { continue };
        table.add_row(vec![
            Cell::new(truncate(&result.title, 40)).fg(Color::DarkGrey),
            Cell::new("unplaced").fg(Color::Yellow),
            Cell::new(""),
            Cell::new(""),
            Cell::new(""),
        ]);
    }
    table
}

pub fn watchlist_table(entries: &[WatchListEntry], total: &RuntimeBreakdown) -> Table {
    let mut table = styled_table(vec!["ID", "Title", "Released", "Runtime"]);
    for entry in entries {
        let runtime = if entry.runtime_minutes == 0 {
            Cell::new(entry.runtime_label()).fg(Color::DarkGrey)
        } else {
            Cell::new(entry.runtime_label())
        };
        table.add_row(vec![
            Cell::new(entry.id),
            Cell::new(truncate(&entry.title, 40)),
            Cell::new(&entry.release_date),
            runtime,
        ]);
    }
    table.add_row(vec![
        Cell::new(""),
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(total_label(total)).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn breakdown_json(minutes: u64, breakdown: &RuntimeBreakdown) -> serde_json::Value {
    json!({
        "totalRuntimeMinutes": minutes,
        "runTimeDays": breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelwall_models::MediaKind;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Heat", 10), "Heat");
        assert_eq!(truncate("The Lord of the Rings", 8), "The Lor…");
    }

    #[test]
    fn test_watchlist_table_has_total_row() {
        let entries = vec![
            WatchListEntry::new(1, "Heat".to_string(), "1995".to_string(), MediaKind::Movie, 170),
            WatchListEntry::new(2, "Lost".to_string(), "2004".to_string(), MediaKind::Tv, 0),
        ];
        let rendered = watchlist_table(&entries, &RuntimeBreakdown::from_minutes(170)).to_string();
        assert!(rendered.contains("0 days, 2 hours, 50 minutes"));
        assert!(rendered.contains("Run time unavailable"));
        assert!(rendered.contains("0 Days 2 Hours 50 Mins"));
    }

    #[test]
    fn test_breakdown_json_shape() {
        let value = breakdown_json(1500, &RuntimeBreakdown::from_minutes(1500));
        assert_eq!(value, json!({"totalRuntimeMinutes": 1500, "runTimeDays": {"DD": 1, "HH": 1, "MM": 0}}));
    }
}
