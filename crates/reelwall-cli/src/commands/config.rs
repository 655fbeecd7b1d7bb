use super::{prompts, Context};
use crate::output::{section_header, Output};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use reelwall_config::{Config, CredentialStore, PathManager, API_KEY_ENV_VARS};
use serde_json::json;

pub async fn run_config(cmd: crate::ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show { full } => show_config(full, output),
        crate::ConfigCommands::ApiKey { key } => configure_api_key(key, output),
        crate::ConfigCommands::Init { force } => init_config(force, output),
    }
}

/// Where the effective API key comes from
fn api_key_origin(credentials: &CredentialStore) -> Option<(String, &'static str)> {
    for name in API_KEY_ENV_VARS {
        if let Ok(value) = std::env::var(name) {
            if !value.trim().is_empty() {
                return Some((value, name));
            }
        }
    }
    credentials
        .get_tmdb_api_key()
        .map(|key| (key.clone(), "credentials.toml"))
}

fn settings_table(title: &str, rows: Vec<(&str, String)>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let ctx = Context::load()?;
    let config_file = ctx.paths.config_file();
    let config = &ctx.config;

    let key = api_key_origin(&ctx.credentials);
    let key_display = match &key {
        Some((value, _)) if full => value.clone(),
        Some((value, _)) => mask_string(value),
        None => "<not set>".to_string(),
    };
    let key_origin = key.as_ref().map(|(_, origin)| *origin);

    if !output.is_human() {
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "config_file_exists": config_file.exists(),
            "api_key": key_display,
            "api_key_source": key_origin,
            "config": config,
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    output.info(section_header("Configuration"));
    let file_state = if config_file.exists() {
        config_file.display().to_string()
    } else {
        format!("{} {}", config_file.display(), "(not created, using defaults)".bright_black())
    };
    output.table(&settings_table("Files", vec![
        ("Config File", file_state),
        ("Credentials", ctx.paths.credentials_file().display().to_string()),
    ]));

    let updated = ctx
        .credentials
        .get_tmdb_api_key_updated()
        .filter(|_| key_origin == Some("credentials.toml"))
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string());
    let mut tmdb_rows = vec![
        ("API Key", key_display),
        ("Key Source", key_origin.unwrap_or("-").to_string()),
    ];
    if let Some(updated) = updated {
        tmdb_rows.push(("Key Updated", updated));
    }
    tmdb_rows.extend([
        ("API Base", config.tmdb.api_base.clone()),
        ("Image Base", config.tmdb.image_base.clone()),
        ("Placeholder", config.tmdb.placeholder_url.clone()),
        ("Include Adult", check(config.tmdb.include_adult)),
        ("Timeout", format!("{}s", config.tmdb.request_timeout_secs)),
    ]);
    output.table(&settings_table("TMDB", tmdb_rows));

    output.table(&settings_table("Search", vec![
        ("Default Query", config.search.default_query.clone()),
        ("Result Limit", config.search.result_limit.to_string()),
        ("Require Query", check(config.search.require_query)),
    ]));
    output.table(&settings_table("Server", vec![("Bind", config.server.bind.clone())]));
    output.table(&settings_table("Layout", vec![
        ("Poster Width", format!("{}-{} px", config.layout.min_size, config.layout.max_size)),
        ("Aspect Ratio", config.layout.aspect_ratio.to_string()),
        ("Margin", format!("{} px", config.layout.margin)),
        ("Max Attempts", config.layout.max_attempts.to_string()),
    ]));
    Ok(())
}

fn check(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

fn configure_api_key(key_arg: Option<String>, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;

    let mut store = CredentialStore::new(paths.credentials_file());
    store
        .load()
        .map_err(|e| eyre!("Failed to load credentials: {}", e))?;

    let key = match key_arg {
        Some(key) => key,
        None => {
            output.info(section_header("TMDB API Key"));
            output.info("Create a key at https://www.themoviedb.org/settings/api");
            prompts::prompt_password("TMDB API Key")?
        }
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(eyre!("API key cannot be empty"));
    }

    store.set_tmdb_api_key(key);
    store
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;
    output.success(format!("API key saved to {}", paths.credentials_file().display()));

    for name in API_KEY_ENV_VARS {
        if std::env::var(name).map(|v| !v.trim().is_empty()).unwrap_or(false) {
            output.warn(format!("{} is set and takes precedence over the stored key", name));
        }
    }
    Ok(())
}

fn init_config(force: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config_file = paths.config_file();
    if config_file.exists() && !force {
        output.warn(format!(
            "Config file already exists at {} (use --force to overwrite)",
            config_file.display()
        ));
        return Ok(());
    }

    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {}", config_file.display(), e))?;
    output.success(format!("Wrote default configuration to {}", config_file.display()));
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
