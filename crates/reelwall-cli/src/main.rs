use clap::{ArgAction, Parser, Subcommand};
use commands::{browse, config, runtime, search, serve};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reelwall")]
#[command(about = "Reelwall - A poster wall for finding movies and shows, with a watch-list that adds up the hours")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the metadata proxy server
    #[command(long_about = "Serve GET /search and GET /runtime, forwarding to TMDB with the locally configured API key. The key is never sent to clients.")]
    Serve {
        /// Address to bind (overrides server.bind from the config file)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,

        /// Write logs to a daily-rotating file instead of stderr
        /// (defaults to logs/reelwall.log under the config directory)
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        log_file: Option<Option<PathBuf>>,
    },
    /// Search movies, shows and people
    #[command(long_about = "Run one search and print the results. An empty query searches for the configured default term. With --layout, also scatter the posters over a virtual canvas and print their positions.")]
    Search {
        /// Search text (defaults to search.default_query)
        query: Option<String>,

        /// Talk to a running Reelwall proxy instead of TMDB directly
        #[arg(long, value_name = "URL")]
        server: Option<String>,

        /// Canvas size for a layout pass, e.g. 1280x800
        #[arg(long, value_name = "WIDTHxHEIGHT")]
        layout: Option<search::CanvasSize>,
    },
    /// Look up the total runtime of a movie or show
    Runtime {
        /// TMDB id
        id: u64,

        /// Media type: movie or tv
        #[arg(long = "type", value_name = "TYPE")]
        kind: String,

        /// Talk to a running Reelwall proxy instead of TMDB directly
        #[arg(long, value_name = "URL")]
        server: Option<String>,
    },
    /// Interactive poster wall session in the terminal
    #[command(long_about = "Search, add and remove titles on a session watch-list and see the combined runtime. Nothing is saved when the session ends.")]
    Browse {
        /// Talk to a running Reelwall proxy instead of TMDB directly
        #[arg(long, value_name = "URL")]
        server: Option<String>,
    },
    /// View or change configuration and credentials
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Store the TMDB API key in the credentials file
    #[command(long_about = "Store the TMDB API key in credentials.toml. The API_KEY and TMDB_API_KEY environment variables take precedence over the stored key.")]
    ApiKey {
        /// TMDB API key (if not provided, will prompt)
        #[arg(long)]
        key: Option<String>,
    },

    /// Write a config file with every default filled in
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = match &cli.command {
        Commands::Serve { log_file: Some(path), .. } => Some(serve::log_file_path(path.as_deref())),
        _ => None,
    };
    match log_file {
        Some(path) => logging::init_logging_with_file(cli.verbose, cli.quiet, Some(path)),
        None => logging::init_logging(cli.verbose, cli.quiet),
    }
    .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Serve { bind, .. } => serve::run_serve(bind, &output).await,
        Commands::Search { query, server, layout } => search::run_search(query, server, layout, &output).await,
        Commands::Runtime { id, kind, server } => runtime::run_runtime(id, &kind, server, &output).await,
        Commands::Browse { server } => browse::run_browse(server, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output).await,
    }
}
