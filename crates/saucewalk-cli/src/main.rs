use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use saucewalk_cli::OutputFormat;
use saucewalk_cli::commands;
use saucewalk_cli::commands::run::RunOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "saucewalk")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Walk the SauceDemo shop from login to logout in Chrome and check every page",
    long_about = "Saucewalk drives Chrome over the DevTools Protocol through one fixed journey: \
                  log in, open the first T-shirt, add it to the cart, check out, and log out. \
                  Every step is verified and the first unmet expectation fails the run."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the checkout journey in Chrome
    Run {
        /// Base URL of the shop
        #[arg(
            long,
            env = "SAUCEWALK_BASE_URL",
            default_value = saucewalk_core::model::DEFAULT_BASE_URL
        )]
        base_url: String,

        /// Path to Chrome executable (auto-detected if not specified)
        #[arg(long, env = "SAUCEWALK_CHROME_PATH")]
        chrome_path: Option<PathBuf>,

        /// Show the browser window instead of running headless
        #[arg(long)]
        headed: bool,

        /// Use a named profile kept in ~/.saucewalk/profiles
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,

        /// Use a temporary profile (the default; overrides --profile)
        #[arg(long)]
        temp: bool,

        /// Seconds to wait for an element before failing
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,

        /// Chrome remote debugging port
        #[arg(long, default_value_t = 9222)]
        debugging_port: u16,

        /// Also write the JSON report of a passing run to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    #[command(after_help = "SUPPORTED SHELLS:\n  \
        bash, zsh, fish, powershell, elvish\n\n\
        INSTALLATION:\n  \
        bash:  saucewalk completion --shell bash >> ~/.bashrc\n  \
        zsh:   saucewalk completion --shell zsh > \"${fpath[1]}/_saucewalk\"\n  \
        fish:  saucewalk completion --shell fish > ~/.config/fish/completions/saucewalk.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    tracing::debug!("Output format: {}", cli.format.as_str());

    match cli.command {
        Commands::Run {
            base_url,
            chrome_path,
            headed,
            profile,
            temp,
            timeout_secs,
            debugging_port,
            report,
        } => commands::run::execute(
            RunOptions {
                base_url,
                chrome_path,
                headed,
                profile,
                temp,
                timeout_secs,
                debugging_port,
                report,
            },
            cli.format,
        ),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("saucewalk=debug,saucewalk_cli=debug,saucewalk_core=debug,saucewalk_browser=debug")
    } else {
        EnvFilter::new("saucewalk=info,saucewalk_cli=info,saucewalk_core=info,saucewalk_browser=info")
    };

    // Logs go to stderr so `--format json` output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
