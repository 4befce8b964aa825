use crate::{OutputFormat, render};
use anyhow::{Context, Result};
use saucewalk_browser::{BrowserSession, LaunchOptions, ProfileChoice, WaitConfig};
use saucewalk_core::{Scenario, ScenarioConfig, ScenarioReport};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Options of the `run` subcommand
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub base_url: String,
    pub chrome_path: Option<PathBuf>,
    pub headed: bool,
    pub profile: Option<String>,
    pub temp: bool,
    pub timeout_secs: u64,
    pub debugging_port: u16,
    pub report: Option<PathBuf>,
}

impl RunOptions {
    fn profile_choice(&self) -> ProfileChoice {
        match (&self.profile, self.temp) {
            (Some(name), true) => {
                tracing::warn!(
                    "Both --profile '{}' and --temp given; using a temporary profile",
                    name
                );
                ProfileChoice::Temporary
            }
            (Some(name), false) => ProfileChoice::Named(name.clone()),
            (None, _) => ProfileChoice::Temporary,
        }
    }

    fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            chrome_path: self.chrome_path.clone(),
            headless: !self.headed,
            profile: self.profile_choice(),
            debugging_port: self.debugging_port,
            wait: WaitConfig::with_timeout(Duration::from_secs(self.timeout_secs)),
            ..LaunchOptions::default()
        }
    }
}

pub fn execute(options: RunOptions, format: OutputFormat) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(run(options, format));

    // Don't hang on a blocked CDP handler task
    runtime.shutdown_timeout(Duration::from_millis(100));

    result
}

async fn run(options: RunOptions, format: OutputFormat) -> Result<()> {
    // Reject a bad base URL before Chrome is started
    let scenario = Scenario::new(ScenarioConfig {
        base_url: options.base_url.clone(),
    })?;

    tracing::info!("Launching Chrome...");
    let mut session = BrowserSession::launch(options.launch_options()).await?;

    let outcome = scenario.run(session.page()).await;

    if let Err(e) = session.close().await {
        tracing::warn!("Failed to close Chrome cleanly: {}", e);
    }

    match outcome {
        Ok(report) => {
            println!("{}", render::report(&report, format));
            if let Some(path) = &options.report {
                write_report(path, &report)?;
                tracing::info!("Report written to: {}", path.display());
            }
            Ok(())
        }
        Err(err) => {
            println!("{}", render::failure(&err, format));
            Err(err.into())
        }
    }
}

fn write_report(path: &Path, report: &ScenarioReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
