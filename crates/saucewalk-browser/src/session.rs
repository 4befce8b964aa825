use crate::{CdpPage, CdpSession, ChromeFinder, ChromeLauncher, ProfileManager, Result, WaitConfig};
use chromiumoxide::browser::Browser;
use std::io;
use std::path::PathBuf;
use std::process::{Child, ExitStatus};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// How long Chrome gets to exit on its own before it is killed
const EXIT_GRACE: Duration = Duration::from_secs(5);

/// Which Chrome profile directory the session runs with
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProfileChoice {
    /// Fresh directory, removed when the session ends
    #[default]
    Temporary,
    /// Named profile kept under `~/.saucewalk/profiles`
    Named(String),
}

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
    pub profile: ProfileChoice,
    pub debugging_port: u16,
    pub window_size: (u32, u32),
    pub wait: WaitConfig,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            profile: ProfileChoice::Temporary,
            debugging_port: 9222,
            window_size: (1280, 800),
            wait: WaitConfig::default(),
        }
    }
}

/// A running Chrome with one page ready to drive
///
/// Chrome is killed when the session is closed or dropped.
pub struct BrowserSession {
    chrome: Child,
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: CdpPage,
    // Dropped last so a temporary profile outlives Chrome
    _profile: ProfileManager,
}

impl BrowserSession {
    pub async fn launch(options: LaunchOptions) -> Result<Self> {
        let chrome_binary = ChromeFinder::new(options.chrome_path).find()?;
        tracing::info!("Found Chrome at: {}", chrome_binary.display());

        let profile = match &options.profile {
            ProfileChoice::Temporary => ProfileManager::temporary()?,
            ProfileChoice::Named(name) => ProfileManager::named(name)?,
        };
        tracing::debug!("Using profile {}", profile.path().display());

        let launcher = ChromeLauncher::new(
            chrome_binary,
            profile.path().to_path_buf(),
            options.headless,
        )
        .with_debugging_port(options.debugging_port)
        .with_window_size(options.window_size.0, options.window_size.1);
        let chrome = launcher.launch()?;
        tracing::info!(
            "Chrome started ({}), pid {}",
            if options.headless { "headless" } else { "headed" },
            chrome.id()
        );

        let connected = match CdpSession::new(launcher.debugging_port()).connect().await {
            Ok(connected) => connected,
            Err(e) => {
                let mut chrome = chrome;
                let _ = chrome.kill();
                let _ = reap(&mut chrome, Duration::ZERO).await;
                return Err(e);
            }
        };

        Ok(Self {
            chrome,
            browser: connected.browser,
            handler_task: connected.handler_task,
            page: CdpPage::new(connected.page, options.wait),
            _profile: profile,
        })
    }

    /// The page the scenario drives
    pub fn page(&mut self) -> &mut CdpPage {
        &mut self.page
    }

    /// Close the browser and wait for the Chrome process to exit
    pub async fn close(mut self) -> Result<()> {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("Browser.close failed, killing Chrome: {}", e);
            let _ = self.chrome.kill();
        }
        self.handler_task.abort();

        let status = reap(&mut self.chrome, EXIT_GRACE).await?;
        tracing::debug!("Chrome exited with {}", status);
        Ok(())
    }
}

/// Wait for `child` to exit without blocking the runtime, killing it once
/// `grace` has passed
async fn reap(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    let deadline = Instant::now() + grace;
    let mut killed = false;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if !killed && Instant::now() >= deadline {
            tracing::debug!("Chrome still running after {:?}, killing it", grace);
            let _ = child.kill();
            killed = true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // No-op when Chrome has already been reaped by close()
        if let Ok(None) = self.chrome.try_wait() {
            let _ = self.chrome.kill();
            let _ = self.chrome.wait();
        }
        self.handler_task.abort();
    }
}
