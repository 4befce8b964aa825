use crate::{Error, Result};
use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Manages Chrome DevTools Protocol session
pub struct CdpSession {
    debugging_port: u16,
    attempts: u32,
    retry_delay: Duration,
}

/// A live CDP connection and the page the scenario will drive
pub struct ConnectedBrowser {
    pub browser: Browser,
    pub page: Page,
    pub handler_task: JoinHandle<()>,
}

impl CdpSession {
    /// Create a new CDP session
    pub fn new(debugging_port: u16) -> Self {
        Self {
            debugging_port,
            attempts: 10,
            retry_delay: Duration::from_millis(500),
        }
    }

    /// Connect to Chrome and open the page to drive
    pub async fn connect(&self) -> Result<ConnectedBrowser> {
        tracing::info!(
            "CDP session: connecting to Chrome on port {}",
            self.debugging_port
        );

        // Chrome needs a moment before the debugging endpoint answers
        let endpoint = format!("http://localhost:{}", self.debugging_port);
        let (browser, mut handler) = {
            let mut remaining = self.attempts;
            loop {
                tracing::debug!("Attempting CDP connection to {}...", endpoint);
                match Browser::connect(&endpoint).await {
                    Ok(result) => {
                        tracing::info!("CDP connection established");
                        break result;
                    }
                    Err(e) => {
                        remaining -= 1;
                        if remaining == 0 {
                            return Err(Error::Cdp(format!(
                                "Failed to connect to Chrome after {} attempts: {}",
                                self.attempts, e
                            )));
                        }
                        tracing::debug!(
                            "CDP connection attempt failed, retrying... ({} left)",
                            remaining
                        );
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        };

        // The handler stream must be polled for any command to complete
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        let page = match browser.pages().await?.into_iter().next() {
            Some(page) => {
                tracing::debug!("CDP: using existing page");
                page
            }
            None => {
                tracing::debug!("CDP: no existing pages, creating new page");
                browser.new_page("about:blank").await?
            }
        };

        Ok(ConnectedBrowser {
            browser,
            page,
            handler_task,
        })
    }
}
