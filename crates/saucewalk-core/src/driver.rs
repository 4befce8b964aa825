//! The seam between the scenario and whatever drives the browser.
//!
//! Every method resolves only once the browser has finished the action, so the
//! effect of one call is observable by the next. Implementations own any
//! implicit waiting for elements to appear; the scenario never retries.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("No element matching '{selector}' appeared within {timeout_ms}ms")]
    ElementNotFound { selector: String, timeout_ms: u64 },

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Interaction with '{selector}' failed: {message}")]
    Interaction { selector: String, message: String },

    #[error("Page script failed: {0}")]
    Script(String),
}

pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// One browser page session
#[async_trait]
pub trait PageDriver: Send {
    /// Load `url` and wait for the navigation to settle
    async fn navigate(&mut self, url: &str) -> DriverResult<()>;

    /// Replace the text of the input matching `selector` with `value`
    async fn fill(&mut self, selector: &str, value: &str) -> DriverResult<()>;

    /// Click the first element matching `selector`
    async fn click(&mut self, selector: &str) -> DriverResult<()> {
        self.click_nth(selector, 0).await
    }

    /// Click the `index`-th element (zero based) matching `selector`
    async fn click_nth(&mut self, selector: &str, index: usize) -> DriverResult<()>;

    /// Text content of the first element matching `selector`
    ///
    /// Waits for the element. Returns `None` when the element carries no text node.
    async fn text_content(&mut self, selector: &str) -> DriverResult<Option<String>>;

    /// Whether the first element matching `selector` is rendered
    ///
    /// Does not wait: a missing element is simply not visible.
    async fn is_visible(&mut self, selector: &str) -> DriverResult<bool>;

    /// URL the page currently shows
    async fn current_url(&mut self) -> DriverResult<String>;
}
