use crate::probe::{self, TextProbe};
use crate::wait::WaitConfig;
use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use saucewalk_core::PageDriver;
use saucewalk_core::driver::{DriverError, DriverResult};
use serde::de::DeserializeOwned;

/// [`PageDriver`] over a Chrome tab
///
/// Element lookups are retried until the [`WaitConfig`] timeout. An element
/// is only handed out once it is actionable: its box sits still inside the
/// viewport and a click at its centre would reach it. Every click or
/// navigation waits for the document to finish loading before it returns.
pub struct CdpPage {
    page: Page,
    wait: WaitConfig,
}

impl CdpPage {
    pub fn new(page: Page, wait: WaitConfig) -> Self {
        Self { page, wait }
    }

    async fn element(&self, selector: &str, index: usize) -> DriverResult<Element> {
        let page = &self.page;
        match self
            .wait
            .poll_until(move || async move { actionable(page, selector, index).await })
            .await
        {
            Some(element) => Ok(element),
            None => Err(self.never_actionable(selector, index).await),
        }
    }

    /// Error for an element that never became actionable: not found when it
    /// is absent from the DOM, an interaction failure when it is present
    async fn never_actionable(&self, selector: &str, index: usize) -> DriverError {
        let present = matches!(
            self.page.find_elements(selector).await,
            Ok(elements) if elements.len() > index
        );
        not_actionable_error(selector, present, self.wait.timeout_ms())
    }

    async fn eval<T: DeserializeOwned>(&self, script: &str) -> DriverResult<T> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| DriverError::Script(e.to_string()))?;
        result
            .into_value()
            .map_err(|e| DriverError::Script(e.to_string()))
    }

    /// Wait for `document.readyState` to reach `complete`
    async fn settle(&self) -> DriverResult<()> {
        let page = &self.page;
        self.wait
            .poll_until(move || async move {
                let state: String = page
                    .evaluate(probe::READY_STATE)
                    .await
                    .ok()?
                    .into_value()
                    .ok()?;
                (state == "complete").then_some(())
            })
            .await
            .ok_or_else(|| {
                DriverError::Script(format!(
                    "page did not finish loading within {}ms",
                    self.wait.timeout_ms()
                ))
            })
    }

    fn not_found(&self, selector: &str) -> DriverError {
        DriverError::ElementNotFound {
            selector: selector.to_string(),
            timeout_ms: self.wait.timeout_ms(),
        }
    }
}

/// The `index`-th match of `selector`, if it is ready to take a click
async fn actionable(page: &Page, selector: &str, index: usize) -> Option<Element> {
    let element = match page.find_elements(selector).await {
        Ok(mut elements) if elements.len() > index => elements.swap_remove(index),
        Ok(_) => return None,
        Err(e) => {
            tracing::trace!("lookup of {} failed: {}", selector, e);
            return None;
        }
    };

    for check in [probe::STABLE_BOX, probe::HIT_TEST] {
        if !holds(&element, check).await {
            tracing::trace!("{} is not actionable yet", selector);
            return None;
        }
    }
    Some(element)
}

async fn holds(element: &Element, check: &str) -> bool {
    match element.call_js_fn(check, true).await {
        Ok(returns) => returns
            .result
            .value
            .as_ref()
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false),
        Err(e) => {
            tracing::trace!("actionability check failed: {}", e);
            false
        }
    }
}

fn not_actionable_error(selector: &str, present: bool, timeout_ms: u64) -> DriverError {
    if present {
        DriverError::Interaction {
            selector: selector.to_string(),
            message: format!(
                "element is in the page but did not become visible, stable and clickable within {}ms",
                timeout_ms
            ),
        }
    } else {
        DriverError::ElementNotFound {
            selector: selector.to_string(),
            timeout_ms,
        }
    }
}

fn interaction(selector: &str) -> impl Fn(CdpError) -> DriverError + '_ {
    move |e| DriverError::Interaction {
        selector: selector.to_string(),
        message: e.to_string(),
    }
}

fn script_error(e: serde_json::Error) -> DriverError {
    DriverError::Script(e.to_string())
}

#[async_trait]
impl PageDriver for CdpPage {
    async fn navigate(&mut self, url: &str) -> DriverResult<()> {
        tracing::debug!("navigate {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| DriverError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        self.settle().await
    }

    async fn fill(&mut self, selector: &str, value: &str) -> DriverResult<()> {
        let element = self.element(selector, 0).await?;
        element
            .call_js_fn(probe::SELECT_INPUT_TEXT, false)
            .await
            .map_err(interaction(selector))?;
        element
            .type_str(value)
            .await
            .map_err(interaction(selector))?;
        Ok(())
    }

    async fn click_nth(&mut self, selector: &str, index: usize) -> DriverResult<()> {
        let page = &self.page;
        let clicked = self
            .wait
            .poll_until(move || async move {
                let element = actionable(page, selector, index).await?;
                match element.click().await {
                    Ok(_) => Some(()),
                    Err(e) => {
                        tracing::debug!("click on {} failed, retrying: {}", selector, e);
                        None
                    }
                }
            })
            .await;

        if clicked.is_none() {
            return Err(self.never_actionable(selector, index).await);
        }
        self.settle().await
    }

    async fn text_content(&mut self, selector: &str) -> DriverResult<Option<String>> {
        let script = probe::text_content(selector).map_err(script_error)?;
        let script = script.as_str();
        let page = &self.page;

        self.wait
            .poll_until(move || async move {
                let probe: TextProbe = page.evaluate(script).await.ok()?.into_value().ok()?;
                probe.found.then_some(probe.text)
            })
            .await
            .ok_or_else(|| self.not_found(selector))
    }

    async fn is_visible(&mut self, selector: &str) -> DriverResult<bool> {
        let script = probe::is_visible(selector).map_err(script_error)?;
        self.eval(&script).await
    }

    async fn current_url(&mut self) -> DriverResult<String> {
        self.eval(probe::CURRENT_URL).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_element_is_not_found() {
        let err = not_actionable_error("#finish", false, 500);
        assert!(matches!(
            err,
            DriverError::ElementNotFound { ref selector, timeout_ms: 500 } if selector == "#finish"
        ));
    }

    #[test]
    fn test_present_but_unclickable_element_is_an_interaction_failure() {
        let err = not_actionable_error("[data-test='logout-sidebar-link']", true, 30000);
        match err {
            DriverError::Interaction { selector, message } => {
                assert_eq!(selector, "[data-test='logout-sidebar-link']");
                assert!(message.contains("clickable within 30000ms"));
            }
            other => panic!("expected an interaction failure, got {other:?}"),
        }
    }
}
