//! The SauceDemo checkout journey.
//!
//! [`Scenario::run`] walks a fixed, strictly ordered list of [`Step`]s against
//! one [`PageDriver`]. Every step ends with the expectations that prove the
//! page reached the next [`JourneyState`]; the first unmet expectation aborts
//! the run with an error naming the step and the state reached so far.

use crate::assert::{self, Expectation};
use crate::driver::{DriverError, PageDriver};
use crate::model::{
    Credentials, DEFAULT_BASE_URL, ExpectedUrls, ItemSnapshot, ShippingInfo, selectors,
};
use crate::report::ScenarioReport;
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::time::Instant;

/// Where the user is in the shop
///
/// Recorded for reporting only; the scenario never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyState {
    Unauthenticated,
    ProductsPage,
    ProductDetail,
    CartPage,
    CheckoutInfo,
    CheckoutSummary,
    OrderComplete,
    LoggedOut,
}

impl fmt::Display for JourneyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JourneyState::Unauthenticated => "unauthenticated",
            JourneyState::ProductsPage => "products page",
            JourneyState::ProductDetail => "product detail",
            JourneyState::CartPage => "cart page",
            JourneyState::CheckoutInfo => "checkout information",
            JourneyState::CheckoutSummary => "checkout summary",
            JourneyState::OrderComplete => "order complete",
            JourneyState::LoggedOut => "logged out",
        };
        f.write_str(name)
    }
}

/// One step of the journey, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    OpenLoginPage,
    LogIn,
    OpenProduct,
    AddToCart,
    OpenCart,
    StartCheckout,
    EnterShippingInfo,
    FinishOrder,
    LogOut,
}

impl Step {
    pub const ALL: [Step; 9] = [
        Step::OpenLoginPage,
        Step::LogIn,
        Step::OpenProduct,
        Step::AddToCart,
        Step::OpenCart,
        Step::StartCheckout,
        Step::EnterShippingInfo,
        Step::FinishOrder,
        Step::LogOut,
    ];

    /// State the shop is in once this step's expectations hold
    pub fn target_state(self) -> JourneyState {
        match self {
            Step::OpenLoginPage => JourneyState::Unauthenticated,
            Step::LogIn => JourneyState::ProductsPage,
            Step::OpenProduct | Step::AddToCart => JourneyState::ProductDetail,
            Step::OpenCart => JourneyState::CartPage,
            Step::StartCheckout => JourneyState::CheckoutInfo,
            Step::EnterShippingInfo => JourneyState::CheckoutSummary,
            Step::FinishOrder => JourneyState::OrderComplete,
            Step::LogOut => JourneyState::LoggedOut,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Step::OpenLoginPage => "Open the login page",
            Step::LogIn => "Log in as the standard user",
            Step::OpenProduct => "Open the first T-shirt",
            Step::AddToCart => "Add the T-shirt to the cart",
            Step::OpenCart => "Open the cart",
            Step::StartCheckout => "Start checkout",
            Step::EnterShippingInfo => "Enter shipping information",
            Step::FinishOrder => "Finish the order",
            Step::LogOut => "Log out",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    pub base_url: String,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

pub struct Scenario {
    urls: ExpectedUrls,
}

impl Scenario {
    pub fn new(config: ScenarioConfig) -> Result<Self> {
        let urls = ExpectedUrls::from_base(&config.base_url)?;
        Ok(Self { urls })
    }

    /// Run every step in order, stopping at the first failure
    pub async fn run<D>(&self, driver: &mut D) -> Result<ScenarioReport>
    where
        D: PageDriver + ?Sized,
    {
        let mut journey = Journey {
            driver,
            urls: &self.urls,
            step: Step::OpenLoginPage,
            state: JourneyState::Unauthenticated,
            item: None,
        };
        let mut report = ScenarioReport::new(self.urls.login.clone());

        tracing::info!("Starting checkout journey against {}", self.urls.login);

        for step in Step::ALL {
            journey.step = step;
            tracing::info!("▶ {}", step);
            let started = Instant::now();

            journey.execute(step).await?;

            journey.state = step.target_state();
            let elapsed_ms = started.elapsed().as_millis() as u64;
            tracing::debug!("{} done in {}ms, now at {}", step, elapsed_ms, journey.state);
            report.record(step, journey.state, elapsed_ms);
        }

        report.item = journey.item;
        tracing::info!("Journey complete in {}ms", report.total_ms());
        Ok(report)
    }
}

/// Per-run state: the driver, the current step and what has been captured
struct Journey<'a, D: ?Sized> {
    driver: &'a mut D,
    urls: &'a ExpectedUrls,
    step: Step,
    state: JourneyState,
    item: Option<ItemSnapshot>,
}

impl<D> Journey<'_, D>
where
    D: PageDriver + ?Sized,
{
    async fn execute(&mut self, step: Step) -> Result<()> {
        match step {
            Step::OpenLoginPage => self.open_login_page().await,
            Step::LogIn => self.log_in().await,
            Step::OpenProduct => self.open_product().await,
            Step::AddToCart => self.add_to_cart().await,
            Step::OpenCart => self.open_cart().await,
            Step::StartCheckout => self.start_checkout().await,
            Step::EnterShippingInfo => self.enter_shipping_info().await,
            Step::FinishOrder => self.finish_order().await,
            Step::LogOut => self.log_out().await,
        }
    }

    async fn open_login_page(&mut self) -> Result<()> {
        let url = self.urls.login.clone();
        let outcome = self.driver.navigate(&url).await;
        outcome.map_err(|source| self.driver_failure(source))
    }

    async fn log_in(&mut self) -> Result<()> {
        let credentials = Credentials::STANDARD_USER;
        self.fill(selectors::USERNAME, credentials.username).await?;
        self.fill(selectors::PASSWORD, credentials.password).await?;
        self.click(selectors::LOGIN_BUTTON).await?;

        let login_form_still_shown = self.visible(selectors::LOGIN_BUTTON).await?;
        if login_form_still_shown {
            tracing::warn!("Login unsuccessful");
        } else {
            tracing::info!("Login successful");
        }
        self.check(assert::holds(
            !login_form_still_shown,
            "Login should be successful",
        ))?;

        let url = self.url().await?;
        if url == self.urls.inventory {
            tracing::info!("User is redirected to the products page");
        } else {
            tracing::warn!("User is NOT redirected to the products page");
        }
        self.check(assert::url_equals(&url, &self.urls.inventory))
    }

    async fn open_product(&mut self) -> Result<()> {
        self.click_nth(selectors::TSHIRT_IMAGE, 0).await?;

        let details_shown = self.visible(selectors::INVENTORY_ITEM).await?;
        if details_shown {
            tracing::info!("Description is visible");
        } else {
            tracing::warn!("Description is NOT visible");
        }
        self.check(assert::holds(
            details_shown,
            "T-Shirt description should be displayed",
        ))?;

        let url = self.url().await?;
        self.check(assert::url_contains(&url, &self.urls.inventory_item_prefix))?;

        let item = self.read_item().await?;
        tracing::info!("Selected {} ({})", item.name, item.price);
        self.item = Some(item);
        Ok(())
    }

    async fn add_to_cart(&mut self) -> Result<()> {
        self.click(selectors::ADD_TO_CART).await?;

        let badge = self.text(selectors::CART_BADGE).await?;
        tracing::debug!("Cart badge shows {:?}", badge);
        self.check(assert::non_empty(
            badge.as_deref(),
            "T-Shirt has not been added to the cart",
        ))
    }

    async fn open_cart(&mut self) -> Result<()> {
        self.click(selectors::CART_LINK).await?;

        let url = self.url().await?;
        self.check(assert::url_equals(&url, &self.urls.cart))?;

        let shown = self.read_item().await?;
        let captured = self.captured_item()?;
        self.check(assert::snapshot_matches("cart page", &captured, &shown))
    }

    async fn start_checkout(&mut self) -> Result<()> {
        self.click(selectors::CHECKOUT).await?;

        let url = self.url().await?;
        self.check(assert::url_equals(&url, &self.urls.checkout_step_one))
    }

    async fn enter_shipping_info(&mut self) -> Result<()> {
        let info = ShippingInfo::EXAMPLE;
        self.fill(selectors::FIRST_NAME, info.first_name).await?;
        self.fill(selectors::LAST_NAME, info.last_name).await?;
        self.fill(selectors::POSTAL_CODE, info.postal_code).await?;
        self.click(selectors::CONTINUE).await?;

        let url = self.url().await?;
        self.check(assert::url_equals(&url, &self.urls.checkout_step_two))?;

        let name = self.text(selectors::ITEM_NAME).await?.unwrap_or_default();
        let captured = self.captured_item()?;
        self.check(assert::text_equals("name", &name, &captured.name))?;

        let total = self.text(selectors::TOTAL_LABEL).await?;
        if let Some(total) = &total {
            tracing::info!("Order summary: {}", total);
        }
        self.check(assert::non_empty(
            total.as_deref(),
            "Order summary should show the total amount",
        ))
    }

    async fn finish_order(&mut self) -> Result<()> {
        self.click(selectors::FINISH).await?;

        let url = self.url().await?;
        self.check(assert::url_equals(&url, &self.urls.checkout_complete))
    }

    async fn log_out(&mut self) -> Result<()> {
        self.click(selectors::MENU_BUTTON).await?;
        self.click(selectors::LOGOUT_LINK).await?;

        let url = self.url().await?;
        self.check(assert::url_equals(&url, &self.urls.login))
    }

    async fn read_item(&mut self) -> Result<ItemSnapshot> {
        Ok(ItemSnapshot {
            name: self.text(selectors::ITEM_NAME).await?.unwrap_or_default(),
            description: self
                .text(selectors::ITEM_DESCRIPTION)
                .await?
                .unwrap_or_default(),
            price: self.text(selectors::ITEM_PRICE).await?.unwrap_or_default(),
        })
    }

    fn captured_item(&self) -> Result<ItemSnapshot> {
        self.item.clone().ok_or_else(|| Error::Assertion {
            step: self.step,
            state: self.state,
            message: "No item was captured on the product page".to_string(),
        })
    }

    async fn fill(&mut self, selector: &str, value: &str) -> Result<()> {
        tracing::debug!("fill {}", selector);
        let outcome = self.driver.fill(selector, value).await;
        outcome.map_err(|source| self.driver_failure(source))
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        tracing::debug!("click {}", selector);
        let outcome = self.driver.click(selector).await;
        outcome.map_err(|source| self.driver_failure(source))
    }

    async fn click_nth(&mut self, selector: &str, index: usize) -> Result<()> {
        tracing::debug!("click {} #{}", selector, index);
        let outcome = self.driver.click_nth(selector, index).await;
        outcome.map_err(|source| self.driver_failure(source))
    }

    async fn text(&mut self, selector: &str) -> Result<Option<String>> {
        let outcome = self.driver.text_content(selector).await;
        outcome.map_err(|source| self.driver_failure(source))
    }

    async fn visible(&mut self, selector: &str) -> Result<bool> {
        let outcome = self.driver.is_visible(selector).await;
        outcome.map_err(|source| self.driver_failure(source))
    }

    async fn url(&mut self) -> Result<String> {
        let outcome = self.driver.current_url().await;
        let url = outcome.map_err(|source| self.driver_failure(source))?;
        tracing::debug!("current URL {}", url);
        Ok(url)
    }

    fn check(&self, expectation: Expectation) -> Result<()> {
        expectation.map_err(|message| {
            tracing::error!("{}: {}", self.step, message);
            Error::Assertion {
                step: self.step,
                state: self.state,
                message,
            }
        })
    }

    fn driver_failure(&self, source: DriverError) -> Error {
        tracing::error!("{}: {}", self.step, source);
        Error::Driver {
            step: self.step,
            state: self.state,
            source,
        }
    }
}
