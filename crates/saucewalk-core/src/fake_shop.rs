//! In-memory stand-in for the SauceDemo shop, driven through [`PageDriver`].

use crate::driver::{DriverError, DriverResult, PageDriver};
use crate::model::{Credentials, selectors};
use async_trait::async_trait;
use std::collections::HashMap;

const ITEM_NAME: &str = "Sauce Labs Bolt T-Shirt";
const ITEM_DESCRIPTION: &str = "Get your testing superhero on with the Sauce Labs bolt T-shirt.";
const ITEM_PRICE: &str = "$15.99";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Blank,
    Login,
    Inventory,
    Item,
    Cart,
    StepOne,
    StepTwo,
    Complete,
}

/// Ways the fake shop can misbehave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quirk {
    RejectLogin,
    NoTShirts,
    EmptyBadge,
    CartPrice(&'static str),
    SummaryName(&'static str),
    EmptyTotal,
    DetailHidden,
    /// Product detail page served under another path
    DetailPath(&'static str),
    LogoutElsewhere,
}

pub struct FakeShop {
    base: String,
    page: Page,
    url: String,
    fields: HashMap<&'static str, String>,
    cart_items: usize,
    menu_open: bool,
    quirks: Vec<Quirk>,
    visited: Vec<String>,
}

impl FakeShop {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.to_string(),
            page: Page::Blank,
            url: "about:blank".to_string(),
            fields: HashMap::new(),
            cart_items: 0,
            menu_open: false,
            quirks: Vec::new(),
            visited: Vec::new(),
        }
    }

    pub fn with_quirk(mut self, quirk: Quirk) -> Self {
        self.quirks.push(quirk);
        self
    }

    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    pub fn field(&self, selector: &str) -> Option<&str> {
        self.fields.get(selector).map(String::as_str)
    }

    fn has(&self, quirk: Quirk) -> bool {
        self.quirks.contains(&quirk)
    }

    fn quirk<T>(&self, pick: impl Fn(&Quirk) -> Option<T>) -> Option<T> {
        self.quirks.iter().find_map(pick)
    }

    fn go(&mut self, page: Page) {
        let path = match page {
            Page::Blank => return,
            Page::Login => "",
            Page::Inventory => "inventory.html",
            Page::Item => self
                .quirk(|q| match q {
                    Quirk::DetailPath(path) => Some(*path),
                    _ => None,
                })
                .unwrap_or("inventory-item.html?id=1"),
            Page::Cart => "cart.html",
            Page::StepOne => "checkout-step-one.html",
            Page::StepTwo => "checkout-step-two.html",
            Page::Complete => "checkout-complete.html",
        };
        self.page = page;
        self.url = format!("{}{}", self.base, path);
        self.menu_open = false;
        self.visited.push(self.url.clone());
    }

    fn logged_in(&self) -> bool {
        !matches!(self.page, Page::Blank | Page::Login)
    }

    fn exists(&self, selector: &str) -> bool {
        match selector {
            selectors::USERNAME | selectors::PASSWORD | selectors::LOGIN_BUTTON => {
                self.page == Page::Login
            }
            selectors::TSHIRT_IMAGE => self.page == Page::Inventory && !self.has(Quirk::NoTShirts),
            selectors::INVENTORY_ITEM => matches!(self.page, Page::Inventory | Page::Item),
            selectors::ITEM_NAME | selectors::ITEM_DESCRIPTION | selectors::ITEM_PRICE => {
                matches!(self.page, Page::Item | Page::Cart | Page::StepTwo)
            }
            selectors::ADD_TO_CART => self.page == Page::Item && self.cart_items == 0,
            selectors::CART_BADGE => self.logged_in() && self.cart_items > 0,
            selectors::CART_LINK | selectors::MENU_BUTTON => self.logged_in(),
            selectors::CHECKOUT => self.page == Page::Cart,
            selectors::FIRST_NAME
            | selectors::LAST_NAME
            | selectors::POSTAL_CODE
            | selectors::CONTINUE => self.page == Page::StepOne,
            selectors::TOTAL_LABEL | selectors::FINISH => self.page == Page::StepTwo,
            selectors::LOGOUT_LINK => self.menu_open,
            _ => false,
        }
    }

    fn require(&self, selector: &str) -> DriverResult<()> {
        if self.exists(selector) {
            Ok(())
        } else {
            Err(DriverError::ElementNotFound {
                selector: selector.to_string(),
                timeout_ms: 0,
            })
        }
    }

    fn credentials_accepted(&self) -> bool {
        let credentials = Credentials::STANDARD_USER;
        !self.has(Quirk::RejectLogin)
            && self.field(selectors::USERNAME) == Some(credentials.username)
            && self.field(selectors::PASSWORD) == Some(credentials.password)
    }

    fn shipping_complete(&self) -> bool {
        [
            selectors::FIRST_NAME,
            selectors::LAST_NAME,
            selectors::POSTAL_CODE,
        ]
        .iter()
        .all(|s| self.field(s).is_some_and(|v| !v.is_empty()))
    }
}

#[async_trait]
impl PageDriver for FakeShop {
    async fn navigate(&mut self, url: &str) -> DriverResult<()> {
        if url != self.base {
            return Err(DriverError::Navigation {
                url: url.to_string(),
                message: "only the login page can be opened directly".to_string(),
            });
        }
        self.go(Page::Login);
        Ok(())
    }

    async fn fill(&mut self, selector: &str, value: &str) -> DriverResult<()> {
        self.require(selector)?;
        let key = match selector {
            selectors::USERNAME => selectors::USERNAME,
            selectors::PASSWORD => selectors::PASSWORD,
            selectors::FIRST_NAME => selectors::FIRST_NAME,
            selectors::LAST_NAME => selectors::LAST_NAME,
            selectors::POSTAL_CODE => selectors::POSTAL_CODE,
            other => {
                return Err(DriverError::Interaction {
                    selector: other.to_string(),
                    message: "element is not an input".to_string(),
                });
            }
        };
        self.fields.insert(key, value.to_string());
        Ok(())
    }

    async fn click_nth(&mut self, selector: &str, index: usize) -> DriverResult<()> {
        self.require(selector)?;
        if index > 0 && selector != selectors::TSHIRT_IMAGE {
            return Err(DriverError::ElementNotFound {
                selector: selector.to_string(),
                timeout_ms: 0,
            });
        }

        match selector {
            selectors::LOGIN_BUTTON if self.credentials_accepted() => self.go(Page::Inventory),
            selectors::TSHIRT_IMAGE => self.go(Page::Item),
            selectors::ADD_TO_CART => self.cart_items += 1,
            selectors::CART_LINK => self.go(Page::Cart),
            selectors::CHECKOUT => self.go(Page::StepOne),
            selectors::CONTINUE if self.shipping_complete() => self.go(Page::StepTwo),
            selectors::FINISH => {
                self.cart_items = 0;
                self.go(Page::Complete);
            }
            selectors::MENU_BUTTON => self.menu_open = true,
            selectors::LOGOUT_LINK if self.has(Quirk::LogoutElsewhere) => {
                self.go(Page::Inventory)
            }
            selectors::LOGOUT_LINK => self.go(Page::Login),
            _ => {}
        }
        Ok(())
    }

    async fn text_content(&mut self, selector: &str) -> DriverResult<Option<String>> {
        self.require(selector)?;
        let text = match (selector, self.page) {
            (selectors::ITEM_NAME, Page::StepTwo) => self
                .quirk(|q| match q {
                    Quirk::SummaryName(name) => Some(*name),
                    _ => None,
                })
                .unwrap_or(ITEM_NAME),
            (selectors::ITEM_NAME, _) => ITEM_NAME,
            (selectors::ITEM_DESCRIPTION, _) => ITEM_DESCRIPTION,
            (selectors::ITEM_PRICE, Page::Cart) => self
                .quirk(|q| match q {
                    Quirk::CartPrice(price) => Some(*price),
                    _ => None,
                })
                .unwrap_or(ITEM_PRICE),
            (selectors::ITEM_PRICE, _) => ITEM_PRICE,
            (selectors::CART_BADGE, _) if self.has(Quirk::EmptyBadge) => "",
            (selectors::CART_BADGE, _) => "1",
            (selectors::TOTAL_LABEL, _) if self.has(Quirk::EmptyTotal) => "",
            (selectors::TOTAL_LABEL, _) => "Total: $17.27",
            _ => return Ok(None),
        };
        Ok(Some(text.to_string()))
    }

    async fn is_visible(&mut self, selector: &str) -> DriverResult<bool> {
        if selector == selectors::INVENTORY_ITEM
            && self.page == Page::Item
            && self.has(Quirk::DetailHidden)
        {
            return Ok(false);
        }
        Ok(self.exists(selector))
    }

    async fn current_url(&mut self) -> DriverResult<String> {
        Ok(self.url.clone())
    }
}
