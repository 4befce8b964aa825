use serde::{Deserialize, Serialize};
use url::Url;

/// Public SauceDemo shop the journey runs against
pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com/";

/// CSS selectors the journey interacts with
pub mod selectors {
    pub const USERNAME: &str = "#user-name";
    pub const PASSWORD: &str = "#password";
    pub const LOGIN_BUTTON: &str = "#login-button";

    /// Product images whose alt text names a T-shirt; the journey picks the first
    pub const TSHIRT_IMAGE: &str = "img[alt*='T-Shirt']";

    pub const INVENTORY_ITEM: &str = "[data-test='inventory-item']";
    pub const ITEM_NAME: &str = "[data-test='inventory-item-name']";
    pub const ITEM_DESCRIPTION: &str = "[data-test='inventory-item-desc']";
    pub const ITEM_PRICE: &str = "[data-test='inventory-item-price']";
    pub const ADD_TO_CART: &str = "#add-to-cart";

    pub const CART_BADGE: &str = "[data-test='shopping-cart-badge']";
    pub const CART_LINK: &str = "[data-test='shopping-cart-link']";
    pub const CHECKOUT: &str = "#checkout";

    pub const FIRST_NAME: &str = "#first-name";
    pub const LAST_NAME: &str = "#last-name";
    pub const POSTAL_CODE: &str = "#postal-code";
    pub const CONTINUE: &str = "#continue";
    pub const TOTAL_LABEL: &str = "[data-test='total-label']";
    pub const FINISH: &str = "#finish";

    pub const MENU_BUTTON: &str = "#react-burger-menu-btn";
    pub const LOGOUT_LINK: &str = "[data-test='logout-sidebar-link']";
}

/// Login credentials for the shop's standard account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: &'static str,
    pub password: &'static str,
}

impl Credentials {
    pub const STANDARD_USER: Credentials = Credentials {
        username: "standard_user",
        password: "secret_sauce",
    };
}

/// Data entered on the checkout information form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingInfo {
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub postal_code: &'static str,
}

impl ShippingInfo {
    pub const EXAMPLE: ShippingInfo = ShippingInfo {
        first_name: "ExampleFirstName",
        last_name: "ExampleLastName",
        postal_code: "LV-1055",
    };
}

/// Product fields captured on the detail page and compared on later pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub name: String,
    pub description: String,
    pub price: String,
}

impl ItemSnapshot {
    /// Names of the fields that differ from `other`, in display order
    pub fn mismatched_fields(&self, other: &ItemSnapshot) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name != other.name {
            fields.push("name");
        }
        if self.description != other.description {
            fields.push("description");
        }
        if self.price != other.price {
            fields.push("price");
        }
        fields
    }
}

/// Oracle URLs for every page of the journey
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpectedUrls {
    pub login: String,
    pub inventory: String,
    /// Detail pages carry a query string, so this one is only a prefix
    pub inventory_item_prefix: String,
    pub cart: String,
    pub checkout_step_one: String,
    pub checkout_step_two: String,
    pub checkout_complete: String,
}

impl ExpectedUrls {
    /// Derive all oracle URLs from the shop's base URL
    ///
    /// A base URL without a trailing slash is treated as the site root, so
    /// `https://www.saucedemo.com` and `https://www.saucedemo.com/` agree.
    pub fn from_base(base: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let page = |path: &str| base.join(path).map(String::from);

        Ok(Self {
            login: base.to_string(),
            inventory: page("inventory.html")?,
            inventory_item_prefix: page("inventory-item")?,
            cart: page("cart.html")?,
            checkout_step_one: page("checkout-step-one.html")?,
            checkout_step_two: page("checkout-step-two.html")?,
            checkout_complete: page("checkout-complete.html")?,
        })
    }
}
