pub mod assert;
pub mod driver;
pub mod error;
pub mod model;
pub mod report;
pub mod scenario;

#[cfg(test)]
mod fake_shop;

pub use driver::{DriverError, PageDriver};
pub use error::{Error, Result};
pub use model::{Credentials, ExpectedUrls, ItemSnapshot, ShippingInfo};
pub use report::{ScenarioReport, StepRecord};
pub use scenario::{JourneyState, Scenario, ScenarioConfig, Step};
