use crate::driver::DriverError;
use crate::scenario::{JourneyState, Step};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Step '{step}' failed in state {state}: {source}")]
    Driver {
        step: Step,
        state: JourneyState,
        #[source]
        source: DriverError,
    },

    #[error("Step '{step}' failed in state {state}: {message}")]
    Assertion {
        step: Step,
        state: JourneyState,
        message: String,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// The step that was executing when the run aborted, if any
    pub fn step(&self) -> Option<Step> {
        match self {
            Error::Driver { step, .. } | Error::Assertion { step, .. } => Some(*step),
            Error::InvalidUrl(_) => None,
        }
    }

    /// The journey state the run had reached when it aborted, if any
    pub fn state(&self) -> Option<JourneyState> {
        match self {
            Error::Driver { state, .. } | Error::Assertion { state, .. } => Some(*state),
            Error::InvalidUrl(_) => None,
        }
    }

    pub fn is_assertion(&self) -> bool {
        matches!(self, Error::Assertion { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
