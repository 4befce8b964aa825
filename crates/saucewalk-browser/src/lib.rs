mod cdp_session;
mod chrome_finder;
mod error;
mod launcher;
mod page;
mod probe;
mod profile;
mod session;
mod wait;

pub use cdp_session::{CdpSession, ConnectedBrowser};
pub use chrome_finder::ChromeFinder;
pub use error::{Error, Result};
pub use launcher::ChromeLauncher;
pub use page::CdpPage;
pub use profile::ProfileManager;
pub use session::{BrowserSession, LaunchOptions, ProfileChoice};
pub use wait::WaitConfig;
