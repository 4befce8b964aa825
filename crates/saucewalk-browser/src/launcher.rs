use crate::{Error, Result};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

/// Manages Chrome process lifecycle
pub struct ChromeLauncher {
    chrome_path: PathBuf,
    profile_path: PathBuf,
    headless: bool,
    window_size: (u32, u32),
    debugging_port: u16,
}

impl ChromeLauncher {
    /// Create a new ChromeLauncher
    pub fn new(chrome_path: PathBuf, profile_path: PathBuf, headless: bool) -> Self {
        Self {
            chrome_path,
            profile_path,
            headless,
            window_size: (1280, 800),
            debugging_port: 9222,
        }
    }

    pub fn with_debugging_port(mut self, port: u16) -> Self {
        self.debugging_port = port;
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Launch Chrome process
    pub fn launch(&self) -> Result<Child> {
        let args = self.build_args();
        tracing::debug!("Launching {} {}", self.chrome_path.display(), args.join(" "));

        Command::new(&self.chrome_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Browser(format!("Failed to launch Chrome: {}", e)))
    }

    /// Build Chrome command-line arguments
    fn build_args(&self) -> Vec<String> {
        let (width, height) = self.window_size;
        let mut args = vec![
            format!("--remote-debugging-port={}", self.debugging_port),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-popup-blocking".to_string(),
            format!("--window-size={},{}", width, height),
            format!("--user-data-dir={}", self.profile_path.display()),
        ];

        if self.headless {
            args.push("--headless=new".to_string());
        }

        args.push("about:blank".to_string());
        args
    }

    /// Get the debugging port
    pub fn debugging_port(&self) -> u16 {
        self.debugging_port
    }
}
