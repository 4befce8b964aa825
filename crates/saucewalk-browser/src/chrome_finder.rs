use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Binary names looked up on `PATH` when no default location matches
const PATH_CANDIDATES: [&str; 4] = [
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

/// Locates Chrome binary on the system
pub struct ChromeFinder {
    custom_path: Option<PathBuf>,
}

impl ChromeFinder {
    /// Create a new ChromeFinder with optional custom path
    pub fn new(custom_path: Option<PathBuf>) -> Self {
        Self { custom_path }
    }

    /// Find Chrome binary: custom path first, then platform defaults, then `PATH`
    pub fn find(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.custom_path {
            return self.validate_chrome_path(path);
        }

        for path in Self::default_paths() {
            if let Ok(valid_path) = self.validate_chrome_path(&path) {
                tracing::debug!("Chrome found at default location {}", valid_path.display());
                return Ok(valid_path);
            }
        }

        for name in PATH_CANDIDATES {
            if let Ok(path) = which::which(name) {
                tracing::debug!("Chrome found on PATH as {}", name);
                return Ok(path);
            }
        }

        Err(Error::Browser(format!(
            "Chrome not found. Checked: {} and PATH ({}). Use --chrome-path to specify location.",
            Self::default_paths()
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            PATH_CANDIDATES.join(", ")
        )))
    }

    /// Get platform-specific default Chrome paths
    fn default_paths() -> Vec<PathBuf> {
        #[cfg(target_os = "macos")]
        return vec![
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
            PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
        ];

        #[cfg(target_os = "linux")]
        return vec![
            PathBuf::from("/usr/bin/google-chrome"),
            PathBuf::from("/usr/bin/chromium"),
            PathBuf::from("/usr/bin/chromium-browser"),
        ];

        #[cfg(target_os = "windows")]
        return vec![
            PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
            PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        return vec![];
    }

    /// Validate that a path exists and is executable
    fn validate_chrome_path(&self, path: &Path) -> Result<PathBuf> {
        if !path.exists() {
            return Err(Error::Browser(format!(
                "Chrome not found at: {}",
                path.display()
            )));
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = std::fs::metadata(path)?;
            if metadata.permissions().mode() & 0o111 == 0 {
                return Err(Error::Browser(format!(
                    "Chrome binary not executable: {}",
                    path.display()
                )));
            }
        }

        Ok(path.to_path_buf())
    }
}
