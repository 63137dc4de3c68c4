//! Chromium discovery and launch
//!
//! Executable lookup order: the configured path, well-known install
//! locations, `PATH`, then a managed download into the user cache.

use anyhow::{Context, Result, anyhow};
use chromiumoxide::Handler;
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, trace, warn};

use crate::config::WatchConfig;
use crate::utils::constants::{CHROME_USER_AGENT, DEFAULT_PROTOCOL_TIMEOUT_MS};

/// Options for launching the run's browser
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    /// CDP request timeout; page-level timeouts are applied separately
    pub protocol_timeout: Duration,
    /// Explicit executable, skipping the search
    pub chrome_executable: Option<PathBuf>,
    /// Profile directory. Defaults to a per-process temp directory.
    pub user_data_dir: Option<PathBuf>,
    /// Where a managed Chromium is downloaded. Defaults to the user cache.
    pub cache_dir: Option<PathBuf>,
    pub user_agent: String,
    pub window_size: (u32, u32),
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            protocol_timeout: Duration::from_millis(DEFAULT_PROTOCOL_TIMEOUT_MS),
            chrome_executable: None,
            user_data_dir: None,
            cache_dir: None,
            user_agent: CHROME_USER_AGENT.to_string(),
            window_size: (1920, 1080),
        }
    }
}

impl LaunchOptions {
    #[must_use]
    pub fn from_config(config: &WatchConfig) -> Self {
        Self {
            headless: config.headless(),
            chrome_executable: config.chromium_path().map(Path::to_path_buf),
            ..Self::default()
        }
    }

    fn profile_dir(&self) -> PathBuf {
        self.user_data_dir.clone().unwrap_or_else(|| {
            std::env::temp_dir().join(format!("listing_watch_chrome_{}", std::process::id()))
        })
    }

    fn download_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("listing_watch")
                .join("chromium")
        })
    }
}

#[cfg(target_os = "windows")]
const INSTALL_LOCATIONS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
];

#[cfg(target_os = "macos")]
const INSTALL_LOCATIONS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const INSTALL_LOCATIONS: &[&str] = &[
    "/usr/bin/google-chrome-stable",
    "/usr/bin/google-chrome",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
];

const PATH_NAMES: &[&str] = &["chromium", "chromium-browser", "google-chrome", "chrome"];

/// Locate an installed browser without downloading one
#[must_use]
pub fn find_browser_executable(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        warn!("Configured browser path does not exist: {}", path.display());
    }

    INSTALL_LOCATIONS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
        .or_else(|| search_path(PATH_NAMES))
}

fn search_path(names: &[&str]) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}

/// Download Chromium into `cache_dir` and return the executable path
pub async fn download_managed_browser(cache_dir: &Path) -> Result<PathBuf> {
    info!("Downloading managed Chromium into {}", cache_dir.display());
    tokio::fs::create_dir_all(cache_dir)
        .await
        .context("Failed to create browser cache directory")?;

    let options = BrowserFetcherOptions::builder()
        .with_path(cache_dir)
        .build()
        .context("Failed to build fetcher options")?;
    let revision = BrowserFetcher::new(options)
        .fetch()
        .await
        .context("Failed to fetch browser")?;

    Ok(revision.executable_path)
}

/// Command-line switches passed to every launch
#[must_use]
pub fn launch_args(options: &LaunchOptions) -> Vec<String> {
    vec![
        format!("--user-agent={}", options.user_agent),
        "--disable-blink-features=AutomationControlled".to_string(),
        "--no-first-run".to_string(),
        "--no-default-browser-check".to_string(),
        "--disable-notifications".to_string(),
        "--disable-background-networking".to_string(),
        "--password-store=basic".to_string(),
        "--mute-audio".to_string(),
        "--no-sandbox".to_string(),
    ]
}

/// Find or download Chrome and launch it.
///
/// Returns the browser, its tracked handler task and the profile directory,
/// which must be removed after the browser has exited.
pub async fn launch_browser(options: &LaunchOptions) -> Result<(Browser, JoinHandle<()>, PathBuf)> {
    let executable = match find_browser_executable(options.chrome_executable.as_deref()) {
        Some(path) => path,
        None => download_managed_browser(&options.download_dir()).await?,
    };
    info!("Using browser at {}", executable.display());

    let user_data_dir = options.profile_dir();
    tokio::fs::create_dir_all(&user_data_dir)
        .await
        .context("Failed to create user data directory")?;

    let (width, height) = options.window_size;
    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(options.protocol_timeout)
        .window_size(width, height)
        .user_data_dir(user_data_dir.clone())
        .chrome_executable(executable)
        .args(launch_args(options));
    builder = if options.headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };
    let config = builder
        .build()
        .map_err(|e| anyhow!("Failed to build browser config: {e}"))?;

    info!("Launching browser (headless: {})", options.headless);
    let (browser, handler) = Browser::launch(config)
        .await
        .context("Failed to launch browser")?;

    Ok((browser, spawn_handler(handler), user_data_dir))
}

fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                let message = e.to_string();
                if is_benign_handler_error(&message) {
                    trace!("Ignored CDP message: {}", message);
                } else {
                    error!("Browser handler error: {:?}", e);
                }
            }
        }
        info!("Browser handler task completed");
    })
}

/// CDP events chromiumoxide cannot decode; harmless for page automation
fn is_benign_handler_error(message: &str) -> bool {
    message.contains("data did not match any variant of untagged enum Message")
        || message.contains("Failed to deserialize WS response")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn explicit_executable_wins() {
        let file = NamedTempFile::new().unwrap();
        assert_eq!(
            find_browser_executable(Some(file.path())),
            Some(file.path().to_path_buf())
        );
    }

    #[test]
    fn launch_args_carry_user_agent() {
        let options = LaunchOptions {
            user_agent: "TestAgent/1.0".to_string(),
            ..LaunchOptions::default()
        };
        let args = launch_args(&options);
        assert!(args.contains(&"--user-agent=TestAgent/1.0".to_string()));
        assert!(!args.iter().any(|a| a.contains(CHROME_USER_AGENT)));
    }

    #[test]
    fn configured_path_reaches_launch_options() {
        let config = WatchConfig::builder()
            .telegram("123:abc", "42")
            .chromium_path("/opt/chromium/chrome")
            .headless(false)
            .build()
            .unwrap();
        let options = LaunchOptions::from_config(&config);
        assert_eq!(
            options.chrome_executable.as_deref(),
            Some(Path::new("/opt/chromium/chrome"))
        );
        assert!(!options.headless);
    }

    #[test]
    fn unknown_cdp_messages_are_benign() {
        assert!(is_benign_handler_error(
            "data did not match any variant of untagged enum Message"
        ));
        assert!(!is_benign_handler_error("websocket closed"));
    }
}
