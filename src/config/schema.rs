use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/yotoup/config.toml` or `~/.config/yotoup/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `YOTOUP__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub account: AccountSettings,
    pub library: LibrarySettings,
    pub upload: UploadSettings,
    pub browser: BrowserSettings,
    pub site: SiteSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            account: AccountSettings::default(),
            library: LibrarySettings::default(),
            upload: UploadSettings::default(),
            browser: BrowserSettings::default(),
            site: SiteSettings::default(),
        }
    }
}

/// Yoto account credentials. Only used to establish the browser session;
/// when either field is missing the operator is prompted instead.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccountSettings {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as uploadable audio (case-insensitive,
    /// without dot). Defaults match what the Yoto editor accepts.
    pub extensions: Vec<String>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "m4a".into(), "wav".into(), "m4b".into()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Number of files submitted per batch. Small on purpose: the editor
    /// transcodes uploads server-side and bogs down on large drops.
    pub chunk_size: usize,
    /// How long to wait for a batch to finish processing (seconds).
    pub processing_timeout_secs: u64,
    /// How often to re-check the readiness signal while waiting (seconds).
    pub poll_interval_secs: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            chunk_size: 3,
            processing_timeout_secs: 600,
            poll_interval_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// WebDriver endpoint to connect to (a running chromedriver).
    pub webdriver_url: String,
    /// Run the browser without a visible window.
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            window_width: 1920,
            window_height: 1080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Account/login page. Login lands back here once authenticated.
    pub login_url: String,
    /// Blank playlist editor used to create a new card.
    pub editor_url: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            login_url: "https://us.yotoplay.com/my-account".to_string(),
            editor_url: "https://my.yotoplay.com/card/edit".to_string(),
        }
    }
}
