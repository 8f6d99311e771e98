//! The Yoto playlist editor, seen through fixed selectors.
//!
//! Everything in this file is glue tied to the site's current markup; when
//! Yoto ships a redesign, this is the file that breaks. The drivers above
//! it only talk to the `UploadSurface` and `IconSurface` traits.

use std::path::PathBuf;
use std::time::Duration;

use thirtyfour::Key;
use thirtyfour::prelude::*;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::config::SiteSettings;
use crate::error::{Error, Result};
use crate::icons::{IconId, IconSurface};
use crate::upload::UploadSurface;

// Selectors for the current (2024) markup of my.yotoplay.com.
const UPLOAD_INPUT: &str = "#upload";
const CREATE_BUTTON: &str = "button.create-btn";
const PLAYLIST_NAME_INPUT: &str = "input[placeholder='Playlist name']";
const USERNAME_INPUT: &str = "input[name='username']";
const PASSWORD_INPUT: &str = "input[name='password']";
const LOGIN_SUBMIT: &str = "button[type='submit']";
const COOKIE_ACCEPT: &str = "button.cky-btn-accept";
const TRACK_ICON: &str = "img.trackIcon[alt='Choose icon']";
const PICKER_DIALOG: &str = "div[role='dialog']:has(img.trackIcon)";
const PICKER_ICONS: &str = "div[role='dialog']:has(img.trackIcon) img.trackIcon";

const LOGIN_TIMEOUT: Duration = Duration::from_secs(60);
const ELEMENT_TIMEOUT: Duration = Duration::from_secs(10);
const PICKER_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_STEP: Duration = Duration::from_millis(250);
const CLICK_SETTLE: Duration = Duration::from_millis(500);
// The editor persists an icon selection asynchronously after the dialog
// closes; moving on too fast loses the previous pick.
const PICKER_SETTLE: Duration = Duration::from_secs(3);

/// One logged-in browser tab on the playlist editor.
pub struct BrowserEditor {
    driver: WebDriver,
    site: SiteSettings,
}

impl BrowserEditor {
    pub fn new(driver: WebDriver, site: SiteSettings) -> Self {
        Self { driver, site }
    }

    /// Close the browser session.
    pub async fn quit(self) -> Result<()> {
        self.driver.quit().await?;
        Ok(())
    }

    /// Fill the login form and wait (bounded) to land back on the account
    /// page. Returns `false` when that never happens within the bound,
    /// typically a CAPTCHA; the operator finishes logging in by hand.
    pub async fn login(&self, email: &str, password: &str) -> Result<bool> {
        info!("logging in...");
        self.driver.goto(&self.site.login_url).await?;

        self.wait_for(USERNAME_INPUT, ELEMENT_TIMEOUT)
            .await?
            .send_keys(email)
            .await?;
        self.driver
            .find(By::Css(PASSWORD_INPUT))
            .await?
            .send_keys(password)
            .await?;
        self.driver.find(By::Css(LOGIN_SUBMIT)).await?.click().await?;

        let start = Instant::now();
        while start.elapsed() < LOGIN_TIMEOUT {
            if self
                .driver
                .current_url()
                .await?
                .as_str()
                .contains("/my-account")
            {
                return Ok(true);
            }
            sleep(POLL_STEP).await;
        }
        Ok(false)
    }

    /// Open a blank editor and set the playlist name.
    pub async fn open_new_playlist(&self, name: &str) -> Result<()> {
        info!("navigating to the playlist editor...");
        self.driver.goto(&self.site.editor_url).await?;

        info!("setting playlist name: {name}");
        let field = self.wait_for(PLAYLIST_NAME_INPUT, ELEMENT_TIMEOUT).await?;
        field.send_keys(name).await?;
        Ok(())
    }

    /// Navigate to an existing playlist's edit page.
    pub async fn goto_edit_page(&self, url: &str) -> Result<()> {
        info!("navigating to {url}");
        self.driver.goto(url).await?;
        Ok(())
    }

    /// Accept the cookie-consent banner if it is in the way.
    pub async fn dismiss_cookie_banner(&self) -> Result<()> {
        if let Ok(btn) = self.driver.find(By::Css(COOKIE_ACCEPT)).await {
            if btn.is_displayed().await.unwrap_or(false) {
                info!("dismissing the cookie banner");
                let _ = btn.click().await;
                sleep(Duration::from_secs(1)).await;
            }
        }
        Ok(())
    }

    /// Poll for an element until it exists or the bound elapses; the final
    /// lookup propagates the driver's not-found error.
    async fn wait_for(&self, css: &str, timeout: Duration) -> Result<WebElement> {
        let start = Instant::now();
        loop {
            match self.driver.find(By::Css(css)).await {
                Ok(elem) => return Ok(elem),
                Err(_) if start.elapsed() < timeout => sleep(POLL_STEP).await,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Poll until no visible element matches `css`. `false` on timeout.
    async fn wait_gone(&self, css: &str, timeout: Duration) -> Result<bool> {
        let start = Instant::now();
        loop {
            let visible = match self.driver.find(By::Css(css)).await {
                Ok(elem) => elem.is_displayed().await.unwrap_or(false),
                Err(_) => false,
            };
            if !visible {
                return Ok(true);
            }
            if start.elapsed() >= timeout {
                return Ok(false);
            }
            sleep(POLL_STEP).await;
        }
    }

    async fn force_click(&self, elem: &WebElement) -> Result<()> {
        self.driver
            .execute("arguments[0].click();", vec![elem.to_json()?])
            .await?;
        Ok(())
    }
}

impl UploadSurface for BrowserEditor {
    async fn submit_files(&self, files: &[PathBuf]) -> Result<()> {
        let mut absolute = Vec::with_capacity(files.len());
        for f in files {
            absolute.push(std::path::absolute(f)?.to_string_lossy().into_owned());
        }
        // A multi-file input takes newline-separated paths.
        let keys = absolute.join("\n");

        let input = self.wait_for(UPLOAD_INPUT, ELEMENT_TIMEOUT).await?;
        if let Err(e) = input.send_keys(&keys).await {
            warn!("direct file submission failed ({e}); unhiding the input and retrying");
            self.driver
                .execute(
                    "const el = document.querySelector('#upload'); \
                     if (el) { el.style.display = 'block'; el.style.visibility = 'visible'; }",
                    vec![],
                )
                .await?;
            self.driver
                .find(By::Css(UPLOAD_INPUT))
                .await?
                .send_keys(&keys)
                .await?;
        }
        Ok(())
    }

    async fn processing_complete(&self) -> Result<bool> {
        let button = self.driver.find(By::Css(CREATE_BUTTON)).await?;
        Ok(button.is_enabled().await?)
    }

    async fn processing_hint(&self) -> Option<String> {
        let source = self.driver.source().await.ok()?;
        let lower = source.to_lowercase();
        ["processing", "transcoding", "analyzing"]
            .iter()
            .find(|w| lower.contains(*w))
            .map(|w| (*w).to_string())
    }
}

impl IconSurface for BrowserEditor {
    async fn track_count(&self) -> Result<usize> {
        // Icons render after the track list loads; give them a moment.
        let start = Instant::now();
        loop {
            let icons = self.driver.find_all(By::Css(TRACK_ICON)).await?;
            if !icons.is_empty() {
                return Ok(icons.len());
            }
            if start.elapsed() >= ELEMENT_TIMEOUT {
                return Ok(0);
            }
            sleep(POLL_STEP).await;
        }
    }

    async fn still_in_editor(&self) -> Result<bool> {
        Ok(self.driver.current_url().await?.as_str().contains("/edit"))
    }

    async fn open_picker(&self, track: usize) -> Result<Vec<IconId>> {
        let icons = self.driver.find_all(By::Css(TRACK_ICON)).await?;
        let icon = icons
            .get(track)
            .ok_or_else(|| Error::Picker(format!("track {} is no longer listed", track + 1)))?;

        icon.scroll_into_view().await?;
        // The track rows sit under a sticky header; nudge back above it.
        self.driver
            .execute("window.scrollBy(0, -150);", vec![])
            .await?;
        sleep(CLICK_SETTLE).await;

        if icon.click().await.is_err() {
            debug!("standard click failed, forcing via script");
            self.force_click(icon).await?;
        }

        self.wait_for(PICKER_DIALOG, PICKER_TIMEOUT).await?;
        let dialog_icons = self.driver.find_all(By::Css(PICKER_ICONS)).await?;

        let mut available = Vec::with_capacity(dialog_icons.len());
        for ico in dialog_icons {
            if let Some(src) = ico.attr("src").await? {
                available.push(IconId(src));
            }
        }
        Ok(available)
    }

    async fn choose(&self, icon: &IconId) -> Result<()> {
        let dialog_icons = self.driver.find_all(By::Css(PICKER_ICONS)).await?;
        for ico in dialog_icons {
            if ico.attr("src").await?.as_deref() == Some(icon.0.as_str()) {
                // Picker tiles hide behind hover overlays; a scripted click
                // lands regardless.
                self.force_click(&ico).await?;
                if !self.wait_gone(PICKER_DIALOG, PICKER_TIMEOUT).await? {
                    warn!("picker dialog did not close after selection");
                }
                sleep(PICKER_SETTLE).await;
                return Ok(());
            }
        }
        Err(Error::Picker(
            "chosen icon disappeared from the dialog".to_string(),
        ))
    }

    async fn dismiss_picker(&self) -> Result<()> {
        let open = match self.driver.find(By::Css(PICKER_DIALOG)).await {
            Ok(dialog) => dialog.is_displayed().await.unwrap_or(false),
            Err(_) => false,
        };
        if !open {
            // Pressing Escape blind risks backing out of the editor.
            return Ok(());
        }

        debug!("closing a stuck icon picker with Escape");
        let body = self.driver.find(By::Css("body")).await?;
        body.send_keys(Key::Escape + "").await?;
        if !self.wait_gone(PICKER_DIALOG, Duration::from_secs(3)).await? {
            warn!("icon picker stayed open after Escape");
        }
        Ok(())
    }
}
