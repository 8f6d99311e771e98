//! WebDriver session bootstrap and the Yoto editor surface.

mod editor;

pub use editor::BrowserEditor;

use thirtyfour::prelude::*;
use tracing::info;

use crate::config::BrowserSettings;
use crate::error::Result;

/// Connect to the WebDriver endpoint and size the window for the editor.
pub async fn start_session(settings: &BrowserSettings) -> Result<WebDriver> {
    let mut caps = DesiredCapabilities::chrome();
    if settings.headless {
        caps.set_headless()?;
    }

    info!("connecting to WebDriver at {}", settings.webdriver_url);
    let driver = WebDriver::new(&settings.webdriver_url, caps).await?;
    driver
        .set_window_rect(0, 0, settings.window_width, settings.window_height)
        .await?;
    Ok(driver)
}
