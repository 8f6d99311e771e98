//! High-level upload and icon workflows.
//!
//! These glue the file collector, the drivers and the browser surface
//! together, and own every operator interaction: prompts for what the CLI
//! did not supply, and the pauses before the destructive save steps, which
//! stay strictly manual.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::browser::{self, BrowserEditor};
use crate::config::{AccountSettings, Settings, UploadSettings};
use crate::error::{Error, Result};
use crate::files;
use crate::icons::{self, IconPool};
use crate::upload::{self, WaitSettings};

/// CLI-supplied parts of upload mode; anything missing is prompted for.
#[derive(Debug, Default)]
pub struct UploadArgs {
    pub playlist: Option<String>,
    pub folder: Option<PathBuf>,
    pub chunk_size: Option<usize>,
}

/// Upload mode: create a new playlist and batch-upload a folder of audio.
pub async fn run_upload(settings: &Settings, args: UploadArgs) -> Result<()> {
    println!("=== UPLOAD MODE ===");

    let playlist = match args.playlist.filter(|p| !p.trim().is_empty()) {
        Some(p) => p,
        None => prompt_nonempty("Enter playlist name")?,
    };
    let folder = match args.folder {
        Some(f) => f,
        None => PathBuf::from(strip_quotes(&prompt_nonempty("Enter path to audio folder")?)),
    };

    let audio_files = files::collect(&folder, &settings.library.extensions)?;
    if audio_files.is_empty() {
        // Explicit choice: nothing to upload is fatal here, not a no-op.
        return Err(Error::EmptyFolder(folder));
    }
    info!("found {} audio files in {}", audio_files.len(), folder.display());

    let chunk_size = args.chunk_size.unwrap_or(settings.upload.chunk_size);
    let (email, password) = credentials(&settings.account)?;

    let driver = browser::start_session(&settings.browser).await?;
    let editor = BrowserEditor::new(driver, settings.site.clone());

    let outcome = async {
        login(&editor, &email, &password).await?;
        editor.open_new_playlist(&playlist).await?;
        upload::upload_all(&editor, &audio_files, chunk_size, wait_settings(&settings.upload)).await
    }
    .await;

    match &outcome {
        Ok(()) => {
            println!();
            println!("--- UPLOAD COMPLETED ---");
            println!("Files have been uploaded. Please:");
            println!("1. Verify there are no loading spinners left.");
            println!("2. Click 'Create' yourself to save the playlist.");
            println!("3. Copy the edit page URL (.../card/XXXX/edit) for icon mode.");
            pause("Press Enter to finish and close the browser...")?;
        }
        Err(Error::StillProcessing { .. }) => {
            println!();
            println!("--- STILL PROCESSING ---");
            println!("The site did not finish processing a batch in time. Nothing was");
            println!("saved; you can wait in the browser and click 'Create' yourself,");
            println!("or re-run later with a longer upload.processing_timeout_secs.");
            pause("Press Enter to close the browser...")?;
        }
        Err(_) => {}
    }

    // A quit failure must not mask how the run itself went.
    if let Err(e) = editor.quit().await {
        warn!("failed to close the browser session: {e}");
    }
    outcome
}

/// Icon mode: assign random icons to the tracks of an existing playlist.
pub async fn run_icons(settings: &Settings, url: &str) -> Result<()> {
    println!("=== ICON MODE ===");
    println!("Target URL: {url}");

    let (email, password) = credentials(&settings.account)?;

    let driver = browser::start_session(&settings.browser).await?;
    let editor = BrowserEditor::new(driver, settings.site.clone());

    let outcome = async {
        login(&editor, &email, &password).await?;
        editor.goto_edit_page(url).await?;

        if !upload::wait_until_ready(&editor, wait_settings(&settings.upload)).await? {
            warn!("the editor still shows processing; continuing anyway");
        }
        editor.dismiss_cookie_banner().await?;

        let mut pool = IconPool::new();
        let assigned = icons::assign_icons(&editor, &mut pool).await?;
        info!("updated {assigned} track icons");
        Ok(())
    }
    .await;

    if outcome.is_ok() {
        println!();
        println!("--- ASSIGNMENT COMPLETED ---");
        println!("Verify the icons and click 'Update'/'Save' yourself if needed.");
        pause("Press Enter to close the browser...")?;
    }

    if let Err(e) = editor.quit().await {
        warn!("failed to close the browser session: {e}");
    }
    outcome
}

async fn login(editor: &BrowserEditor, email: &str, password: &str) -> Result<()> {
    if !editor.login(email, password).await? {
        println!();
        println!("Login is taking a while; a CAPTCHA may have appeared.");
        pause("Press Enter here once you have logged in in the browser...")?;
    }
    Ok(())
}

fn wait_settings(upload: &UploadSettings) -> WaitSettings {
    WaitSettings {
        processing_timeout: Duration::from_secs(upload.processing_timeout_secs),
        poll_interval: Duration::from_secs(upload.poll_interval_secs),
    }
}

/// Resolve credentials from settings, prompting for whatever is missing.
fn credentials(account: &AccountSettings) -> Result<(String, String)> {
    let email = match account.email.as_deref() {
        Some(e) if !e.trim().is_empty() => e.to_string(),
        _ => prompt_nonempty("Enter Yoto email")?,
    };
    let password = match account.password.as_deref() {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => prompt_nonempty("Enter Yoto password")?,
    };
    Ok((email, password))
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_nonempty(label: &str) -> Result<String> {
    loop {
        let value = prompt(label)?;
        if !value.is_empty() {
            return Ok(value);
        }
        println!("A value is required.");
    }
}

fn pause(message: &str) -> Result<()> {
    println!();
    print!("{message}");
    io::stdout().flush()?;
    let mut sink = String::new();
    io::stdin().read_line(&mut sink)?;
    Ok(())
}

/// Shells love wrapping dragged-in paths in quotes.
fn strip_quotes(raw: &str) -> String {
    raw.replace(['\'', '"'], "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_quotes_removes_both_quote_kinds() {
        assert_eq!(strip_quotes("'/tmp/My Audio'"), "/tmp/My Audio");
        assert_eq!(strip_quotes("\"/tmp/x\""), "/tmp/x");
        assert_eq!(strip_quotes("/plain/path"), "/plain/path");
    }

    #[test]
    fn credentials_use_settings_without_prompting() {
        let account = AccountSettings {
            email: Some("me@example.com".to_string()),
            password: Some("hunter2".to_string()),
        };
        let (email, password) = credentials(&account).unwrap();
        assert_eq!(email, "me@example.com");
        assert_eq!(password, "hunter2");
    }
}
