//! Random icon assignment for playlist tracks.
//!
//! Each track gets one icon drawn uniformly at random from the picker's
//! pool. An icon is never reused until every icon in the pool has been
//! handed out once; only then does the pool reset and repeats begin.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Identifier for one icon in the remote picker (its image source URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconId(pub String);

/// Tracks which icons have been assigned during this run.
///
/// The set of available icons is discovered per picker dialog, so the pool
/// only remembers what has been used and treats "available minus used" as
/// the live pool.
#[derive(Debug, Default)]
pub struct IconPool {
    used: HashSet<IconId>,
}

impl IconPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw one icon uniformly at random among those not yet used.
    ///
    /// When every available icon has been used, the pool resets first, so a
    /// repeat can only follow full exhaustion. Returns `None` only when
    /// `available` is empty.
    pub fn draw<R: Rng + ?Sized>(&mut self, available: &[IconId], rng: &mut R) -> Option<IconId> {
        if available.is_empty() {
            return None;
        }

        let fresh: Vec<&IconId> = available
            .iter()
            .filter(|icon| !self.used.contains(*icon))
            .collect();

        let pick = if fresh.is_empty() {
            self.used.clear();
            available.choose(rng)
        } else {
            fresh.choose(rng).copied()
        }?
        .clone();

        self.used.insert(pick.clone());
        Some(pick)
    }

    #[cfg(test)]
    pub(crate) fn used_len(&self) -> usize {
        self.used.len()
    }
}

/// What the icon driver needs from the remote playlist editor.
#[allow(async_fn_in_trait)]
pub trait IconSurface {
    /// Number of tracks whose icon can be edited.
    async fn track_count(&self) -> Result<usize>;

    /// Whether the browser is still on the playlist editor page.
    async fn still_in_editor(&self) -> Result<bool>;

    /// Open the icon picker for the given track (0-based) and list the
    /// icons it offers.
    async fn open_picker(&self, track: usize) -> Result<Vec<IconId>>;

    /// Click one icon in the open picker and wait for the dialog to close.
    async fn choose(&self, icon: &IconId) -> Result<()>;

    /// Close an open picker without selecting anything.
    async fn dismiss_picker(&self) -> Result<()>;
}

/// Assign a random icon to every track, in listing order.
///
/// A failure on one track is reported and the run moves on to the next;
/// leaving the editor page aborts the run. Returns how many tracks were
/// actually updated.
pub async fn assign_icons<S: IconSurface>(surface: &S, pool: &mut IconPool) -> Result<usize> {
    let count = surface.track_count().await?;
    if count == 0 {
        warn!("no tracks with editable icons found");
        return Ok(0);
    }
    info!("assigning icons to {count} tracks");

    let mut rng = rand::rng();
    let mut assigned = 0;

    for track in 0..count {
        if !surface.still_in_editor().await? {
            return Err(Error::LeftEditor);
        }

        match assign_one(surface, pool, track, &mut rng).await {
            Ok(true) => assigned += 1,
            Ok(false) => {}
            Err(e) => {
                warn!("track {}: icon assignment failed: {e}", track + 1);
                // A stuck dialog would break every following track.
                if let Err(e2) = surface.dismiss_picker().await {
                    warn!("could not close the icon picker: {e2}");
                }
            }
        }
    }

    Ok(assigned)
}

async fn assign_one<S: IconSurface, R: Rng + ?Sized>(
    surface: &S,
    pool: &mut IconPool,
    track: usize,
    rng: &mut R,
) -> Result<bool> {
    info!("updating icon for track {}...", track + 1);
    let available = surface.open_picker(track).await?;

    let Some(icon) = pool.draw(&available, rng) else {
        warn!("track {}: picker offered no icons", track + 1);
        surface.dismiss_picker().await?;
        return Ok(false);
    };

    surface.choose(&icon).await?;
    Ok(true)
}

#[cfg(test)]
mod tests;
