use super::*;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

fn pool_of(n: usize) -> Vec<IconId> {
    (0..n).map(|i| IconId(format!("icon-{i}.png"))).collect()
}

#[test]
fn draw_returns_none_only_for_empty_pool() {
    let mut pool = IconPool::new();
    let mut rng = rand::rng();
    assert!(pool.draw(&[], &mut rng).is_none());
    assert!(pool.draw(&pool_of(1), &mut rng).is_some());
}

#[test]
fn draw_never_repeats_before_exhaustion() {
    let available = pool_of(8);
    let mut pool = IconPool::new();
    let mut rng = rand::rng();

    let mut seen = std::collections::HashSet::new();
    for _ in 0..available.len() {
        let icon = pool.draw(&available, &mut rng).unwrap();
        assert!(seen.insert(icon), "icon repeated before pool exhaustion");
    }
    assert_eq!(seen.len(), available.len());
}

#[test]
fn draw_resets_after_exhaustion_then_stays_unique_again() {
    let available = pool_of(4);
    let mut pool = IconPool::new();
    let mut rng = rand::rng();

    for _ in 0..available.len() {
        pool.draw(&available, &mut rng).unwrap();
    }
    assert_eq!(pool.used_len(), available.len());

    // Next draw crosses the exhaustion boundary: pool resets and starts a
    // fresh no-repeat window.
    let mut seen = std::collections::HashSet::new();
    for _ in 0..available.len() {
        let icon = pool.draw(&available, &mut rng).unwrap();
        assert!(seen.insert(icon), "icon repeated within second window");
    }
}

#[test]
fn draw_fully_resets_used_set_on_exhaustion() {
    let available = pool_of(3);
    let mut pool = IconPool::new();
    let mut rng = rand::rng();

    for _ in 0..3 {
        pool.draw(&available, &mut rng).unwrap();
    }
    assert_eq!(pool.used_len(), 3);

    // The boundary draw clears the whole used set first; afterwards only
    // the new pick is marked used.
    pool.draw(&available, &mut rng).unwrap();
    assert_eq!(pool.used_len(), 1);
}

#[test]
fn draw_only_picks_from_available() {
    let available = pool_of(3);
    let mut pool = IconPool::new();
    let mut rng = rand::rng();

    for _ in 0..20 {
        let icon = pool.draw(&available, &mut rng).unwrap();
        assert!(available.contains(&icon));
    }
}

/// Mock editor page: fixed track count, fixed picker contents, records
/// every choice.
struct MockPage {
    tracks: usize,
    picker: Vec<IconId>,
    chosen: Mutex<Vec<IconId>>,
    dismissed: AtomicUsize,
    fail_on_track: Option<usize>,
    leave_editor_at: Option<usize>,
    opened: AtomicUsize,
}

impl MockPage {
    fn new(tracks: usize, icons: usize) -> Self {
        Self {
            tracks,
            picker: pool_of(icons),
            chosen: Mutex::new(Vec::new()),
            dismissed: AtomicUsize::new(0),
            fail_on_track: None,
            leave_editor_at: None,
            opened: AtomicUsize::new(0),
        }
    }
}

impl IconSurface for MockPage {
    async fn track_count(&self) -> crate::error::Result<usize> {
        Ok(self.tracks)
    }

    async fn still_in_editor(&self) -> crate::error::Result<bool> {
        let opened = self.opened.load(Ordering::SeqCst);
        Ok(self.leave_editor_at.is_none_or(|at| opened < at))
    }

    async fn open_picker(&self, track: usize) -> crate::error::Result<Vec<IconId>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_track == Some(track) {
            return Err(crate::error::Error::Io(std::io::Error::other(
                "picker refused to open",
            )));
        }
        Ok(self.picker.clone())
    }

    async fn choose(&self, icon: &IconId) -> crate::error::Result<()> {
        self.chosen.lock().unwrap().push(icon.clone());
        Ok(())
    }

    async fn dismiss_picker(&self) -> crate::error::Result<()> {
        self.dismissed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn assign_icons_updates_every_track_without_early_repeats() {
    let page = MockPage::new(5, 12);
    let mut pool = IconPool::new();

    let assigned = assign_icons(&page, &mut pool).await.unwrap();
    assert_eq!(assigned, 5);

    let chosen = page.chosen.lock().unwrap().clone();
    let unique: std::collections::HashSet<_> = chosen.iter().collect();
    assert_eq!(unique.len(), chosen.len(), "repeat before pool exhaustion");
}

#[tokio::test]
async fn assign_icons_repeats_only_after_pool_exhaustion() {
    // More tracks than icons: repeats are allowed, but only once a whole
    // pool's worth of picks has gone out. Each aligned block of pool-size
    // picks is one exhaustion cycle and stays internally distinct; a pick
    // straddling the reset boundary may legitimately repeat a recent one.
    let page = MockPage::new(7, 3);
    let mut pool = IconPool::new();

    let assigned = assign_icons(&page, &mut pool).await.unwrap();
    assert_eq!(assigned, 7);

    let chosen = page.chosen.lock().unwrap().clone();
    for block in chosen.chunks(3) {
        let unique: std::collections::HashSet<_> = block.iter().collect();
        assert_eq!(unique.len(), block.len(), "repeat within one pool cycle");
    }
}

#[tokio::test]
async fn assign_icons_handles_zero_tracks() {
    let page = MockPage::new(0, 4);
    let mut pool = IconPool::new();
    assert_eq!(assign_icons(&page, &mut pool).await.unwrap(), 0);
}

#[tokio::test]
async fn assign_icons_skips_track_with_empty_picker() {
    let page = MockPage {
        picker: Vec::new(),
        ..MockPage::new(3, 0)
    };
    let mut pool = IconPool::new();

    let assigned = assign_icons(&page, &mut pool).await.unwrap();
    assert_eq!(assigned, 0);
    // Every empty picker was dismissed rather than left open.
    assert_eq!(page.dismissed.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn assign_icons_continues_past_a_failing_track() {
    let page = MockPage {
        fail_on_track: Some(1),
        ..MockPage::new(4, 10)
    };
    let mut pool = IconPool::new();

    let assigned = assign_icons(&page, &mut pool).await.unwrap();
    assert_eq!(assigned, 3);
    // Recovery closed whatever the failing track left open.
    assert_eq!(page.dismissed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn assign_icons_aborts_when_editor_is_left() {
    let page = MockPage {
        leave_editor_at: Some(2),
        ..MockPage::new(6, 10)
    };
    let mut pool = IconPool::new();

    let err = assign_icons(&page, &mut pool).await.unwrap_err();
    assert!(matches!(err, crate::error::Error::LeftEditor));

    // Two tracks were updated before the navigation guard tripped.
    assert_eq!(page.chosen.lock().unwrap().len(), 2);
}
