use crate::command::{Command, Outcome};
use crate::display::{Background, BackgroundSlot, BackgroundState, Display};
use crate::error::{ControllerError, Result};
use crate::prompt::{Notice, Prompt};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use wallpaper_core::{ImageKind, ImageStore, StoredImage};
use wallpaper_source::ImageSource;
use wallpaper_theme::{dominant_color_from_bytes, SampleOptions, ThemePalette};

/// A random image older than this is replaced on the next check.
pub const STALE_AFTER: Duration = Duration::from_secs(15 * 60);

/// Period of the background re-check.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, Copy)]
pub struct RefreshSettings {
    pub stale_after: Duration,
    pub refresh_interval: Duration,
    pub sample: SampleOptions,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            stale_after: STALE_AFTER,
            refresh_interval: REFRESH_INTERVAL,
            sample: SampleOptions::default(),
        }
    }
}

pub struct Controller<R, D, P> {
    store: ImageStore,
    source: R,
    slot: Mutex<BackgroundSlot<D>>,
    prompt: P,
    settings: RefreshSettings,
}

impl<R, D, P> Controller<R, D, P>
where
    R: ImageSource,
    D: Display,
    P: Prompt,
{
    pub fn new(store: ImageStore, source: R, display: D, prompt: P, settings: RefreshSettings) -> Self {
        Self {
            store,
            source,
            slot: Mutex::new(BackgroundSlot::new(display)),
            prompt,
            settings,
        }
    }

    pub fn settings(&self) -> &RefreshSettings {
        &self.settings
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    fn slot(&self) -> MutexGuard<'_, BackgroundSlot<D>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> Background {
        self.slot().current().clone()
    }

    pub fn current_state(&self) -> BackgroundState {
        self.slot().current().state()
    }

    pub async fn dispatch(&self, command: Command) -> Result<Outcome> {
        match command {
            Command::Upload(bytes) => self.upload(bytes),
            Command::Clear => self.clear(),
            Command::FetchRandom => self.apply_random(true).await,
        }
    }

    /// Load the stored record and decide what to show. Never fails: every
    /// error ends in a displayable state.
    pub async fn check_and_update(&self) -> BackgroundState {
        let record = match self.store.load() {
            Ok(record) => record,
            Err(e) => {
                log::error!("Error loading image details: {}", e);
                self.set(Background::None);
                return BackgroundState::NoBackground;
            }
        };

        let Some(image) = record.into_image() else {
            log::debug!("No valid stored image");
            self.set(Background::None);
            return BackgroundState::NoBackground;
        };

        if self.is_stale(&image, Utc::now()) {
            log::info!("Random wallpaper from {} is stale, refreshing", image.timestamp_string());
            if let Err(e) = self.apply_random(false).await {
                log::error!("Error fetching random image: {}", e);
            }
            return self.current_state();
        }

        let kind = image.kind;
        self.show_image(kind, image.blob);
        self.current_state()
    }

    /// Only random images age; uploads are kept regardless of how old they are.
    pub fn is_stale(&self, image: &StoredImage, now: DateTime<Utc>) -> bool {
        if image.kind != ImageKind::Random {
            return false;
        }
        // A timestamp in the future yields a negative age, which never counts.
        image
            .age(now)
            .to_std()
            .map(|age| age > self.settings.stale_after)
            .unwrap_or(false)
    }

    /// Fetch, display and persist a new random image. With `confirm`, ask the
    /// user first. On failure the current background is left untouched.
    pub async fn apply_random(&self, confirm: bool) -> Result<Outcome> {
        if confirm && !self.prompt.confirm(Notice::ConfirmRandom) {
            return Ok(Outcome::Cancelled);
        }

        let fetched = self.source.fetch_random().await?;
        log::info!("Fetched random wallpaper from {}", fetched.url);
        let theme = self.theme_for(&fetched.bytes)?;

        self.set(Background::Image {
            kind: ImageKind::Random,
            bytes: Arc::from(fetched.bytes.as_slice()),
            theme,
        });
        self.store.save(&fetched.bytes, true)?;
        Ok(Outcome::Displayed(BackgroundState::Random))
    }

    pub fn upload(&self, bytes: Vec<u8>) -> Result<Outcome> {
        let theme = self.theme_for(&bytes)?;
        self.set(Background::Image {
            kind: ImageKind::Upload,
            bytes: Arc::from(bytes.as_slice()),
            theme,
        });
        self.store.save(&bytes, false)?;
        Ok(Outcome::Displayed(BackgroundState::Uploaded))
    }

    pub fn clear(&self) -> Result<Outcome> {
        if !self.store.has_image()? {
            self.prompt.alert(Notice::NoBackgroundSet);
            return Ok(Outcome::NothingToClear);
        }
        if !self.prompt.confirm(Notice::ConfirmClear) {
            return Ok(Outcome::Cancelled);
        }

        self.store.clear()?;
        self.set(Background::None);
        Ok(Outcome::Displayed(BackgroundState::NoBackground))
    }

    fn show_image(&self, kind: ImageKind, blob: Vec<u8>) {
        let theme = match self.theme_for(&blob) {
            Ok(theme) => theme,
            Err(e) => {
                log::warn!("Showing stored image without theme color: {}", e);
                None
            }
        };
        self.set(Background::Image {
            kind,
            bytes: Arc::from(blob),
            theme,
        });
    }

    fn theme_for(&self, bytes: &[u8]) -> Result<Option<ThemePalette>> {
        let color = dominant_color_from_bytes(bytes, self.settings.sample)
            .map_err(|e| ControllerError::Decode(format!("{:#}", e)))?;
        Ok(color.map(ThemePalette::from_dominant))
    }

    fn set(&self, background: Background) {
        self.slot().set(background);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::SecondsFormat;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wallpaper_source::{FetchedImage, SourceError};

    fn png(rgba: [u8; 4]) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 4, Rgba(rgba)))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn minutes_ago(minutes: i64) -> String {
        (Utc::now() - chrono::Duration::minutes(minutes)).to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    #[derive(Clone)]
    struct StubSource {
        calls: Arc<AtomicUsize>,
        bytes: Option<Vec<u8>>,
    }

    impl ImageSource for StubSource {
        async fn fetch_random(&self) -> wallpaper_source::Result<FetchedImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.bytes {
                Some(bytes) => Ok(FetchedImage {
                    url: "https://images.test/raw".to_string(),
                    bytes: bytes.clone(),
                }),
                None => Err(SourceError::EmptyResponse),
            }
        }
    }

    #[derive(Clone, Default)]
    struct Shown(Arc<Mutex<Vec<Background>>>);

    impl Display for Shown {
        fn show(&mut self, background: &Background) {
            self.0.lock().unwrap().push(background.clone());
        }
    }

    #[derive(Clone)]
    struct ScriptedPrompt {
        answer: bool,
        seen: Arc<Mutex<Vec<Notice>>>,
    }

    impl Prompt for ScriptedPrompt {
        fn confirm(&self, notice: Notice) -> bool {
            self.seen.lock().unwrap().push(notice);
            self.answer
        }

        fn alert(&self, notice: Notice) {
            self.seen.lock().unwrap().push(notice);
        }
    }

    struct Harness {
        controller: Controller<StubSource, Shown, ScriptedPrompt>,
        calls: Arc<AtomicUsize>,
        shown: Shown,
        notices: Arc<Mutex<Vec<Notice>>>,
    }

    fn harness(fetch: Option<Vec<u8>>, answer: bool) -> Harness {
        let calls = Arc::new(AtomicUsize::new(0));
        let shown = Shown::default();
        let notices = Arc::new(Mutex::new(Vec::new()));
        let controller = Controller::new(
            ImageStore::open_in_memory().unwrap(),
            StubSource {
                calls: calls.clone(),
                bytes: fetch,
            },
            shown.clone(),
            ScriptedPrompt {
                answer,
                seen: notices.clone(),
            },
            RefreshSettings::default(),
        );
        Harness {
            controller,
            calls,
            shown,
            notices,
        }
    }

    #[tokio::test]
    async fn empty_store_shows_no_background() {
        let h = harness(None, true);
        assert_eq!(h.controller.check_and_update().await, BackgroundState::NoBackground);
        assert_eq!(h.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.controller.current().data_attribute(), "color");
    }

    #[tokio::test]
    async fn malformed_timestamp_shows_no_background() {
        let h = harness(None, true);
        h.controller
            .store()
            .save_at(&png([1, 2, 3, 255]), ImageKind::Random, "not a date")
            .unwrap();
        assert_eq!(h.controller.check_and_update().await, BackgroundState::NoBackground);
    }

    #[tokio::test]
    async fn stale_random_image_is_refetched_once() {
        let fresh = png([10, 20, 30, 255]);
        let h = harness(Some(fresh.clone()), false);
        let stale_ts = minutes_ago(20);
        h.controller
            .store()
            .save_at(&png([200, 0, 0, 255]), ImageKind::Random, &stale_ts)
            .unwrap();

        let state = h.controller.check_and_update().await;

        assert_eq!(state, BackgroundState::Random);
        assert_eq!(h.calls.load(Ordering::SeqCst), 1);
        let stored = h.controller.store().load().unwrap().into_image().unwrap();
        assert_eq!(stored.blob, fresh);
        assert_ne!(stored.timestamp_string(), stale_ts);
        assert_eq!(
            h.controller.current().theme().map(|t| t.dominant.as_str()),
            Some("#0a141e")
        );
        // silent refresh never asks
        assert!(h.notices.lock().unwrap().is_empty());

        // The new image is fresh: a second check neither fetches nor saves again.
        let saved_ts = stored.timestamp_string();
        assert_eq!(h.controller.check_and_update().await, BackgroundState::Random);
        assert_eq!(h.calls.load(Ordering::SeqCst), 1);
        let again = h.controller.store().load().unwrap().into_image().unwrap();
        assert_eq!(again.timestamp_string(), saved_ts);
        assert_eq!(again.blob, fresh);
    }

    #[tokio::test]
    async fn failed_stale_refresh_on_first_check_shows_nothing() {
        let h = harness(None, true);
        let stale_ts = minutes_ago(20);
        let old = png([200, 0, 0, 255]);
        h.controller
            .store()
            .save_at(&old, ImageKind::Random, &stale_ts)
            .unwrap();

        assert_eq!(h.controller.check_and_update().await, BackgroundState::NoBackground);
        assert_eq!(h.calls.load(Ordering::SeqCst), 1);
        let stored = h.controller.store().load().unwrap().into_image().unwrap();
        assert_eq!(stored.blob, old);
        assert_eq!(stored.timestamp_string(), stale_ts);
    }

    #[tokio::test]
    async fn fresh_random_image_is_redisplayed() {
        let h = harness(Some(png([0, 0, 0, 255])), true);
        h.controller
            .store()
            .save_at(&png([10, 20, 30, 255]), ImageKind::Random, &minutes_ago(5))
            .unwrap();

        assert_eq!(h.controller.check_and_update().await, BackgroundState::Random);
        assert_eq!(h.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.controller.current().data_attribute(), "wallpaper");
    }

    #[tokio::test]
    async fn uploads_never_expire() {
        let h = harness(Some(png([0, 0, 0, 255])), true);
        h.controller
            .store()
            .save_at(&png([10, 20, 30, 255]), ImageKind::Upload, &minutes_ago(60 * 24 * 30))
            .unwrap();

        assert_eq!(h.controller.check_and_update().await, BackgroundState::Uploaded);
        assert_eq!(h.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn future_timestamp_is_not_stale() {
        let h = harness(Some(png([0, 0, 0, 255])), true);
        h.controller
            .store()
            .save_at(&png([10, 20, 30, 255]), ImageKind::Random, &minutes_ago(-60))
            .unwrap();

        assert_eq!(h.controller.check_and_update().await, BackgroundState::Random);
        assert_eq!(h.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_background() {
        let h = harness(None, true);
        h.controller.upload(png([10, 20, 30, 255])).unwrap();

        let result = h.controller.apply_random(false).await;

        assert!(matches!(result, Err(ControllerError::Source(_))));
        assert_eq!(h.controller.current_state(), BackgroundState::Uploaded);
        let stored = h.controller.store().load().unwrap().into_image().unwrap();
        assert_eq!(stored.kind, ImageKind::Upload);
    }

    #[tokio::test]
    async fn declined_random_fetch_does_nothing() {
        let h = harness(Some(png([0, 0, 0, 255])), false);
        let outcome = h.controller.dispatch(Command::FetchRandom).await.unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(h.calls.load(Ordering::SeqCst), 0);
        assert_eq!(*h.notices.lock().unwrap(), vec![Notice::ConfirmRandom]);
    }

    #[tokio::test]
    async fn upload_is_saved_and_shown() {
        let h = harness(None, true);
        let bytes = png([10, 20, 30, 255]);
        let outcome = h.controller.dispatch(Command::Upload(bytes.clone())).await.unwrap();

        assert_eq!(outcome, Outcome::Displayed(BackgroundState::Uploaded));
        let stored = h.controller.store().load().unwrap().into_image().unwrap();
        assert_eq!(stored.blob, bytes);
        assert_eq!(stored.kind, ImageKind::Upload);
        assert_eq!(h.shown.0.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn undecodable_upload_is_rejected() {
        let h = harness(None, true);
        let result = h.controller.dispatch(Command::Upload(b"nope".to_vec())).await;
        assert!(matches!(result, Err(ControllerError::Decode(_))));
        assert!(!h.controller.store().has_image().unwrap());
    }

    #[tokio::test]
    async fn clearing_nothing_alerts_without_delete() {
        let h = harness(None, true);
        let outcome = h.controller.dispatch(Command::Clear).await.unwrap();

        assert_eq!(outcome, Outcome::NothingToClear);
        assert_eq!(*h.notices.lock().unwrap(), vec![Notice::NoBackgroundSet]);
        assert!(h.shown.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn confirmed_clear_removes_record() {
        let h = harness(None, true);
        h.controller.upload(png([10, 20, 30, 255])).unwrap();

        let outcome = h.controller.dispatch(Command::Clear).await.unwrap();

        assert_eq!(outcome, Outcome::Displayed(BackgroundState::NoBackground));
        assert!(h.controller.store().load().unwrap().is_empty());
        assert_eq!(*h.notices.lock().unwrap(), vec![Notice::ConfirmClear]);
    }

    #[tokio::test]
    async fn declined_clear_keeps_record() {
        let h = harness(None, false);
        h.controller.upload(png([10, 20, 30, 255])).unwrap();

        let outcome = h.controller.dispatch(Command::Clear).await.unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert!(h.controller.store().has_image().unwrap());
        assert_eq!(h.controller.current_state(), BackgroundState::Uploaded);
    }
}
