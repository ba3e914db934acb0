use std::sync::Arc;
use wallpaper_core::ImageKind;
use wallpaper_theme::ThemePalette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundState {
    NoBackground,
    Uploaded,
    Random,
}

/// What the page currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Background {
    #[default]
    None,
    Image {
        kind: ImageKind,
        bytes: Arc<[u8]>,
        theme: Option<ThemePalette>,
    },
}

impl Background {
    pub fn state(&self) -> BackgroundState {
        match self {
            Background::None => BackgroundState::NoBackground,
            Background::Image {
                kind: ImageKind::Upload,
                ..
            } => BackgroundState::Uploaded,
            Background::Image {
                kind: ImageKind::Random,
                ..
            } => BackgroundState::Random,
        }
    }

    /// Value of the page's background-presence attribute.
    pub fn data_attribute(&self) -> &'static str {
        match self {
            Background::None => "color",
            Background::Image { .. } => "wallpaper",
        }
    }

    pub fn theme(&self) -> Option<&ThemePalette> {
        match self {
            Background::Image { theme, .. } => theme.as_ref(),
            Background::None => None,
        }
    }
}

/// Receives every background change.
pub trait Display: Send {
    fn show(&mut self, background: &Background);
}

/// Owns the current background and forwards each change to the sink.
pub(crate) struct BackgroundSlot<D> {
    current: Background,
    sink: D,
}

impl<D: Display> BackgroundSlot<D> {
    pub(crate) fn new(sink: D) -> Self {
        Self {
            current: Background::None,
            sink,
        }
    }

    pub(crate) fn set(&mut self, background: Background) {
        log::debug!(
            "Background -> {:?} (data-bg={})",
            background.state(),
            background.data_attribute()
        );
        self.sink.show(&background);
        self.current = background;
    }

    pub(crate) fn current(&self) -> &Background {
        &self.current
    }
}
