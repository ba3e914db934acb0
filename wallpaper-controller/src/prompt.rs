use std::fmt;

/// User-facing messages the controller may raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoBackgroundSet,
    ConfirmClear,
    ConfirmRandom,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Notice::NoBackgroundSet => "No background is set.",
            Notice::ConfirmClear => "Do you want to clear the background image?",
            Notice::ConfirmRandom => "Do you want to set a new random wallpaper?",
        };
        f.write_str(text)
    }
}

pub trait Prompt: Send + Sync {
    /// Ask a yes/no question.
    fn confirm(&self, notice: Notice) -> bool;

    fn alert(&self, notice: Notice);
}

/// Accepts every confirmation and logs alerts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Prompt for AutoConfirm {
    fn confirm(&self, notice: Notice) -> bool {
        log::debug!("Auto-confirmed: {}", notice);
        true
    }

    fn alert(&self, notice: Notice) {
        log::warn!("{}", notice);
    }
}
