use crate::display::BackgroundState;

/// A user-triggered action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Save these bytes as the uploaded background.
    Upload(Vec<u8>),
    /// Remove the stored background, after confirmation.
    Clear,
    /// Fetch a random background, after confirmation.
    FetchRandom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Displayed(BackgroundState),
    /// The user declined the confirmation.
    Cancelled,
    /// Clear was requested with nothing stored.
    NothingToClear,
}
