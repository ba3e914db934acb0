//! Persistence for the background wallpaper: a single image record kept in a
//! small SQLite key-value table.

mod error;
mod record;
mod store;

pub use error::{Result, StoreError};
pub use record::{ImageKind, RecordSummary, StoredImage, StoredRecord};
pub use store::ImageStore;
