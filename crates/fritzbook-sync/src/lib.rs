pub mod error;
pub mod ktipp;
pub mod source;
pub mod transport;
pub mod upload;
pub mod xml;

pub use error::{Result, SyncError};
