//! Input collection: turns an upload or a text entry into one string.

pub mod collect;
pub mod docx;
pub mod file;

pub use collect::{collect, InputKind, InputSource};
pub use file::{FileType, ACCEPTED_EXTENSIONS};
