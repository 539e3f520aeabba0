mod buffer;
mod document;
mod mode;

pub use buffer::Buffer;
pub use document::{Cursor, Document};
pub use mode::EditorMode;
