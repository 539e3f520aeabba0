pub mod event;
pub mod keyboard;

pub use event::AppEvent;
pub use keyboard::{map_key_event, map_tree_key};
