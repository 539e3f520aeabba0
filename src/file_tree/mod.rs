mod tree;

pub use tree::{FileTree, Node, VisibleEntry, ROOT_KEY};
