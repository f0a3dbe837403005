//! 数据模型层

pub mod default_project;
pub mod file_tree;

pub use default_project::default_project;
pub use file_tree::{
    FileTree, FileTreeError, FileTreeRow, InvariantViolation, Node, NodeId, NodeKind,
};
