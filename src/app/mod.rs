//! 应用层：组合 Store 与服务

pub mod workbench;

pub use workbench::Workbench;
