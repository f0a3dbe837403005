//! codepad - 浏览器 IDE 的无界面核心
//!
//! 模块结构：
//! - core: 服务注册表、按键事件
//! - models: 内存文件树与示例项目
//! - kernel: 状态、action/effect、Store、快捷键、搜索、终端、i18n
//! - kernel::services: 端口与适配器（设置存储、模拟 shell、内容搜索、异步执行器）
//! - app: 工作台（组合根）

pub mod app;
pub mod core;
pub mod kernel;
pub mod models;
