//! 核心框架模块
//!
//! - Service: 服务注册与依赖注入
//! - Event: 按键事件与按键组合解析

pub mod event;
pub mod service;

pub use event::{parse_key_chord, ChordParseError, KeyEvent, Modifiers};
pub use service::{Service, ServiceError, ServiceRegistry};
