//! 服务层
//!
//! - `ports`: 内核依赖的契约（执行器、设置存储、shell、搜索的数据类型）
//! - `adapters`: 带副作用的实现（JSON 文件、tokio、模拟 shell、正则搜索）
//! - `host` / `bus`: 组合根持有的注册表，以及后台任务回送 action 的通道

pub mod adapters;
pub mod bus;
pub mod host;
pub mod ports;

pub use bus::{kernel_bus, KernelBusReceiver, KernelBusSender, KernelMessage};
pub use host::{KernelServiceContext, KernelServiceHost};
