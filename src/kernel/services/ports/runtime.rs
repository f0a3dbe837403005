use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// 异步执行器端口：工作台只通过它派发后台任务
pub trait AsyncExecutor: Send + Sync {
    fn spawn(&self, task: BoxFuture);

    /// 单线程运行时不会自己推进任务，需要调用方让出时间
    fn needs_driving(&self) -> bool {
        false
    }

    fn drive_for(&self, _duration: Duration) {}
}
