use super::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[test]
fn test_current_thread_drives_timers() {
    let executor = TokioExecutor::current_thread().unwrap();
    assert!(executor.needs_driving());

    let done = Arc::new(AtomicBool::new(false));
    let flag = done.clone();
    executor.spawn(Box::pin(async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        flag.store(true, Ordering::SeqCst);
    }));
    assert!(!done.load(Ordering::SeqCst));

    for _ in 0..100 {
        executor.drive_for(Duration::from_millis(10));
        if done.load(Ordering::SeqCst) {
            break;
        }
    }
    assert!(done.load(Ordering::SeqCst));
}

#[test]
fn test_multi_thread_runs_without_driving() {
    let executor = TokioExecutor::new().unwrap();
    assert!(!executor.needs_driving());

    let (tx, rx) = std::sync::mpsc::channel();
    executor.spawn(Box::pin(async move {
        tokio::time::sleep(Duration::from_millis(1)).await;
        let _ = tx.send(7u8);
    }));
    assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), 7);
}
