//! tracing 初始化：日志写入缓存目录下按天滚动的文件，同时逐行转发给驱动程序

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "codepad=info";
const LOG_FILE_PREFIX: &str = "codepad.log";

/// 持有写盘线程的 guard；drop 时刷新剩余日志
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
    lines: Option<Receiver<String>>,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn take_lines(&mut self) -> Option<Receiver<String>> {
        self.lines.take()
    }
}

/// 每条事件一个 writer：文件直接写，通道侧攒到 drop 时按行发送
struct EventWriter {
    file: NonBlocking,
    pending: Vec<u8>,
    lines: Sender<String>,
}

impl Write for EventWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.file.write(buf)?;
        self.pending.extend_from_slice(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Drop for EventWriter {
    fn drop(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.pending);
        for line in text.lines().filter(|l| !l.is_empty()) {
            // 接收端已关闭时静默丢弃
            let _ = self.lines.send(line.to_string());
        }
    }
}

#[derive(Clone)]
struct EventWriterFactory {
    file: NonBlocking,
    lines: Sender<String>,
}

impl<'a> MakeWriter<'a> for EventWriterFactory {
    type Writer = EventWriter;

    fn make_writer(&'a self) -> Self::Writer {
        EventWriter {
            file: self.file.clone(),
            pending: Vec::with_capacity(256),
            lines: self.lines.clone(),
        }
    }
}

fn resolve_log_dir() -> io::Result<PathBuf> {
    codepad::kernel::services::adapters::ensure_log_dir().or_else(|e| {
        let fallback = std::env::temp_dir().join("codepad").join("logs");
        std::fs::create_dir_all(&fallback)?;
        eprintln!(
            "log dir unavailable ({e}); writing logs to {}",
            fallback.display()
        );
        Ok(fallback)
    })
}

/// 安装全局 subscriber。`RUST_LOG` 覆盖默认过滤；已安装过或目录不可用时返回 `None`。
pub fn init() -> Option<LoggingGuard> {
    let log_dir = resolve_log_dir().ok()?;

    let appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (file, guard) = tracing_appender::non_blocking(appender);
    let (tx, rx) = mpsc::channel::<String>();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(EventWriterFactory { file, lines: tx })
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()
        .ok()?;

    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "panic");
    }));

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
        lines: Some(rx),
    })
}
