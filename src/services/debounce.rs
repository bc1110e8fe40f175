// 输入防抖
//
// 每个输入流只有一个待定值：新输入到来即重新计时，值在窗口期内保持不变
// 才会被发出，最后一次输入总是生效。防抖器被销毁时丢弃待定值，不再发出。

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// 搜索输入的默认防抖窗口
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// 防抖器，必须在 tokio 运行时内创建
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    input: Option<mpsc::UnboundedSender<T>>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// 创建防抖器，返回防抖器本身和接收稳定值的通道
    pub fn new(window: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(window, input_rx, settled_tx));

        let debouncer = Self {
            window,
            input: Some(input_tx),
            task,
        };
        (debouncer, settled_rx)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// 推入一个原始输入，重新开始计时。防抖器已取消时返回 false。
    pub fn push(&self, value: T) -> bool {
        match &self.input {
            Some(input) => input.send(value).is_ok(),
            None => false,
        }
    }

    /// 取消防抖器：丢弃待定值，稳定值通道随之关闭
    pub fn cancel(&mut self) {
        self.input = None;
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.input.is_none()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T>(
    window: Duration,
    mut input: mpsc::UnboundedReceiver<T>,
    settled: mpsc::UnboundedSender<T>,
) {
    let mut pending: Option<T> = None;

    loop {
        let next = if pending.is_none() {
            input.recv().await
        } else {
            match tokio::time::timeout(window, input.recv()).await {
                Ok(next) => next,
                Err(_) => {
                    // 窗口期内没有新输入，发出待定值
                    if let Some(value) = pending.take() {
                        if settled.send(value).is_err() {
                            break;
                        }
                    }
                    continue;
                }
            }
        };

        match next {
            Some(value) => pending = Some(value),
            // 输入端已关闭，丢弃待定值
            None => break,
        }
    }
}
