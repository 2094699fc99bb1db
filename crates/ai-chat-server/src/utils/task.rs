use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

/// Owner side of a long-running background task.
///
/// The task watches the paired receiver and exits once `shutdown` is called
/// or the handle is dropped.
pub struct TaskHandle {
    name: &'static str,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TaskHandle {
    /// Spawn `make(rx)` on the runtime
    pub fn spawn<F, Fut>(name: &'static str, make: F) -> Self
    where
        F: FnOnce(watch::Receiver<bool>) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let (shutdown, rx) = watch::channel(false);
        let task = tokio::spawn(make(rx));
        Self { name, shutdown, task }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal the task and wait for it to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!("Background task {} ended abnormally: {}", self.name, e);
        }
    }
}

/// Resolves once shutdown is requested or the handle is gone
pub async fn stopped(rx: &mut watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}
