use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::application::ports::Connectivity;

/// Single source of truth for the device's reachability state. The embedding
/// shell feeds it the runtime's online/offline signal via [`set_online`];
/// services read it through the [`Connectivity`] port.
///
/// [`set_online`]: Self::set_online
pub struct ConnectivityMonitor {
    state: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    pub fn new(initially_online: bool) -> Self {
        let (state, _) = watch::channel(initially_online);
        Self { state }
    }

    /// Record a reachability change. Repeating the current state is a no-op
    /// and does not wake any watcher.
    pub fn set_online(&self, online: bool) {
        self.state.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    /// Invoke `callback` once per offline-to-online transition, for as long
    /// as the monitor lives.
    pub fn on_online<F, Fut>(&self, callback: F) -> JoinHandle<()>
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let mut rx = self.state.subscribe();
        tokio::spawn(async move {
            let mut was_online = *rx.borrow();
            while rx.changed().await.is_ok() {
                let online = *rx.borrow_and_update();
                if online && !was_online {
                    callback().await;
                }
                was_online = online;
            }
        })
    }
}

impl Connectivity for ConnectivityMonitor {
    fn is_online(&self) -> bool {
        *self.state.borrow()
    }
}
