use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::WindowConfig;
use crate::error::{Result, WindowError};
use crate::metric::{Metric, PeerId};
use crate::window::Window;

/// Registry owning one [`Window`] per (metric name, peer).
///
/// Windows are created on first `add` and handed out as `Arc`s, so a caller
/// may keep reading a window after its peer has been removed here.
pub struct Store {
    capacity: usize,
    // metric name → peer → window
    byname: RwLock<HashMap<String, HashMap<PeerId, Arc<Window>>>>,
}

impl Store {
    pub fn new(config: &WindowConfig) -> Self {
        Self {
            capacity: config.capacity(),
            byname: RwLock::new(HashMap::new()),
        }
    }

    /// Route `metric` into the window for its name and peer.
    pub fn add(&self, metric: Arc<Metric>) {
        let window = self.window_or_insert(&metric.name, &metric.peer);
        window.add(metric);
    }

    fn window_or_insert(&self, name: &str, peer: &PeerId) -> Arc<Window> {
        // Read lock first: after the first metric per pair every add lands here.
        if let Some(w) = self.window(name, peer) {
            return w;
        }

        // Re-checked under the write lock; another adder may have won the race.
        let mut byname = self.byname.write();
        let peers = byname.entry(name.to_owned()).or_default();
        Arc::clone(peers.entry(peer.clone()).or_insert_with(|| {
            tracing::debug!(metric = name, %peer, capacity = self.capacity, "created window");
            Arc::new(Window::new(self.capacity))
        }))
    }

    pub fn window(&self, name: &str, peer: &PeerId) -> Option<Arc<Window>> {
        self.byname
            .read()
            .get(name)
            .and_then(|peers| peers.get(peer))
            .cloned()
    }

    /// Most recent metric `name` reported by `peer`.
    pub fn peer_latest(&self, name: &str, peer: &PeerId) -> Result<Arc<Metric>> {
        self.window(name, peer)
            .ok_or(WindowError::NoMetrics)?
            .latest()
    }

    /// Every retained `name` metric from `peer`, newest first.
    pub fn peer_metric_all(&self, name: &str, peer: &PeerId) -> Vec<Arc<Metric>> {
        self.window(name, peer)
            .map(|w| w.all())
            .unwrap_or_default()
    }

    /// Peers that have reported metric `name`, sorted.
    pub fn peers(&self, name: &str) -> Vec<PeerId> {
        let mut peers: Vec<PeerId> = self
            .byname
            .read()
            .get(name)
            .map(|peers| peers.keys().cloned().collect())
            .unwrap_or_default();
        peers.sort();
        peers
    }

    /// Names of every metric seen so far, sorted.
    pub fn metric_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.byname.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Forget every window belonging to `peer`.
    pub fn remove_peer(&self, peer: &PeerId) {
        let mut byname = self.byname.write();
        let mut removed = 0usize;
        for peers in byname.values_mut() {
            if peers.remove(peer).is_some() {
                removed += 1;
            }
        }
        byname.retain(|_, peers| !peers.is_empty());
        tracing::debug!(%peer, windows = removed, "removed peer");
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(&WindowConfig::default())
    }
}
