use std::sync::Arc;
use std::time::Duration;

use peer_metric_window::{Metric, PeerId, Store, Window, WindowConfig, WindowError};

fn make_metric(value: &str) -> Arc<Metric> {
    Arc::new(Metric::new("test", "peer1", value).with_ttl(Duration::from_secs(5)))
}

fn values(window: &Window) -> Vec<String> {
    window.all().iter().map(|m| m.value.clone()).collect()
}

#[test]
fn capacity_four_overflow_by_one() {
    let w = Window::new(4);
    for v in ["1", "2", "3", "4", "5"] {
        w.add(make_metric(v));
    }
    assert_eq!(values(&w), ["5", "4", "3", "2"]);
    assert_eq!(w.latest().unwrap().value, "5");
}

#[test]
fn capacity_four_half_full() {
    let w = Window::new(4);
    w.add(make_metric("1"));
    w.add(make_metric("2"));
    assert_eq!(values(&w), ["2", "1"]);
    assert_eq!(w.latest().unwrap().value, "2");
}

#[test]
fn capacity_four_untouched() {
    let w = Window::new(4);
    assert!(w.all().is_empty());
    assert_eq!(w.latest(), Err(WindowError::NoMetrics));
}

#[test]
fn all_lengths_follow_min_of_adds_and_capacity() {
    for cap in [1usize, 2, 5, 10] {
        let w = Window::new(cap);
        for k in 1..=cap * 2 {
            w.add(make_metric(&k.to_string()));
            let all = w.all();
            assert_eq!(all.len(), k.min(cap));
            assert_eq!(all[0].value, k.to_string());
            assert_eq!(all[all.len() - 1].value, (k - all.len() + 1).to_string());
        }
    }
}

#[test]
fn window_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Window>();
    assert_send_sync::<Store>();
}

#[test]
fn store_owns_windows_per_peer() {
    let store = Store::new(&WindowConfig::new(2));
    let peer = PeerId::from("peer1");
    for v in ["1", "2", "3"] {
        store.add(make_metric(v));
    }

    let all: Vec<String> = store
        .peer_metric_all("test", &peer)
        .iter()
        .map(|m| m.value.clone())
        .collect();
    assert_eq!(all, ["3", "2"]);

    store.remove_peer(&peer);
    assert_eq!(store.peer_latest("test", &peer), Err(WindowError::NoMetrics));
}
