use std::cell::RefCell;
use std::rc::Rc;

use spriview::bus::Histograms;
use spriview::panels::{FramesPanel, HistogramPanel, Panel};
use spriview::color_scheme::channel_color;
use spriview::config::ChartConfig;
use spriview::{Dispatcher, Frame};

#[test]
fn routes_by_topic_filter() {
    let seen = Rc::new(RefCell::new(Vec::<String>::new()));
    let mut d = Dispatcher::new();
    let s = seen.clone();
    d.subscribe("telemetry/frames/+", move |topic, _| s.borrow_mut().push(topic.to_string()));

    assert_eq!(d.dispatch("telemetry/frames/mzi", b"{}"), 1);
    assert_eq!(d.dispatch("telemetry/histograms", b"{}"), 0);
    assert_eq!(*seen.borrow(), vec!["telemetry/frames/mzi".to_string()]);
    assert_eq!(d.unrouted(), 1);
}

#[test]
fn callbacks_run_in_registration_order() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let mut d = Dispatcher::new();
    for n in 0..3 {
        let o = order.clone();
        d.subscribe("t", move |_, _| o.borrow_mut().push(n));
    }
    assert_eq!(d.dispatch("t", b""), 3);
    assert_eq!(*order.borrow(), vec![0, 1, 2]);
    assert_eq!(d.filters(), vec!["t".to_string()]);
}

#[test]
fn unsubscribe_stops_delivery() {
    let hits = Rc::new(RefCell::new(0));
    let mut d = Dispatcher::new();
    let h = hits.clone();
    let id = d.subscribe("t", move |_, _| *h.borrow_mut() += 1);
    d.dispatch("t", b"");
    assert!(d.unsubscribe(id));
    assert!(!d.unsubscribe(id));
    d.dispatch("t", b"");
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn malformed_payloads_never_reach_typed_callbacks() {
    let frames = Rc::new(RefCell::new(Vec::new()));
    let mut d = Dispatcher::new();
    let f = frames.clone();
    d.subscribe_typed("t", move |_, frame: Frame| f.borrow_mut().push(frame));

    d.dispatch("t", b"{not json");
    d.dispatch("t", b"");
    d.dispatch("t", br#"{"I": 1, "Timestamp": 0.5, "Values": [1.0, 2.0]}"#);
    assert_eq!(*frames.borrow(), vec![Frame::new(1, 0.5, vec![1.0, 2.0])]);
}

#[test]
fn released_state_makes_callback_a_no_op() {
    let mut d = Dispatcher::new();
    let state = Rc::new(RefCell::new(0usize));
    d.subscribe_weak("t", &state, |n: &mut usize, _, _: Frame| *n += 1);

    let payload = br#"{"I": 0, "Timestamp": 0, "Values": []}"#;
    d.dispatch("t", payload);
    assert_eq!(*state.borrow(), 1);

    drop(state);
    // Still matched, but nothing is left to update.
    assert_eq!(d.dispatch("t", payload), 1);
}

#[test]
fn frames_panel_feeds_its_chart() {
    let mut d = Dispatcher::new();
    let cfg = ChartConfig {
        baseline: true,
        ..ChartConfig::default()
    };
    let mut panel = FramesPanel::new(&cfg, "telemetry/frames/mzi");
    panel.attach(&mut d);
    panel.attach(&mut d);
    assert_eq!(d.len(), 1);

    d.dispatch("telemetry/frames/mzi", br#"{"I": 0, "Timestamp": 0, "Values": [1.0, 2.0]}"#);
    d.dispatch("telemetry/frames/mzi", br#"{"I": 1, "Timestamp": 1, "Values": [2.0, 4.0]}"#);
    d.dispatch("telemetry/frames/other", br#"{"I": 2, "Timestamp": 2, "Values": [9.0, 9.0]}"#);

    let data = panel.data();
    let state = data.borrow();
    assert_eq!(state.window.len(), 2);
    let handle = state.chart.handle().unwrap();
    assert_eq!(handle.updates(), 2);
    assert_eq!(handle.options().id, "Mean (offset: true)");
    assert_eq!(handle.data().series(1), Some(&[0.0, 2.0][..]));
}

#[test]
fn channels_added_later_get_their_palette_color() {
    let mut d = Dispatcher::new();
    let mut panel = FramesPanel::new(&ChartConfig::default(), "telemetry/frames/mzi");
    panel.attach(&mut d);

    d.dispatch("telemetry/frames/mzi", br#"{"I": 0, "Timestamp": 0, "Values": [1.0]}"#);
    panel.data().borrow_mut().clear();
    let wide = serde_json::json!({"I": 1, "Timestamp": 1, "Values": vec![0.5; 20]});
    d.dispatch("telemetry/frames/mzi", &serde_json::to_vec(&wide).unwrap());

    let data = panel.data();
    let state = data.borrow();
    let handle = state.chart.handle().unwrap();
    assert_eq!(handle.data().series_count(), 20);
    let series = &handle.options().series;
    assert_eq!(series.len(), 20);
    assert_eq!(series[19].label, "19");
    assert_eq!(series[19].color, channel_color(19));
    assert_eq!(series[0].label, "0");
}

#[test]
fn histogram_panel_replaces_on_every_message() {
    let mut d = Dispatcher::new();
    let mut panel = HistogramPanel::new("telemetry/histograms");
    panel.attach(&mut d);

    let h1 = Histograms {
        normalized: vec![0.1, 0.2],
        white: vec![1.0, 2.0],
        flat: vec![3.0, 4.0],
    };
    let h2 = Histograms {
        normalized: vec![0.5; 3],
        white: vec![5.0; 3],
        flat: vec![6.0; 3],
    };
    d.dispatch("telemetry/histograms", &serde_json::to_vec(&h1).unwrap());
    d.dispatch("telemetry/histograms", &serde_json::to_vec(&h2).unwrap());

    let data = panel.data();
    let data = data.borrow();
    assert_eq!(data.state.current(), Some(&h2));
    let handle = data.chart.handle().unwrap();
    assert_eq!(handle.data().len(), 3);
    assert_eq!(handle.data().series(0), Some(&[6.0, 6.0, 6.0][..]));
    assert_eq!(handle.data().series(2), Some(&[0.5, 0.5, 0.5][..]));
}
