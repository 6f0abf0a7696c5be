use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

use base64::Engine as _;
use spriview::{BusError, BusEvent, ConnectionStatus, DashboardApp, DashboardConfig, Publisher};

#[derive(Default)]
struct Recorder {
    sent: RefCell<Vec<(String, Vec<u8>)>>,
}

impl Publisher for Recorder {
    fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BusError> {
        self.sent.borrow_mut().push((topic.to_string(), payload));
        Ok(())
    }
}

fn message(topic: &str, payload: &[u8]) -> BusEvent {
    BusEvent::Message {
        topic: topic.to_string(),
        payload: payload.to_vec(),
    }
}

fn png_base64(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    base64::engine::general_purpose::STANDARD
        .encode(buf.into_inner())
        .into_bytes()
}

#[test]
fn default_dashboard_subscribes_every_panel() {
    let app = DashboardApp::new(&DashboardConfig::default(), Rc::new(Recorder::default()));
    assert_eq!(app.charts.len(), 2);
    assert_eq!(app.images.len(), 2);
    assert!(app.histogram.is_some());
    assert!(app.controls.is_some());
    assert!(!app.has_bus());

    let filters = app.subscription_filters();
    for expected in [
        "telemetry/frames/mzi",
        "telemetry/images/drawing",
        "telemetry/images/raw",
        "telemetry/histograms",
        "control/commands/response",
    ] {
        assert!(filters.iter().any(|f| f == expected), "missing {expected}");
    }
    // Both frame charts share one filter.
    assert_eq!(filters.len(), 5);
}

#[test]
fn one_frame_reaches_both_charts() {
    let mut app = DashboardApp::new(&DashboardConfig::default(), Rc::new(Recorder::default()));
    app.handle_event(message(
        "telemetry/frames/mzi",
        br#"{"I": 7, "Timestamp": 1.5, "Values": [3.0, 4.0]}"#,
    ));
    app.handle_event(message(
        "telemetry/frames/mzi",
        br#"{"I": 8, "Timestamp": 2.0, "Values": [5.0, 4.0]}"#,
    ));

    let with_offset = app.charts[0].data();
    let raw = app.charts[1].data();
    let with_offset = with_offset.borrow();
    let raw = raw.borrow();
    assert_eq!(with_offset.window.len(), 2);
    assert_eq!(raw.window.len(), 2);

    let a = with_offset.chart.handle().unwrap().data().series(0).unwrap().to_vec();
    let b = raw.chart.handle().unwrap().data().series(0).unwrap().to_vec();
    assert_eq!(a, vec![0.0, 2.0]);
    assert_eq!(b, vec![3.0, 5.0]);
}

#[test]
fn images_are_routed_by_channel() {
    let mut app = DashboardApp::new(&DashboardConfig::default(), Rc::new(Recorder::default()));
    app.handle_event(message("telemetry/images/raw", &png_base64(4, 3)));
    app.handle_event(message("telemetry/images/raw", b"%%% not base64"));

    let drawing = app.images[0].slot();
    let raw = app.images[1].slot();
    assert_eq!(app.images[1].channel(), "raw");
    assert_eq!(drawing.borrow().received(), 0);
    assert_eq!(raw.borrow().received(), 1);
    assert_eq!(raw.borrow().size(), Some([4, 3]));
    assert!(raw.borrow().has_pending());
}

#[test]
fn drain_applies_queued_events_and_notices_shutdown() {
    let mut app = DashboardApp::new(&DashboardConfig::default(), Rc::new(Recorder::default()));
    let (tx, rx) = std::sync::mpsc::channel();
    app.set_bus(rx);

    tx.send(BusEvent::Status(ConnectionStatus::Connected)).unwrap();
    tx.send(message(
        "control/commands/response",
        br#"{"CmdType": 13, "Value": 480}"#,
    ))
    .unwrap();
    assert_eq!(app.drain_bus(), 2);
    assert!(app.status.status().is_connected());
    let controls = app.controls.as_ref().unwrap();
    assert_eq!(controls.listeners[1].value().as_deref(), Some("480"));
    assert_eq!(app.drain_bus(), 0);

    drop(tx);
    assert_eq!(app.drain_bus(), 0);
    assert!(!app.has_bus());
    assert!(matches!(app.status.status(), ConnectionStatus::Offline(_)));
}

#[test]
fn detach_all_silences_panels() {
    let mut app = DashboardApp::new(&DashboardConfig::default(), Rc::new(Recorder::default()));
    app.detach_all();
    assert!(app.dispatcher.is_empty());
    app.handle_event(message(
        "telemetry/frames/mzi",
        br#"{"I": 0, "Timestamp": 0, "Values": [1.0]}"#,
    ));
    assert!(app.charts[0].data().borrow().window.is_empty());
}

#[test]
fn disabled_sections_are_not_built() {
    let mut cfg = DashboardConfig::default();
    cfg.histogram = false;
    cfg.controls.enabled = false;
    cfg.images.clear();
    let app = DashboardApp::new(&cfg, Rc::new(Recorder::default()));
    assert!(app.histogram.is_none());
    assert!(app.controls.is_none());
    assert_eq!(app.subscription_filters(), vec!["telemetry/frames/mzi".to_string()]);
}
