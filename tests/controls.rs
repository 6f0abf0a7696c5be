use std::cell::RefCell;
use std::rc::Rc;

use spriview::bus::CommandResponse;
use spriview::config::{ControlsConfig, SliderConfig};
use spriview::panels::{CommandButton, CommandSlider, ControlsPanel, Panel, ResponseListener};
use spriview::{BusError, CommandMessage, CommandType, Dispatcher, Publisher};

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

impl Recorder {
    fn messages(&self) -> Vec<(String, serde_json::Value)> {
        self.sent
            .borrow()
            .iter()
            .map(|(t, p)| (t.clone(), serde_json::from_slice(p).unwrap()))
            .collect()
    }
}

struct Offline;

impl Publisher for Offline {
    fn publish(&self, _topic: &str, _payload: Vec<u8>) -> Result<(), BusError> {
        Err(BusError::InvalidUrl("offline".into()))
    }
}

#[test]
fn button_publishes_zero_value() {
    let rec = Rc::new(Recorder::default());
    let button = CommandButton::new(CommandType::StartCamera, rec.clone(), "control/commands");
    button.activate();

    let msgs = rec.messages();
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].0, "control/commands");
    assert_eq!(msgs[0].1, serde_json::json!({"CmdType": 0, "Value": 0.0}));
}

#[test]
fn slider_publishes_clamped_value_on_release() {
    let rec = Rc::new(Recorder::default());
    let cfg = SliderConfig::new(CommandType::SetPump, 0.0, 255.0);
    let mut slider = CommandSlider::new(cfg, rec.clone(), "control/commands");
    assert_eq!(slider.sent(), None);

    slider.release(120.0);
    slider.release(900.0);
    assert_eq!(slider.sent(), Some(255.0));

    let msgs = rec.messages();
    assert_eq!(msgs.len(), 2);
    assert_eq!(msgs[0].1, serde_json::json!({"CmdType": 23, "Value": 120.0}));
    assert_eq!(msgs[1].1, serde_json::json!({"CmdType": 23, "Value": 255.0}));
}

#[test]
fn failed_publish_leaves_slider_unsent() {
    let mut slider = CommandSlider::new(
        SliderConfig::new(CommandType::SetCameraAoiX, 0.0, 1400.0),
        Rc::new(Offline),
        "control/commands",
    );
    slider.release(700.0);
    assert_eq!(slider.sent(), None);
}

#[test]
fn command_message_wire_format() {
    let json = CommandMessage::new(CommandType::SetLed, 1.0).to_json().unwrap();
    let v: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(v, serde_json::json!({"CmdType": 24, "Value": 1.0}));
}

fn response(code: u8, value: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({"CmdType": code, "Value": value})).unwrap()
}

#[test]
fn listener_only_shows_its_command_type() {
    let mut dispatcher = Dispatcher::new();
    let mut listener = ResponseListener::new(CommandType::GetCameraTargetExposureOnFlatMs, "resp");
    listener.attach(&mut dispatcher);
    assert_eq!(listener.value(), None);

    dispatcher.dispatch("resp", &response(6, serde_json::json!(42)));
    assert_eq!(listener.value(), None);

    dispatcher.dispatch("resp", &response(5, serde_json::json!(42)));
    assert_eq!(listener.value().as_deref(), Some("42"));

    dispatcher.dispatch("resp", &response(5, serde_json::json!("70 ms")));
    assert_eq!(listener.value().as_deref(), Some("70 ms"));
}

#[test]
fn unknown_command_type_is_dropped() {
    let mut dispatcher = Dispatcher::new();
    let mut listener = ResponseListener::new(CommandType::GetCameraAoiX, "resp");
    listener.attach(&mut dispatcher);

    dispatcher.dispatch("resp", &response(11, serde_json::json!(640)));
    dispatcher.dispatch("resp", br#"{"CmdType": 99, "Value": 1}"#);
    dispatcher.dispatch("resp", b"not json");
    assert_eq!(listener.value().as_deref(), Some("640"));
}

#[test]
fn response_without_value_shows_empty_text() {
    let resp: CommandResponse = serde_json::from_str(r#"{"CmdType": 0}"#).unwrap();
    assert_eq!(resp.cmd_type, CommandType::StartCamera);
    assert_eq!(resp.display_value(), "");
}

#[test]
fn detached_listener_stops_updating() {
    let mut dispatcher = Dispatcher::new();
    let mut listener = ResponseListener::new(CommandType::GetCameraAoiY, "resp");
    listener.attach(&mut dispatcher);
    dispatcher.dispatch("resp", &response(13, serde_json::json!(480)));
    listener.detach(&mut dispatcher);
    dispatcher.dispatch("resp", &response(13, serde_json::json!(960)));
    assert_eq!(listener.value().as_deref(), Some("480"));
    assert!(dispatcher.is_empty());
}

#[test]
fn controls_panel_builds_default_widgets() {
    let rec = Rc::new(Recorder::default());
    let cfg = ControlsConfig::default();
    let mut panel = ControlsPanel::new(&cfg, rec.clone(), "control/commands", "control/commands/response");
    assert_eq!(panel.sliders.len(), 8);
    assert_eq!(panel.buttons.len(), 5);
    assert_eq!(panel.listeners.len(), 2);

    let mut dispatcher = Dispatcher::new();
    panel.attach(&mut dispatcher);
    assert_eq!(dispatcher.len(), 2);
    assert_eq!(dispatcher.filters(), vec!["control/commands/response".to_string()]);

    dispatcher.dispatch("control/commands/response", &response(11, serde_json::json!(1024)));
    assert_eq!(panel.listeners[0].value().as_deref(), Some("1024"));
    assert_eq!(panel.listeners[1].value(), None);

    for b in &panel.buttons {
        b.activate();
    }
    let codes: Vec<i64> = rec
        .messages()
        .iter()
        .map(|(_, v)| v["CmdType"].as_i64().unwrap())
        .collect();
    assert_eq!(codes, vec![26, 0, 1, 11, 13]);
}
