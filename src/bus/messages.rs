//! Wire messages carried on the telemetry and control topics.
//!
//! All JSON messages use PascalCase field names. Image payloads are raw
//! base64 strings and are not JSON-wrapped.

use std::fmt;

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// A message type that can be decoded from a raw bus payload.
pub trait Payload: Sized {
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError>;
}

fn decode_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(DecodeError::Empty);
    }
    Ok(serde_json::from_slice(bytes)?)
}

/// One timestamped telemetry sample, one value per channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(rename = "I")]
    pub index: i64,
    #[serde(rename = "Timestamp")]
    pub timestamp: f64,
    #[serde(rename = "Values")]
    pub values: Vec<f64>,
}

impl Frame {
    pub fn new(index: i64, timestamp: f64, values: Vec<f64>) -> Self {
        Self {
            index,
            timestamp,
            values,
        }
    }
}

impl Payload for Frame {
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        decode_json(bytes)
    }
}

/// The three histograms published together by the instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Histograms {
    pub normalized: Vec<f64>,
    pub white: Vec<f64>,
    pub flat: Vec<f64>,
}

impl Payload for Histograms {
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        decode_json(bytes)
    }
}

/// Encoded still image bytes (PNG or any format the `image` crate detects).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage(pub Vec<u8>);

impl Payload for EncodedImage {
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let text = std::str::from_utf8(bytes)?.trim();
        // Tolerate a data-URL prefix such as `data:image/png;base64,`.
        let text = match text.split_once(";base64,") {
            Some((head, rest)) if head.starts_with("data:") => rest.trim(),
            _ => text,
        };
        if text.is_empty() {
            return Err(DecodeError::Empty);
        }
        let raw = base64::engine::general_purpose::STANDARD.decode(text)?;
        Ok(Self(raw))
    }
}

/// Device-control operations understood by the instrument driver.
///
/// The integer codes are stable and used to correlate commands with their
/// responses, not to describe payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
#[repr(u8)]
pub enum CommandType {
    StartCamera = 0,
    StopCamera = 1,
    SetCameraTargetExposureMs = 2,
    GetCameraTargetExposureMs = 3,
    SetCameraTargetExposureOnFlatMs = 4,
    GetCameraTargetExposureOnFlatMs = 5,
    SetCameraTargetFrequencyHz = 6,
    GetCameraTargetFrequencyHz = 7,
    SetCameraTargetPixelClockHz = 8,
    GetCameraTargetPixelClockHz = 9,
    SetCameraAoiX = 10,
    GetCameraAoiX = 11,
    SetCameraAoiY = 12,
    GetCameraAoiY = 13,
    SetCameraAoiWidth = 14,
    GetCameraAoiWidth = 15,
    SetCameraAoiHeight = 16,
    GetCameraAoiHeight = 17,
    SetCameraBinning = 18,
    GetCameraBinning = 19,
    SetMeasureMasterNFrames = 20,
    SetDarkMasterDelaySecs = 21,
    SetFlatMasterDelaySecs = 22,
    SetPump = 23,
    SetLed = 24,
    SetValve = 25,
    ExecuteSpotDetectionSequence = 26,
    ExecuteCalibrationSequence = 27,
}

impl CommandType {
    pub const ALL: [CommandType; 28] = [
        CommandType::StartCamera,
        CommandType::StopCamera,
        CommandType::SetCameraTargetExposureMs,
        CommandType::GetCameraTargetExposureMs,
        CommandType::SetCameraTargetExposureOnFlatMs,
        CommandType::GetCameraTargetExposureOnFlatMs,
        CommandType::SetCameraTargetFrequencyHz,
        CommandType::GetCameraTargetFrequencyHz,
        CommandType::SetCameraTargetPixelClockHz,
        CommandType::GetCameraTargetPixelClockHz,
        CommandType::SetCameraAoiX,
        CommandType::GetCameraAoiX,
        CommandType::SetCameraAoiY,
        CommandType::GetCameraAoiY,
        CommandType::SetCameraAoiWidth,
        CommandType::GetCameraAoiWidth,
        CommandType::SetCameraAoiHeight,
        CommandType::GetCameraAoiHeight,
        CommandType::SetCameraBinning,
        CommandType::GetCameraBinning,
        CommandType::SetMeasureMasterNFrames,
        CommandType::SetDarkMasterDelaySecs,
        CommandType::SetFlatMasterDelaySecs,
        CommandType::SetPump,
        CommandType::SetLed,
        CommandType::SetValve,
        CommandType::ExecuteSpotDetectionSequence,
        CommandType::ExecuteCalibrationSequence,
    ];

    /// Stable wire code.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Display name, as shown on buttons and slider headings.
    pub fn name(self) -> &'static str {
        match self {
            CommandType::StartCamera => "StartCamera",
            CommandType::StopCamera => "StopCamera",
            CommandType::SetCameraTargetExposureMs => "SetCameraTargetExposureMs",
            CommandType::GetCameraTargetExposureMs => "GetCameraTargetExposureMs",
            CommandType::SetCameraTargetExposureOnFlatMs => "SetCameraTargetExposureOnFlatMs",
            CommandType::GetCameraTargetExposureOnFlatMs => "GetCameraTargetExposureOnFlatMs",
            CommandType::SetCameraTargetFrequencyHz => "SetCameraTargetFrequencyHz",
            CommandType::GetCameraTargetFrequencyHz => "GetCameraTargetFrequencyHz",
            CommandType::SetCameraTargetPixelClockHz => "SetCameraTargetPixelClockHz",
            CommandType::GetCameraTargetPixelClockHz => "GetCameraTargetPixelClockHz",
            CommandType::SetCameraAoiX => "SetCameraAOIX",
            CommandType::GetCameraAoiX => "GetCameraAOIX",
            CommandType::SetCameraAoiY => "SetCameraAOIY",
            CommandType::GetCameraAoiY => "GetCameraAOIY",
            CommandType::SetCameraAoiWidth => "SetCameraAOIWidth",
            CommandType::GetCameraAoiWidth => "GetCameraAOIWidth",
            CommandType::SetCameraAoiHeight => "SetCameraAOIHeight",
            CommandType::GetCameraAoiHeight => "GetCameraAOIHeight",
            CommandType::SetCameraBinning => "SetCameraBinning",
            CommandType::GetCameraBinning => "GetCameraBinning",
            CommandType::SetMeasureMasterNFrames => "SetMeasureMasterNFrames",
            CommandType::SetDarkMasterDelaySecs => "SetDarkMasterDelaySecs",
            CommandType::SetFlatMasterDelaySecs => "SetFlatMasterDelaySecs",
            CommandType::SetPump => "SetPump",
            CommandType::SetLed => "SetLED",
            CommandType::SetValve => "SetLCS",
            CommandType::ExecuteSpotDetectionSequence => "ExecuteSpotDetectionSequence",
            CommandType::ExecuteCalibrationSequence => "ExecuteCalibrationSequence",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i64> for CommandType {
    type Error = DecodeError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(DecodeError::UnknownCommand(code))
    }
}

impl From<CommandType> for i64 {
    fn from(cmd: CommandType) -> Self {
        i64::from(cmd.code())
    }
}

/// Command published on the control topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommandMessage {
    pub cmd_type: CommandType,
    pub value: f64,
}

impl CommandMessage {
    pub fn new(cmd_type: CommandType, value: f64) -> Self {
        Self { cmd_type, value }
    }

    /// Command without an argument (buttons send a zero value).
    pub fn trigger(cmd_type: CommandType) -> Self {
        Self::new(cmd_type, 0.0)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Asynchronous answer to a command; `value` is opaque to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommandResponse {
    pub cmd_type: CommandType,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl CommandResponse {
    /// Text shown by a response listener. Strings are shown without quotes.
    pub fn display_value(&self) -> String {
        match &self.value {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl Payload for CommandResponse {
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        decode_json(bytes)
    }
}
