//! Topic names and MQTT topic-filter matching.

use serde::{Deserialize, Serialize};

/// Topic layout of the instrument driver.
///
/// Frame and image topics are prefixes; the source or channel name is
/// appended as the last level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Topics {
    pub frames: String,
    pub histograms: String,
    pub images: String,
    pub commands: String,
    pub responses: String,
}

impl Default for Topics {
    fn default() -> Self {
        Self {
            frames: "telemetry/frames".to_string(),
            histograms: "telemetry/histograms".to_string(),
            images: "telemetry/images".to_string(),
            commands: "control/commands".to_string(),
            responses: "control/commands/response".to_string(),
        }
    }
}

impl Topics {
    pub fn frames_for(&self, source: &str) -> String {
        join(&self.frames, source)
    }

    pub fn images_for(&self, channel: &str) -> String {
        join(&self.images, channel)
    }
}

fn join(prefix: &str, leaf: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), leaf)
}

/// Returns `true` if `topic` matches the MQTT topic `filter`.
///
/// `+` matches exactly one level, a trailing `#` matches any number of
/// remaining levels (including none).
pub fn topic_matches(filter: &str, topic: &str) -> bool {
    let mut f = filter.split('/');
    let mut t = topic.split('/');
    loop {
        match (f.next(), t.next()) {
            (Some("#"), _) => return f.next().is_none(),
            (Some("+"), Some(_)) => {}
            (Some(a), Some(b)) if a == b => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}
