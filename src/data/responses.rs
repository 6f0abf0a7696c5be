//! Correlation of command responses with the command type a listener shows.

use crate::bus::{CommandResponse, CommandType};

/// Last response value for one command type. Last write wins.
#[derive(Debug, Clone)]
pub struct ResponseSlot {
    cmd: CommandType,
    value: Option<String>,
    updated_at: Option<chrono::DateTime<chrono::Local>>,
}

impl ResponseSlot {
    pub fn new(cmd: CommandType) -> Self {
        Self {
            cmd,
            value: None,
            updated_at: None,
        }
    }

    /// Take the response if its type matches; otherwise ignore it.
    ///
    /// Returns whether the displayed value changed hands.
    pub fn offer(&mut self, resp: &CommandResponse) -> bool {
        if resp.cmd_type != self.cmd {
            return false;
        }
        self.value = Some(resp.display_value());
        self.updated_at = Some(chrono::Local::now());
        true
    }

    pub fn command(&self) -> CommandType {
        self.cmd
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn updated_at(&self) -> Option<chrono::DateTime<chrono::Local>> {
        self.updated_at
    }
}
