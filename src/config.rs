use serde::{Deserialize, Serialize};

use crate::vzm35::{CONTROL_ENDPOINT, EVENT_ENDPOINT, SCENE_EVENT_COMMAND};
use crate::wire::INOVELLI_MANUFACTURER_CODE;

/// Transition time sent with fan mode changes. 0xFFFF lets the device apply
/// its own default transition; 0 would be instant.
pub const DEFAULT_FAN_TRANSITION_TIME: u16 = 0xFFFF;

/// Device-facing identities used by [`crate::ParameterService`] and
/// [`crate::ReportDecoder`]. Defaults match the VZM35-SN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceOptions {
    pub manufacturer_code: u16,
    pub control_endpoint: u8,
    pub event_endpoint: u8,
    pub scene_event_command: u8,
    pub fan_transition_time: u16,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            manufacturer_code: INOVELLI_MANUFACTURER_CODE,
            control_endpoint: CONTROL_ENDPOINT,
            event_endpoint: EVENT_ENDPOINT,
            scene_event_command: SCENE_EVENT_COMMAND,
            fan_transition_time: DEFAULT_FAN_TRANSITION_TIME,
        }
    }
}

impl ServiceOptions {
    /// Parses options from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
