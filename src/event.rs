//! Button scene events from the manufacturer cluster.
//!
//! A scene event is a manufacturer-specific ZCL frame whose payload starts
//! right after the header: the button code, then the click code.

use std::fmt;

use num_enum::TryFromPrimitive;
use strum_macros::{Display, EnumIter, IntoStaticStr};
use tracing::warn;

use crate::config::ServiceOptions;
use crate::wire::{COMMAND_ID_OFFSET, MANUFACTURER_HEADER_LEN};

pub const BUTTON_OFFSET: usize = MANUFACTURER_HEADER_LEN;
pub const CLICK_OFFSET: usize = BUTTON_OFFSET + 1;

/// Segment rendered for a byte outside its mapped domain.
pub const UNRESOLVED_SEGMENT: &str = "undefined";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, Display, EnumIter, IntoStaticStr,
)]
#[repr(u8)]
#[strum(serialize_all = "snake_case")]
pub enum Button {
    Down = 1,
    Up = 2,
    Config = 3,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, Display, EnumIter, IntoStaticStr,
)]
#[repr(u8)]
#[strum(serialize_all = "snake_case")]
pub enum Click {
    Single = 0,
    Release = 1,
    Held = 2,
    Double = 3,
    Triple = 4,
    Quadruple = 5,
    Quintuple = 6,
}

/// Where a raw frame came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventContext {
    pub endpoint_id: u8,
    pub command_id: u8,
}

impl EventContext {
    /// Reads the command id at its fixed offset; `None` if the frame is
    /// too short to carry one.
    pub fn from_frame(endpoint_id: u8, raw: &[u8]) -> Option<Self> {
        raw.get(COMMAND_ID_OFFSET).map(|&command_id| Self {
            endpoint_id,
            command_id,
        })
    }
}

/// Decoded button action; either half may be unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemanticAction {
    pub button: Option<Button>,
    pub click: Option<Click>,
}

impl SemanticAction {
    pub fn is_resolved(&self) -> bool {
        self.button.is_some() && self.click.is_some()
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SemanticAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let button = self.button.map_or(UNRESOLVED_SEGMENT, <&'static str>::from);
        let click = self.click.map_or(UNRESOLVED_SEGMENT, <&'static str>::from);
        write!(f, "{button}_{click}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDecoder {
    event_endpoint: u8,
    scene_event_command: u8,
}

impl Default for EventDecoder {
    fn default() -> Self {
        Self::from_options(&ServiceOptions::default())
    }
}

impl EventDecoder {
    pub const fn new(event_endpoint: u8, scene_event_command: u8) -> Self {
        Self {
            event_endpoint,
            scene_event_command,
        }
    }

    pub fn from_options(options: &ServiceOptions) -> Self {
        Self::new(options.event_endpoint, options.scene_event_command)
    }

    /// Decodes a scene event; frames for other endpoints or commands are not
    /// ours and yield `None`.
    ///
    /// Button or click bytes outside their domain (or missing) never fail:
    /// the corresponding half of the action stays unresolved.
    pub fn decode(&self, raw: &[u8], context: EventContext) -> Option<SemanticAction> {
        if context.endpoint_id != self.event_endpoint
            || context.command_id != self.scene_event_command
        {
            return None;
        }

        let button_code = raw.get(BUTTON_OFFSET).copied();
        let click_code = raw.get(CLICK_OFFSET).copied();
        let action = SemanticAction {
            button: button_code.and_then(|b| Button::try_from(b).ok()),
            click: click_code.and_then(|c| Click::try_from(c).ok()),
        };

        if !action.is_resolved() {
            warn!(
                "Partially resolved scene event `{action}`: \
                 button={button_code:?} click={click_code:?}"
            );
        }

        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::{Button, Click, EventContext, EventDecoder, SemanticAction};

    const SCENE: EventContext = EventContext {
        endpoint_id: 2,
        command_id: 0x00,
    };

    fn frame(button: u8, click: u8) -> Vec<u8> {
        // frame control, manufacturer code 0x122F, sequence, command.
        vec![0x05, 0x2F, 0x12, 0x17, 0x00, button, click]
    }

    #[test]
    fn decodes_up_double() {
        let action = EventDecoder::default()
            .decode(&frame(2, 3), SCENE)
            .expect("scene event");
        assert_eq!(action.label(), "up_double");
        assert_eq!(
            action,
            SemanticAction {
                button: Some(Button::Up),
                click: Some(Click::Double),
            }
        );
    }

    #[test]
    fn decodes_every_button_and_click() {
        let decoder = EventDecoder::default();
        let label = |button, click| decoder.decode(&frame(button, click), SCENE).map(|a| a.label());

        assert_eq!(label(1, 0).as_deref(), Some("down_single"));
        assert_eq!(label(3, 2).as_deref(), Some("config_held"));
        assert_eq!(label(2, 6).as_deref(), Some("up_quintuple"));
        assert_eq!(label(1, 1).as_deref(), Some("down_release"));
    }

    #[test]
    fn ignores_other_endpoints_and_commands() {
        let decoder = EventDecoder::default();
        let other_endpoint = EventContext {
            endpoint_id: 1,
            command_id: 0x00,
        };
        let other_command = EventContext {
            endpoint_id: 2,
            command_id: 0x01,
        };

        assert_eq!(decoder.decode(&frame(2, 3), other_endpoint), None);
        assert_eq!(decoder.decode(&frame(2, 3), other_command), None);
    }

    #[test]
    fn out_of_domain_bytes_degrade_instead_of_failing() {
        let decoder = EventDecoder::default();

        let action = decoder.decode(&frame(9, 3), SCENE).expect("still an action");
        assert!(!action.is_resolved());
        assert_eq!(action.label(), "undefined_double");

        let action = decoder.decode(&frame(1, 42), SCENE).expect("still an action");
        assert_eq!(action.label(), "down_undefined");

        let action = decoder
            .decode(&[0x05, 0x2F, 0x12, 0x17, 0x00], SCENE)
            .expect("still an action");
        assert_eq!(action.label(), "undefined_undefined");
    }

    #[test]
    fn context_reads_command_at_fixed_offset() {
        assert_eq!(EventContext::from_frame(2, &frame(2, 3)), Some(SCENE));
        assert_eq!(EventContext::from_frame(2, &[0x05, 0x2F]), None);

        // Without a manufacturer code the command byte stays at offset 4.
        let plain = EventContext::from_frame(2, &[0x01, 0x07, 0x0B, 0x09, 0x05, 2, 3]);
        assert_eq!(plain.map(|c| c.command_id), Some(0x05));
    }
}
