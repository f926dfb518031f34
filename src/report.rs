//! Routing of unsolicited device traffic into state deltas.

use tracing::{debug, warn};

use crate::config::ServiceOptions;
use crate::event::{EventContext, EventDecoder};
use crate::fan::{FanState, QuantizedModeMapper};
use crate::state::StateDelta;
use crate::wire::{
    ATTR_CURRENT_LEVEL, ATTR_ON_OFF, AttributeValue, Cluster, ZclHeader, find_attribute,
};

/// A message received from the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomingMessage {
    /// Undecoded frame, header included.
    Raw {
        endpoint: u8,
        cluster: Cluster,
        data: Vec<u8>,
    },
    /// Attribute report or read response.
    AttributeReport {
        cluster: Cluster,
        attributes: Vec<AttributeValue>,
    },
}

/// Receives decoded deltas.
pub trait EventSink {
    fn publish(&mut self, delta: StateDelta);
}

impl EventSink for Vec<StateDelta> {
    fn publish(&mut self, delta: StateDelta) {
        self.push(delta);
    }
}

#[derive(Debug, Clone)]
pub struct ReportDecoder {
    events: EventDecoder,
    mapper: QuantizedModeMapper,
    manufacturer_code: u16,
}

impl Default for ReportDecoder {
    fn default() -> Self {
        Self::new(&ServiceOptions::default(), QuantizedModeMapper::default())
    }
}

impl ReportDecoder {
    pub fn new(options: &ServiceOptions, mapper: QuantizedModeMapper) -> Self {
        Self {
            events: EventDecoder::from_options(options),
            mapper,
            manufacturer_code: options.manufacturer_code,
        }
    }

    /// Decodes `message`; `None` when it carries nothing this device exposes.
    pub fn decode(&self, message: &IncomingMessage) -> Option<StateDelta> {
        match message {
            IncomingMessage::Raw {
                endpoint,
                cluster: Cluster::Inovelli,
                data,
            } => self.decode_raw(*endpoint, data),
            IncomingMessage::Raw { .. } => None,
            IncomingMessage::AttributeReport {
                cluster: Cluster::LevelControl,
                attributes,
            } => find_attribute(attributes, ATTR_CURRENT_LEVEL).map(|level| {
                // A level of 0 means off; report the lowest speed instead.
                let mode = self.mapper.level_to_mode(level.max(1));
                StateDelta::single("fan_mode", mode.to_string())
            }),
            IncomingMessage::AttributeReport {
                cluster: Cluster::OnOff,
                attributes,
            } => find_attribute(attributes, ATTR_ON_OFF).map(|value| {
                StateDelta::single("fan_state", FanState::from_on_off(value).to_string())
            }),
            IncomingMessage::AttributeReport { .. } => None,
        }
    }

    /// Decodes `message` and publishes the result. Returns whether anything was published.
    pub fn dispatch(&self, message: &IncomingMessage, sink: &mut impl EventSink) -> bool {
        match self.decode(message) {
            Some(delta) => {
                sink.publish(delta);
                true
            }
            None => false,
        }
    }

    fn decode_raw(&self, endpoint: u8, data: &[u8]) -> Option<StateDelta> {
        let Some(context) = EventContext::from_frame(endpoint, data) else {
            warn!("Dropping truncated frame from endpoint {endpoint}: {data:02x?}");
            return None;
        };

        let manufacturer_code =
            ZclHeader::parse(data).and_then(|(header, _)| header.manufacturer_code);
        if manufacturer_code.is_some_and(|code| code != self.manufacturer_code) {
            debug!("Ignoring frame for manufacturer {manufacturer_code:?} on endpoint {endpoint}");
            return None;
        }

        self.events
            .decode(data, context)
            .map(|action| StateDelta::single("action", action.label()))
    }
}
