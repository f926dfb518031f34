use crate::command::{IndividualLedEffectCommand, LedEffectCommand};
use crate::wire::{AttributeValue, Cluster, WriteRecord};

#[cfg(any(test, feature = "mock"))]
pub mod mock;

/// Per-request flags forwarded to the Zigbee stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub manufacturer_code: Option<u16>,
    pub disable_response: bool,
    pub disable_default_response: bool,
}

impl RequestOptions {
    pub fn manufacturer(code: u16) -> Self {
        Self {
            manufacturer_code: Some(code),
            ..Self::default()
        }
    }

    /// Fire-and-forget: the device sends neither a response nor a default response.
    pub fn unacknowledged() -> Self {
        Self {
            disable_response: true,
            disable_default_response: true,
            ..Self::default()
        }
    }
}

/// Cluster commands issued by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterCommand {
    On,
    Off,
    Toggle,
    MoveToLevelWithOnOff { level: u8, transition_time: u16 },
    LedEffect(LedEffectCommand),
    IndividualLedEffect(IndividualLedEffectCommand),
}

impl ClusterCommand {
    pub fn cluster(&self) -> Cluster {
        match self {
            Self::On | Self::Off | Self::Toggle => Cluster::OnOff,
            Self::MoveToLevelWithOnOff { .. } => Cluster::LevelControl,
            Self::LedEffect(_) | Self::IndividualLedEffect(_) => Cluster::Inovelli,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Toggle => "toggle",
            Self::MoveToLevelWithOnOff { .. } => "moveToLevelWithOnOff",
            Self::LedEffect(_) => "ledEffect",
            Self::IndividualLedEffect(_) => "individualLedEffect",
        }
    }

    /// Command id within [`ClusterCommand::cluster`].
    pub fn command_id(&self) -> u8 {
        match self {
            Self::Off => 0x00,
            Self::On => 0x01,
            Self::Toggle => 0x02,
            Self::MoveToLevelWithOnOff { .. } => 0x04,
            Self::LedEffect(_) => 0x01,
            Self::IndividualLedEffect(_) => 0x03,
        }
    }

    pub fn payload(&self) -> Vec<u8> {
        match self {
            Self::On | Self::Off | Self::Toggle => Vec::new(),
            Self::MoveToLevelWithOnOff {
                level,
                transition_time,
            } => {
                let mut out = vec![*level];
                out.extend_from_slice(&transition_time.to_le_bytes());
                out
            }
            Self::LedEffect(cmd) => cmd.payload(),
            Self::IndividualLedEffect(cmd) => cmd.payload(),
        }
    }
}

/// Opaque failure of the request/response channel. Never retried here.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("device rejected the request with status {status:#04x}")]
    Rejected { status: u8 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

/// Request/response channel to one physical device.
///
/// Every method is one round trip. Timeouts and cancellation belong to the
/// implementation.
pub trait Transport {
    fn read(
        &mut self,
        cluster: Cluster,
        attribute_ids: &[u16],
        options: &RequestOptions,
    ) -> Result<Vec<AttributeValue>, TransportError>;

    fn write(
        &mut self,
        cluster: Cluster,
        record: &WriteRecord,
        options: &RequestOptions,
    ) -> Result<(), TransportError>;

    fn send_command(
        &mut self,
        command: &ClusterCommand,
        options: &RequestOptions,
    ) -> Result<(), TransportError>;

    /// Binds `clusters` on `endpoint` to the coordinator for reporting.
    fn bind(&mut self, endpoint: u8, clusters: &[Cluster]) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn read(
        &mut self,
        cluster: Cluster,
        attribute_ids: &[u16],
        options: &RequestOptions,
    ) -> Result<Vec<AttributeValue>, TransportError> {
        (**self).read(cluster, attribute_ids, options)
    }

    fn write(
        &mut self,
        cluster: Cluster,
        record: &WriteRecord,
        options: &RequestOptions,
    ) -> Result<(), TransportError> {
        (**self).write(cluster, record, options)
    }

    fn send_command(
        &mut self,
        command: &ClusterCommand,
        options: &RequestOptions,
    ) -> Result<(), TransportError> {
        (**self).send_command(command, options)
    }

    fn bind(&mut self, endpoint: u8, clusters: &[Cluster]) -> Result<(), TransportError> {
        (**self).bind(endpoint, clusters)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read(
        &mut self,
        cluster: Cluster,
        attribute_ids: &[u16],
        options: &RequestOptions,
    ) -> Result<Vec<AttributeValue>, TransportError> {
        (**self).read(cluster, attribute_ids, options)
    }

    fn write(
        &mut self,
        cluster: Cluster,
        record: &WriteRecord,
        options: &RequestOptions,
    ) -> Result<(), TransportError> {
        (**self).write(cluster, record, options)
    }

    fn send_command(
        &mut self,
        command: &ClusterCommand,
        options: &RequestOptions,
    ) -> Result<(), TransportError> {
        (**self).send_command(command, options)
    }

    fn bind(&mut self, endpoint: u8, clusters: &[Cluster]) -> Result<(), TransportError> {
        (**self).bind(endpoint, clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::{ClusterCommand, RequestOptions};
    use crate::command::build_effect_command;
    use crate::wire::Cluster;

    #[test]
    fn level_command_payload() {
        let cmd = ClusterCommand::MoveToLevelWithOnOff {
            level: 85,
            transition_time: 0xFFFF,
        };
        assert_eq!(cmd.cluster(), Cluster::LevelControl);
        assert_eq!(cmd.command_id(), 0x04);
        assert_eq!(cmd.payload(), vec![85, 0xFF, 0xFF]);
    }

    #[test]
    fn led_effect_routes_to_manufacturer_cluster() {
        let effect = build_effect_command("pulse", 10, 20, 30).expect("known");
        let cmd = ClusterCommand::LedEffect(effect);
        assert_eq!(cmd.cluster(), Cluster::Inovelli);
        assert_eq!(cmd.name(), "ledEffect");
        assert_eq!(cmd.payload(), vec![4, 10, 20, 30]);
    }

    #[test]
    fn option_presets() {
        assert_eq!(RequestOptions::manufacturer(0x122F).manufacturer_code, Some(0x122F));
        let fire_and_forget = RequestOptions::unacknowledged();
        assert!(fire_and_forget.disable_response && fire_and_forget.disable_default_response);
        assert_eq!(fire_and_forget.manufacturer_code, None);
    }
}
