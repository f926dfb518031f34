use tracing::debug;

use crate::codec::{self, CodecError, ParamValue};
use crate::command::{
    CommandError, IndividualLedEffectCommand, LedEffectCommand, build_effect_command,
    build_individual_effect_command,
};
use crate::config::ServiceOptions;
use crate::fan::{FanMode, FanState, FanStateCommand, ModeError, QuantizedModeMapper};
use crate::schema::{ParameterSchema, SchemaError, UnknownParameter};
use crate::state::StateDelta;
use crate::transport::{ClusterCommand, RequestOptions, Transport, TransportError};
use crate::vzm35::{self, CONTROL_BINDINGS, EVENT_BINDINGS};
use crate::wire::{ATTR_CURRENT_LEVEL, ATTR_ON_OFF, Cluster, find_attribute};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    UnknownParameter(#[from] UnknownParameter),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Mode(#[from] ModeError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("read reply did not contain attribute {id:#06x}")]
    MissingAttribute { id: u16 },
}

/// Parameter, fan and LED access for one VZM35-SN.
///
/// Every call issues exactly one transport request ([`ParameterService::configure`]
/// issues one per binding). Nothing is cached and nothing is retried.
pub struct ParameterService<T> {
    transport: T,
    schema: ParameterSchema,
    mapper: QuantizedModeMapper,
    options: ServiceOptions,
}

impl<T: Transport> ParameterService<T> {
    pub fn new(transport: T) -> Result<Self, SchemaError> {
        Ok(Self::with_options(
            transport,
            vzm35::schema()?,
            ServiceOptions::default(),
        ))
    }

    pub fn with_options(transport: T, schema: ParameterSchema, options: ServiceOptions) -> Self {
        Self {
            transport,
            schema,
            mapper: QuantizedModeMapper::default(),
            options,
        }
    }

    pub fn with_mapper(mut self, mapper: QuantizedModeMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn schema(&self) -> &ParameterSchema {
        &self.schema
    }

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    /// Reads a parameter from the manufacturer cluster.
    pub fn get(&mut self, name: &str) -> Result<ParamValue, ServiceError> {
        let descriptor = self.schema.lookup(name)?;
        let id = descriptor.id();
        let options = RequestOptions::manufacturer(self.options.manufacturer_code);

        debug!("Reading `{name}` (attribute {id:#06x})");
        let values = self.transport.read(Cluster::Inovelli, &[id], &options)?;
        let wire_value = find_attribute(&values, id).ok_or(ServiceError::MissingAttribute { id })?;

        Ok(codec::decode(descriptor, wire_value)?)
    }

    /// Writes a parameter and returns the value clients should reflect:
    /// the label for enumerations, the number otherwise.
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<ParamValue>,
    ) -> Result<ParamValue, ServiceError> {
        let value = value.into();
        let descriptor = self.schema.lookup(name)?;
        let record = codec::encode(descriptor, &value)?;
        let options = RequestOptions::manufacturer(self.options.manufacturer_code);

        debug!(
            "Writing `{name}` (attribute {:#06x}) = {} as {}",
            record.id, record.value, record.wire_type
        );
        self.transport.write(Cluster::Inovelli, &record, &options)?;

        Ok(codec::acknowledged(descriptor, &record, &value))
    }

    /// Moves to the level of `label`, switching the fan on.
    pub fn set_fan_mode(&mut self, label: &str) -> Result<StateDelta, ServiceError> {
        let level = self.mapper.mode_to_level(label)?;
        let command = ClusterCommand::MoveToLevelWithOnOff {
            level,
            transition_time: self.options.fan_transition_time,
        };

        self.send(&command, &RequestOptions::default())?;

        Ok(StateDelta::single("fan_mode", label).with("state", FanState::On.to_string()))
    }

    pub fn get_fan_mode(&mut self) -> Result<FanMode, ServiceError> {
        let level = self.read_attribute(Cluster::LevelControl, ATTR_CURRENT_LEVEL)?;
        Ok(self.mapper.level_to_mode(level))
    }

    /// Sends `on`, `off` or `toggle`.
    ///
    /// A toggle only yields a delta when the caller knows the current state;
    /// otherwise the returned delta is empty.
    pub fn set_fan_state(
        &mut self,
        command: &str,
        current: Option<FanState>,
    ) -> Result<StateDelta, ServiceError> {
        let command = FanStateCommand::parse(command)?;
        let (cluster_command, next) = match command {
            FanStateCommand::On => (ClusterCommand::On, Some(FanState::On)),
            FanStateCommand::Off => (ClusterCommand::Off, Some(FanState::Off)),
            FanStateCommand::Toggle => (ClusterCommand::Toggle, current.map(FanState::toggled)),
        };

        self.send(&cluster_command, &RequestOptions::default())?;

        Ok(next.map_or_else(StateDelta::new, |state| {
            StateDelta::single("fan_state", state.to_string())
        }))
    }

    pub fn get_fan_state(&mut self) -> Result<FanState, ServiceError> {
        let value = self.read_attribute(Cluster::OnOff, ATTR_ON_OFF)?;
        Ok(FanState::from_on_off(value))
    }

    /// Plays an effect on the whole LED bar.
    pub fn set_led_effect(
        &mut self,
        effect: &str,
        color: i64,
        level: i64,
        duration: i64,
    ) -> Result<LedEffectCommand, ServiceError> {
        let command = build_effect_command(effect, color, level, duration)?;
        self.send(
            &ClusterCommand::LedEffect(command),
            &RequestOptions::unacknowledged(),
        )?;
        Ok(command)
    }

    /// Plays an effect on a single LED (0 is the bottom one).
    pub fn set_individual_led_effect(
        &mut self,
        led: i64,
        effect: &str,
        color: i64,
        level: i64,
        duration: i64,
    ) -> Result<IndividualLedEffectCommand, ServiceError> {
        let command = build_individual_effect_command(led, effect, color, level, duration)?;
        self.send(
            &ClusterCommand::IndividualLedEffect(command),
            &RequestOptions::unacknowledged(),
        )?;
        Ok(command)
    }

    /// Binds the control clusters and the button event cluster for reporting.
    pub fn configure(&mut self) -> Result<(), ServiceError> {
        let control = self.options.control_endpoint;
        let event = self.options.event_endpoint;

        debug!("Binding {CONTROL_BINDINGS:?} on endpoint {control}");
        self.transport.bind(control, &CONTROL_BINDINGS)?;
        debug!("Binding {EVENT_BINDINGS:?} on endpoint {event}");
        self.transport.bind(event, &EVENT_BINDINGS)?;

        Ok(())
    }

    fn read_attribute(&mut self, cluster: Cluster, id: u16) -> Result<u32, ServiceError> {
        debug!("Reading {cluster} attribute {id:#06x}");
        let values = self.transport.read(cluster, &[id], &RequestOptions::default())?;
        find_attribute(&values, id).ok_or(ServiceError::MissingAttribute { id })
    }

    fn send(
        &mut self,
        command: &ClusterCommand,
        options: &RequestOptions,
    ) -> Result<(), ServiceError> {
        debug!(
            "Sending {}.{} (command {:#04x}) payload={:02x?}",
            command.cluster(),
            command.name(),
            command.command_id(),
            command.payload()
        );
        self.transport.send_command(command, options)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ParameterService, ServiceError};
    use crate::codec::{CodecError, ParamValue};
    use crate::command::CommandError;
    use crate::fan::{FanMode, FanState, ModeError};
    use crate::transport::mock::{MockTransport, Request};
    use crate::transport::{ClusterCommand, RequestOptions, TransportError};
    use crate::wire::{ATTR_CURRENT_LEVEL, ATTR_ON_OFF, Cluster, WireType, WriteRecord};

    fn service(transport: MockTransport) -> ParameterService<MockTransport> {
        ParameterService::new(transport).expect("built-in schema is valid")
    }

    #[test]
    fn set_enum_writes_code_and_acknowledges_label() {
        let mut svc = service(MockTransport::new());

        let ack = svc.set("outputMode", "On/Off").expect("valid label");
        assert_eq!(ack, ParamValue::from("On/Off"));

        assert_eq!(
            svc.transport().requests(),
            &[Request::Write {
                cluster: Cluster::Inovelli,
                record: WriteRecord {
                    id: 258,
                    wire_type: WireType::Boolean,
                    value: 1,
                },
                options: RequestOptions::manufacturer(0x122F),
            }]
        );
    }

    #[test]
    fn set_bounded_acknowledges_number() {
        let mut svc = service(MockTransport::new());

        assert_eq!(svc.set("minimumLevel", 20_i64).expect("in range"), ParamValue::Number(20));
        assert_eq!(svc.transport().attribute(Cluster::Inovelli, 9), Some(20));
        assert_eq!(svc.transport().requests().len(), 1);
    }

    #[test]
    fn validation_failures_never_reach_the_transport() {
        let mut svc = service(MockTransport::new());

        assert!(matches!(
            svc.set("minimumLevel", 0_i64),
            Err(ServiceError::Codec(CodecError::OutOfRange { .. }))
        ));
        assert!(matches!(
            svc.set("outputMode", "Dimmer"),
            Err(ServiceError::Codec(CodecError::InvalidEnumValue { .. }))
        ));
        assert!(matches!(
            svc.set("noSuchParameter", 1_i64),
            Err(ServiceError::UnknownParameter(_))
        ));
        assert!(matches!(
            svc.set_fan_mode("turbo"),
            Err(ServiceError::Mode(ModeError::UnknownMode(_)))
        ));
        assert!(matches!(
            svc.set_led_effect("disco", 0, 0, 0),
            Err(ServiceError::Command(CommandError::UnknownEffect(_)))
        ));
        assert!(svc.transport().requests().is_empty());
    }

    #[test]
    fn read_only_parameter_can_be_read_but_not_written() {
        let mut svc = service(MockTransport::new().with_attribute(Cluster::Inovelli, 257, 1));

        assert!(matches!(
            svc.set("remoteProtection", "Enabled"),
            Err(ServiceError::Codec(CodecError::NotWritable(_)))
        ));
        assert_eq!(svc.get("remoteProtection").expect("readable"), ParamValue::from("Enabled"));
        assert_eq!(svc.transport().requests().len(), 1);
    }

    #[test]
    fn get_reads_once_with_manufacturer_code() {
        let mut svc = service(MockTransport::new().with_attribute(Cluster::Inovelli, 9, 42));

        assert_eq!(svc.get("minimumLevel").expect("present"), ParamValue::Number(42));
        assert_eq!(
            svc.transport().requests(),
            &[Request::Read {
                cluster: Cluster::Inovelli,
                attribute_ids: vec![9],
                options: RequestOptions::manufacturer(0x122F),
            }]
        );
    }

    #[test]
    fn get_reports_missing_and_unlabelled_values() {
        let mut svc = service(MockTransport::new().with_attribute(Cluster::Inovelli, 258, 7));

        assert!(matches!(
            svc.get("minimumLevel"),
            Err(ServiceError::MissingAttribute { id: 9 })
        ));
        assert!(matches!(
            svc.get("outputMode"),
            Err(ServiceError::Codec(CodecError::UnknownWireValue { value: 7, .. }))
        ));
    }

    #[test]
    fn transport_errors_pass_through() {
        let mut transport = MockTransport::new();
        transport.fail_next(TransportError::Timeout);
        let mut svc = service(transport);

        assert!(matches!(
            svc.set("minimumLevel", 20_i64),
            Err(ServiceError::Transport(TransportError::Timeout))
        ));
        // Only the failed attempt, no retry.
        assert_eq!(svc.transport().requests().len(), 1);
        assert_eq!(svc.transport().attribute(Cluster::Inovelli, 9), None);
    }

    #[test]
    fn fan_mode_round_trip() {
        let mut svc = service(MockTransport::new());

        let delta = svc.set_fan_mode("medium").expect("known mode");
        assert_eq!(delta.get("fan_mode"), Some(&json!("medium")));
        assert_eq!(delta.get("state"), Some(&json!("ON")));
        assert_eq!(
            svc.transport().requests(),
            &[Request::Command {
                command: ClusterCommand::MoveToLevelWithOnOff {
                    level: 85,
                    transition_time: 0xFFFF,
                },
                options: RequestOptions::default(),
            }]
        );

        assert_eq!(svc.get_fan_mode().expect("level stored"), FanMode::Medium);
        assert_eq!(svc.transport().requests().len(), 2);
    }

    #[test]
    fn fan_mode_quantizes_reported_level() {
        let mut svc = service(MockTransport::new().with_attribute(
            Cluster::LevelControl,
            ATTR_CURRENT_LEVEL,
            200,
        ));
        assert_eq!(svc.get_fan_mode().expect("level stored"), FanMode::Medium);
    }

    #[test]
    fn fan_state_commands() {
        let mut svc = service(MockTransport::new());

        let delta = svc.set_fan_state("ON", None).expect("valid command");
        assert_eq!(delta.to_json(), r#"{"fan_state":"ON"}"#);
        assert_eq!(svc.get_fan_state().expect("stored"), FanState::On);

        let delta = svc.set_fan_state("toggle", Some(FanState::On)).expect("valid command");
        assert_eq!(delta.get("fan_state"), Some(&json!("OFF")));
        assert_eq!(svc.transport().attribute(Cluster::OnOff, ATTR_ON_OFF), Some(0));

        let delta = svc.set_fan_state("toggle", None).expect("valid command");
        assert!(delta.is_empty());

        assert!(matches!(
            svc.set_fan_state("spin", None),
            Err(ServiceError::Mode(ModeError::UnknownStateCommand(_)))
        ));
        // on, read, toggle, toggle
        assert_eq!(svc.transport().requests().len(), 4);
    }

    #[test]
    fn led_effects_are_unacknowledged() {
        let mut svc = service(MockTransport::new());

        let cmd = svc.set_led_effect("Fast Blink", 300, -5, 999).expect("known effect");
        assert_eq!(cmd.payload(), vec![2, 255, 0, 255]);
        let cmd = svc
            .set_individual_led_effect(9, "chase", 170, 50, 10)
            .expect("known effect");
        assert_eq!(cmd.led, 7);

        for request in svc.transport().requests() {
            let Request::Command { options, .. } = request else {
                panic!("expected a command, got {request:?}");
            };
            assert_eq!(*options, RequestOptions::unacknowledged());
        }
        assert_eq!(svc.transport().requests().len(), 2);
    }

    #[test]
    fn configure_binds_both_endpoints() {
        let mut svc = service(MockTransport::new());
        svc.configure().expect("bindings succeed");

        assert_eq!(
            svc.transport().requests(),
            &[
                Request::Bind {
                    endpoint: 1,
                    clusters: vec![Cluster::OnOff, Cluster::LevelControl],
                },
                Request::Bind {
                    endpoint: 2,
                    clusters: vec![Cluster::Inovelli],
                },
            ]
        );
    }
}
