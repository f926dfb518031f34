//! Parameter codec and command/event translation for the Inovelli VZM35-SN
//! Zigbee fan controller.
//!
//! The recommended API surface is:
//! - [`ParameterService`] for get/set, fan and LED requests over a [`Transport`]
//! - [`ReportDecoder`] for turning device traffic into [`StateDelta`]s
//! - [`vzm35::schema`] for the device's parameter table
//!
//! The codec, mode mapper, event decoder and command builders are pure and
//! can be used without a transport.

pub mod codec;
pub mod command;
mod config;
pub mod event;
pub mod fan;
mod report;
pub mod schema;
mod service;
mod state;
/// Transport abstraction the service issues requests through.
pub mod transport;
/// Device definition for the VZM35-SN.
pub mod vzm35;
/// ZCL data types, clusters and frame headers.
pub mod wire;

/// User-level parameter value and codec errors.
pub use codec::{CodecError, ParamValue};
/// Device identities the service and decoders use.
pub use config::ServiceOptions;
pub use fan::{FanMode, FanState, QuantizedModeMapper};
/// Decoding of unsolicited device traffic.
pub use report::{EventSink, IncomingMessage, ReportDecoder};
pub use schema::{ParameterDescriptor, ParameterSchema, SchemaError, UnknownParameter};
/// Errors returned by high-level service operations.
pub use service::{ParameterService, ServiceError};
/// Changes a caller merges into its own view of the device.
pub use state::StateDelta;
pub use transport::{Transport, TransportError};
