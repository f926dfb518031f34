//! Wire-level helpers for ZCL data types, clusters and attribute records.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::{Display, IntoStaticStr};

/// Inovelli manufacturer code carried on every manufacturer-specific request.
pub const INOVELLI_MANUFACTURER_CODE: u16 = 0x122F;

/// Length of a manufacturer-specific ZCL header:
/// frame control, manufacturer code (2 bytes), sequence number, command id.
pub const MANUFACTURER_HEADER_LEN: usize = 5;
/// Offset of the command id inside a manufacturer-specific frame.
pub const COMMAND_ID_OFFSET: usize = MANUFACTURER_HEADER_LEN - 1;
/// Frame control bit announcing a manufacturer code after the first byte.
pub const FRAME_CONTROL_MANUFACTURER_SPECIFIC: u8 = 0x04;

/// `currentLevel` on the level control cluster.
pub const ATTR_CURRENT_LEVEL: u16 = 0x0000;
/// `onOff` on the on/off cluster.
pub const ATTR_ON_OFF: u16 = 0x0000;

/// ZCL data type tag, governing byte width on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, Display,
    IntoStaticStr,
)]
#[repr(u8)]
#[strum(serialize_all = "snake_case")]
pub enum WireType {
    Boolean = 0x10,
    Uint8 = 0x20,
    Uint16 = 0x21,
}

impl WireType {
    pub const fn width(self) -> usize {
        match self {
            Self::Boolean | Self::Uint8 => 1,
            Self::Uint16 => 2,
        }
    }

    /// Largest value representable by this type.
    pub const fn max_value(self) -> u32 {
        match self {
            Self::Boolean => 1,
            Self::Uint8 => u8::MAX as u32,
            Self::Uint16 => u16::MAX as u32,
        }
    }

    pub const fn fits(self, value: u32) -> bool {
        value <= self.max_value()
    }

    /// Little-endian encoding of `value`, truncated to the type's width.
    pub fn encode(self, value: u32) -> Vec<u8> {
        value.to_le_bytes()[..self.width()].to_vec()
    }
}

/// Clusters the fan controller talks to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, Display,
    IntoStaticStr,
)]
#[repr(u16)]
pub enum Cluster {
    #[strum(serialize = "genOnOff")]
    OnOff = 0x0006,
    #[strum(serialize = "genLevelCtrl")]
    LevelControl = 0x0008,
    #[strum(serialize = "manuSpecificInovelliVZM31SN")]
    Inovelli = 0xFC31,
}

/// One attribute write: attribute id plus a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteRecord {
    pub id: u16,
    pub wire_type: WireType,
    pub value: u32,
}

impl WriteRecord {
    /// ZCL write-attribute record: id (LE), type tag, value (LE, type width).
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(3 + self.wire_type.width());
        out.extend_from_slice(&self.id.to_le_bytes());
        out.push(self.wire_type.into());
        out.extend(self.wire_type.encode(self.value));
        out
    }
}

/// One attribute value as returned by a read or carried by a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeValue {
    pub id: u16,
    pub value: u32,
}

impl AttributeValue {
    pub const fn new(id: u16, value: u32) -> Self {
        Self { id, value }
    }
}

pub fn find_attribute(values: &[AttributeValue], id: u16) -> Option<u32> {
    values.iter().find(|v| v.id == id).map(|v| v.value)
}

/// ZCL frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZclHeader {
    pub frame_control: u8,
    pub manufacturer_code: Option<u16>,
    pub sequence: u8,
    pub command_id: u8,
}

impl ZclHeader {
    /// Splits `raw` into its header and payload. `None` if the header is truncated.
    pub fn parse(raw: &[u8]) -> Option<(Self, &[u8])> {
        let (&frame_control, rest) = raw.split_first()?;

        let manufacturer_specific = frame_control & FRAME_CONTROL_MANUFACTURER_SPECIFIC != 0;
        let (manufacturer_code, rest) = if manufacturer_specific {
            let (code, rest) = rest.split_first_chunk::<2>()?;
            (Some(u16::from_le_bytes(*code)), rest)
        } else {
            (None, rest)
        };

        let (&sequence, rest) = rest.split_first()?;
        let (&command_id, payload) = rest.split_first()?;

        let header = Self {
            frame_control,
            manufacturer_code,
            sequence,
            command_id,
        };
        Some((header, payload))
    }
}
