//! In-memory device used by tests and the demo.

use std::collections::HashMap;

use super::{ClusterCommand, RequestOptions, Transport, TransportError};
use crate::wire::{ATTR_CURRENT_LEVEL, ATTR_ON_OFF, AttributeValue, Cluster, WriteRecord};

/// A request as the mock saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Read {
        cluster: Cluster,
        attribute_ids: Vec<u16>,
        options: RequestOptions,
    },
    Write {
        cluster: Cluster,
        record: WriteRecord,
        options: RequestOptions,
    },
    Command {
        command: ClusterCommand,
        options: RequestOptions,
    },
    Bind {
        endpoint: u8,
        clusters: Vec<Cluster>,
    },
}

/// Records every request and keeps attribute values like a device would.
#[derive(Debug, Default)]
pub struct MockTransport {
    attributes: HashMap<(Cluster, u16), u32>,
    requests: Vec<Request>,
    fail_next: Option<TransportError>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, cluster: Cluster, id: u16, value: u32) -> Self {
        self.set_attribute(cluster, id, value);
        self
    }

    pub fn set_attribute(&mut self, cluster: Cluster, id: u16, value: u32) {
        self.attributes.insert((cluster, id), value);
    }

    pub fn attribute(&self, cluster: Cluster, id: u16) -> Option<u32> {
        self.attributes.get(&(cluster, id)).copied()
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Makes the next request fail with `err` without touching state.
    pub fn fail_next(&mut self, err: TransportError) {
        self.fail_next = Some(err);
    }

    fn check_failure(&mut self) -> Result<(), TransportError> {
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Transport for MockTransport {
    fn read(
        &mut self,
        cluster: Cluster,
        attribute_ids: &[u16],
        options: &RequestOptions,
    ) -> Result<Vec<AttributeValue>, TransportError> {
        self.requests.push(Request::Read {
            cluster,
            attribute_ids: attribute_ids.to_vec(),
            options: *options,
        });
        self.check_failure()?;

        Ok(attribute_ids
            .iter()
            .filter_map(|&id| self.attribute(cluster, id).map(|v| AttributeValue::new(id, v)))
            .collect())
    }

    fn write(
        &mut self,
        cluster: Cluster,
        record: &WriteRecord,
        options: &RequestOptions,
    ) -> Result<(), TransportError> {
        self.requests.push(Request::Write {
            cluster,
            record: *record,
            options: *options,
        });
        self.check_failure()?;

        self.set_attribute(cluster, record.id, record.value);
        Ok(())
    }

    fn send_command(
        &mut self,
        command: &ClusterCommand,
        options: &RequestOptions,
    ) -> Result<(), TransportError> {
        self.requests.push(Request::Command {
            command: *command,
            options: *options,
        });
        self.check_failure()?;

        match command {
            ClusterCommand::On => self.set_attribute(Cluster::OnOff, ATTR_ON_OFF, 1),
            ClusterCommand::Off => self.set_attribute(Cluster::OnOff, ATTR_ON_OFF, 0),
            ClusterCommand::Toggle => {
                let on = self.attribute(Cluster::OnOff, ATTR_ON_OFF).unwrap_or(0);
                self.set_attribute(Cluster::OnOff, ATTR_ON_OFF, u32::from(on == 0));
            }
            ClusterCommand::MoveToLevelWithOnOff { level, .. } => {
                self.set_attribute(Cluster::LevelControl, ATTR_CURRENT_LEVEL, u32::from(*level));
                self.set_attribute(Cluster::OnOff, ATTR_ON_OFF, u32::from(*level > 0));
            }
            ClusterCommand::LedEffect(_) | ClusterCommand::IndividualLedEffect(_) => {}
        }
        Ok(())
    }

    fn bind(&mut self, endpoint: u8, clusters: &[Cluster]) -> Result<(), TransportError> {
        self.requests.push(Request::Bind {
            endpoint,
            clusters: clusters.to_vec(),
        });
        self.check_failure()
    }
}
