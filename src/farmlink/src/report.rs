//! Resource reports sent to the server.
//!
//! Each fill type total of a save becomes one [`Resource`] record, delivered
//! one at a time through a [`Transport`]. A failed delivery is logged and
//! the remaining records are still sent.

use crate::fill_type::{FillTypeMap, MappingError};
use crate::save::SaveIdentity;
use crate::totals::ResourceTotals;
use serde::Serialize;
use thiserror::Error;

/// One resource total for one save, as the server expects it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub location: SaveIdentity,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
}

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Server rejected resource with status {status} {reason}: {body}")]
    Rejected {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Server unreachable: {0}")]
    Unreachable(String),

    #[error("Failed to encode resource: {0}")]
    Encode(#[from] serde_json::Error),
}

impl DeliveryError {
    /// Short label used when logging failures
    pub fn kind(&self) -> &'static str {
        match self {
            DeliveryError::Rejected { .. } => "rejected",
            DeliveryError::Unreachable(_) => "unreachable",
            DeliveryError::Encode(_) => "encode",
        }
    }
}

/// Blocking delivery of a single record
pub trait Transport {
    fn deliver(&self, resource: &Resource) -> Result<(), DeliveryError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn deliver(&self, resource: &Resource) -> Result<(), DeliveryError> {
        (**self).deliver(resource)
    }
}

/// Outcome of emitting one save's records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitSummary {
    pub delivered: usize,
    pub failed: usize,
}

/// Resolve each total back to its fill type name
pub fn records(
    identity: &SaveIdentity,
    totals: &ResourceTotals,
    map: &FillTypeMap,
) -> Result<Vec<Resource>, MappingError> {
    totals
        .iter()
        .map(|(code, amount)| -> Result<Resource, MappingError> {
            let name = map.name(code).ok_or(MappingError::UnknownCode(code))?;
            Ok(Resource {
                location: identity.clone(),
                kind: name.to_string(),
                amount,
            })
        })
        .collect()
}

/// Deliver every record, logging failures without stopping
pub fn emit<T: Transport + ?Sized>(resources: &[Resource], transport: &T) -> EmitSummary {
    let mut summary = EmitSummary::default();

    for resource in resources {
        match transport.deliver(resource) {
            Ok(()) => summary.delivered += 1,
            Err(e) => {
                tracing::warn!(
                    kind = e.kind(),
                    "Failed to report {} for {}: {}",
                    resource.kind,
                    resource.location,
                    e
                );
                summary.failed += 1;
            }
        }
    }

    summary
}
