use serde::{Deserialize, Serialize};

use crate::contract::model::ProviderIdentity;

/// Body of a trigger delivery: either the bare user record or the record
/// wrapped in a `data` envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TriggerPayload {
    Envelope { data: ProviderIdentity },
    Bare(ProviderIdentity),
}

impl TriggerPayload {
    pub fn into_identity(self) -> ProviderIdentity {
        match self {
            Self::Envelope { data } => data,
            Self::Bare(identity) => identity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}
