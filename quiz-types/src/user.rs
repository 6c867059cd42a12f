use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// The authenticated player, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerIdentity {
    pub id: Uuid,
    pub display_name: String,
}
