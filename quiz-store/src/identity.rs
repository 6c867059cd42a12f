use uuid::Uuid;

use quiz_core::providers::IdentityProvider;
use quiz_types::PlayerIdentity;

/// Fixed identity provider: either a signed-in player or nobody. Session
/// lifecycle is out of scope, so the answer never changes after construction.
pub struct StaticIdentity(Option<PlayerIdentity>);

impl StaticIdentity {
    pub fn signed_in(id: Uuid, display_name: &str) -> Self {
        Self(Some(PlayerIdentity {
            id,
            display_name: display_name.to_string(),
        }))
    }

    pub fn signed_out() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_player(&self) -> Option<PlayerIdentity> {
        self.0.clone()
    }
}
