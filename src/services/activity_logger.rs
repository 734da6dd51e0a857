use std::sync::Arc;

use anyhow::Result;
use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::database::Store;
use crate::database::models::{ActivityEntry, ActivityType, NewActivity};
use crate::database::store::ActivityStore;

pub const RECENT_ACTIVITY_LIMIT: i64 = 50;

/// Best-effort audit trail. Write failures are logged and never propagated,
/// so a ledger operation that already committed still succeeds.
#[derive(Clone)]
pub struct ActivityLogger {
    store: Arc<dyn Store>,
}

impl ActivityLogger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn record(
        &self,
        actor_id: Uuid,
        action_type: ActivityType,
        details: Option<String>,
        amount: Option<BigDecimal>,
    ) {
        let activity = NewActivity {
            user_id: actor_id,
            action_type,
            action: action_type.action().to_string(),
            details,
            amount,
        };

        if let Err(e) = self.store.append_activity(activity).await {
            log::error!(
                "Failed to record {} activity for user {}: {:#}",
                action_type,
                actor_id,
                e
            );
        }
    }

    /// Newest first, capped at [`RECENT_ACTIVITY_LIMIT`].
    pub async fn recent(&self) -> Result<Vec<ActivityEntry>> {
        self.store.recent_activity(RECENT_ACTIVITY_LIMIT).await
    }
}
