//! System-wide notifications

use std::sync::Arc;

use snapdog_notify::event_types::{SYSTEM_ERROR, SYSTEM_STATUS};

use super::CommandContext;
use crate::error::Result;

/// Publishes system-wide status and errors
#[derive(Clone)]
pub struct SystemCommands {
    context: Arc<CommandContext>,
}

impl SystemCommands {
    pub(crate) fn new(context: Arc<CommandContext>) -> Self {
        Self { context }
    }

    pub async fn publish_system_status(&self, payload: serde_json::Value) -> Result<()> {
        self.context
            .notifier()
            .publish_global(SYSTEM_STATUS, payload)
            .await
    }

    pub async fn publish_system_error(&self, payload: serde_json::Value) -> Result<()> {
        tracing::warn!(%payload, "Publishing system error");
        self.context
            .notifier()
            .publish_global(SYSTEM_ERROR, payload)
            .await
    }
}
