//! PostMessageHandler - Command handler for producer ingest.

use std::sync::Arc;

use tracing::info;

use crate::application::hub::{DeliveryReport, Hub};
use crate::domain::messaging::{Event, HubError};

/// Command to post an event to a channel.
#[derive(Debug, Clone)]
pub struct PostMessageCommand {
    pub channel_id: String,
    pub event: Event,
}

/// Handler for producer posts.
pub struct PostMessageHandler {
    hub: Arc<Hub>,
}

impl PostMessageHandler {
    pub fn new(hub: Arc<Hub>) -> Self {
        Self { hub }
    }

    pub async fn handle(&self, cmd: PostMessageCommand) -> Result<DeliveryReport, HubError> {
        let producer = cmd.event.user.id.clone();
        let report = self.hub.broadcast(&cmd.channel_id, cmd.event).await?;

        info!(
            channel_id = %report.channel_id,
            producer = %producer,
            recipients = report.recipients,
            delivered = report.delivered,
            failed = report.failed(),
            "Message posted"
        );
        Ok(report)
    }
}
