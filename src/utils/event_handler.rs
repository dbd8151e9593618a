use anyhow::Result;
use async_trait::async_trait;

/// Applies events drained from an event stream to the owning state.
#[async_trait(?Send)]
pub trait EventHandler {
    type Event: Send;

    async fn handle_event(&mut self, event: Self::Event) -> Result<()>;
}
