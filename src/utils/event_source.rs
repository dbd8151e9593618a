use futures::Stream;
use tokio::sync::oneshot;

/// Hands out a single event stream that ends when the termination signal
/// fires. A second call returns `None`.
pub trait EventSource {
    type Event;
    type EventStream: Stream<Item = Self::Event> + Unpin;

    fn take_stream(&mut self, termination: oneshot::Receiver<()>) -> Option<Self::EventStream>;
}
