use futures::Stream;
use std::pin::Pin;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_stream::{StreamExt, wrappers::IntervalStream};

pub type TickStream = Pin<Box<dyn Stream<Item = ()> + Send>>;

/// Produces the periodic ticks that drive a running timer.
///
/// Every call to [`TickSource::ticks`] yields a fresh stream; starting the
/// timer takes one, stopping drops it.
pub trait TickSource: Send {
    fn ticks(&self) -> TickStream;
}

/// Wall-clock ticks from the tokio runtime, one per period.
pub struct IntervalTickSource {
    period: Duration,
}

impl IntervalTickSource {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn per_second() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl TickSource for IntervalTickSource {
    fn ticks(&self) -> TickStream {
        // A tokio interval fires immediately; the timer owes a full period
        // before its first tick, so start one period out. Delayed ticks push
        // later ticks back instead of bursting to catch up.
        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Box::pin(IntervalStream::new(interval).map(|_| ()))
    }
}
