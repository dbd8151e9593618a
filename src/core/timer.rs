use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Whole seconds elapsed since the timer was last reset.
pub type Seconds = u64;

/// A callback invoked on every tick while registered.
pub type EachCallback = Box<dyn FnMut(Seconds) + Send>;

/// A callback invoked once when the counter reaches its target second.
pub type OnceCallback = Box<dyn FnOnce(Seconds) + Send>;

/// A Universally Unique Identifier (UUID) for registered callbacks.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone)]
pub struct CallbackId(pub Uuid);

impl CallbackId {
    pub fn new() -> Self {
        CallbackId(Uuid::new_v4())
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CallbackId {
    fn default() -> Self {
        Self::new()
    }
}

/// A second-resolution timer.
///
/// The timer itself does not produce ticks; whatever owns it feeds ticks in
/// through [`Timer::tick`] while the timer is running. Each tick fires the
/// one-shot callbacks registered for the current second, then every per-tick
/// callback, then advances the counter.
pub struct Timer {
    elapsed: Seconds,
    running: bool,
    each: BTreeMap<CallbackId, EachCallback>,
    once: HashMap<Seconds, Vec<OnceCallback>>,
}

impl Timer {
    /// Creates a stopped timer with no elapsed time and no callbacks.
    pub fn new() -> Self {
        Self {
            elapsed: 0,
            running: false,
            each: BTreeMap::new(),
            once: HashMap::new(),
        }
    }

    /// Registers a callback to run on every tick, under a generated id.
    ///
    /// The returned id is the only way to remove the callback later.
    pub fn each(&mut self, callback: impl FnMut(Seconds) + Send + 'static) -> CallbackId {
        self.each_with_id(CallbackId::new(), callback)
    }

    /// Registers a per-tick callback under the caller's id, replacing any
    /// existing callback with that id.
    pub fn each_with_id(
        &mut self,
        id: CallbackId,
        callback: impl FnMut(Seconds) + Send + 'static,
    ) -> CallbackId {
        self.each.insert(id.clone(), Box::new(callback));
        id
    }

    /// Removes a per-tick callback. Unknown ids are ignored.
    pub fn remove_callback(&mut self, id: &CallbackId) {
        self.each.remove(id);
    }

    /// Registers a callback to run once, when `elapsed` reaches `second`.
    ///
    /// Callbacks sharing a target second fire in registration order. There is
    /// no way to remove a one-shot callback before it fires.
    pub fn once(&mut self, second: i64, callback: impl FnOnce(Seconds) + Send + 'static) {
        // A negative target is unreachable; drop the registration.
        if second < 0 {
            return;
        }
        self.once
            .entry(second as Seconds)
            .or_default()
            .push(Box::new(callback));
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> Seconds {
        self.elapsed
    }

    /// Transitions to running. Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Transitions to stopped, preserving `elapsed` and all callbacks.
    /// Returns `false` if already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        true
    }

    /// Stops the timer and zeroes `elapsed`. Registered callbacks are kept:
    /// pending one-shot callbacks can still fire if their second is reached
    /// again, and per-tick callbacks resume from zero on the next start.
    pub fn reset(&mut self) {
        self.stop();
        self.elapsed = 0;
    }

    /// Advances the timer by one second boundary.
    ///
    /// One-shot callbacks for the current second fire first, in registration
    /// order, and their entry is removed so they can never fire again. Then
    /// every per-tick callback fires. Both receive the pre-increment elapsed
    /// value. Ticks arriving while stopped are ignored.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }

        if let Some(callbacks) = self.once.remove(&self.elapsed) {
            for callback in callbacks {
                callback(self.elapsed);
            }
        }

        for callback in self.each.values_mut() {
            callback(self.elapsed);
        }

        self.elapsed += 1;
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use test_case::test_case;

    fn recorder() -> (Arc<Mutex<Vec<Seconds>>>, impl FnMut(Seconds) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |second| sink.lock().push(second))
    }

    fn run_ticks(timer: &mut Timer, ticks: u64) {
        for _ in 0..ticks {
            timer.tick();
        }
    }

    #[test]
    fn new_timer_is_stopped_at_zero() {
        let timer = Timer::new();
        assert_eq!(0, timer.elapsed());
        assert!(!timer.is_running());
    }

    #[test]
    fn start_and_stop_report_transitions() {
        let mut timer = Timer::new();

        assert!(timer.start());
        assert!(!timer.start());
        assert!(timer.is_running());

        assert!(timer.stop());
        assert!(!timer.stop());
        assert!(!timer.is_running());
    }

    #[test]
    fn ticks_are_ignored_while_stopped() {
        let mut timer = Timer::new();
        let (seen, callback) = recorder();
        timer.each(callback);

        run_ticks(&mut timer, 3);

        assert_eq!(0, timer.elapsed());
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn each_receives_every_pre_increment_second() {
        let mut timer = Timer::new();
        let (seen, callback) = recorder();
        timer.each(callback);

        timer.start();
        run_ticks(&mut timer, 4);

        assert_eq!(vec![0, 1, 2, 3], *seen.lock());
        assert_eq!(4, timer.elapsed());
    }

    #[test]
    fn each_with_id_replaces_the_existing_callback() {
        let mut timer = Timer::new();
        let id = CallbackId::new();
        let (first_seen, first) = recorder();
        let (second_seen, second) = recorder();

        timer.each_with_id(id.clone(), first);
        let returned = timer.each_with_id(id.clone(), second);
        assert_eq!(id, returned);

        timer.start();
        run_ticks(&mut timer, 2);

        assert!(first_seen.lock().is_empty());
        assert_eq!(vec![0, 1], *second_seen.lock());
    }

    #[test]
    fn removed_callback_no_longer_fires() {
        let mut timer = Timer::new();
        let (seen, callback) = recorder();
        let id = timer.each(callback);

        timer.start();
        run_ticks(&mut timer, 2);
        timer.remove_callback(&id);
        run_ticks(&mut timer, 2);

        assert_eq!(vec![0, 1], *seen.lock());
    }

    #[test]
    fn removing_an_unknown_id_is_a_no_op() {
        let mut timer = Timer::new();
        let (seen, callback) = recorder();
        timer.each(callback);

        timer.remove_callback(&CallbackId::new());

        timer.start();
        run_ticks(&mut timer, 1);
        assert_eq!(vec![0], *seen.lock());
    }

    #[test_case(0; "immediately")]
    #[test_case(2; "after_two_seconds")]
    #[test_case(7; "after_seven_seconds")]
    fn once_fires_exactly_once_at_the_target(target: i64) {
        let mut timer = Timer::new();
        let (seen, callback) = recorder();
        timer.once(target, callback);

        timer.start();
        run_ticks(&mut timer, target as u64 + 5);

        assert_eq!(vec![target as Seconds], *seen.lock());
    }

    #[test_case(-1; "minus_one")]
    #[test_case(-100; "far_negative")]
    fn negative_targets_never_fire(target: i64) {
        let mut timer = Timer::new();
        let (seen, callback) = recorder();
        timer.once(target, callback);

        timer.start();
        run_ticks(&mut timer, 10);

        assert!(seen.lock().is_empty());
    }

    #[test]
    fn shared_target_fires_in_registration_order() {
        let mut timer = Timer::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = order.clone();
        timer.once(1, move |_| first.lock().push("first"));
        let second = order.clone();
        timer.once(1, move |_| second.lock().push("second"));

        timer.start();
        run_ticks(&mut timer, 2);

        assert_eq!(vec!["first", "second"], *order.lock());
    }

    #[test]
    fn reset_zeroes_the_counter_but_keeps_callbacks() {
        let mut timer = Timer::new();
        let (each_seen, each_callback) = recorder();
        let (pending_seen, pending_callback) = recorder();
        timer.each(each_callback);
        timer.once(5, pending_callback);

        timer.start();
        run_ticks(&mut timer, 3);
        timer.reset();

        assert_eq!(0, timer.elapsed());
        assert!(!timer.is_running());

        // Callbacks survive the reset; the counter restarts from zero.
        timer.start();
        run_ticks(&mut timer, 6);

        assert_eq!(vec![0, 1, 2, 0, 1, 2, 3, 4, 5], *each_seen.lock());
        assert_eq!(vec![5], *pending_seen.lock());
    }

    #[test]
    fn consumed_once_does_not_fire_again_after_reset() {
        let mut timer = Timer::new();
        let (seen, callback) = recorder();
        timer.once(1, callback);

        timer.start();
        run_ticks(&mut timer, 3);
        timer.reset();
        timer.start();
        run_ticks(&mut timer, 3);

        assert_eq!(vec![1], *seen.lock());
    }

    #[test]
    fn once_and_each_dispatch_in_the_same_tick() {
        let mut timer = Timer::new();
        let (once_seen, once_callback) = recorder();
        let (each_seen, each_callback) = recorder();

        timer.once(2, once_callback);
        timer.each(each_callback);

        timer.start();
        run_ticks(&mut timer, 3);

        assert_eq!(vec![2], *once_seen.lock());
        assert_eq!(vec![0, 1, 2], *each_seen.lock());
    }
}
