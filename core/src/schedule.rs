use alloc::collections::BTreeMap;
use core::time::Duration;

/// Single-threaded timer queue running on a virtual clock.
///
/// Nothing fires on its own: the owner moves the clock forward and pops due tasks one by one, so
/// tasks scheduled while handling an earlier one are still picked up in order. Tasks sharing a
/// due time fire in the order they were scheduled.
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_seq: u64,
    queue: BTreeMap<(Duration, u64), T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            queue: BTreeMap::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queues `task` to fire `delay` after the current time and returns its due time.
    pub fn schedule(&mut self, delay: Duration, task: T) -> Duration {
        let due = self.now.saturating_add(delay);
        self.queue.insert((due, self.next_seq), task);
        self.next_seq += 1;
        due
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|&(due, _)| due)
    }

    /// Removes the earliest task due at or before `until`, moving the clock to its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<T> {
        let (&(due, _), _) = self.queue.first_key_value()?;
        if due > until {
            return None;
        }
        let (_, task) = self.queue.pop_first()?;
        self.now = self.now.max(due);
        Some(task)
    }

    /// Moves the clock forward, never backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.queue.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn drain(scheduler: &mut Scheduler<&'static str>, until: Duration) -> Vec<&'static str> {
        let mut fired = Vec::new();
        while let Some(task) = scheduler.pop_due(until) {
            fired.push(task);
        }
        scheduler.set_now(until);
        fired
    }

    #[test]
    fn tasks_fire_in_due_order_then_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(500), "late");
        scheduler.schedule(ms(100), "first");
        scheduler.schedule(ms(100), "second");

        assert_eq!(scheduler.next_due(), Some(ms(100)));
        assert_eq!(drain(&mut scheduler, ms(499)), ["first", "second"]);
        assert_eq!(scheduler.now(), ms(499));
        assert_eq!(drain(&mut scheduler, ms(500)), ["late"]);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn delays_are_relative_to_the_current_clock() {
        let mut scheduler = Scheduler::new();
        scheduler.set_now(ms(1_000));

        assert_eq!(scheduler.schedule(ms(250), "task"), ms(1_250));
        assert!(scheduler.pop_due(ms(1_249)).is_none());
        assert_eq!(scheduler.pop_due(ms(1_250)), Some("task"));
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut scheduler: Scheduler<()> = Scheduler::new();
        scheduler.set_now(ms(10));
        scheduler.set_now(ms(5));

        assert_eq!(scheduler.now(), ms(10));
    }
}
