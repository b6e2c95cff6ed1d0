//! Deferred and repeating tasks
//!
//! Spawners and gem timeouts run on a schedule clock owned by the game state
//! instead of host timers, so they are deterministic, cancellable on reset,
//! and refer to entities by id.

use super::state::EntityId;
use crate::tuning::Tuning;

/// Shortest allowed repeat interval (seconds)
const MIN_INTERVAL: f64 = 1e-3;

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// Work to perform when a task comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    SpawnEnemy,
    SpawnGem,
    /// Remove this gem if it is still on the board
    ExpireGem(EntityId),
}

#[derive(Debug, Clone)]
struct Scheduled {
    id: TaskId,
    due: f64,
    task: Task,
    repeat: Option<f64>,
}

/// Task queue driven by elapsed frame time
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    now: f64,
    /// Target time of the current `advance`
    until: f64,
    tasks: Vec<Scheduled>,
    next_id: u64,
    spawners_started: bool,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds elapsed on the schedule clock
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn spawners_started(&self) -> bool {
        self.spawners_started
    }

    /// Run `task` once, `delay` seconds from now
    pub fn schedule_once(&mut self, delay: f64, task: Task) -> TaskId {
        self.push(delay.max(0.0), task, None)
    }

    /// Run `task` every `interval` seconds, first time one interval from now
    pub fn schedule_repeating(&mut self, interval: f64, task: Task) -> TaskId {
        let interval = interval.max(MIN_INTERVAL);
        self.push(interval, task, Some(interval))
    }

    /// Start the enemy and gem spawners. Returns false if already running.
    pub fn start_spawners(&mut self, tuning: &Tuning) -> bool {
        if self.spawners_started {
            return false;
        }
        self.schedule_repeating(tuning.enemy_spawn_interval, Task::SpawnEnemy);
        self.schedule_repeating(tuning.gem_spawn_interval, Task::SpawnGem);
        self.spawners_started = true;
        true
    }

    /// Cancel a pending task. Returns false if it already ran or never existed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Cancel every pending task matching `pred`, returning how many were dropped
    pub fn cancel_where(&mut self, pred: impl Fn(&Task) -> bool) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !pred(&t.task));
        before - self.tasks.len()
    }

    /// Pending tasks in insertion order
    pub fn pending(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().map(|t| &t.task)
    }

    /// Move the target time `dt` seconds ahead. Tasks due by then are taken
    /// one at a time with `pop_due`.
    pub fn advance(&mut self, dt: f64) {
        self.until += dt.max(0.0);
    }

    /// Take the earliest task due by the target time, earliest first.
    ///
    /// The clock moves to the task's due time, so work scheduled while
    /// handling it is measured from when it fired. A repeating task fires at
    /// most once per `advance`; intervals missed by a long frame are skipped.
    /// Once nothing is due the clock settles on the target time.
    pub fn pop_due(&mut self) -> Option<Task> {
        let Some(index) = self.next_due() else {
            self.now = self.until;
            return None;
        };
        let Scheduled {
            due, task, repeat, ..
        } = self.tasks[index];
        self.now = due;

        match repeat {
            Some(interval) => {
                let mut next = due + interval;
                if next <= self.until {
                    next += ((self.until - next) / interval).floor() * interval + interval;
                }
                self.tasks[index].due = next;
            }
            None => {
                self.tasks.remove(index);
            }
        }
        Some(task)
    }

    fn next_due(&self) -> Option<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= self.until)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)
    }

    fn push(&mut self, delay: f64, task: Task, repeat: Option<f64>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Scheduled {
            id,
            due: self.now + delay,
            task,
            repeat,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Advance and collect everything that fires
    fn run(schedule: &mut Schedule, dt: f64) -> Vec<Task> {
        schedule.advance(dt);
        std::iter::from_fn(|| schedule.pop_due()).collect()
    }

    #[test]
    fn test_once_fires_after_delay() {
        let mut schedule = Schedule::new();
        schedule.schedule_once(3.0, Task::ExpireGem(EntityId(7)));

        assert!(run(&mut schedule, 2.9).is_empty());
        assert_eq!(run(&mut schedule, 0.2), vec![Task::ExpireGem(EntityId(7))]);
        // One-shot tasks do not fire again
        assert!(run(&mut schedule, 10.0).is_empty());
    }

    #[test]
    fn test_repeating_fires_each_interval() {
        let mut schedule = Schedule::new();
        schedule.schedule_repeating(1.5, Task::SpawnEnemy);

        assert!(run(&mut schedule, 1.0).is_empty());
        assert_eq!(run(&mut schedule, 0.5), vec![Task::SpawnEnemy]);
        assert_eq!(run(&mut schedule, 1.5), vec![Task::SpawnEnemy]);
    }

    #[test]
    fn test_long_frame_fires_repeat_once() {
        let mut schedule = Schedule::new();
        schedule.schedule_repeating(1.5, Task::SpawnEnemy);

        // Due at 1.5 .. 60.0; only the first fires, the rest are skipped
        assert_eq!(run(&mut schedule, 60.0), vec![Task::SpawnEnemy]);
        assert!(run(&mut schedule, 1.25).is_empty());
        // Phase is kept: next due at 61.5
        assert_eq!(run(&mut schedule, 0.25), vec![Task::SpawnEnemy]);
    }

    #[test]
    fn test_work_scheduled_while_firing_counts_from_due_time() {
        let mut schedule = Schedule::new();
        schedule.schedule_once(1.0, Task::SpawnGem);
        schedule.advance(10.0);

        assert_eq!(schedule.pop_due(), Some(Task::SpawnGem));
        assert_eq!(schedule.now(), 1.0);

        // Due at 4.0, still inside this advance
        schedule.schedule_once(3.0, Task::ExpireGem(EntityId(3)));
        assert_eq!(schedule.pop_due(), Some(Task::ExpireGem(EntityId(3))));
        assert_eq!(schedule.now(), 4.0);

        assert_eq!(schedule.pop_due(), None);
        assert_eq!(schedule.now(), 10.0);
    }

    #[test]
    fn test_due_order_is_by_time() {
        let mut schedule = Schedule::new();
        schedule.schedule_once(2.0, Task::SpawnGem);
        schedule.schedule_once(1.0, Task::SpawnEnemy);

        assert_eq!(run(&mut schedule, 5.0), vec![Task::SpawnEnemy, Task::SpawnGem]);
    }

    #[test]
    fn test_cancel() {
        let mut schedule = Schedule::new();
        let id = schedule.schedule_once(1.0, Task::SpawnGem);
        assert!(schedule.cancel(id));
        assert!(!schedule.cancel(id));
        assert!(run(&mut schedule, 2.0).is_empty());
    }

    #[test]
    fn test_cancel_where_only_matches() {
        let mut schedule = Schedule::new();
        schedule.schedule_repeating(1.5, Task::SpawnEnemy);
        schedule.schedule_once(3.0, Task::ExpireGem(EntityId(1)));
        schedule.schedule_once(3.0, Task::ExpireGem(EntityId(2)));

        let dropped = schedule.cancel_where(|t| matches!(t, Task::ExpireGem(_)));
        assert_eq!(dropped, 2);
        assert_eq!(schedule.pending().collect::<Vec<_>>(), vec![&Task::SpawnEnemy]);
    }

    #[test]
    fn test_start_spawners_is_idempotent() {
        let tuning = Tuning::default();
        let mut schedule = Schedule::new();
        assert!(schedule.start_spawners(&tuning));
        assert!(!schedule.start_spawners(&tuning));
        assert_eq!(schedule.pending().count(), 2);

        // Quarter-second frames for 10 seconds: six enemy spawns and one gem
        let mut fired = Vec::new();
        for _ in 0..40 {
            fired.extend(run(&mut schedule, 0.25));
        }
        assert_eq!(fired.iter().filter(|t| **t == Task::SpawnEnemy).count(), 6);
        assert_eq!(fired.iter().filter(|t| **t == Task::SpawnGem).count(), 1);
    }
}
