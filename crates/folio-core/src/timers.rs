//! Timer bookkeeping.
//!
//! The host only hands out opaque [`TimerId`]s. The [`TimerBook`] remembers
//! what each timer is for so the page can route a fired timer back to the
//! controller that scheduled it, and so teardown can cancel everything that
//! is still pending.

use std::collections::HashMap;

use crate::host::{ElementId, Host, TimerId};

/// Work to run when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Next typing animation transition
    TypingStep,
    /// Next frame of the smooth scroll animation
    ScrollFrame,
    /// Particle emitter tick
    SpawnParticle,
    /// End of a particle's life
    ExpireParticle(ElementId),
    /// Staggered tag highlight on a hovered card
    LiftTag { card: ElementId, tag: ElementId },
    /// Staggered reveal of a descendant
    RevealChild(ElementId),
    /// Hero intro start
    HeroStart,
    /// Staggered hero item
    HeroItem(ElementId),
}

#[derive(Debug)]
struct Scheduled {
    task: TimerTask,
    repeating: bool,
}

/// Pending timers keyed by host id.
#[derive(Debug, Default)]
pub struct TimerBook {
    pending: HashMap<TimerId, Scheduled>,
}

impl TimerBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a one-shot task.
    pub fn after<H: Host>(&mut self, host: &mut H, delay_ms: u32, task: TimerTask) -> TimerId {
        let id = host.set_timeout(delay_ms);
        self.pending.insert(
            id,
            Scheduled {
                task,
                repeating: false,
            },
        );
        id
    }

    /// Schedule a repeating task.
    pub fn every<H: Host>(&mut self, host: &mut H, period_ms: u32, task: TimerTask) -> TimerId {
        let id = host.set_interval(period_ms);
        self.pending.insert(
            id,
            Scheduled {
                task,
                repeating: true,
            },
        );
        id
    }

    /// Resolve a fired timer into its task.
    ///
    /// One-shot entries are dropped and released back to the host. Unknown
    /// ids (already cancelled, or fired twice) yield `None`.
    pub fn fire<H: Host>(&mut self, host: &mut H, id: TimerId) -> Option<TimerTask> {
        let scheduled = self.pending.get(&id)?;
        let task = scheduled.task;
        if !scheduled.repeating {
            self.pending.remove(&id);
            host.clear_timer(id);
        }
        Some(task)
    }

    /// Cancel one timer. Returns its task if it was still pending.
    pub fn cancel<H: Host>(&mut self, host: &mut H, id: TimerId) -> Option<TimerTask> {
        let scheduled = self.pending.remove(&id)?;
        host.clear_timer(id);
        Some(scheduled.task)
    }

    /// Cancel every pending timer whose task matches `pred`.
    pub fn cancel_where<H, F>(&mut self, host: &mut H, pred: F) -> Vec<TimerTask>
    where
        H: Host,
        F: Fn(&TimerTask) -> bool,
    {
        let ids: Vec<TimerId> = self
            .pending
            .iter()
            .filter(|(_, scheduled)| pred(&scheduled.task))
            .map(|(id, _)| *id)
            .collect();

        ids.into_iter()
            .filter_map(|id| self.cancel(host, id))
            .collect()
    }

    pub fn cancel_all<H: Host>(&mut self, host: &mut H) -> usize {
        let ids: Vec<TimerId> = self.pending.keys().copied().collect();
        for id in &ids {
            host.clear_timer(*id);
        }
        self.pending.clear();
        ids.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of pending timers whose task matches `pred`.
    pub fn count_where<F>(&self, pred: F) -> usize
    where
        F: Fn(&TimerTask) -> bool,
    {
        self.pending.values().filter(|s| pred(&s.task)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryHost;

    #[test]
    fn test_one_shot_fires_once() {
        let mut host = MemoryHost::new();
        let mut book = TimerBook::new();

        let id = book.after(&mut host, 10, TimerTask::TypingStep);
        assert_eq!(book.fire(&mut host, id), Some(TimerTask::TypingStep));
        assert_eq!(book.fire(&mut host, id), None);
        assert!(book.is_empty());
    }

    #[test]
    fn test_repeating_stays_pending() {
        let mut host = MemoryHost::new();
        let mut book = TimerBook::new();

        let id = book.every(&mut host, 2000, TimerTask::SpawnParticle);
        assert_eq!(book.fire(&mut host, id), Some(TimerTask::SpawnParticle));
        assert_eq!(book.fire(&mut host, id), Some(TimerTask::SpawnParticle));
        assert!(book.is_pending(id));

        assert_eq!(book.cancel(&mut host, id), Some(TimerTask::SpawnParticle));
        assert_eq!(book.cancel(&mut host, id), None);
    }

    #[test]
    fn test_cancel_where_filters() {
        let mut host = MemoryHost::new();
        let mut book = TimerBook::new();
        let card = ElementId(1);
        let other = ElementId(2);

        book.after(&mut host, 50, TimerTask::LiftTag { card, tag: ElementId(10) });
        book.after(&mut host, 100, TimerTask::LiftTag { card, tag: ElementId(11) });
        book.after(&mut host, 50, TimerTask::LiftTag { card: other, tag: ElementId(12) });

        let cancelled =
            book.cancel_where(&mut host, |t| matches!(t, TimerTask::LiftTag { card: c, .. } if *c == card));
        assert_eq!(cancelled.len(), 2);
        assert_eq!(book.len(), 1);
        assert_eq!(host.pending_timers(), 1);
    }
}
