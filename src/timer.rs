/// A one-shot deadline on the frame clock.
///
/// Scheduling again replaces the pending deadline (last write wins);
/// `poll` fires at most once per schedule.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeferredTimer {
    deadline: Option<f64>,
}

impl DeferredTimer {
    pub fn schedule(&mut self, now: f64, delay_secs: f64) {
        self.deadline = Some(now + delay_secs.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Seconds until the deadline, if one is pending.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.deadline.map(|deadline| (deadline - now).max(0.0))
    }

    pub fn poll(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_deadline() {
        let mut timer = DeferredTimer::default();
        timer.schedule(10.0, 0.1);

        assert!(!timer.poll(10.05));
        assert!(timer.poll(10.11));
        assert!(!timer.poll(10.2));
        assert!(!timer.is_pending());
    }

    #[test]
    fn rescheduling_replaces_pending_deadline() {
        let mut timer = DeferredTimer::default();
        timer.schedule(0.0, 0.1);
        timer.schedule(0.08, 0.1);

        assert!(!timer.poll(0.12));
        assert!(timer.poll(0.19));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timer = DeferredTimer::default();
        timer.schedule(0.0, 2.0);
        timer.cancel();

        assert!(!timer.poll(5.0));
        assert_eq!(timer.remaining(5.0), None);
    }
}
