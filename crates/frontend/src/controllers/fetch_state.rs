use super::generation::{Generation, GenerationCounter};

/// How a control treats a new request while one is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Filter controls: the new request supersedes the old one.
    LatestWins,
    /// One-shot actions: ignored until the current request settles.
    RejectWhileBusy,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Fetching,
    Rendered,
    Failed(String),
}

/// `Idle -> Fetching -> Rendered | Failed` for one server-dependent control.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlFetch {
    policy: FetchPolicy,
    phase: FetchPhase,
    counter: GenerationCounter,
}

impl ControlFetch {
    pub fn new(policy: FetchPolicy) -> Self {
        Self {
            policy,
            phase: FetchPhase::Idle,
            counter: GenerationCounter::default(),
        }
    }

    pub fn latest_wins() -> Self {
        Self::new(FetchPolicy::LatestWins)
    }

    pub fn reject_while_busy() -> Self {
        Self::new(FetchPolicy::RejectWhileBusy)
    }

    /// Starts a request. `None` means the click must be ignored.
    pub fn begin(&mut self) -> Option<Generation> {
        if self.policy == FetchPolicy::RejectWhileBusy && self.is_busy() {
            log::debug!("request rejected: previous one still in flight");
            return None;
        }
        self.phase = FetchPhase::Fetching;
        Some(self.counter.next())
    }

    /// Settles a request. Returns `false` for a superseded one, whose
    /// result must not be shown.
    pub fn finish_ok(&mut self, generation: Generation) -> bool {
        if !self.counter.is_current(generation) {
            return false;
        }
        self.phase = FetchPhase::Rendered;
        true
    }

    pub fn finish_err(&mut self, generation: Generation, message: impl Into<String>) -> bool {
        if !self.counter.is_current(generation) {
            return false;
        }
        self.phase = FetchPhase::Failed(message.into());
        true
    }

    /// Drops any in-flight request and returns to `Idle`.
    pub fn reset(&mut self) {
        self.counter.invalidate();
        self.phase = FetchPhase::Idle;
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.counter.is_current(generation)
    }

    pub fn is_busy(&self) -> bool {
        self.phase == FetchPhase::Fetching
    }

    pub fn phase(&self) -> &FetchPhase {
        &self.phase
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            FetchPhase::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_wins() {
        let mut fetch = ControlFetch::latest_wins();
        let a = fetch.begin().unwrap();
        let b = fetch.begin().unwrap();

        assert!(!fetch.finish_ok(a));
        assert!(fetch.is_busy());
        assert!(fetch.finish_ok(b));
        assert_eq!(fetch.phase(), &FetchPhase::Rendered);
    }

    #[test]
    fn test_reject_while_busy() {
        let mut fetch = ControlFetch::reject_while_busy();
        let a = fetch.begin().unwrap();
        assert!(fetch.begin().is_none());

        assert!(fetch.finish_err(a, "Ошибка"));
        assert_eq!(fetch.error(), Some("Ошибка"));
        assert!(fetch.begin().is_some());
    }

    #[test]
    fn test_reset_discards_in_flight() {
        let mut fetch = ControlFetch::latest_wins();
        let a = fetch.begin().unwrap();
        fetch.reset();
        assert!(!fetch.finish_ok(a));
        assert_eq!(fetch.phase(), &FetchPhase::Idle);
    }
}
