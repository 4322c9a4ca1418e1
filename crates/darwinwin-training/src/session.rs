use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use darwinwin_engine::Level;

/// Shared training-enabled flag.
///
/// Clones share the same flag, so any thread (a signal handler or a control front
/// end) can stop a running training loop. The loop polls the flag between generations
/// and between batches; work that has already started is never interrupted.
#[derive(Debug, Clone)]
pub struct TrainingSwitch(Arc<AtomicBool>);

impl Default for TrainingSwitch {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingSwitch {
    /// Creates an enabled switch.
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn disable(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn enable(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// State shared by the controlling thread and the island workers.
///
/// Only the controlling thread replaces the level, and only between batches. During a
/// batch the workers read it through a shared reference.
#[derive(Debug, Clone)]
pub struct TrainingSession {
    level: Level,
    switch: TrainingSwitch,
}

impl TrainingSession {
    #[must_use]
    pub fn new(switch: TrainingSwitch) -> Self {
        Self {
            level: Level::new(),
            switch,
        }
    }

    #[must_use]
    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn replace_level(&mut self, level: Level) {
        self.level = level;
    }

    #[must_use]
    pub fn switch(&self) -> &TrainingSwitch {
        &self.switch
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.switch.is_enabled()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_switch_is_shared_between_clones() {
        let switch = TrainingSwitch::new();
        let session = TrainingSession::new(switch.clone());
        assert!(session.is_enabled());

        thread::scope(|s| {
            s.spawn(|| switch.disable());
        });
        assert!(!session.is_enabled());

        session.switch().enable();
        assert!(switch.is_enabled());
    }
}
