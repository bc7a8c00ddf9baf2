//! Autoplay recovery
//!
//! Browsers refuse audio that was not started by a user gesture. When that
//! happens (or when the session starts muted to get around it) the gate is
//! armed: one-shot listeners for click, keypress and touch are registered
//! together. The first interaction wins and removes all of them, so at most
//! one resume fires per gating episode.

use crate::types::InteractionKind;
use radio_core::InteractionHooks;
use tracing::debug;

/// One-shot interaction gate
pub struct AutoplayGate {
    armed: bool,
    hooks: Box<dyn InteractionHooks>,
}

impl AutoplayGate {
    /// Create a disarmed gate over the platform's interaction listeners
    pub fn new(hooks: Box<dyn InteractionHooks>) -> Self {
        Self {
            armed: false,
            hooks,
        }
    }

    /// Register interaction listeners
    ///
    /// Idempotent: returns `false` (and registers nothing) if already armed.
    pub fn arm(&mut self) -> bool {
        if self.armed {
            return false;
        }
        self.hooks.attach();
        self.armed = true;
        debug!("autoplay gate armed");
        true
    }

    /// Consume the gate for an interaction
    ///
    /// Returns `true` exactly once per arming; later interactions are no-ops.
    pub fn trigger(&mut self, kind: InteractionKind) -> bool {
        if !self.armed {
            return false;
        }
        self.hooks.detach();
        self.armed = false;
        debug!(?kind, "autoplay gate released");
        true
    }

    /// Remove listeners because playback resumed some other way
    pub fn disarm(&mut self) -> bool {
        if !self.armed {
            return false;
        }
        self.hooks.detach();
        self.armed = false;
        debug!("autoplay gate disarmed");
        true
    }

    /// Whether listeners are currently registered
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

impl std::fmt::Debug for AutoplayGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoplayGate")
            .field("armed", &self.armed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counts {
        attached: Cell<u32>,
        detached: Cell<u32>,
    }

    struct CountingHooks(Rc<Counts>);

    impl InteractionHooks for CountingHooks {
        fn attach(&mut self) {
            self.0.attached.set(self.0.attached.get() + 1);
        }

        fn detach(&mut self) {
            self.0.detached.set(self.0.detached.get() + 1);
        }
    }

    fn gate() -> (AutoplayGate, Rc<Counts>) {
        let counts = Rc::new(Counts::default());
        (AutoplayGate::new(Box::new(CountingHooks(counts.clone()))), counts)
    }

    #[test]
    fn arming_twice_registers_once() {
        let (mut gate, counts) = gate();
        assert!(gate.arm());
        assert!(!gate.arm());
        assert_eq!(counts.attached.get(), 1);
    }

    #[test]
    fn first_interaction_wins() {
        let (mut gate, counts) = gate();
        gate.arm();

        assert!(gate.trigger(InteractionKind::Touch));
        assert!(!gate.trigger(InteractionKind::Click));
        assert!(!gate.trigger(InteractionKind::KeyPress));
        assert_eq!(counts.detached.get(), 1);
        assert!(!gate.is_armed());
    }

    #[test]
    fn trigger_without_arming_is_noop() {
        let (mut gate, counts) = gate();
        assert!(!gate.trigger(InteractionKind::Click));
        assert_eq!(counts.detached.get(), 0);
    }

    #[test]
    fn disarm_removes_listeners_once() {
        let (mut gate, counts) = gate();
        gate.arm();
        assert!(gate.disarm());
        assert!(!gate.disarm());
        assert_eq!(counts.detached.get(), 1);
    }

    #[test]
    fn gate_can_be_rearmed_after_release() {
        let (mut gate, counts) = gate();
        gate.arm();
        gate.trigger(InteractionKind::Click);
        assert!(gate.arm());
        assert_eq!(counts.attached.get(), 2);
    }
}
