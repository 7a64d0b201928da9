use std::cell::RefCell;
use std::rc::Rc;

use cachesim_core::common::ProcessorId;
use cachesim_core::soc::{CoherenceGateway, CoherenceNotifier};
use mockall::mock;

mock! {
    pub Coherence {}
    impl CoherenceGateway for Coherence {
        fn register_observer(&mut self, notifier: CoherenceNotifier);
        fn request_permission(&mut self, is_load: bool, block: u64, processor: ProcessorId) -> bool;
        fn tick(&mut self);
    }
}

/// One permission query as seen by the protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PermissionQuery {
    pub is_load: bool,
    pub block: u64,
    pub processor: ProcessorId,
}

#[derive(Debug, Default)]
struct ScriptState {
    notifier: Option<CoherenceNotifier>,
    registrations: usize,
    deny: bool,
    queries: Vec<PermissionQuery>,
    ticks: u64,
    grants_on_tick: Vec<(ProcessorId, u64)>,
}

/// Coherence protocol whose answers are scripted by the test.
///
/// Clones share state, so the test keeps one handle while the cache owns
/// another.
#[derive(Clone, Debug, Default)]
pub struct ScriptedCoherence {
    state: Rc<RefCell<ScriptState>>,
}

impl ScriptedCoherence {
    /// A protocol that grants every request immediately.
    pub fn granting() -> Self {
        Self::default()
    }

    /// A protocol that denies every request until told otherwise.
    pub fn denying() -> Self {
        let coherence = Self::default();
        coherence.set_deny(true);
        coherence
    }

    pub fn set_deny(&self, deny: bool) {
        self.state.borrow_mut().deny = deny;
    }

    /// Boxed handle for `Cache::new`.
    pub fn gateway(&self) -> Box<dyn CoherenceGateway> {
        Box::new(self.clone())
    }

    /// Posts a data-received notification right away.
    pub fn grant_now(&self, processor: ProcessorId, block: u64) -> bool {
        let notifier = self.state.borrow().notifier.clone();
        notifier.is_some_and(|n| n.data_received(processor, block))
    }

    /// Posts a data-received notification during the next protocol tick.
    pub fn grant_on_tick(&self, processor: ProcessorId, block: u64) {
        self.state.borrow_mut().grants_on_tick.push((processor, block));
    }

    pub fn notifier(&self) -> Option<CoherenceNotifier> {
        self.state.borrow().notifier.clone()
    }

    pub fn registrations(&self) -> usize {
        self.state.borrow().registrations
    }

    pub fn queries(&self) -> Vec<PermissionQuery> {
        self.state.borrow().queries.clone()
    }

    pub fn ticks(&self) -> u64 {
        self.state.borrow().ticks
    }
}

impl CoherenceGateway for ScriptedCoherence {
    fn register_observer(&mut self, notifier: CoherenceNotifier) {
        let mut state = self.state.borrow_mut();
        state.notifier = Some(notifier);
        state.registrations += 1;
    }

    fn request_permission(&mut self, is_load: bool, block: u64, processor: ProcessorId) -> bool {
        let mut state = self.state.borrow_mut();
        state.queries.push(PermissionQuery {
            is_load,
            block,
            processor,
        });
        !state.deny
    }

    fn tick(&mut self) {
        let (notifier, grants) = {
            let mut state = self.state.borrow_mut();
            state.ticks += 1;
            (state.notifier.clone(), std::mem::take(&mut state.grants_on_tick))
        };
        if let Some(notifier) = notifier {
            for (processor, block) in grants {
                let _ = notifier.data_received(processor, block);
            }
        }
    }
}
