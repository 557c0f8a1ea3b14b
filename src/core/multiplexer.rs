//! # Event multiplexer - fans provider signals out to subscriptions.
//!
//! Installed as the provider's [`SignalListener`]. For each notification it takes a
//! lock-free snapshot of the subscription list and submits one job per matching
//! subscription to that subscription's executor.
//!
//! ## Rules
//! - **No locks**: the notifying thread never waits on the registry lock.
//! - **No waiting**: a job is submitted, never awaited.
//! - **No cross-subscription ordering**; per-subscription order is the executor's.

use crate::core::registry::SubscriptionList;
use crate::layout::{LayoutSignal, WindowContext};
use crate::provider::SignalListener;

pub(crate) struct Multiplexer {
    subs: SubscriptionList,
}

impl Multiplexer {
    pub(crate) fn new(subs: SubscriptionList) -> Self {
        Self { subs }
    }

    /// Number of subscriptions a signal for `context` would reach right now.
    #[cfg(test)]
    pub(crate) fn fanout(&self, context: &WindowContext) -> usize {
        self.subs
            .load()
            .iter()
            .filter(|s| s.context == *context)
            .count()
    }
}

impl SignalListener for Multiplexer {
    fn on_signal(&self, context: &WindowContext, signal: LayoutSignal) {
        let snapshot = self.subs.load_full();
        for sub in snapshot.iter().filter(|s| s.context == *context) {
            sub.deliver(signal.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, mpsc};
    use std::thread;
    use std::time::Duration;

    use parking_lot::Mutex;

    use super::*;
    use crate::core::registry::Registry;
    use crate::dispatch::InlineExecutor;
    use crate::events::Bus;
    use crate::layout::{Bounds, ConsumerFn, ConsumerRef, FeatureKind, FeatureState, LayoutFeature};
    use crate::provider::Provider;
    use crate::testing::{Call, Collector, CountingExecutor, MockProvider};
    use crate::version::ProtocolVersion;

    fn v2() -> Option<ProtocolVersion> {
        Some(ProtocolVersion::new(2, 0))
    }

    /// Registry whose provider reports the current layout from inside `hook_context`.
    fn eager_registry() -> (Arc<MockProvider>, Arc<Registry>) {
        let p = MockProvider::eager("eager", v2());
        let reg = Arc::new(Registry::new(p.clone(), Bus::new(32)));
        p.set_signal_listener(Arc::new(Multiplexer::new(reg.list())));
        (p, reg)
    }

    /// Runs `f` on another thread and fails instead of hanging if it never returns.
    fn within_deadline(f: impl FnOnce() + Send + 'static) {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            f();
            let _ = tx.send(());
        });
        rx.recv_timeout(Duration::from_secs(3)).expect("registry call did not return");
    }

    fn fold() -> LayoutSignal {
        LayoutSignal::new(vec![LayoutFeature {
            kind: FeatureKind::Fold,
            state: FeatureState::HalfOpened,
            bounds: Bounds::new(0, 900, 1080, 900),
        }])
    }

    #[test]
    fn test_routes_by_context_through_executor() {
        let reg = Registry::new(MockProvider::new("m", v2()), Bus::new(8));
        let mux = Multiplexer::new(reg.list());
        let a = WindowContext::new("a");
        let b = WindowContext::new("b");
        let exec = Arc::new(CountingExecutor::default());
        let on_a = Arc::new(Collector::default());
        let on_b = Arc::new(Collector::default());
        reg.register(&a, exec.clone(), on_a.clone());
        reg.register(&b, exec.clone(), on_b.clone());

        mux.on_signal(&a, fold());
        assert_eq!(on_a.count(), 1);
        assert_eq!(on_b.count(), 0);
        assert_eq!(exec.jobs.load(Ordering::SeqCst), 1);
        assert_eq!(on_a.seen.lock()[0], fold());
    }

    #[test]
    fn test_unknown_context_reaches_nobody() {
        let reg = Registry::new(MockProvider::new("m", v2()), Bus::new(8));
        let mux = Multiplexer::new(reg.list());
        let exec = Arc::new(CountingExecutor::default());
        reg.register(&WindowContext::new("a"), exec.clone(), Arc::new(Collector::default()));

        let stranger = WindowContext::new("a");
        mux.on_signal(&stranger, fold());
        assert_eq!(mux.fanout(&stranger), 0);
        assert_eq!(exec.jobs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_consumer_may_unregister_itself_during_dispatch() {
        let reg = Arc::new(Registry::new(MockProvider::new("m", v2()), Bus::new(8)));
        let mux = Multiplexer::new(reg.list());
        let ctx = WindowContext::new("a");

        let slot: Arc<Mutex<Option<ConsumerRef>>> = Arc::default();
        let (r, s) = (Arc::clone(&reg), Arc::clone(&slot));
        let once: ConsumerRef = ConsumerFn::arc("once", move |_sig: LayoutSignal| {
            if let Some(me) = s.lock().take() {
                r.unregister(&me);
            }
        });
        *slot.lock() = Some(once.clone());
        reg.register(&ctx, Arc::new(CountingExecutor::default()), once);

        mux.on_signal(&ctx, fold());
        assert_eq!(reg.refcount(&ctx), 0);
        mux.on_signal(&ctx, fold());
        assert_eq!(mux.fanout(&ctx), 0);
    }

    #[test]
    fn test_consumer_unregisters_on_signal_sent_from_hook() {
        let (p, reg) = eager_registry();
        let ctx = WindowContext::new("a");

        let slot: Arc<Mutex<Option<ConsumerRef>>> = Arc::default();
        let (r, s) = (Arc::clone(&reg), Arc::clone(&slot));
        let once: ConsumerRef = ConsumerFn::arc("once", move |sig: LayoutSignal| {
            assert!(sig.is_empty());
            if let Some(me) = s.lock().take() {
                r.unregister(&me);
            }
        });
        *slot.lock() = Some(once.clone());

        let (r, c) = (Arc::clone(&reg), ctx.clone());
        within_deadline(move || r.register(&c, InlineExecutor::arc(), once));

        assert_eq!(reg.refcount(&ctx), 0);
        assert_eq!(reg.len(), 0);
        assert_eq!(p.calls(), vec![Call::Hook(ctx.clone()), Call::Unhook(ctx)]);
    }

    #[test]
    fn test_consumer_registers_other_context_on_signal_sent_from_hook() {
        let (p, reg) = eager_registry();
        let a = WindowContext::new("a");
        let b = WindowContext::new("b");
        let on_b = Arc::new(Collector::default());

        let spawned = Arc::new(AtomicBool::new(false));
        let (r, b2, on_b2) = (Arc::clone(&reg), b.clone(), Arc::clone(&on_b));
        let spawner: ConsumerRef = ConsumerFn::arc("spawner", move |_sig: LayoutSignal| {
            if !spawned.swap(true, Ordering::SeqCst) {
                r.register(&b2, InlineExecutor::arc(), on_b2.clone());
            }
        });

        let (r, a2) = (Arc::clone(&reg), a.clone());
        within_deadline(move || r.register(&a2, InlineExecutor::arc(), spawner));

        assert_eq!(p.hooks(&a), 1);
        assert_eq!(p.hooks(&b), 1);
        assert_eq!(reg.refcount(&b), 1);
        assert_eq!(on_b.count(), 1);
    }
}
