//! # Subscription registry - refcounted hook/unhook bookkeeping.
//!
//! Registry tracks live subscriptions and how many of them share each
//! [`WindowContext`]. It decides when the provider must be told to start or stop
//! observing a context:
//! - refcount 0 → 1: `provider.hook_context(ctx)`
//! - refcount 1 → 0: `provider.unhook_context(ctx)`
//!
//! ## Architecture
//! ```text
//! register(sub) ─┐                       ┌─► snapshot.store(next)   (copy-on-write)
//!                ├─► lock(state) ────────┼─► refcounts[ctx] += / -=
//! unregister(c) ─┘                       └─► hook / unhook on 0↔1 transitions
//!
//! Multiplexer ──► snapshot.load_full()   (never takes the lock)
//! ```
//!
//! ## Rules
//! - All mutations and the implied hook/unhook call happen under one lock.
//! - The lock is reentrant. A consumer reached inline from `hook_context` may call
//!   back into the registry on the same thread; the state borrow is released first.
//! - A panicking hook rolls its registration back; a panicking unhook does not stop
//!   the other contexts from being unhooked.
//! - Readers see either the list before or after a mutation, never a partial one.

use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::ReentrantMutex;

use crate::dispatch::ExecutorRef;
use crate::events::{Bus, Event, EventKind};
use crate::layout::{ConsumerRef, LayoutSignal, WindowContext, same_consumer};
use crate::provider::ProviderRef;

/// One `(context, executor, consumer)` registration.
pub(crate) struct Subscription {
    pub(crate) context: WindowContext,
    pub(crate) executor: ExecutorRef,
    pub(crate) consumer: ConsumerRef,
}

impl Subscription {
    /// Submits `consumer.accept(signal)` to this subscription's executor.
    pub(crate) fn deliver(&self, signal: LayoutSignal) {
        let consumer = Arc::clone(&self.consumer);
        self.executor.execute(Box::new(move || consumer.accept(signal)));
    }
}

/// Shared, lock-free readable list of live subscriptions.
pub(crate) type SubscriptionList = Arc<ArcSwap<Vec<Arc<Subscription>>>>;

/// Per-context refcounts (guarded by the registry lock).
#[derive(Default)]
struct State {
    refcounts: HashMap<WindowContext, usize>,
}

/// Refcounted registry of subscriptions bound to one provider.
///
/// The lock is reentrant: a provider may deliver a signal from inside
/// `hook_context`, and an inline consumer may then call back into the registry on the
/// same thread. The `RefCell` borrow is never held across a provider call.
pub(crate) struct Registry {
    state: ReentrantMutex<RefCell<State>>,
    subs: SubscriptionList,
    provider: ProviderRef,
    bus: Bus,
}

impl Registry {
    pub(crate) fn new(provider: ProviderRef, bus: Bus) -> Self {
        Self {
            state: ReentrantMutex::new(RefCell::new(State::default())),
            subs: Arc::new(ArcSwap::from_pointee(Vec::new())),
            provider,
            bus,
        }
    }

    /// Handle for lock-free readers.
    pub(crate) fn list(&self) -> SubscriptionList {
        Arc::clone(&self.subs)
    }

    /// Stores a subscription; hooks the context on its first subscription.
    ///
    /// If `hook_context` panics the subscription is rolled back and the panic resumes,
    /// so the next registration on that context hooks again.
    pub(crate) fn register(
        &self,
        context: &WindowContext,
        executor: ExecutorRef,
        consumer: ConsumerRef,
    ) {
        let guard = self.state.lock();

        let consumer_name: Arc<str> = consumer.name().into();
        let sub = Arc::new(Subscription {
            context: context.clone(),
            executor,
            consumer,
        });

        let cur = self.subs.load_full();
        let mut next = Vec::with_capacity(cur.len() + 1);
        next.extend(cur.iter().cloned());
        next.push(Arc::clone(&sub));
        self.subs.store(Arc::new(next));

        let refcount = {
            let mut state = guard.borrow_mut();
            let count = state.refcounts.entry(context.clone()).or_insert(0);
            *count += 1;
            *count
        };

        self.bus.publish(
            Event::new(EventKind::SubscriptionAdded)
                .with_context(context.to_string())
                .with_consumer(consumer_name)
                .with_refcount(refcount),
        );

        if refcount == 1 {
            let hooked = catch_unwind(AssertUnwindSafe(|| self.provider.hook_context(context)));
            if let Err(payload) = hooked {
                self.rollback(&guard, &sub);
                resume_unwind(payload);
            }
            self.bus.publish(
                Event::new(EventKind::ContextHooked).with_context(context.to_string()),
            );
        }
    }

    /// Undoes a registration whose hook call failed.
    fn rollback(&self, guard: &RefCell<State>, sub: &Arc<Subscription>) {
        let cur = self.subs.load_full();
        let kept: Vec<_> = cur.iter().filter(|s| !Arc::ptr_eq(s, sub)).cloned().collect();
        if kept.len() == cur.len() {
            // Already removed by a reentrant unregister.
            return;
        }
        self.subs.store(Arc::new(kept));

        let mut state = guard.borrow_mut();
        if let Some(n) = state.refcounts.get_mut(&sub.context) {
            *n = n.saturating_sub(1);
            if *n == 0 {
                state.refcounts.remove(&sub.context);
            }
        }
    }

    /// Removes every subscription of `consumer`; unhooks contexts left without any.
    ///
    /// Returns the number of subscriptions removed (0 for an unknown consumer).
    /// Every emptied context is unhooked even if an earlier `unhook_context` panics;
    /// the first panic resumes afterwards.
    pub(crate) fn unregister(&self, consumer: &ConsumerRef) -> usize {
        let guard = self.state.lock();

        let cur = self.subs.load_full();
        let (removed, kept): (Vec<_>, Vec<_>) = cur
            .iter()
            .cloned()
            .partition(|s| same_consumer(&s.consumer, consumer));
        if removed.is_empty() {
            return 0;
        }
        self.subs.store(Arc::new(kept));

        let mut emptied: Vec<WindowContext> = Vec::new();
        {
            let mut state = guard.borrow_mut();
            for sub in &removed {
                let refcount = match state.refcounts.get_mut(&sub.context) {
                    Some(n) => {
                        *n = n.saturating_sub(1);
                        *n
                    }
                    None => 0,
                };
                if refcount == 0 {
                    state.refcounts.remove(&sub.context);
                    if !emptied.contains(&sub.context) {
                        emptied.push(sub.context.clone());
                    }
                }
                self.bus.publish(
                    Event::new(EventKind::SubscriptionRemoved)
                        .with_context(sub.context.to_string())
                        .with_consumer(sub.consumer.name())
                        .with_refcount(refcount),
                );
            }
        }

        let mut first_panic = None;
        for ctx in emptied {
            match catch_unwind(AssertUnwindSafe(|| self.provider.unhook_context(&ctx))) {
                Ok(()) => self
                    .bus
                    .publish(Event::new(EventKind::ContextUnhooked).with_context(ctx.to_string())),
                Err(payload) => {
                    first_panic.get_or_insert(payload);
                }
            }
        }
        if let Some(payload) = first_panic {
            resume_unwind(payload);
        }

        removed.len()
    }

    /// Live subscriptions on `ctx`.
    pub(crate) fn refcount(&self, ctx: &WindowContext) -> usize {
        self.state.lock().borrow().refcounts.get(ctx).copied().unwrap_or(0)
    }

    /// Total live subscriptions.
    pub(crate) fn len(&self) -> usize {
        self.subs.load().len()
    }

    /// Contexts currently hooked upstream.
    pub(crate) fn hooked(&self) -> Vec<WindowContext> {
        self.state.lock().borrow().refcounts.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::dispatch::InlineExecutor;
    use crate::layout::ConsumerFn;
    use crate::testing::{Call, MockProvider};
    use crate::version::ProtocolVersion;

    fn setup() -> (Arc<MockProvider>, Registry) {
        let p = MockProvider::new("mock", Some(ProtocolVersion::new(2, 0)));
        let reg = Registry::new(p.clone(), Bus::new(64));
        (p, reg)
    }

    fn noop(name: &'static str) -> ConsumerRef {
        ConsumerFn::arc(name, |_s: LayoutSignal| {})
    }

    #[test]
    fn test_hook_once_per_first_subscription() {
        let (p, reg) = setup();
        let ctx = WindowContext::new("a");
        reg.register(&ctx, InlineExecutor::arc(), noop("one"));
        reg.register(&ctx, InlineExecutor::arc(), noop("two"));
        assert_eq!(p.hooks(&ctx), 1);
        assert_eq!(reg.refcount(&ctx), 2);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_unhook_only_when_last_leaves() {
        let (p, reg) = setup();
        let ctx = WindowContext::new("a");
        let a = noop("a");
        let b = noop("b");
        reg.register(&ctx, InlineExecutor::arc(), a.clone());
        reg.register(&ctx, InlineExecutor::arc(), b.clone());

        assert_eq!(reg.unregister(&a), 1);
        assert_eq!(p.unhooks(&ctx), 0);
        assert_eq!(reg.unregister(&b), 1);
        assert_eq!(p.unhooks(&ctx), 1);
        assert_eq!(reg.refcount(&ctx), 0);
        assert!(reg.hooked().is_empty());
    }

    #[test]
    fn test_unknown_consumer_is_noop() {
        let (p, reg) = setup();
        assert_eq!(reg.unregister(&noop("ghost")), 0);
        assert!(p.calls().is_empty());
    }

    #[test]
    fn test_duplicate_registration_removed_in_one_pass() {
        let (p, reg) = setup();
        let ctx = WindowContext::new("a");
        let c = noop("dup");
        reg.register(&ctx, InlineExecutor::arc(), c.clone());
        reg.register(&ctx, InlineExecutor::arc(), c.clone());
        assert_eq!(reg.refcount(&ctx), 2);

        assert_eq!(reg.unregister(&c), 2);
        assert_eq!(p.calls(), vec![Call::Hook(ctx.clone()), Call::Unhook(ctx)]);
    }

    #[test]
    fn test_one_consumer_across_contexts() {
        let (p, reg) = setup();
        let a = WindowContext::new("a");
        let b = WindowContext::new("b");
        let shared = noop("shared");
        let other = noop("other");
        reg.register(&a, InlineExecutor::arc(), shared.clone());
        reg.register(&b, InlineExecutor::arc(), shared.clone());
        reg.register(&b, InlineExecutor::arc(), other);

        reg.unregister(&shared);
        assert_eq!(p.unhooks(&a), 1);
        assert_eq!(p.unhooks(&b), 0);
        assert_eq!(reg.refcount(&b), 1);
    }

    #[test]
    fn test_rehook_after_full_release() {
        let (p, reg) = setup();
        let ctx = WindowContext::new("a");
        let c = noop("c");
        for _ in 0..3 {
            reg.register(&ctx, InlineExecutor::arc(), c.clone());
            reg.unregister(&c);
        }
        assert_eq!(p.hooks(&ctx), 3);
        assert_eq!(p.unhooks(&ctx), 3);
    }

    #[test]
    fn test_events_carry_refcounts() {
        let p = MockProvider::new("mock", Some(ProtocolVersion::new(2, 0)));
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let reg = Registry::new(p, bus);
        let ctx = WindowContext::new("main");
        let c = noop("c");
        reg.register(&ctx, InlineExecutor::arc(), c.clone());
        reg.unregister(&c);

        let kinds: Vec<(EventKind, Option<usize>)> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| (e.kind, e.refcount))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (EventKind::SubscriptionAdded, Some(1)),
                (EventKind::ContextHooked, None),
                (EventKind::SubscriptionRemoved, Some(0)),
                (EventKind::ContextUnhooked, None),
            ]
        );
    }

    #[test]
    fn test_panicking_hook_rolls_back_registration() {
        let (p, reg) = setup();
        let ctx = WindowContext::new("a");
        p.failing_hooks.store(1, Ordering::SeqCst);

        let res = catch_unwind(AssertUnwindSafe(|| {
            reg.register(&ctx, InlineExecutor::arc(), noop("first"));
        }));
        assert!(res.is_err());
        assert_eq!(reg.refcount(&ctx), 0);
        assert_eq!(reg.len(), 0);

        reg.register(&ctx, InlineExecutor::arc(), noop("second"));
        assert_eq!(p.hooks(&ctx), 1);
        assert_eq!(reg.refcount(&ctx), 1);
    }

    #[test]
    fn test_panicking_unhook_still_releases_other_contexts() {
        let (p, reg) = setup();
        let a = WindowContext::new("a");
        let b = WindowContext::new("b");
        let shared = noop("shared");
        reg.register(&a, InlineExecutor::arc(), shared.clone());
        reg.register(&b, InlineExecutor::arc(), shared.clone());
        p.failing_unhooks.store(1, Ordering::SeqCst);

        let res = catch_unwind(AssertUnwindSafe(|| reg.unregister(&shared)));
        assert!(res.is_err());
        assert_eq!(reg.len(), 0);
        assert!(reg.hooked().is_empty());
        // One of the two unhooks panicked; the other still reached the provider.
        assert_eq!(p.unhooks(&a) + p.unhooks(&b), 1);
    }
}
