//! Test doubles shared by unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::dispatch::{Executor, Job};
use crate::error::ProviderError;
use crate::layout::{LayoutSignal, WindowContext};
use crate::provider::{FactoryFn, FactoryRef, ListenerRef, Provider, ProviderRef};
use crate::version::ProtocolVersion;

/// Upstream call observed by [`MockProvider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Hook(WindowContext),
    Unhook(WindowContext),
}

/// Provider that records every upstream call.
pub(crate) struct MockProvider {
    name: &'static str,
    version: Option<ProtocolVersion>,
    shape_ok: bool,
    eager: AtomicBool,
    calls: Mutex<Vec<Call>>,
    listener: Mutex<Option<ListenerRef>>,
    pub(crate) version_reads: AtomicUsize,
    pub(crate) shape_checks: AtomicUsize,
    /// Number of upcoming `hook_context` calls that panic.
    pub(crate) failing_hooks: AtomicUsize,
    /// Number of upcoming `unhook_context` calls that panic.
    pub(crate) failing_unhooks: AtomicUsize,
}

impl MockProvider {
    pub(crate) fn new(name: &'static str, version: Option<ProtocolVersion>) -> Arc<Self> {
        Self::with_shape(name, version, true)
    }

    pub(crate) fn with_shape(
        name: &'static str,
        version: Option<ProtocolVersion>,
        shape_ok: bool,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            version,
            shape_ok,
            eager: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
            listener: Mutex::new(None),
            version_reads: AtomicUsize::new(0),
            shape_checks: AtomicUsize::new(0),
            failing_hooks: AtomicUsize::new(0),
            failing_unhooks: AtomicUsize::new(0),
        })
    }

    /// Provider that reports an empty layout from inside `hook_context`.
    pub(crate) fn eager(name: &'static str, version: Option<ProtocolVersion>) -> Arc<Self> {
        let p = Self::new(name, version);
        p.eager.store(true, Ordering::SeqCst);
        p
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub(crate) fn hooks(&self, ctx: &WindowContext) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, Call::Hook(x) if x == ctx))
            .count()
    }

    pub(crate) fn unhooks(&self, ctx: &WindowContext) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, Call::Unhook(x) if x == ctx))
            .count()
    }

    pub(crate) fn has_listener(&self) -> bool {
        self.listener.lock().is_some()
    }

    /// Delivers a signal the way a vendor notification thread would.
    pub(crate) fn emit(&self, ctx: &WindowContext, signal: LayoutSignal) {
        let listener = self.listener.lock().clone();
        if let Some(l) = listener {
            l.on_signal(ctx, signal);
        }
    }
}

impl Provider for MockProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn reported_version(&self) -> Option<ProtocolVersion> {
        self.version_reads.fetch_add(1, Ordering::SeqCst);
        self.version
    }

    fn validate_interface_shape(&self) -> bool {
        self.shape_checks.fetch_add(1, Ordering::SeqCst);
        self.shape_ok
    }

    fn hook_context(&self, ctx: &WindowContext) {
        if take_one(&self.failing_hooks) {
            panic!("vendor hook failed");
        }
        self.calls.lock().push(Call::Hook(ctx.clone()));
        if self.eager.load(Ordering::SeqCst) {
            self.emit(ctx, LayoutSignal::empty());
        }
    }

    fn unhook_context(&self, ctx: &WindowContext) {
        if take_one(&self.failing_unhooks) {
            panic!("vendor unhook failed");
        }
        self.calls.lock().push(Call::Unhook(ctx.clone()));
    }

    fn set_signal_listener(&self, listener: ListenerRef) {
        *self.listener.lock() = Some(listener);
    }
}

fn take_one(budget: &AtomicUsize) -> bool {
    budget
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

pub(crate) fn factory(provider: Arc<MockProvider>) -> FactoryRef {
    let name = provider.name;
    FactoryFn::arc(name, move || -> Result<ProviderRef, ProviderError> {
        Ok(provider.clone())
    })
}

pub(crate) fn failing_factory(name: &'static str) -> FactoryRef {
    FactoryFn::arc(name, || -> Result<ProviderRef, ProviderError> {
        Err(ProviderError::Load {
            reason: "library not found".into(),
        })
    })
}

pub(crate) fn panicking_factory(name: &'static str) -> FactoryRef {
    FactoryFn::arc(name, || -> Result<ProviderRef, ProviderError> {
        panic!("vendor constructor blew up")
    })
}

/// Runs jobs inline and counts them.
#[derive(Default)]
pub(crate) struct CountingExecutor {
    pub(crate) jobs: AtomicUsize,
}

impl Executor for CountingExecutor {
    fn execute(&self, job: Job) {
        self.jobs.fetch_add(1, Ordering::SeqCst);
        job();
    }
}

/// Collects every signal it receives.
#[derive(Default)]
pub(crate) struct Collector {
    pub(crate) seen: Mutex<Vec<LayoutSignal>>,
}

impl Collector {
    pub(crate) fn count(&self) -> usize {
        self.seen.lock().len()
    }
}

impl crate::layout::LayoutConsumer for Collector {
    fn accept(&self, signal: LayoutSignal) {
        self.seen.lock().push(signal);
    }
}
