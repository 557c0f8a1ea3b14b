//! Simulated foldable device: a fake provider flips a hinge between flat and
//! half-opened, two windows subscribe, and every backend event is logged.
//!
//! Run with: `cargo run --example fold_watch --features logging`

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use windowvisor::{
    Backend, Bounds, Config, ConsumerFn, ConsumerRef, Executor, FactoryFn, FeatureKind,
    FeatureState, LayoutFeature, LayoutSignal, ListenerRef, LogWriter, Observe, ObserverSet,
    ProtocolVersion, Provider, ProviderError, ProviderRef, QueueExecutor, WindowContext,
};

/// Pretends to be a vendor extension that notifies from its own thread.
#[derive(Default)]
struct FakeHinge {
    hooked: Mutex<Vec<WindowContext>>,
    listener: Mutex<Option<ListenerRef>>,
}

impl FakeHinge {
    fn flip(&self, state: FeatureState) {
        let listener = self.listener.lock().clone();
        let hooked = self.hooked.lock().clone();
        if let Some(l) = listener {
            let signal = LayoutSignal::new(vec![LayoutFeature {
                kind: FeatureKind::Hinge,
                state,
                bounds: Bounds::new(1000, 0, 1040, 1800),
            }]);
            for ctx in &hooked {
                l.on_signal(ctx, signal.clone());
            }
        }
    }
}

impl Provider for FakeHinge {
    fn name(&self) -> &str {
        "fake-hinge"
    }

    fn reported_version(&self) -> Option<ProtocolVersion> {
        Some(ProtocolVersion::CURRENT)
    }

    fn validate_interface_shape(&self) -> bool {
        true
    }

    fn hook_context(&self, context: &WindowContext) {
        self.hooked.lock().push(context.clone());
    }

    fn unhook_context(&self, context: &WindowContext) {
        self.hooked.lock().retain(|c| c != context);
    }

    fn set_signal_listener(&self, listener: ListenerRef) {
        *self.listener.lock() = Some(listener);
    }
}

fn printer(window: &'static str) -> ConsumerRef {
    ConsumerFn::arc(window, move |signal: LayoutSignal| {
        for f in signal.iter() {
            let (w, h) = (f.bounds.width(), f.bounds.height());
            println!("  {window}: {:?} {:?} {w}x{h}", f.kind, f.state);
        }
    })
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    let cfg = Config::default();
    let bus = windowvisor::Bus::new(cfg.bus_capacity_clamped());

    let observers: Vec<Arc<dyn Observe>> = vec![Arc::new(LogWriter)];
    let set = ObserverSet::new(observers, bus.clone());
    let listener = set.spawn_listener();

    let hinge = Arc::new(FakeHinge::default());
    let h = Arc::clone(&hinge);
    let backend = Backend::builder(cfg.clone())
        .with_bus(bus.clone())
        .with_factory(FactoryFn::arc("extensions", move || -> Result<ProviderRef, ProviderError> {
            Ok(h.clone())
        }))
        .build();

    let ui = QueueExecutor::with_config("ui", &cfg, bus.clone());
    let main_win = WindowContext::new("main");
    let side_win = WindowContext::new("side");
    let on_main = printer("main");
    let on_side = printer("side");

    backend.register_layout_change_callback(&main_win, ui.clone(), on_main.clone());
    backend.register_layout_change_callback(&side_win, ui.clone(), on_side.clone());

    let device = {
        let hinge = Arc::clone(&hinge);
        std::thread::spawn(move || {
            for state in [FeatureState::Flat, FeatureState::HalfOpened, FeatureState::Flat] {
                hinge.flip(state);
                std::thread::sleep(Duration::from_millis(50));
            }
        })
    };
    let _ = tokio::task::spawn_blocking(move || device.join()).await;

    backend.unregister_layout_change_callback(&on_side);
    hinge.flip(FeatureState::HalfOpened);
    backend.unregister_layout_change_callback(&on_main);

    println!("executor {} drained", ui.name());
    ui.shutdown().await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    set.shutdown().await;
    let _ = listener.await;
}
