use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::observers::Observe;

/// Observer that prints one line per backend event to stdout.
///
/// Enabled via the `logging` feature. Useful for demos and debugging.
pub struct LogWriter;

fn field(v: &Option<std::sync::Arc<str>>) -> &str {
    v.as_deref().unwrap_or("-")
}

#[async_trait]
impl Observe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::CandidateRejected => {
                println!(
                    "[rejected] candidate={} version={:?} reason={}",
                    field(&e.candidate),
                    e.version,
                    field(&e.reason)
                );
            }
            EventKind::ProviderSelected => {
                if let (Some(c), Some(v)) = (&e.candidate, e.version) {
                    println!(
                        "[selected] candidate={c} provider={} version={v}",
                        field(&e.provider)
                    );
                }
            }
            EventKind::NoProvider => {
                println!("[no-provider] running with empty signals");
            }
            EventKind::SubscriptionAdded => {
                println!(
                    "[subscribed] ctx={} consumer={} refcount={:?}",
                    field(&e.context),
                    field(&e.consumer),
                    e.refcount
                );
            }
            EventKind::SubscriptionRemoved => {
                println!(
                    "[unsubscribed] ctx={} consumer={} refcount={:?}",
                    field(&e.context),
                    field(&e.consumer),
                    e.refcount
                );
            }
            EventKind::ContextHooked => {
                println!("[hooked] ctx={}", field(&e.context));
            }
            EventKind::ContextUnhooked => {
                println!("[unhooked] ctx={}", field(&e.context));
            }
            EventKind::EmptySignalDelivered => {
                println!(
                    "[empty-signal] ctx={} consumer={}",
                    field(&e.context),
                    field(&e.consumer)
                );
            }
            EventKind::DispatchOverflow | EventKind::ObserverOverflow => {
                println!("[overflow] who={} reason={}", field(&e.consumer), field(&e.reason));
            }
            EventKind::DispatchPanicked | EventKind::ObserverPanicked => {
                println!("[panicked] who={} info={}", field(&e.consumer), field(&e.reason));
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
