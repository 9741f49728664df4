use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Directive used when `RUST_LOG` is unset: `level` for this crate's
/// targets (`obsq::queue`, `obsq::subscriber`, `obsq::demo`, ...), `warn`
/// for everything else.
pub fn default_directive(level: &str) -> String {
    format!("warn,obsq={level}")
}

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise [`default_directive`] with `level`
/// applies. Fails if a global subscriber is already installed.
pub fn init_logging(level: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    // Events fire on producer and consumer threads alike; keep the thread
    // visible on every line.
    let events = fmt::layer()
        .compact()
        .with_timer(UtcTime::rfc_3339())
        .with_thread_names(true)
        .with_thread_ids(true);

    Registry::default().with(filter).with(events).try_init()
}
