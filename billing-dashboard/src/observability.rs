use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "billing_dashboard=info";

/// Installs the global fmt subscriber. `RUST_LOG` directives are honoured on
/// top of the crate default.
pub fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = DEFAULT_DIRECTIVE.parse() {
        filter = filter.add_directive(directive);
    }

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
