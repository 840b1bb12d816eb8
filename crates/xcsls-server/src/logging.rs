use tracing_subscriber::EnvFilter;

/// Install the tracing subscriber on the stderr side-channel. Stdout
/// belongs to the wire protocol and must stay clean.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
