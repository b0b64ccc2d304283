use anyhow::Result;

/// Initializes the global `tracing` subscriber: an env filter over
/// `level`, with file/line annotations on every event. A human reading the
/// CLI's own stderr during a demux/mux run gets the same warn-per-tag
/// diagnostics the library crates already emit via `tracing::warn!`.
pub fn init(level: &str) -> Result<()> {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(level)
            .with_line_number(true)
            .with_file(true)
            .finish(),
    )?;

    Ok(())
}
