//! fixture-runner CLI entry point

fn main() {
    // Diagnostics go to stderr so they never interleave with the stdout report
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    fixture_runner::cli::run();
}
