use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod command;
mod model;
mod util;

fn main() -> anyhow::Result<()> {
    init_tracing();
    command::run()
}

/// Diagnostics go to stderr so that stdout only carries JSON results.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).without_time().compact())
        .init();
}
