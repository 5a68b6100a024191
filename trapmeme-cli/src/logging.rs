use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialise the global tracing subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise `-v` raises the crates' level to
/// debug and `-vv` to trace.
pub fn init_tracing(verbosity: u8) {
    let default_directives = match verbosity {
        0 => "trapmeme=info,trapmeme_core=info,trapmeme_runner=info,warn",
        1 => "trapmeme=debug,trapmeme_core=debug,trapmeme_runner=debug,warn",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .init();
}
