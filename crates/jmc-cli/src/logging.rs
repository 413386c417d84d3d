//! Log output setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVES: &str = "jmc_cli=info,jmc_layout=info,jmc_model=info";
const VERBOSE_DIRECTIVES: &str = "jmc_cli=debug,jmc_layout=debug,jmc_model=debug";

/// Install the stderr subscriber; `RUST_LOG` overrides the defaults
pub fn init(verbose: bool) {
    let directives = if verbose {
        VERBOSE_DIRECTIVES
    } else {
        DEFAULT_DIRECTIVES
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    // A second init (tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .try_init();
}
