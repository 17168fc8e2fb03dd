pub mod build_info;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVES: [&str; 3] = [
    "financer=info",
    "financer_core=info",
    "financer_storage_json=info",
];

/// Installs the global fmt subscriber. `RUST_LOG` adds to the default directives.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        for raw in DEFAULT_DIRECTIVES {
            if let Ok(directive) = raw.parse::<Directive>() {
                filter = filter.add_directive(directive);
            }
        }

        // Logs go to stderr so command output stays machine readable.
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .ok();
    });
}
