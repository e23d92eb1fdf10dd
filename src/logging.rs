use std::io::Write;

use env_logger::{Builder, Env};

/// `LEVEL: message` logging to stderr, Info unless `RUST_LOG` says otherwise.
pub fn init() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();
}
