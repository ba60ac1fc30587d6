#![cfg(test)]

use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

/// Route `log` output through env_logger once per test binary. This
/// crate logs at `debug`, everything else at `warn`; `RUST_LOG` wins.
pub(crate) fn init_test_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();
        builder
            .filter_level(LevelFilter::Warn)
            .filter_module("closed_hashmap", LevelFilter::Debug)
            .is_test(true)
            .parse_default_env();
        // Another harness may have installed a logger already.
        let _ = builder.try_init();
    });
}
