//! `log` sink: `console_log` on wasm32, `env_logger` (stderr, `RUST_LOG`
//! aware) everywhere else.

use log::LevelFilter;

/// Install the engine logger at `Info`. Safe to call more than once.
pub fn init() {
    init_with_level(LevelFilter::Info);
}

/// Install the logger at `level`; returns false when a logger was already set.
pub fn init_with_level(level: LevelFilter) -> bool {
    let installed = install(level);
    if installed {
        log::set_max_level(level);
    }
    installed
}

#[cfg(target_arch = "wasm32")]
fn install(level: LevelFilter) -> bool {
    match level.to_level() {
        Some(level) => console_log::init_with_level(level).is_ok(),
        None => false,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn install(level: LevelFilter) -> bool {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .is_ok()
}
