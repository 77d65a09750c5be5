//! Logger setup.
//!
//! On Android log records go to logcat, anywhere else (host tests, desktop JVMs) to stderr.
//! Initialization is idempotent: the library can be loaded by `System.loadLibrary`, which
//! runs `JNI_OnLoad`, or by JNA, which doesn't, so every entry point calls [`init`].
use crate::config::BridgeConfig;
use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(target_os = "android")] {
        /// Install `android_logger` as the `log` backend.
        pub fn init(config: &BridgeConfig) {
            android_logger::init_once(
                android_logger::Config::default()
                    .with_max_level(config.max_log_level())
                    .with_tag(config.log_tag()),
            );
        }
    } else {
        /// Install `env_logger` as the `log` backend. `RUST_LOG` takes precedence over
        /// the configured level.
        pub fn init(config: &BridgeConfig) {
            // Fails when a logger is already installed, which is fine.
            let _ = env_logger::Builder::new()
                .filter_level(config.max_log_level())
                .parse_default_env()
                .is_test(cfg!(test))
                .try_init();
        }
    }
}
