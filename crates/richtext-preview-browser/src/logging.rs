//! Console logging and panic reporting for the wasm bundle.

use std::sync::Once;

use tracing::Level;
use tracing::subscriber::set_global_default;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;

static INIT: Once = Once::new();

/// Install the panic hook and a console tracing subscriber.
///
/// DEBUG in debug builds, INFO otherwise. Later calls are no-ops, and a
/// subscriber the host already installed is left in place.
pub fn init() {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();

        let console_level = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        };

        let wasm_layer = tracing_wasm::WASMLayer::new(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(console_level)
                .build(),
        );

        let reg = Registry::default().with(wasm_layer);
        let _ = set_global_default(reg);
    });
}
