// Panic isolation for caller-supplied mapping strategies
use std::any::Any;
use std::panic::{catch_unwind, UnwindSafe};
use tracing::error;

/// Run one mapping strategy, turning a panic into its message
///
/// `Ok` carries whatever the strategy returned (possibly its own error);
/// `Err` carries the panic message.
pub fn catch_mapping_panic<T>(
    adapter_id: &str,
    direction: &'static str,
    strategy: impl FnOnce() -> T + UnwindSafe,
) -> Result<T, String> {
    catch_unwind(strategy).map_err(|payload| {
        let message = panic_message(payload.as_ref());
        error!(adapter_id, direction, panic_msg = %message, "Mapping strategy panicked");
        message
    })
}

/// Message of a panic payload (`panic!` yields `&str` or `String`)
fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "mapping panicked with a non-string payload".to_string())
}
