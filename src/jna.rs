use crate::bridge::Bridge;
use crate::callback::{JnaCallback, RawJnaCallback};
use crate::error::BridgeError;
use crate::native_method::catch_panic;
use log::error;

/// Status codes returned to JNA callers. JNA has no exceptions, so failures are reported
/// as negative `int`-s.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JnaStatus {
    Ok = 0,
    NullCallback = -1,
    Failed = -2,
    Panicked = -3,
}

impl From<&BridgeError> for JnaStatus {
    fn from(error: &BridgeError) -> Self {
        match error {
            BridgeError::NullCallback => JnaStatus::NullCallback,
            BridgeError::Panic(_) => JnaStatus::Panicked,
            _ => JnaStatus::Failed,
        }
    }
}

/// Run the body of a C function called through JNA.
///
/// Panics are caught and, like errors, logged and reported as a negative status.
pub fn jna_method_wrapper<T>(method: &str, body: T) -> JnaStatus
where
    T: FnOnce() -> Result<(), BridgeError>,
{
    match catch_panic(body) {
        Ok(()) => JnaStatus::Ok,
        Err(error) => {
            error!("{} failed: {}", method, error);
            JnaStatus::from(&error)
        }
    }
}

/// Call a JNA function pointer back through the bridge.
///
/// Unsafe because the caller guarantees that a non-null `callback` is callable.
pub unsafe fn invoke_callback_via_jna(
    bridge: &Bridge,
    callback: Option<RawJnaCallback>,
) -> JnaStatus {
    jna_method_wrapper("invokeCallbackViaJNA", || {
        let callback = JnaCallback::from_raw(callback)?;
        bridge.invoke_callback(&callback)
    })
}
