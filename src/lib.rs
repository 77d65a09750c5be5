//! The native half of the Android Rust samples.
//!
//! The library is loaded by an Android activity either with `System.loadLibrary("rust")`
//! (JNI) or with `Native.load("rust", ...)` (JNA). Both paths end up in the same
//! [`Bridge`](struct.Bridge.html), which calls a managed-code [`Callback`](trait.Callback.html)
//! back with `"Hello from Rust"` before returning:
//!
//! ```java
//! public static native void invokeCallbackViaJNI(JNICallback callback);
//!
//! interface RustLibrary extends Library {
//!     int invokeCallbackViaJNA(JNACallback callback);
//! }
//! ```
//!
//! Failures never unwind into the VM. JNI entry points report them as Java exceptions,
//! the JNA entry point as a negative status code (see [`JnaStatus`](enum.JnaStatus.html)).
#[cfg(test)]
#[macro_use]
extern crate lazy_static;

#[cfg(test)]
#[macro_use]
mod testing;

mod bridge;
mod callback;
mod config;
mod env;
mod error;
pub mod java_string;
mod jna;
mod logging;
mod native_method;
mod object;
mod string;
mod version;

pub use bridge::{Bridge, JniRequestListener, RequestListener};
pub use callback::{
    Callback, Capture, JniCallback, JnaCallback, RawJnaCallback, CALLBACK_METHOD,
    CALLBACK_SIGNATURE,
};
pub use config::{
    BridgeConfig, ConfigWarning, DEFAULT_LOG_TAG, DEFAULT_MESSAGE, LOG_LEVEL_VARIABLE, LOG_TAG_VARIABLE,
};
pub use env::JniEnv;
pub use error::{BridgeError, JniError};
pub use jna::{invoke_callback_via_jna, jna_method_wrapper, JnaStatus};
pub use native_method::{native_method_wrapper, JniType};
pub use object::Object;
pub use string::JavaString;
pub use version::JniVersion;

use std::os::raw::c_void;
use std::sync::Once;

/// Install the logger once per process, configured by the global bridge.
fn init() -> &'static Bridge {
    static CONFIG_WARNINGS: Once = Once::new();
    let bridge = Bridge::global();
    logging::init(bridge.config());
    // The configuration is read before there is a logger to report it to.
    CONFIG_WARNINGS.call_once(|| {
        for warning in bridge.config_warnings() {
            log::warn!("{}", warning);
        }
    });
    bridge
}

/// Called by the VM when the library is loaded with `System.loadLibrary`.
///
/// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/invocation.html#jni_onload)
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "system" fn JNI_OnLoad(
    _vm: *mut jni_sys::JavaVM,
    _reserved: *mut c_void,
) -> jni_sys::jint {
    init();
    log::debug!("librust loaded.");
    JniVersion::V6.to_raw()
}

/// `public static native String stringFromJNI();`
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "system" fn Java_com_nishtahir_androidrust_MainActivity_stringFromJNI(
    raw_env: *mut jni_sys::JNIEnv,
    _raw_class: jni_sys::jclass,
) -> jni_sys::jstring {
    let bridge = init();
    native_method_wrapper(raw_env, "stringFromJNI", |env| {
        Ok(JavaString::new(env, &bridge.greeting())?.into_raw())
    })
}

/// `public static native void invokeCallbackViaJNI(JNICallback callback);`
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "system" fn Java_com_nishtahir_androidrust_MainActivity_invokeCallbackViaJNI(
    raw_env: *mut jni_sys::JNIEnv,
    _raw_class: jni_sys::jclass,
    raw_callback: jni_sys::jobject,
) {
    let bridge = init();
    native_method_wrapper(raw_env, "invokeCallbackViaJNI", |env| {
        let callback = JniCallback::from_raw(env, raw_callback)?;
        bridge.invoke_callback(&callback)
    })
}

/// `private static native void startRequestFromJni(MainActivity callback);`
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "system" fn Java_com_nishtahir_androidrust_MainActivity_startRequestFromJni(
    raw_env: *mut jni_sys::JNIEnv,
    _raw_class: jni_sys::jclass,
    raw_listener: jni_sys::jobject,
) {
    let bridge = init();
    native_method_wrapper(raw_env, "startRequestFromJni", |env| {
        let listener = JniRequestListener::from_raw(env, raw_listener)?;
        bridge.start_request(&listener)
    })
}

/// `int invokeCallbackViaJNA(JNACallback callback);`
///
/// Returns a [`JnaStatus`](enum.JnaStatus.html) code.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn invokeCallbackViaJNA(callback: Option<RawJnaCallback>) -> i32 {
    invoke_callback_via_jna(init(), callback) as i32
}
