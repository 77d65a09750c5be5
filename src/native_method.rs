use crate::env::JniEnv;
use crate::error::BridgeError;
use jni_sys;
use log::{debug, error};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::ptr::{self, NonNull};

include!("call_jni_method.rs");

/// Java class thrown when a native method gets a `null` callback.
pub const NULL_POINTER_EXCEPTION: &str = "java/lang/NullPointerException";
/// Java class thrown for any other bridge failure, including Rust panics.
pub const RUNTIME_EXCEPTION: &str = "java/lang/RuntimeException";

/// A type native methods return to Java.
pub trait JniType {
    /// The value returned to Java when the method fails. Java ignores it because an
    /// exception is pending.
    fn default() -> Self;
}

impl JniType for () {
    fn default() -> Self {}
}

impl JniType for jni_sys::jobject {
    fn default() -> Self {
        ptr::null_mut()
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(string) = payload.downcast_ref::<String>() {
        string.clone()
    } else if let Some(string) = payload.downcast_ref::<&str>() {
        (*string).to_owned()
    } else {
        "generic panic.".to_owned()
    }
}

/// Run `body`, turning a panic into [`BridgeError::Panic`](enum.BridgeError.html).
pub(crate) fn catch_panic<T, R>(body: T) -> Result<R, BridgeError>
where
    T: FnOnce() -> Result<R, BridgeError>,
{
    panic::catch_unwind(AssertUnwindSafe(body))
        .unwrap_or_else(|payload| Err(BridgeError::Panic(panic_message(&*payload))))
}

/// Report a failed native method to Java.
///
/// Java exceptions raised by JNI calls are already pending and are left alone.
fn throw_error(env: &JniEnv, method: &str, error: BridgeError) {
    let class = match error {
        BridgeError::JavaException(ref call) => {
            debug!("{}: rethrowing the Java exception from `{}`.", method, call);
            return;
        }
        BridgeError::NullCallback => NULL_POINTER_EXCEPTION,
        _ => RUNTIME_EXCEPTION,
    };
    error!("{} failed: {}", method, error);
    if let Err(throw_error) = env.throw_new(class, &error.to_string()) {
        error!(
            "{}: could not throw {} ({}): {}",
            method, class, error, throw_error
        );
    }
}

/// Run the body of a native Java method.
///
/// Checks for a pending exception, converts the raw `JNIEnv` pointer into a
/// [`JniEnv`](struct.JniEnv.html), runs `body` and reports failures to Java:
/// * a pending Java exception is left pending;
/// * a `null` callback throws `NullPointerException`;
/// * any other error or a panic throws `RuntimeException`.
///
/// On failure Java receives [`JniType::default`](trait.JniType.html#tymethod.default).
///
/// Unsafe because an incorrect pointer can be passed to it as an argument.
pub unsafe fn native_method_wrapper<T, R>(raw_env: *mut jni_sys::JNIEnv, method: &str, body: T) -> R
where
    T: for<'a> FnOnce(&'a JniEnv<'a>) -> Result<R, BridgeError>,
    R: JniType,
{
    let raw_env = match NonNull::new(raw_env) {
        Some(raw_env) => raw_env,
        None => {
            error!("{} failed: {}", method, BridgeError::NullEnv);
            return R::default();
        }
    };
    // `ExceptionCheck` is one of the few JNI calls allowed with a pending exception,
    // so it goes before anything else.
    if call_jni_method!(raw_env.as_ptr(), ExceptionCheck) != jni_sys::JNI_FALSE {
        error!("{} called from a thread with a pending exception.", method);
        return R::default();
    }
    let env = match JniEnv::from_raw(raw_env.as_ptr()) {
        Ok(env) => env,
        Err(error) => {
            error!("{} failed: {}", method, error);
            return R::default();
        }
    };
    debug!("{} called with JNI {:?}.", method, env.version());

    match catch_panic(|| body(&env)) {
        Ok(result) => result,
        Err(error) => {
            throw_error(&env, method, error);
            R::default()
        }
    }
}
