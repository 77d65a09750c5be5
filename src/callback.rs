use crate::env::JniEnv;
use crate::error::BridgeError;
use crate::string::JavaString;
use jni_sys;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr::NonNull;

/// Name of the Java method invoked on a JNI callback object.
pub const CALLBACK_METHOD: &str = "callback";
/// JNI signature of `void callback(String)`.
pub const CALLBACK_SIGNATURE: &str = "(Ljava/lang/String;)V";

/// A C function pointer JNA passes for a `com.sun.jna.Callback` with a single
/// `String` argument.
pub type RawJnaCallback = unsafe extern "C" fn(message: *const c_char);

/// A handle that can be called back with a message.
///
/// The JNI and JNA variants are interchangeable: the bridge only ever sees this trait.
#[cfg_attr(test, mockall::automock)]
pub trait Callback {
    fn invoke(&self, message: &str) -> Result<(), BridgeError>;
}

/// A Java object implementing `void callback(String)`, reached through JNI.
#[derive(Debug)]
pub struct JniCallback<'env> {
    env: &'env JniEnv<'env>,
    object: NonNull<jni_sys::_jobject>,
}

impl<'env> JniCallback<'env> {
    /// Wrap a callback object passed to a native method.
    ///
    /// The reference is borrowed: it belongs to the native method's frame and is not deleted.
    ///
    /// Unsafe because an incorrect object reference can be passed.
    pub unsafe fn from_raw(
        env: &'env JniEnv<'env>,
        object: jni_sys::jobject,
    ) -> Result<Self, BridgeError> {
        let object = NonNull::new(object).ok_or(BridgeError::NullCallback)?;
        Ok(JniCallback { env, object })
    }
}

impl<'env> Callback for JniCallback<'env> {
    fn invoke(&self, message: &str) -> Result<(), BridgeError> {
        let message = JavaString::new(self.env, message)?;
        // Safe because the object is a live reference and the argument matches the signature.
        unsafe {
            self.env.call_void_method(
                self.object,
                CALLBACK_METHOD,
                CALLBACK_SIGNATURE,
                &[message.as_argument()],
            )
        }
    }
}

/// A C function pointer, as passed by JNA.
#[derive(Debug, Clone, Copy)]
pub struct JnaCallback {
    function: RawJnaCallback,
}

impl JnaCallback {
    /// Unsafe because the caller guarantees that a non-null `function` is callable
    /// for the duration of the bridge call.
    pub unsafe fn from_raw(function: Option<RawJnaCallback>) -> Result<Self, BridgeError> {
        function
            .map(|function| JnaCallback { function })
            .ok_or(BridgeError::NullCallback)
    }
}

impl Callback for JnaCallback {
    fn invoke(&self, message: &str) -> Result<(), BridgeError> {
        let message = CString::new(message)?;
        // Safe because of the `from_raw` contract. The string outlives the call.
        unsafe { (self.function)(message.as_ptr()) };
        Ok(())
    }
}

/// A callback that records every message it receives.
///
/// Example:
/// ```
/// use rust::{Bridge, BridgeConfig, Capture};
///
/// let capture = Capture::new();
/// Bridge::new(BridgeConfig::default()).invoke_callback(&capture).unwrap();
/// assert_eq!(capture.messages(), vec!["Hello from Rust".to_owned()]);
/// ```
#[derive(Debug, Default)]
pub struct Capture {
    messages: RefCell<Vec<String>>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages received so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Callback for Capture {
    fn invoke(&self, message: &str) -> Result<(), BridgeError> {
        self.messages.borrow_mut().push(message.to_owned());
        Ok(())
    }
}
