use jni_sys;
use std::ffi::NulError;
use thiserror::Error;

/// Errors returned by JNI function.
///
/// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#return-codes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JniError {
    /// Unknown error.
    /// Needed for forward compability.
    Unknown(i32),
    /// Returned when the currect thread is not attached to a Java VM.
    ThreadDetached,
    /// Returned when requesting a VM with an unsupported version.
    UnsupportedVersion,
    /// Returned when there isn't enough memory for the operation.
    NotEnoughMemory,
    /// Returned when trying to create a new Java VM when
    /// one already exists in the current process.
    VmExists,
    /// Returned when passing invalid arguments to JNI calls.
    InvalidArguments,
}

impl JniError {
    /// Convert from a raw `jint` error.
    pub(crate) fn from_raw(error: jni_sys::jint) -> Option<JniError> {
        match error {
            jni_sys::JNI_OK => None,
            jni_sys::JNI_EDETACHED => Some(JniError::ThreadDetached),
            jni_sys::JNI_EVERSION => Some(JniError::UnsupportedVersion),
            jni_sys::JNI_ENOMEM => Some(JniError::NotEnoughMemory),
            jni_sys::JNI_EEXIST => Some(JniError::VmExists),
            jni_sys::JNI_EINVAL => Some(JniError::InvalidArguments),
            error => Some(JniError::Unknown(error)),
        }
    }
}

/// The error type of every fallible bridge operation.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The VM passed a null `JNIEnv` pointer.
    #[error("the JNI environment pointer is null")]
    NullEnv,
    /// The managed caller passed a null callback.
    #[error("the callback is null")]
    NullCallback,
    /// A JNI call left a Java exception pending in the current thread.
    ///
    /// The exception is still pending when this error is returned, so it will be
    /// rethrown into Java when the native method returns.
    #[error("a Java exception is pending after `{0}`")]
    JavaException(String),
    /// `GetObjectClass` returned `null` for a non-null object.
    #[error("could not get the class of a Java object")]
    NoClass,
    /// A message can not be passed as a C string.
    #[error("the message contains an interior NUL byte")]
    InteriorNul(#[from] NulError),
    /// A JNI function returned an error status.
    #[error("JNI call `{call}` failed with status {status:?}")]
    Jni {
        call: &'static str,
        status: JniError,
    },
    /// Rust code panicked.
    #[error("Rust panic: {0}")]
    Panic(String),
}
