use crate::env::JniEnv;
use crate::error::BridgeError;
use crate::java_string::to_java_string;
use crate::object::Object;
use jni_sys;
use std::os::raw::c_char;
use std::ptr::NonNull;

include!("call_jni_method.rs");

/// A type representing a Java
/// [`String`](https://docs.oracle.com/javase/10/docs/api/java/lang/String.html).
#[derive(Debug)]
pub struct JavaString<'env> {
    object: Object<'env>,
}

impl<'env> JavaString<'env> {
    /// Create a new Java string from a Rust string.
    ///
    /// `NewStringUTF` throws `OutOfMemoryError` before returning `null`, in which case the
    /// exception is left pending.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#newstringutf)
    pub fn new(env: &'env JniEnv<'env>, string: &str) -> Result<JavaString<'env>, BridgeError> {
        let buffer = to_java_string(string);
        // Safe because the buffer is a null-terminated modified UTF-8 string.
        let raw_string = unsafe {
            call_jni_method!(
                env.raw_env(),
                NewStringUTF,
                buffer.as_ptr() as *const c_char
            )
        };
        let raw_string = NonNull::new(raw_string)
            .ok_or_else(|| BridgeError::JavaException("NewStringUTF".to_owned()))?;
        // Safe because `NewStringUTF` returned a new local reference.
        Ok(JavaString {
            object: unsafe { Object::from_raw(env, raw_string) },
        })
    }

    /// The string as a JNI method argument.
    pub fn as_argument(&self) -> jni_sys::jvalue {
        // Safe because the reference outlives the returned value's use in a call.
        jni_sys::jvalue {
            l: unsafe { self.object.raw_object() },
        }
    }

    /// Transfer ownership of the string to Java code.
    pub fn into_raw(self) -> jni_sys::jstring {
        self.object.into_raw()
    }
}

/// Allow [`JavaString`](struct.JavaString.html) to be used in place of an
/// [`Object`](struct.Object.html).
impl<'env> ::std::ops::Deref for JavaString<'env> {
    type Target = Object<'env>;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.object
    }
}
