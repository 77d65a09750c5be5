use crate::error::{BridgeError, JniError};
use crate::java_string::to_java_string;
use crate::object::Object;
use crate::version::JniVersion;
use jni_sys;
use std::marker::PhantomData;
use std::os::raw::c_char;
use std::ptr::NonNull;

include!("call_jni_method.rs");

/// The interface for interacting with Java from a native method.
///
/// Wraps the `JNIEnv` pointer the JVM passes to every native method. The value is only
/// valid for the duration of that native method call and only on the calling thread.
///
/// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/design.html#jni-interface-functions-and-pointers)
#[derive(Debug)]
pub struct JniEnv<'a> {
    version: JniVersion,
    raw_env: NonNull<jni_sys::JNIEnv>,
    _native_call: PhantomData<&'a jni_sys::JNIEnv>,
}

// [`JniEnv`](struct.JniEnv.html) can't be passed between threads: `NonNull` is `!Send`
// and `!Sync` already.

impl<'a> JniEnv<'a> {
    /// Wrap the `JNIEnv` pointer passed to a native method.
    ///
    /// Unsafe because an invalid pointer can be passed.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#getversion)
    pub unsafe fn from_raw(raw_env: *mut jni_sys::JNIEnv) -> Result<JniEnv<'a>, BridgeError> {
        let raw_env = NonNull::new(raw_env).ok_or(BridgeError::NullEnv)?;
        let version = JniVersion::from_raw(call_jni_method!(raw_env.as_ptr(), GetVersion));
        Ok(JniEnv {
            version,
            raw_env,
            _native_call: PhantomData,
        })
    }

    /// Get the raw JNI environment pointer.
    ///
    /// This function provides low-level access to all of JNI and thus is unsafe.
    pub unsafe fn raw_env(&self) -> *mut jni_sys::JNIEnv {
        self.raw_env.as_ptr()
    }

    /// Get JNI version.
    pub fn version(&self) -> JniVersion {
        self.version
    }

    /// Check if there is a pending Java exception in the current thread.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#exceptioncheck)
    pub fn has_exception(&self) -> bool {
        // Safe because the argument is ensured to be correct by construction.
        let value = unsafe { call_jni_method!(self.raw_env(), ExceptionCheck) };
        value != jni_sys::JNI_FALSE
    }

    /// Get the class of an object.
    ///
    /// Unsafe because an invalid object reference can be passed.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#getobjectclass)
    pub unsafe fn object_class(
        &'a self,
        object: NonNull<jni_sys::_jobject>,
    ) -> Result<Object<'a>, BridgeError> {
        let raw_class = call_jni_method!(self.raw_env(), GetObjectClass, object.as_ptr());
        let raw_class = NonNull::new(raw_class).ok_or(BridgeError::NoClass)?;
        Ok(Object::from_raw(self, raw_class))
    }

    /// Look up an instance method of a class.
    ///
    /// `GetMethodID` throws `NoSuchMethodError` when the method doesn't exist, in which case the
    /// exception is left pending.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#getmethodid)
    pub fn method_id(
        &self,
        class: &Object,
        name: &str,
        signature: &str,
    ) -> Result<NonNull<jni_sys::_jmethodID>, BridgeError> {
        let raw_name = to_java_string(name);
        let raw_signature = to_java_string(signature);
        // Safe because the class is a valid reference by construction and the strings
        // are null-terminated.
        let method_id = unsafe {
            call_jni_method!(
                self.raw_env(),
                GetMethodID,
                class.raw_object(),
                raw_name.as_ptr() as *const c_char,
                raw_signature.as_ptr() as *const c_char
            )
        };
        NonNull::new(method_id)
            .ok_or_else(|| BridgeError::JavaException(format!("GetMethodID({}{})", name, signature)))
    }

    /// Call a `void` instance method by name.
    ///
    /// An exception thrown by the method is left pending.
    ///
    /// Unsafe because an invalid object reference can be passed and because the arguments
    /// are not checked against the signature.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#calltypemethod-routines-calltypemethoda-routines-calltypemethodv-routines)
    pub unsafe fn call_void_method(
        &'a self,
        object: NonNull<jni_sys::_jobject>,
        name: &str,
        signature: &str,
        arguments: &[jni_sys::jvalue],
    ) -> Result<(), BridgeError> {
        let class = self.object_class(object)?;
        let method_id = self.method_id(&class, name, signature)?;
        call_jni_method!(
            self.raw_env(),
            CallVoidMethodA,
            object.as_ptr(),
            method_id.as_ptr(),
            arguments.as_ptr()
        );
        if self.has_exception() {
            Err(BridgeError::JavaException(format!("{}{}", name, signature)))
        } else {
            Ok(())
        }
    }

    /// Throw a new exception of the class `class_name` (in the `java/lang/Foo` form)
    /// with a message.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#thrownew)
    pub fn throw_new(&'a self, class_name: &str, message: &str) -> Result<(), BridgeError> {
        let raw_class_name = to_java_string(class_name);
        // Safe because the string is null-terminated.
        let raw_class = unsafe {
            call_jni_method!(
                self.raw_env(),
                FindClass,
                raw_class_name.as_ptr() as *const c_char
            )
        };
        // `FindClass` throws `NoClassDefFoundError` before returning `null`.
        let raw_class = NonNull::new(raw_class)
            .ok_or_else(|| BridgeError::JavaException(format!("FindClass({})", class_name)))?;
        // Safe because `FindClass` returned a new local reference.
        let class = unsafe { Object::from_raw(self, raw_class) };
        let raw_message = to_java_string(message);
        // Safe because the class is a valid reference and the string is null-terminated.
        let status = unsafe {
            call_jni_method!(
                self.raw_env(),
                ThrowNew,
                class.raw_object(),
                raw_message.as_ptr() as *const c_char
            )
        };
        match JniError::from_raw(status) {
            None => Ok(()),
            Some(status) => Err(BridgeError::Jni {
                call: "ThrowNew",
                status,
            }),
        }
    }

    /// Delete a local reference.
    ///
    /// Unsafe because the reference must not be used afterwards.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#deletelocalref)
    pub(crate) unsafe fn delete_local_ref(&self, object: jni_sys::jobject) {
        call_jni_method!(self.raw_env(), DeleteLocalRef, object);
    }
}

#[cfg(test)]
pub(crate) fn test_env<'a>(raw_env: *mut jni_sys::JNIEnv) -> JniEnv<'a> {
    JniEnv {
        version: JniVersion::V8,
        raw_env: NonNull::new(raw_env).unwrap(),
        _native_call: PhantomData,
    }
}
