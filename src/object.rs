use crate::env::JniEnv;
use jni_sys;
use std::fmt;
use std::mem;
use std::ptr::NonNull;

/// An owned local reference to a Java object.
///
/// The reference is deleted when the value is dropped, unless ownership is handed back to
/// Java with [`into_raw`](#method.into_raw).
pub struct Object<'env> {
    env: &'env JniEnv<'env>,
    raw_object: NonNull<jni_sys::_jobject>,
}

// [`Object`](struct.Object.html) can't be passed between threads: `NonNull` is `!Send`
// and `!Sync` already.

impl<'env> Object<'env> {
    /// Take ownership of a local reference.
    ///
    /// Unsafe because an incorrect object reference can be passed.
    pub(crate) unsafe fn from_raw(
        env: &'env JniEnv<'env>,
        raw_object: NonNull<jni_sys::_jobject>,
    ) -> Self {
        Self { env, raw_object }
    }

    /// Get the raw object pointer.
    ///
    /// This function provides low-level access to the Java object and thus is unsafe.
    pub unsafe fn raw_object(&self) -> jni_sys::jobject {
        self.raw_object.as_ptr()
    }

    /// Get the [`JniEnv`](struct.JniEnv.html) this object is bound to.
    pub fn env(&self) -> &'env JniEnv<'env> {
        self.env
    }

    /// Transfer ownership of the reference to Java code, e.g. to return it from a native method.
    pub fn into_raw(self) -> jni_sys::jobject {
        let raw_object = self.raw_object.as_ptr();
        mem::forget(self);
        raw_object
    }
}

impl<'env> fmt::Debug for Object<'env> {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter
            .debug_struct("Object")
            .field("raw_object", &self.raw_object)
            .finish()
    }
}

/// `Drop` deletes the local reference.
///
/// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#deletelocalref)
impl<'env> Drop for Object<'env> {
    fn drop(&mut self) {
        // Safe because the reference is owned and is never used after this.
        unsafe { self.env.delete_local_ref(self.raw_object.as_ptr()) };
    }
}
