//! A module with tools used in unit tests.
//!
//! [`test_raw_jni_env!`] builds a fake `JNIEnv` whose function table checks every call against
//! an ordered script of expected [`JniCall`]s and returns the scripted results.
use crate::java_string::from_java_string;
use crate::native_method::panic_message;
use jni_sys;
use std::ffi::CStr;
use std::mem;
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;

macro_rules! generate_method_check_impl {
    ($method:ident, fn($($argument_name:ident: $argument_type:ty),*) -> $result_type:ty, $code:expr) => {
        impl $method {
            #[doc(hidden)]
            pub unsafe fn __check_call(
                calls: &mut JniCalls,
                env: *mut jni_sys::JNIEnv,
                $($argument_name: $argument_type,)*
            ) -> $result_type {
                match calls.__check_method_call(env, stringify!($method)) {
                    JniCall::$method(ref call) => call.__check_call_impl(
                        $($argument_name),*
                    ),
                    ref call => panic!(
                        "Unexpected call {:?}, actual call: {}.",
                        call,
                        stringify!($method)
                    ),
                }
            }

            unsafe fn __check_call_impl(
                &self,
                $($argument_name: $argument_type,)*
            ) -> $result_type {
                $code(self)
            }
        }
    };
}

unsafe fn decode(string: *const c_char) -> String {
    from_java_string(CStr::from_ptr(string).to_bytes_with_nul())
        .unwrap()
        .into_owned()
}

#[derive(Debug)]
pub struct GetVersion {
    pub result: jni_sys::jint,
}

generate_method_check_impl!(GetVersion, fn() -> jni_sys::jint, |call: &Self| {
    call.result
});

#[derive(Debug)]
pub struct ExceptionCheck {
    pub result: jni_sys::jboolean,
}

generate_method_check_impl!(ExceptionCheck, fn() -> jni_sys::jboolean, |call: &Self| {
    call.result
});

#[derive(Debug)]
pub struct DeleteLocalRef {
    pub object: jni_sys::jobject,
}

generate_method_check_impl!(
    DeleteLocalRef,
    fn(object: jni_sys::jobject) -> (),
    |call: &Self| {
        assert_eq!(object, call.object);
    }
);

#[derive(Debug)]
pub struct GetObjectClass {
    pub object: jni_sys::jobject,
    pub result: jni_sys::jobject,
}

generate_method_check_impl!(
    GetObjectClass,
    fn(object: jni_sys::jobject) -> jni_sys::jobject,
    |call: &Self| {
        assert_eq!(object, call.object);
        call.result
    }
);

#[derive(Debug)]
pub struct GetMethodID {
    pub class: jni_sys::jobject,
    pub name: String,
    pub signature: String,
    pub result: jni_sys::jmethodID,
}

generate_method_check_impl!(
    GetMethodID,
    fn(class: jni_sys::jobject, name: *const c_char, signature: *const c_char) -> jni_sys::jmethodID,
    |call: &Self| {
        assert_eq!(class, call.class);
        assert_eq!(decode(name), call.name);
        assert_eq!(decode(signature), call.signature);
        call.result
    }
);

#[derive(Debug)]
pub struct CallVoidMethodA {
    pub object: jni_sys::jobject,
    pub method_id: jni_sys::jmethodID,
    pub arguments: Vec<jni_sys::jobject>,
}

generate_method_check_impl!(
    CallVoidMethodA,
    fn(object: jni_sys::jobject, method_id: jni_sys::jmethodID, arguments: *const jni_sys::jvalue) -> (),
    |call: &Self| {
        assert_eq!(object, call.object);
        assert_eq!(method_id, call.method_id);
        for (index, expected) in call.arguments.iter().enumerate() {
            assert_eq!((*arguments.add(index)).l, *expected);
        }
    }
);

#[derive(Debug)]
pub struct FindClass {
    pub name: String,
    pub result: jni_sys::jobject,
}

generate_method_check_impl!(
    FindClass,
    fn(name: *const c_char) -> jni_sys::jobject,
    |call: &Self| {
        assert_eq!(decode(name), call.name);
        call.result
    }
);

#[derive(Debug)]
pub struct ThrowNew {
    pub class: jni_sys::jobject,
    pub message: String,
    pub result: jni_sys::jint,
}

generate_method_check_impl!(
    ThrowNew,
    fn(class: jni_sys::jobject, message: *const c_char) -> jni_sys::jint,
    |call: &Self| {
        assert_eq!(class, call.class);
        assert_eq!(decode(message), call.message);
        call.result
    }
);

#[derive(Debug)]
pub struct NewStringUTF {
    pub string: String,
    pub result: jni_sys::jobject,
}

impl NewStringUTF {
    /// Unlike other calls, also records the created string so tests can inspect
    /// the payloads sent to Java.
    #[doc(hidden)]
    pub unsafe fn __check_call(
        calls: &mut JniCalls,
        env: *mut jni_sys::JNIEnv,
        string: *const c_char,
    ) -> jni_sys::jobject {
        let string = decode(string);
        let result = match calls.__check_method_call(env, "NewStringUTF") {
            JniCall::NewStringUTF(ref call) => {
                assert_eq!(string, call.string);
                call.result
            }
            ref call => panic!("Unexpected call {:?}, actual call: NewStringUTF.", call),
        };
        calls.strings.push(string);
        result
    }
}

#[derive(Debug)]
pub enum JniCall {
    GetVersion(GetVersion),
    ExceptionCheck(ExceptionCheck),
    DeleteLocalRef(DeleteLocalRef),
    GetObjectClass(GetObjectClass),
    GetMethodID(GetMethodID),
    CallVoidMethodA(CallVoidMethodA),
    FindClass(FindClass),
    ThrowNew(ThrowNew),
    NewStringUTF(NewStringUTF),
}

#[derive(Debug)]
pub struct JniCalls {
    pub calls: Vec<JniCall>,
    pub current_call: usize,
    pub env: *mut jni_sys::JNIEnv,
    pub strings: Vec<String>,
    pub failure: Option<String>,
}

/// Make [`JniCalls`](struct.JniCalls.html) sendable between threads so that it can live
/// in a static `Mutex`. Safe, because this type is only used for testing.
unsafe impl Send for JniCalls {}

impl Default for JniCalls {
    fn default() -> Self {
        JniCalls {
            calls: vec![],
            current_call: 0,
            env: std::ptr::null_mut(),
            strings: vec![],
            failure: None,
        }
    }
}

impl JniCalls {
    pub fn __check_method_call<'a>(
        &'a mut self,
        env: *mut jni_sys::JNIEnv,
        method_name: &str,
    ) -> &'a JniCall {
        assert_eq!(env, self.env);
        let current_call = self.current_call;
        if current_call >= self.calls.len() {
            panic!("Unexpected {} method call.", method_name);
        }
        self.current_call += 1;
        &self.calls[current_call]
    }
}

pub fn lock(calls: &'static Mutex<JniCalls>) -> MutexGuard<'static, JniCalls> {
    calls.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run a mock JNI function's check.
///
/// A panic can't unwind out of an `extern "system"` function, so a failed check is recorded
/// instead and reported by [`TestEnv`](struct.TestEnv.html) when it is dropped. The function
/// returns zero (`null`, `JNI_FALSE`, ...) in that case.
pub fn check<R>(calls: &'static Mutex<JniCalls>, body: impl FnOnce(&mut JniCalls) -> R) -> R {
    match panic::catch_unwind(AssertUnwindSafe(|| body(&mut lock(calls)))) {
        Ok(result) => result,
        Err(payload) => {
            let mut calls = lock(calls);
            if calls.failure.is_none() {
                calls.failure = Some(panic_message(&*payload));
            }
            // Safe because mock functions only return integers, pointers and `()`.
            unsafe { mem::zeroed() }
        }
    }
}

/// A fake `JNIEnv` returned by [`test_raw_jni_env!`].
///
/// Checks that all scripted calls have happened when dropped.
pub struct TestEnv {
    pub env: *mut jni_sys::JNIEnv,
    calls: &'static Mutex<JniCalls>,
}

impl TestEnv {
    #[doc(hidden)]
    pub fn new(
        calls: &'static Mutex<JniCalls>,
        script: Vec<JniCall>,
        raw_env: jni_sys::JNINativeInterface_,
    ) -> Self {
        // Leaked so that the pointers stay valid for as long as anything might use them.
        let raw_env: &'static jni_sys::JNINativeInterface_ = Box::leak(Box::new(raw_env));
        let env: &'static mut jni_sys::JNIEnv = Box::leak(Box::new(raw_env as *const _));
        let env = env as *mut jni_sys::JNIEnv;
        *lock(calls) = JniCalls {
            calls: script,
            current_call: 0,
            env,
            strings: vec![],
            failure: None,
        };
        TestEnv { env, calls }
    }

    /// Strings created with `NewStringUTF` so far.
    pub fn strings(&self) -> Vec<String> {
        lock(self.calls).strings.clone()
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        if thread::panicking() {
            return;
        }
        let calls = lock(self.calls);
        if let Some(ref failure) = calls.failure {
            panic!("JNI call check failed: {}", failure);
        }
        assert_eq!(
            calls.current_call,
            calls.calls.len(),
            "Expected JNI calls did not happen: {:?}.",
            &calls.calls[calls.current_call..]
        );
    }
}

/// A function table with every function missing.
pub fn empty_raw_jni_env() -> jni_sys::JNINativeInterface_ {
    // Safe because the table only consists of raw pointers and `Option`-s of function pointers,
    // for which all-zeroes is `null` and `None`.
    unsafe { mem::zeroed() }
}

macro_rules! test_raw_jni_env {
    ($calls:expr) => {{
        lazy_static! {
            static ref CALLS: ::std::sync::Mutex<$crate::testing::JniCalls> =
                ::std::sync::Mutex::new($crate::testing::JniCalls::default());
        }
        unsafe extern "system" fn get_version(env: *mut ::jni_sys::JNIEnv) -> ::jni_sys::jint {
            $crate::testing::check(&*CALLS, |calls| {
                $crate::testing::GetVersion::__check_call(calls, env)
            })
        }
        unsafe extern "system" fn exception_check(
            env: *mut ::jni_sys::JNIEnv,
        ) -> ::jni_sys::jboolean {
            $crate::testing::check(&*CALLS, |calls| {
                $crate::testing::ExceptionCheck::__check_call(calls, env)
            })
        }
        unsafe extern "system" fn delete_local_ref(
            env: *mut ::jni_sys::JNIEnv,
            object: ::jni_sys::jobject,
        ) {
            $crate::testing::check(&*CALLS, |calls| {
                $crate::testing::DeleteLocalRef::__check_call(calls, env, object)
            })
        }
        unsafe extern "system" fn get_object_class(
            env: *mut ::jni_sys::JNIEnv,
            object: ::jni_sys::jobject,
        ) -> ::jni_sys::jclass {
            $crate::testing::check(&*CALLS, |calls| {
                $crate::testing::GetObjectClass::__check_call(calls, env, object)
            })
        }
        unsafe extern "system" fn get_method_id(
            env: *mut ::jni_sys::JNIEnv,
            class: ::jni_sys::jclass,
            name: *const ::std::os::raw::c_char,
            signature: *const ::std::os::raw::c_char,
        ) -> ::jni_sys::jmethodID {
            $crate::testing::check(&*CALLS, |calls| {
                $crate::testing::GetMethodID::__check_call(calls, env, class, name, signature)
            })
        }
        unsafe extern "system" fn call_void_method_a(
            env: *mut ::jni_sys::JNIEnv,
            object: ::jni_sys::jobject,
            method_id: ::jni_sys::jmethodID,
            arguments: *const ::jni_sys::jvalue,
        ) {
            $crate::testing::check(&*CALLS, |calls| {
                $crate::testing::CallVoidMethodA::__check_call(calls, env, object, method_id, arguments)
            })
        }
        unsafe extern "system" fn find_class(
            env: *mut ::jni_sys::JNIEnv,
            name: *const ::std::os::raw::c_char,
        ) -> ::jni_sys::jclass {
            $crate::testing::check(&*CALLS, |calls| {
                $crate::testing::FindClass::__check_call(calls, env, name)
            })
        }
        unsafe extern "system" fn throw_new(
            env: *mut ::jni_sys::JNIEnv,
            class: ::jni_sys::jclass,
            message: *const ::std::os::raw::c_char,
        ) -> ::jni_sys::jint {
            $crate::testing::check(&*CALLS, |calls| {
                $crate::testing::ThrowNew::__check_call(calls, env, class, message)
            })
        }
        unsafe extern "system" fn new_string_utf(
            env: *mut ::jni_sys::JNIEnv,
            string: *const ::std::os::raw::c_char,
        ) -> ::jni_sys::jstring {
            $crate::testing::check(&*CALLS, |calls| {
                $crate::testing::NewStringUTF::__check_call(calls, env, string)
            })
        }
        $crate::testing::TestEnv::new(
            &*CALLS,
            $calls,
            ::jni_sys::JNINativeInterface_ {
                GetVersion: Some(get_version),
                ExceptionCheck: Some(exception_check),
                DeleteLocalRef: Some(delete_local_ref),
                GetObjectClass: Some(get_object_class),
                GetMethodID: Some(get_method_id),
                CallVoidMethodA: Some(call_void_method_a),
                FindClass: Some(find_class),
                ThrowNew: Some(throw_new),
                NewStringUTF: Some(new_string_utf),
                ..$crate::testing::empty_raw_jni_env()
            },
        )
    }};
}

#[cfg(test)]
mod test_raw_jni_env_tests {
    use super::*;
    use crate::env::test_env;

    #[test]
    fn scripted_calls() {
        let calls = test_raw_jni_env!(vec![JniCall::ExceptionCheck(ExceptionCheck {
            result: jni_sys::JNI_TRUE,
        })]);
        assert!(test_env(calls.env).has_exception());
    }

    #[test]
    #[should_panic(expected = "JNI call check failed: Unexpected call GetVersion")]
    fn unexpected_call_fails_the_test() {
        let calls = test_raw_jni_env!(vec![JniCall::GetVersion(GetVersion {
            result: jni_sys::JNI_VERSION_1_6,
        })]);
        // The mock returns `JNI_FALSE` after recording the failure.
        assert!(!test_env(calls.env).has_exception());
    }

    #[test]
    #[should_panic(expected = "JNI call check failed: Unexpected ExceptionCheck method call.")]
    fn extra_call_fails_the_test() {
        let calls = test_raw_jni_env!(vec![]);
        assert!(!test_env(calls.env).has_exception());
    }

    #[test]
    #[should_panic(expected = "Expected JNI calls did not happen")]
    fn missing_call_fails_the_test() {
        let _calls = test_raw_jni_env!(vec![JniCall::GetVersion(GetVersion {
            result: jni_sys::JNI_VERSION_1_6,
        })]);
    }
}
