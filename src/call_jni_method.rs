// This file is textually included, not imported as a module.

/// Call a function from the `JNIEnv` function table.
///
/// Unsafe: the caller guarantees that the pointer is a valid `JNIEnv` of the current thread
/// and that the arguments are valid for the function.
macro_rules! call_jni_method {
    ($raw_env:expr, $method:ident) => {
        {
            let raw_env: *mut ::jni_sys::JNIEnv = $raw_env;
            let jni_fn = ((**raw_env).$method)
                .expect(concat!("JNI function table has no `", stringify!($method), "`"));
            jni_fn(raw_env)
        }
    };
    ($raw_env:expr, $method:ident, $($argument:expr),*) => {
        {
            let raw_env: *mut ::jni_sys::JNIEnv = $raw_env;
            let jni_fn = ((**raw_env).$method)
                .expect(concat!("JNI function table has no `", stringify!($method), "`"));
            jni_fn(raw_env, $($argument),*)
        }
    };
}
