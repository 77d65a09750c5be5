use jni_sys;

/// JNI Version enum.
///
/// Maps to the `jni_sys::JNI_VERSION_1_*` constants.
///
/// [JNI documentation](https://docs.oracle.com/javase/9/docs/specs/jni/functions.html#version-constants)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum JniVersion {
    /// JNI 1.1.
    V1,
    /// JNI 1.2.
    V2,
    /// JNI 1.4.
    V4,
    /// JNI 1.6.
    V6,
    /// JNI 1.8.
    V8,
    /// Unknown version.
    /// Needed for forward compability with VMs newer than this library.
    Unknown(i32),
}

impl JniVersion {
    /// Convert from a raw `jint` version.
    pub fn from_raw(version: jni_sys::jint) -> JniVersion {
        match version {
            jni_sys::JNI_VERSION_1_1 => JniVersion::V1,
            jni_sys::JNI_VERSION_1_2 => JniVersion::V2,
            jni_sys::JNI_VERSION_1_4 => JniVersion::V4,
            jni_sys::JNI_VERSION_1_6 => JniVersion::V6,
            jni_sys::JNI_VERSION_1_8 => JniVersion::V8,
            _ => JniVersion::Unknown(version),
        }
    }

    /// Convert to a raw `jint` version.
    pub fn to_raw(self) -> jni_sys::jint {
        match self {
            JniVersion::V1 => jni_sys::JNI_VERSION_1_1,
            JniVersion::V2 => jni_sys::JNI_VERSION_1_2,
            JniVersion::V4 => jni_sys::JNI_VERSION_1_4,
            JniVersion::V6 => jni_sys::JNI_VERSION_1_6,
            JniVersion::V8 => jni_sys::JNI_VERSION_1_8,
            JniVersion::Unknown(version) => version,
        }
    }
}
