use crate::callback::Callback;
use crate::config::{BridgeConfig, ConfigWarning};
use crate::env::JniEnv;
use crate::error::BridgeError;
use crate::string::JavaString;
use jni_sys;
use log::debug;
use std::ptr::NonNull;
use std::sync::OnceLock;

/// Cargo features the library was built with, reported in the greeting.
const FEATURES: &[(&str, bool)] = &[("foo", cfg!(feature = "foo")), ("bar", cfg!(feature = "bar"))];

/// The callback bridge: calls managed-code capabilities back with the configured message.
#[derive(Debug)]
pub struct Bridge {
    config: BridgeConfig,
    config_warnings: Vec<ConfigWarning>,
}

impl Bridge {
    pub fn new(config: BridgeConfig) -> Self {
        Bridge {
            config,
            config_warnings: vec![],
        }
    }

    /// A bridge configured with [`BridgeConfig::from_env`](struct.BridgeConfig.html#method.from_env).
    pub fn from_env() -> Self {
        let (config, config_warnings) = BridgeConfig::from_env();
        Bridge {
            config,
            config_warnings,
        }
    }

    /// The process-wide bridge used by the exported entry points, configured from the
    /// environment on first use.
    pub fn global() -> &'static Bridge {
        static GLOBAL: OnceLock<Bridge> = OnceLock::new();
        GLOBAL.get_or_init(Bridge::from_env)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Environment overrides ignored while building the configuration.
    pub fn config_warnings(&self) -> &[ConfigWarning] {
        &self.config_warnings
    }

    /// Call the callback back exactly once with the configured message.
    pub fn invoke_callback(&self, callback: &dyn Callback) -> Result<(), BridgeError> {
        debug!("Invoking callback with {:?}.", self.config.message());
        callback.invoke(self.config.message())
    }

    /// The greeting returned to Java by `stringFromJNI`, tagged with the enabled cargo features,
    /// e.g. `Hello from Rust [feature=foo,bar]`.
    pub fn greeting(&self) -> String {
        let features = FEATURES
            .iter()
            .filter(|(_, enabled)| *enabled)
            .map(|(name, _)| *name)
            .collect::<Vec<_>>();
        format!("{} [feature={}]", self.config.message(), features.join(","))
    }

    /// Greet a request listener, then hand it the configured message.
    pub fn start_request(&self, listener: &dyn RequestListener) -> Result<(), BridgeError> {
        listener.hello()?;
        listener.append_to_text_view(self.config.message())
    }
}

/// A Java activity that receives text from a native request.
pub trait RequestListener {
    fn hello(&self) -> Result<(), BridgeError>;
    fn append_to_text_view(&self, text: &str) -> Result<(), BridgeError>;
}

/// A Java object implementing `void hello()` and `void appendToTextView(String)`.
#[derive(Debug)]
pub struct JniRequestListener<'env> {
    env: &'env JniEnv<'env>,
    object: NonNull<jni_sys::_jobject>,
}

impl<'env> JniRequestListener<'env> {
    /// Unsafe because an incorrect object reference can be passed.
    pub unsafe fn from_raw(
        env: &'env JniEnv<'env>,
        object: jni_sys::jobject,
    ) -> Result<Self, BridgeError> {
        let object = NonNull::new(object).ok_or(BridgeError::NullCallback)?;
        Ok(JniRequestListener { env, object })
    }
}

impl<'env> RequestListener for JniRequestListener<'env> {
    fn hello(&self) -> Result<(), BridgeError> {
        // Safe because the object is a live reference and there are no arguments.
        unsafe { self.env.call_void_method(self.object, "hello", "()V", &[]) }
    }

    fn append_to_text_view(&self, text: &str) -> Result<(), BridgeError> {
        let text = JavaString::new(self.env, text)?;
        // Safe because the object is a live reference and the argument matches the signature.
        unsafe {
            self.env.call_void_method(
                self.object,
                "appendToTextView",
                "(Ljava/lang/String;)V",
                &[text.as_argument()],
            )
        }
    }
}
