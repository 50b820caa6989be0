use std::fmt;
use std::path::PathBuf;

/// Errors raised by the binding layer itself.
///
/// Failures reported by the vendor SDK are integer [`Status`](crate::Status)
/// values and never show up here.
#[derive(Debug, thiserror::Error)]
pub enum NatNetError {
    #[error("Failed to load NatNet library {}: {source}", path.display())]
    Library {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("NatNet library returned a null client handle")]
    ClientCreation,

    #[error("initialize expects 2 to 4 connection arguments, got {0}")]
    ArgumentCount(usize),

    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("Frame stream stopped")]
    StreamStopped,

    #[error("Timeout waiting for frame")]
    Timeout,
}

impl NatNetError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        NatNetError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

/// Last-error storage for the C FFI layer. The FFI keeps one per thread.
pub(crate) struct LastError {
    message: std::sync::Mutex<String>,
}

impl LastError {
    pub const fn new() -> Self {
        Self {
            message: std::sync::Mutex::new(String::new()),
        }
    }

    pub fn set(&self, err: &NatNetError) {
        if let Ok(mut msg) = self.message.lock() {
            *msg = fmt::format(format_args!("{}\0", err));
        }
    }

    pub fn as_ptr(&self) -> *const std::ffi::c_char {
        match self.message.lock() {
            Ok(msg) if !msg.is_empty() => msg.as_ptr() as *const std::ffi::c_char,
            _ => std::ptr::null(),
        }
    }
}
