use crate::marshal;
use crate::sys;
use crate::types::Frame;
use std::ffi::c_void;
use std::sync::{Arc, Mutex, PoisonError};

pub(crate) type DataCallback = dyn Fn(Frame) + Send + Sync;

/// The single registered data callback. Re-registration swaps it.
pub(crate) struct Dispatch {
    callback: Mutex<Option<Arc<DataCallback>>>,
}

impl Dispatch {
    pub fn new() -> Self {
        Self {
            callback: Mutex::new(None),
        }
    }

    /// Install `callback`, returning whether one was already registered.
    pub fn replace(&self, callback: Arc<DataCallback>) -> bool {
        let mut slot = self.callback.lock().unwrap_or_else(PoisonError::into_inner);
        slot.replace(callback).is_some()
    }

    fn current(&self) -> Option<Arc<DataCallback>> {
        self.callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn as_user_ptr(self: &Arc<Self>) -> *mut c_void {
        Arc::as_ptr(self) as *mut c_void
    }
}

/// Frame handler handed to the SDK. Runs on the SDK's delivery thread.
///
/// The callback runs after the slot lock is released, so it may re-register.
pub(crate) unsafe extern "C" fn data_handler(data: *const sys::sFrameOfMocapData, user: *mut c_void) {
    if data.is_null() || user.is_null() {
        return;
    }
    let dispatch = &*(user as *const Dispatch);
    let Some(callback) = dispatch.current() else {
        return;
    };

    let frame = marshal::frame(&*data);
    callback(frame);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::NativeFrame;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn test_handler_without_callback_is_noop() {
        let dispatch = Arc::new(Dispatch::new());
        let native = NativeFrame::new(1);
        unsafe { data_handler(native.as_native(), dispatch.as_user_ptr()) };
        unsafe { data_handler(std::ptr::null(), dispatch.as_user_ptr()) };
    }

    #[test]
    fn test_replace_swaps_callback() {
        let dispatch = Arc::new(Dispatch::new());
        let seen = Arc::new(AtomicI32::new(0));

        let first = seen.clone();
        assert!(!dispatch.replace(Arc::new(move |f: Frame| {
            first.store(f.frame_number, Ordering::SeqCst)
        })));
        let second = seen.clone();
        assert!(dispatch.replace(Arc::new(move |f: Frame| {
            second.store(-f.frame_number, Ordering::SeqCst)
        })));

        let native = NativeFrame::new(8);
        unsafe { data_handler(native.as_native(), dispatch.as_user_ptr()) };
        assert_eq!(seen.load(Ordering::SeqCst), -8);
    }
}
