//! Runtime-loaded vendor NatNet library.
//!
//! The SDK ships as a prebuilt shared library. Its client object is reached
//! through flat C entry points taking the opaque client pointer first.

use crate::config::ClientConfig;
use crate::native::NativeClient;
use crate::types::ConnectionType;
use crate::{sys, NatNetError, Result};
use libloading as lib;
#[cfg(unix)]
use libloading::os::unix::Symbol;
#[cfg(windows)]
use libloading::os::windows::Symbol;
use std::ffi::{c_char, c_int, c_uchar, c_void, CStr};
use std::path::Path;
use std::ptr::NonNull;
use std::sync::Arc;

// NatNet client entry points
type CreateFn = unsafe extern "C" fn(c_int) -> *mut c_void;
type DestroyFn = unsafe extern "C" fn(*mut c_void);
type InitializeFn = unsafe extern "C" fn(*mut c_void, *mut c_char, *mut c_char) -> c_int;
type InitializeCommandPortFn =
    unsafe extern "C" fn(*mut c_void, *mut c_char, *mut c_char, c_int) -> c_int;
type InitializePortsFn =
    unsafe extern "C" fn(*mut c_void, *mut c_char, *mut c_char, c_int, c_int) -> c_int;
type UninitializeFn = unsafe extern "C" fn(*mut c_void) -> c_int;
type NatNetVersionFn = unsafe extern "C" fn(*mut c_void, *mut c_uchar);
type GetDataDescriptionsFn =
    unsafe extern "C" fn(*mut c_void, *mut *mut sys::sDataDescriptions) -> c_int;
type FreeDescriptionsFn = unsafe extern "C" fn(*mut sys::sDataDescriptions);
type SetVerbosityLevelFn = unsafe extern "C" fn(*mut c_void, c_int);
type SetDataCallbackFn = unsafe extern "C" fn(*mut c_void, sys::FrameHandler, *mut c_void) -> c_int;

pub struct VendorLibrary {
    create: Symbol<CreateFn>,
    destroy: Symbol<DestroyFn>,
    initialize: Symbol<InitializeFn>,
    initialize_command_port: Symbol<InitializeCommandPortFn>,
    initialize_ports: Symbol<InitializePortsFn>,
    uninitialize: Symbol<UninitializeFn>,
    natnet_version: Symbol<NatNetVersionFn>,
    get_data_descriptions: Symbol<GetDataDescriptionsFn>,
    free_descriptions: Symbol<FreeDescriptionsFn>,
    set_verbosity_level: Symbol<SetVerbosityLevelFn>,
    set_data_callback: Symbol<SetDataCallbackFn>,
    _lib: lib::Library,
}

impl VendorLibrary {
    /// Load the vendor library and resolve every client entry point.
    pub fn open(path: &Path) -> Result<Arc<VendorLibrary>> {
        let library = unsafe { Self::load(path) }.map_err(|source| NatNetError::Library {
            path: path.to_owned(),
            source,
        })?;
        log::info!("Loaded NatNet library {}", path.display());
        Ok(Arc::new(library))
    }

    unsafe fn load(path: &Path) -> std::result::Result<VendorLibrary, lib::Error> {
        let lib = lib::Library::new(path)?;
        let create = lib.get::<CreateFn>(b"NatNetClient_Create\0")?.into_raw();
        let destroy = lib.get::<DestroyFn>(b"NatNetClient_Destroy\0")?.into_raw();
        let initialize = lib.get::<InitializeFn>(b"NatNetClient_Initialize\0")?.into_raw();
        let initialize_command_port = lib
            .get::<InitializeCommandPortFn>(b"NatNetClient_InitializeCommandPort\0")?
            .into_raw();
        let initialize_ports = lib
            .get::<InitializePortsFn>(b"NatNetClient_InitializePorts\0")?
            .into_raw();
        let uninitialize = lib.get::<UninitializeFn>(b"NatNetClient_Uninitialize\0")?.into_raw();
        let natnet_version = lib.get::<NatNetVersionFn>(b"NatNetClient_NatNetVersion\0")?.into_raw();
        let get_data_descriptions = lib
            .get::<GetDataDescriptionsFn>(b"NatNetClient_GetDataDescriptions\0")?
            .into_raw();
        let free_descriptions = lib.get::<FreeDescriptionsFn>(b"NatNet_FreeDescriptions\0")?.into_raw();
        let set_verbosity_level = lib
            .get::<SetVerbosityLevelFn>(b"NatNetClient_SetVerbosityLevel\0")?
            .into_raw();
        let set_data_callback = lib
            .get::<SetDataCallbackFn>(b"NatNetClient_SetDataCallback\0")?
            .into_raw();

        Ok(VendorLibrary {
            create,
            destroy,
            initialize,
            initialize_command_port,
            initialize_ports,
            uninitialize,
            natnet_version,
            get_data_descriptions,
            free_descriptions,
            set_verbosity_level,
            set_data_callback,
            _lib: lib,
        })
    }
}

/// Native client instance created from a [`VendorLibrary`].
pub struct VendorClient {
    library: Arc<VendorLibrary>,
    handle: NonNull<c_void>,
}

// The SDK client is driven from the caller's thread and its own delivery
// thread; it does its own locking.
unsafe impl Send for VendorClient {}
unsafe impl Sync for VendorClient {}

impl VendorClient {
    /// Load the library named by `config` and create a client from it.
    pub fn open(connection: ConnectionType, config: &ClientConfig) -> Result<VendorClient> {
        Self::create(VendorLibrary::open(&config.library_path)?, connection)
    }

    pub fn create(library: Arc<VendorLibrary>, connection: ConnectionType) -> Result<VendorClient> {
        let raw = unsafe { (library.create)(connection as c_int) };
        let handle = NonNull::new(raw).ok_or(NatNetError::ClientCreation)?;
        log::info!("Created NatNet client ({:?})", connection);
        Ok(VendorClient { library, handle })
    }

    fn ptr(&self) -> *mut c_void {
        self.handle.as_ptr()
    }
}

impl Drop for VendorClient {
    fn drop(&mut self) {
        unsafe { (self.library.destroy)(self.ptr()) };
    }
}

impl NativeClient for VendorClient {
    fn initialize(&self, local: &CStr, server: &CStr) -> c_int {
        unsafe {
            (self.library.initialize)(
                self.ptr(),
                local.as_ptr() as *mut c_char,
                server.as_ptr() as *mut c_char,
            )
        }
    }

    fn initialize_with_command_port(
        &self,
        local: &CStr,
        server: &CStr,
        command_port: c_int,
    ) -> c_int {
        unsafe {
            (self.library.initialize_command_port)(
                self.ptr(),
                local.as_ptr() as *mut c_char,
                server.as_ptr() as *mut c_char,
                command_port,
            )
        }
    }

    fn initialize_with_ports(
        &self,
        local: &CStr,
        server: &CStr,
        command_port: c_int,
        data_port: c_int,
    ) -> c_int {
        unsafe {
            (self.library.initialize_ports)(
                self.ptr(),
                local.as_ptr() as *mut c_char,
                server.as_ptr() as *mut c_char,
                command_port,
                data_port,
            )
        }
    }

    fn uninitialize(&self) -> c_int {
        unsafe { (self.library.uninitialize)(self.ptr()) }
    }

    fn natnet_version(&self) -> [u8; 4] {
        let mut ver = [0u8; 4];
        unsafe { (self.library.natnet_version)(self.ptr(), ver.as_mut_ptr()) };
        ver
    }

    fn data_descriptions(&self) -> *mut sys::sDataDescriptions {
        let mut out: *mut sys::sDataDescriptions = std::ptr::null_mut();
        let count = unsafe { (self.library.get_data_descriptions)(self.ptr(), &mut out) };
        log::debug!("Server returned {} data descriptions", count);
        out
    }

    unsafe fn free_data_descriptions(&self, descriptions: *mut sys::sDataDescriptions) {
        (self.library.free_descriptions)(descriptions);
    }

    fn set_verbosity_level(&self, level: c_int) {
        unsafe { (self.library.set_verbosity_level)(self.ptr(), level) };
    }

    unsafe fn set_data_callback(&self, handler: sys::FrameHandler, user: *mut c_void) {
        let ret = (self.library.set_data_callback)(self.ptr(), handler, user);
        if ret != 0 {
            log::warn!("SetDataCallback returned {}", ret);
        }
    }
}
