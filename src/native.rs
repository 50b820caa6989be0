use crate::sys;
use std::ffi::{c_int, c_void, CStr};
use std::sync::Arc;

/// Operations of the vendor NatNet client object.
///
/// [`VendorClient`](crate::library::VendorClient) forwards them to the loaded
/// SDK; the `mock` module provides an in-memory implementation. Return values
/// are the vendor's own status codes, untouched.
pub trait NativeClient: Send + Sync {
    /// `Initialize(myAddress, serverAddress)`.
    fn initialize(&self, local: &CStr, server: &CStr) -> c_int;

    /// `Initialize(myAddress, serverAddress, hostCommandPort)`.
    fn initialize_with_command_port(&self, local: &CStr, server: &CStr, command_port: c_int)
        -> c_int;

    /// `Initialize(myAddress, serverAddress, hostCommandPort, hostDataPort)`.
    fn initialize_with_ports(
        &self,
        local: &CStr,
        server: &CStr,
        command_port: c_int,
        data_port: c_int,
    ) -> c_int;

    fn uninitialize(&self) -> c_int;

    fn natnet_version(&self) -> [u8; 4];

    /// Request the server's data descriptions. Returns a vendor-owned list,
    /// or null when the server did not answer.
    fn data_descriptions(&self) -> *mut sys::sDataDescriptions;

    /// Release a list returned by [`data_descriptions`](Self::data_descriptions).
    ///
    /// # Safety
    /// `descriptions` must come from this client and be released only once.
    unsafe fn free_data_descriptions(&self, descriptions: *mut sys::sDataDescriptions);

    fn set_verbosity_level(&self, level: c_int);

    /// Install the per-frame handler, replacing any previous one.
    ///
    /// # Safety
    /// `user` is passed back to `handler` from the SDK's delivery thread and
    /// must stay valid until the handler is replaced or the client is dropped.
    unsafe fn set_data_callback(&self, handler: sys::FrameHandler, user: *mut c_void);
}

macro_rules! forward_native_client {
    ($($wrapper:ident),*) => {$(
        impl<T: NativeClient + ?Sized> NativeClient for $wrapper<T> {
            fn initialize(&self, local: &CStr, server: &CStr) -> c_int {
                (**self).initialize(local, server)
            }

            fn initialize_with_command_port(
                &self,
                local: &CStr,
                server: &CStr,
                command_port: c_int,
            ) -> c_int {
                (**self).initialize_with_command_port(local, server, command_port)
            }

            fn initialize_with_ports(
                &self,
                local: &CStr,
                server: &CStr,
                command_port: c_int,
                data_port: c_int,
            ) -> c_int {
                (**self).initialize_with_ports(local, server, command_port, data_port)
            }

            fn uninitialize(&self) -> c_int {
                (**self).uninitialize()
            }

            fn natnet_version(&self) -> [u8; 4] {
                (**self).natnet_version()
            }

            fn data_descriptions(&self) -> *mut sys::sDataDescriptions {
                (**self).data_descriptions()
            }

            unsafe fn free_data_descriptions(&self, descriptions: *mut sys::sDataDescriptions) {
                (**self).free_data_descriptions(descriptions)
            }

            fn set_verbosity_level(&self, level: c_int) {
                (**self).set_verbosity_level(level)
            }

            unsafe fn set_data_callback(&self, handler: sys::FrameHandler, user: *mut c_void) {
                (**self).set_data_callback(handler, user)
            }
        }
    )*};
}

forward_native_client!(Box, Arc);
