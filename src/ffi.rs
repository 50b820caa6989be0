//! C FFI layer for natnet.
//!
//! Provides an opaque handle-based API for C/C++ consumers.
//! The generated C header is written to `include/natnet.h` by cbindgen.

use crate::client::{Client, Endpoints};
use crate::config::ClientConfig;
use crate::error::LastError;
use crate::library::VendorClient;
use crate::native::NativeClient;
use crate::types::{ConnectionType, DataDescription, Frame};
use crate::{sys, NatNetError, Result};
use std::ffi::{c_char, c_int, c_uint, c_void, CStr, CString};

thread_local! {
    /// Last error message for C consumers, per calling thread.
    static LAST_ERROR: LastError = const { LastError::new() };
}

/// Returned for binding-level failures (bad handle, bad arguments). Vendor
/// status codes are never negative.
pub const NN_BINDING_ERROR: c_int = -1;

/// Opaque client handle for C consumers.
pub struct NnClient(Client<Box<dyn NativeClient>>);

/// Opaque description list for C consumers.
pub struct NnDescriptionList(Vec<DescriptionEntry>);

enum DescriptionEntry {
    RigidBody {
        name: CString,
        id: c_int,
        parent_id: c_int,
        offset: [f32; 3],
    },
    MarkerSet {
        name: CString,
        marker_names: Vec<CString>,
    },
}

/// Rigid body in C-compatible layout.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct NnRigidBody {
    pub id: c_int,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
    pub mean_error: f32,
    pub tracking_valid: bool,
}

/// Marker set in C-compatible layout.
#[repr(C)]
pub struct NnMarkerSet {
    /// Null-terminated name.
    pub name: *const c_char,
    pub marker_count: c_int,
    /// `marker_count` [x, y, z] triples.
    pub markers: *const [f32; 3],
}

/// Labeled marker in C-compatible layout.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct NnLabeledMarker {
    pub id: c_int,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub size: f32,
}

/// Skeleton in C-compatible layout.
#[repr(C)]
pub struct NnSkeleton {
    pub id: c_int,
    pub rigid_body_count: c_int,
    pub rigid_bodies: *const NnRigidBody,
}

/// Frame view passed to the data callback. It and everything it points to
/// are valid only for the duration of the callback.
#[repr(C)]
pub struct NnFrame {
    pub frame_number: c_int,
    /// Latency in seconds.
    pub latency: f32,
    /// Server timestamp in seconds.
    pub timestamp: f64,
    pub rigid_body_count: c_int,
    pub rigid_bodies: *const NnRigidBody,
    pub marker_set_count: c_int,
    pub marker_sets: *const NnMarkerSet,
    pub skeleton_count: c_int,
    pub skeletons: *const NnSkeleton,
    pub labeled_marker_count: c_int,
    pub labeled_markers: *const NnLabeledMarker,
    /// Markers outside any marker set, as [x, y, z] triples.
    pub other_marker_count: c_int,
    pub other_markers: *const [f32; 3],
    /// SMPTE `hh:mm:ss:ff`, one byte each from the high byte down.
    pub timecode: c_uint,
    pub timecode_subframe: c_uint,
    /// Bit 0: recording. Bit 1: tracked models changed.
    pub flags: u16,
}

/// Rigid body description in C-compatible layout. `name` is owned by the
/// description list.
#[repr(C)]
pub struct NnRigidBodyDescription {
    pub name: *const c_char,
    pub id: c_int,
    pub parent_id: c_int,
    pub offset_x: f32,
    pub offset_y: f32,
    pub offset_z: f32,
}

pub type NnFrameCallback = unsafe extern "C" fn(frame: *const NnFrame, user: *mut c_void);

pub type NnMessageCallback =
    unsafe extern "C" fn(level: c_int, message: *const c_char, user: *mut c_void);

struct UserData(*mut c_void);

// The C caller owns `user` and vouches for its use from the delivery thread.
unsafe impl Send for UserData {}
unsafe impl Sync for UserData {}

impl UserData {
    fn get(&self) -> *mut c_void {
        self.0
    }
}

fn nn_rigid_body(body: &crate::RigidBody) -> NnRigidBody {
    NnRigidBody {
        id: body.id,
        x: body.x,
        y: body.y,
        z: body.z,
        qx: body.qx,
        qy: body.qy,
        qz: body.qz,
        qw: body.qw,
        mean_error: body.mean_error,
        tracking_valid: body.tracking_valid(),
    }
}

fn c_string(s: &str) -> CString {
    CString::new(s).unwrap_or_default()
}

/// Backing storage for an [`NnFrame`] built from a marshaled [`Frame`].
struct FrameView<'a> {
    frame: &'a Frame,
    rigid_bodies: Vec<NnRigidBody>,
    _marker_names: Vec<CString>,
    marker_sets: Vec<NnMarkerSet>,
    _skeleton_bodies: Vec<Vec<NnRigidBody>>,
    skeletons: Vec<NnSkeleton>,
    labeled_markers: Vec<NnLabeledMarker>,
}

impl<'a> FrameView<'a> {
    fn new(frame: &'a Frame) -> Self {
        let marker_names: Vec<CString> = frame.marker_sets.iter().map(|m| c_string(&m.name)).collect();
        let marker_sets = frame
            .marker_sets
            .iter()
            .zip(&marker_names)
            .map(|(set, name)| NnMarkerSet {
                name: name.as_ptr(),
                marker_count: set.markers.len() as c_int,
                markers: set.markers.as_ptr(),
            })
            .collect();

        let skeleton_bodies: Vec<Vec<NnRigidBody>> = frame
            .skeletons
            .iter()
            .map(|s| s.rigid_bodies.iter().map(nn_rigid_body).collect())
            .collect();
        let skeletons = frame
            .skeletons
            .iter()
            .zip(&skeleton_bodies)
            .map(|(skel, bodies)| NnSkeleton {
                id: skel.id,
                rigid_body_count: bodies.len() as c_int,
                rigid_bodies: bodies.as_ptr(),
            })
            .collect();

        FrameView {
            frame,
            rigid_bodies: frame.rigid_bodies.iter().map(nn_rigid_body).collect(),
            _marker_names: marker_names,
            marker_sets,
            _skeleton_bodies: skeleton_bodies,
            skeletons,
            labeled_markers: frame
                .labeled_markers
                .iter()
                .map(|m| NnLabeledMarker {
                    id: m.id,
                    x: m.x,
                    y: m.y,
                    z: m.z,
                    size: m.size,
                })
                .collect(),
        }
    }

    fn raw(&self) -> NnFrame {
        NnFrame {
            frame_number: self.frame.frame_number,
            latency: self.frame.latency,
            timestamp: self.frame.timestamp,
            rigid_body_count: self.rigid_bodies.len() as c_int,
            rigid_bodies: self.rigid_bodies.as_ptr(),
            marker_set_count: self.marker_sets.len() as c_int,
            marker_sets: self.marker_sets.as_ptr(),
            skeleton_count: self.skeletons.len() as c_int,
            skeletons: self.skeletons.as_ptr(),
            labeled_marker_count: self.labeled_markers.len() as c_int,
            labeled_markers: self.labeled_markers.as_ptr(),
            other_marker_count: self.frame.other_markers.len() as c_int,
            other_markers: self.frame.other_markers.as_ptr(),
            timecode: self.frame.timecode.packed(),
            timecode_subframe: self.frame.timecode.subframe,
            flags: self.frame.flags.bits(),
        }
    }
}

fn fail<T>(err: NatNetError, value: T) -> T {
    LAST_ERROR.with(|last| last.set(&err));
    value
}

unsafe fn arg_str<'a>(name: &'static str, ptr: *const c_char) -> Result<&'a str> {
    if ptr.is_null() {
        return Err(NatNetError::invalid(name, "null pointer"));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|e| NatNetError::invalid(name, e.to_string()))
}

fn arg_port(name: &'static str, port: c_int) -> Result<u16> {
    u16::try_from(port).map_err(|_| NatNetError::invalid(name, format!("{} out of range", port)))
}

unsafe fn endpoints(
    argc: c_int,
    local: *const c_char,
    server: *const c_char,
    command_port: c_int,
    data_port: c_int,
) -> Result<Endpoints> {
    if !(2..=4).contains(&argc) {
        return Err(NatNetError::ArgumentCount(argc.max(0) as usize));
    }
    let endpoints = Endpoints::new(arg_str("local", local)?, arg_str("server", server)?);
    Ok(match argc {
        2 => endpoints,
        3 => endpoints.with_command_port(arg_port("command_port", command_port)?),
        _ => endpoints.with_ports(
            arg_port("command_port", command_port)?,
            arg_port("data_port", data_port)?,
        ),
    })
}

fn create_client(connection_type: c_int) -> Result<NnClient> {
    let connection = ConnectionType::from_raw(connection_type).ok_or_else(|| {
        NatNetError::invalid("connection_type", format!("unknown value {}", connection_type))
    })?;
    let config = ClientConfig::from_env();
    let native: Box<dyn NativeClient> = Box::new(VendorClient::open(connection, &config)?);
    Ok(NnClient(Client::configured(native, &config)))
}

/// Load the NatNet library and create a client.
/// `connection_type`: 0 = multicast, 1 = unicast.
/// Returns NULL on error (check nn_last_error()).
#[no_mangle]
pub extern "C" fn nn_client_create(connection_type: c_int) -> *mut NnClient {
    match create_client(connection_type) {
        Ok(client) => Box::into_raw(Box::new(client)),
        Err(e) => fail(e, std::ptr::null_mut()),
    }
}

/// Destroy a client and free its resources.
///
/// # Safety
/// `client` must be a pointer returned by `nn_client_create`, or null.
#[no_mangle]
pub unsafe extern "C" fn nn_client_destroy(client: *mut NnClient) {
    if !client.is_null() {
        drop(Box::from_raw(client));
    }
}

/// Open the network session.
///
/// `argc` is the number of connection parameters supplied: 2 uses
/// `local` and `server` only, 3 adds `command_port`, 4 adds `data_port`.
/// Returns the vendor status (0 = success), or NN_BINDING_ERROR when the
/// arguments are invalid.
///
/// # Safety
/// `client` must be a valid client pointer, or null. `local` and `server`
/// must be null-terminated strings, or null.
#[no_mangle]
pub unsafe extern "C" fn nn_initialize(
    client: *mut NnClient,
    argc: c_int,
    local: *const c_char,
    server: *const c_char,
    command_port: c_int,
    data_port: c_int,
) -> c_int {
    if client.is_null() {
        return NN_BINDING_ERROR;
    }
    let client = &*client;
    let result = endpoints(argc, local, server, command_port, data_port)
        .and_then(|e| client.0.initialize(&e));
    match result {
        Ok(status) => status.code(),
        Err(e) => fail(e, NN_BINDING_ERROR),
    }
}

/// Close the network session. Returns the vendor status.
///
/// # Safety
/// `client` must be a valid client pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn nn_uninitialize(client: *mut NnClient) -> c_int {
    if client.is_null() {
        return NN_BINDING_ERROR;
    }
    (*client).0.uninitialize().code()
}

/// Write the negotiated NatNet version (major, minor, patch, build) to `out`.
/// Returns 0 on success, NN_BINDING_ERROR on a null argument.
///
/// # Safety
/// `client` must be a valid client pointer, or null. `out` must point to at
/// least 4 bytes, or be null.
#[no_mangle]
pub unsafe extern "C" fn nn_natnet_version(client: *const NnClient, out: *mut u8) -> c_int {
    if client.is_null() || out.is_null() {
        return NN_BINDING_ERROR;
    }
    let version: [u8; 4] = (*client).0.natnet_version().into();
    std::ptr::copy_nonoverlapping(version.as_ptr(), out, version.len());
    0
}

/// Forward a verbosity level (0 = none .. 4 = error) to the SDK.
///
/// # Safety
/// `client` must be a valid client pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn nn_set_verbosity_level(client: *const NnClient, level: c_int) {
    if !client.is_null() {
        (*client).0.set_verbosity_level_raw(level);
    }
}

/// Register the frame callback, replacing any earlier one. `callback` runs on
/// the SDK's delivery thread with a frame view valid only for that call.
/// Returns 0, or NN_BINDING_ERROR if `client` or `callback` is null.
///
/// # Safety
/// `client` must be a valid client pointer, or null. `user` is passed back
/// untouched and must remain usable from another thread.
#[no_mangle]
pub unsafe extern "C" fn nn_set_data_callback(
    client: *const NnClient,
    callback: Option<NnFrameCallback>,
    user: *mut c_void,
) -> c_int {
    if client.is_null() {
        return NN_BINDING_ERROR;
    }
    let Some(callback) = callback else {
        return fail(NatNetError::invalid("callback", "null pointer"), NN_BINDING_ERROR);
    };
    let user = UserData(user);
    (*client).0.set_data_callback(move |frame| {
        let view = FrameView::new(&frame);
        let nn_frame = view.raw();
        callback(&nn_frame, user.get());
    });
    0
}

/// Not implemented; the callback is never invoked.
///
/// # Safety
/// `client` must be a valid client pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn nn_set_message_callback(
    client: *const NnClient,
    _callback: Option<NnMessageCallback>,
    _user: *mut c_void,
) {
    if !client.is_null() {
        (*client).0.set_message_callback(|_, _| {});
    }
}

/// Not implemented; always returns NULL.
///
/// # Safety
/// `client` must be a valid client pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn nn_get_server_description(client: *const NnClient) -> *const c_void {
    if !client.is_null() {
        let _ = (*client).0.server_description();
    }
    std::ptr::null()
}

/// Fetch the server's rigid body and marker set descriptions.
/// Free the result with `nn_free_descriptions`. Returns NULL if `client` is null.
///
/// # Safety
/// `client` must be a valid client pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn nn_get_data_descriptions(client: *const NnClient) -> *mut NnDescriptionList {
    if client.is_null() {
        return std::ptr::null_mut();
    }
    let entries = (*client)
        .0
        .data_descriptions()
        .into_iter()
        .map(|d| match d {
            DataDescription::RigidBody(rb) => DescriptionEntry::RigidBody {
                name: c_string(&rb.name),
                id: rb.id,
                parent_id: rb.parent_id,
                offset: [rb.offset_x, rb.offset_y, rb.offset_z],
            },
            DataDescription::MarkerSet(ms) => DescriptionEntry::MarkerSet {
                name: c_string(&ms.name),
                marker_names: ms.marker_names.iter().map(|n| c_string(n)).collect(),
            },
        })
        .collect();
    Box::into_raw(Box::new(NnDescriptionList(entries)))
}

/// Free a description list.
///
/// # Safety
/// `list` must be a pointer returned by `nn_get_data_descriptions`, or null.
#[no_mangle]
pub unsafe extern "C" fn nn_free_descriptions(list: *mut NnDescriptionList) {
    if !list.is_null() {
        drop(Box::from_raw(list));
    }
}

unsafe fn entry<'a>(list: *const NnDescriptionList, index: c_int) -> Option<&'a DescriptionEntry> {
    if list.is_null() || index < 0 {
        return None;
    }
    (&(*list).0).get(index as usize)
}

/// Number of descriptions in the list.
///
/// # Safety
/// `list` must be a valid description list pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn nn_description_count(list: *const NnDescriptionList) -> c_int {
    if list.is_null() {
        return 0;
    }
    (*list).0.len() as c_int
}

/// Kind of description `index`: 0 = marker set, 1 = rigid body, -1 = out of range.
///
/// # Safety
/// `list` must be a valid description list pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn nn_description_kind(list: *const NnDescriptionList, index: c_int) -> c_int {
    match entry(list, index) {
        Some(DescriptionEntry::MarkerSet { .. }) => sys::Descriptor_MarkerSet,
        Some(DescriptionEntry::RigidBody { .. }) => sys::Descriptor_RigidBody,
        None => -1,
    }
}

/// Copy rigid body description `index` into `out`. Returns 0, or -1 if the
/// entry is not a rigid body.
///
/// # Safety
/// `list` must be a valid description list pointer, or null. `out` must be
/// writable, or null.
#[no_mangle]
pub unsafe extern "C" fn nn_rigid_body_description(
    list: *const NnDescriptionList,
    index: c_int,
    out: *mut NnRigidBodyDescription,
) -> c_int {
    if out.is_null() {
        return NN_BINDING_ERROR;
    }
    match entry(list, index) {
        Some(DescriptionEntry::RigidBody {
            name,
            id,
            parent_id,
            offset,
        }) => {
            out.write(NnRigidBodyDescription {
                name: name.as_ptr(),
                id: *id,
                parent_id: *parent_id,
                offset_x: offset[0],
                offset_y: offset[1],
                offset_z: offset[2],
            });
            0
        }
        _ => NN_BINDING_ERROR,
    }
}

/// Name of marker set description `index`, or NULL if it is not a marker set.
///
/// # Safety
/// `list` must be a valid description list pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn nn_marker_set_name(list: *const NnDescriptionList, index: c_int) -> *const c_char {
    match entry(list, index) {
        Some(DescriptionEntry::MarkerSet { name, .. }) => name.as_ptr(),
        _ => std::ptr::null(),
    }
}

/// Number of marker names in marker set description `index`, or -1.
///
/// # Safety
/// `list` must be a valid description list pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn nn_marker_set_marker_count(list: *const NnDescriptionList, index: c_int) -> c_int {
    match entry(list, index) {
        Some(DescriptionEntry::MarkerSet { marker_names, .. }) => marker_names.len() as c_int,
        _ => NN_BINDING_ERROR,
    }
}

/// Name of marker `marker` in marker set description `index`, or NULL.
///
/// # Safety
/// `list` must be a valid description list pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn nn_marker_set_marker_name(
    list: *const NnDescriptionList,
    index: c_int,
    marker: c_int,
) -> *const c_char {
    match entry(list, index) {
        Some(DescriptionEntry::MarkerSet { marker_names, .. }) if marker >= 0 => marker_names
            .get(marker as usize)
            .map_or(std::ptr::null(), |n| n.as_ptr()),
        _ => std::ptr::null(),
    }
}

/// Get the last error message raised on the calling thread. Returns NULL if
/// no error. The returned pointer is valid until the next failing natnet call
/// on the same thread.
#[no_mangle]
pub extern "C" fn nn_last_error() -> *const c_char {
    LAST_ERROR.with(|last| last.as_ptr())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Call, MockClient, NativeDescriptions, NativeFrame};
    use std::sync::{Arc, Mutex};

    fn client() -> (Arc<MockClient>, *mut NnClient) {
        let mock = Arc::new(MockClient::new());
        let native: Box<dyn NativeClient> = Box::new(mock.clone());
        let client = NnClient(Client::with_native(native));
        (mock, Box::into_raw(Box::new(client)))
    }

    #[test]
    fn test_initialize_argc_routing() {
        let (mock, c) = client();
        let local = CString::new("127.0.0.1").unwrap();
        let server = CString::new("127.0.0.2").unwrap();

        unsafe {
            assert_eq!(nn_initialize(c, 2, local.as_ptr(), server.as_ptr(), 0, 0), 0);
            assert_eq!(nn_initialize(c, 3, local.as_ptr(), server.as_ptr(), 1510, 0), 0);
            assert_eq!(nn_initialize(c, 4, local.as_ptr(), server.as_ptr(), 1510, 1511), 0);
        }
        let calls = mock.calls();
        assert!(matches!(calls[0], Call::Initialize { .. }));
        assert!(matches!(calls[1], Call::InitializeCommandPort { command_port: 1510, .. }));
        assert!(matches!(
            calls[2],
            Call::InitializePorts { command_port: 1510, data_port: 1511, .. }
        ));

        unsafe {
            for argc in [0, 1, 5] {
                assert_eq!(
                    nn_initialize(c, argc, local.as_ptr(), server.as_ptr(), 1, 2),
                    NN_BINDING_ERROR
                );
            }
            assert!(!nn_last_error().is_null());
            assert_eq!(
                nn_initialize(c, 3, local.as_ptr(), server.as_ptr(), 70000, 0),
                NN_BINDING_ERROR
            );
            assert_eq!(nn_initialize(c, 2, std::ptr::null(), server.as_ptr(), 0, 0), NN_BINDING_ERROR);
        }
        assert_eq!(mock.calls().len(), 3);

        mock.set_status(2);
        unsafe {
            assert_eq!(nn_initialize(c, 2, local.as_ptr(), server.as_ptr(), 0, 0), 2);
            assert_eq!(nn_uninitialize(c), 2);
            nn_client_destroy(c);
        }
    }

    #[test]
    fn test_last_error_is_per_thread() {
        let (_mock, c) = client();
        let local = CString::new("127.0.0.1").unwrap();
        let server = CString::new("127.0.0.2").unwrap();

        let msg = unsafe {
            assert_eq!(
                nn_initialize(c, 1, local.as_ptr(), server.as_ptr(), 0, 0),
                NN_BINDING_ERROR
            );
            nn_last_error()
        };

        std::thread::spawn(|| {
            assert!(nn_last_error().is_null());
            assert!(nn_client_create(7).is_null());
            let other = unsafe { CStr::from_ptr(nn_last_error()) };
            assert!(other.to_str().unwrap().contains("connection_type"));
        })
        .join()
        .unwrap();

        assert_eq!(nn_last_error(), msg);
        assert_eq!(
            unsafe { CStr::from_ptr(msg) }.to_str().unwrap(),
            "initialize expects 2 to 4 connection arguments, got 1"
        );
        unsafe { nn_client_destroy(c) };
    }

    #[test]
    fn test_version_and_verbosity() {
        let (mock, c) = client();
        mock.set_version([2, 9, 0, 1]);
        let mut out = [0u8; 4];
        unsafe {
            assert_eq!(nn_natnet_version(c, out.as_mut_ptr()), 0);
            assert_eq!(nn_natnet_version(c, std::ptr::null_mut()), NN_BINDING_ERROR);
            nn_set_verbosity_level(c, 4);
            assert!(nn_get_server_description(c).is_null());
            nn_set_message_callback(c, None, std::ptr::null_mut());
            nn_client_destroy(c);
        }
        assert_eq!(out, [2, 9, 0, 1]);
        assert_eq!(mock.calls(), vec![Call::SetVerbosityLevel(4)]);
    }

    #[derive(Default)]
    struct Seen {
        frame_number: c_int,
        body_ids: Vec<c_int>,
        marker_sets: Vec<(String, Vec<[f32; 3]>)>,
        skeleton_bodies: Vec<(c_int, usize)>,
        labeled: Vec<(c_int, f32)>,
        other_markers: Vec<[f32; 3]>,
        timecode: (c_uint, c_uint),
        flags: u16,
    }

    unsafe extern "C" fn record_frame(frame: *const NnFrame, user: *mut c_void) {
        let frame = &*frame;
        let seen = &*(user as *const Mutex<Seen>);
        let mut seen = seen.lock().unwrap();
        seen.frame_number = frame.frame_number;
        seen.body_ids = std::slice::from_raw_parts(frame.rigid_bodies, frame.rigid_body_count as usize)
            .iter()
            .map(|b| b.id)
            .collect();
        for set in std::slice::from_raw_parts(frame.marker_sets, frame.marker_set_count as usize) {
            let name = CStr::from_ptr(set.name).to_string_lossy().into_owned();
            let markers = std::slice::from_raw_parts(set.markers, set.marker_count as usize).to_vec();
            seen.marker_sets.push((name, markers));
        }
        for skel in std::slice::from_raw_parts(frame.skeletons, frame.skeleton_count as usize) {
            seen.skeleton_bodies.push((skel.id, skel.rigid_body_count as usize));
        }
        seen.labeled = std::slice::from_raw_parts(frame.labeled_markers, frame.labeled_marker_count as usize)
            .iter()
            .map(|m| (m.id, m.size))
            .collect();
        seen.other_markers =
            std::slice::from_raw_parts(frame.other_markers, frame.other_marker_count as usize).to_vec();
        seen.timecode = (frame.timecode, frame.timecode_subframe);
        seen.flags = frame.flags;
    }

    #[test]
    fn test_data_callback_frame_view() {
        let (mock, c) = client();
        let seen = Box::new(Mutex::new(Seen::default()));
        let user = &*seen as *const Mutex<Seen> as *mut c_void;

        unsafe {
            assert_eq!(nn_set_data_callback(c, None, user), NN_BINDING_ERROR);
            assert_eq!(nn_set_data_callback(c, Some(record_frame), user), 0);
        }

        let mut native = NativeFrame::new(77);
        native
            .rigid_body(4, [0.0; 3], [0.0, 0.0, 0.0, 1.0])
            .rigid_body(8, [1.0; 3], [0.0, 0.0, 0.0, 1.0])
            .marker_set("empty", &[])
            .marker_set("pair", &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])
            .skeleton(2, &[(20, [0.0; 3]), (21, [0.0; 3]), (22, [0.0; 3])])
            .labeled_marker(30, [0.1, 0.2, 0.3], 0.012)
            .other_marker([9.0, 8.0, 7.0])
            .timecode(0x0102_0304, 5)
            .params(0x01);
        mock.deliver_from_thread(native).join().unwrap();

        {
            let seen = seen.lock().unwrap();
            assert_eq!(seen.frame_number, 77);
            assert_eq!(seen.body_ids, vec![4, 8]);
            assert_eq!(seen.marker_sets[0], ("empty".to_string(), vec![]));
            assert_eq!(
                seen.marker_sets[1],
                ("pair".to_string(), vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])
            );
            assert_eq!(seen.skeleton_bodies, vec![(2, 3)]);
            assert_eq!(seen.labeled, vec![(30, 0.012)]);
            assert_eq!(seen.other_markers, vec![[9.0, 8.0, 7.0]]);
            assert_eq!(seen.timecode, (0x0102_0304, 5));
            assert_eq!(seen.flags, 0x01);
        }
        unsafe { nn_client_destroy(c) };
    }

    #[test]
    fn test_description_list_accessors() {
        let (mock, c) = client();
        let mut descs = NativeDescriptions::new();
        descs
            .rigid_body("bat", 3, -1, [0.0, 0.5, 1.0])
            .skeleton("actor", 1)
            .marker_set("bat", &["tip", "grip"]);
        mock.set_descriptions(Some(descs));

        unsafe {
            let list = nn_get_data_descriptions(c);
            assert_eq!(nn_description_count(list), 2);
            assert_eq!(nn_description_kind(list, 0), sys::Descriptor_RigidBody);
            assert_eq!(nn_description_kind(list, 1), sys::Descriptor_MarkerSet);
            assert_eq!(nn_description_kind(list, 2), -1);

            let mut rb = std::mem::MaybeUninit::<NnRigidBodyDescription>::uninit();
            assert_eq!(nn_rigid_body_description(list, 0, rb.as_mut_ptr()), 0);
            let rb = rb.assume_init();
            assert_eq!(CStr::from_ptr(rb.name).to_str().unwrap(), "bat");
            assert_eq!((rb.id, rb.parent_id), (3, -1));
            assert_eq!([rb.offset_x, rb.offset_y, rb.offset_z], [0.0, 0.5, 1.0]);

            let mut other = std::mem::MaybeUninit::<NnRigidBodyDescription>::uninit();
            assert_eq!(nn_rigid_body_description(list, 1, other.as_mut_ptr()), NN_BINDING_ERROR);

            assert_eq!(CStr::from_ptr(nn_marker_set_name(list, 1)).to_str().unwrap(), "bat");
            assert!(nn_marker_set_name(list, 0).is_null());
            assert_eq!(nn_marker_set_marker_count(list, 1), 2);
            assert_eq!(
                CStr::from_ptr(nn_marker_set_marker_name(list, 1, 1)).to_str().unwrap(),
                "grip"
            );
            assert!(nn_marker_set_marker_name(list, 1, 2).is_null());

            nn_free_descriptions(list);
            nn_client_destroy(c);
        }
        assert_eq!(mock.descriptions_freed(), 1);
    }
}
