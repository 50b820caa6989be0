//! In-memory stand-in for the vendor SDK.
//!
//! [`NativeFrame`] and [`NativeDescriptions`] build the same native records
//! the SDK hands out, and [`MockClient`] implements [`NativeClient`] by
//! recording calls and invoking the registered frame handler on demand.

use crate::native::NativeClient;
use crate::sys;
use std::alloc::{alloc_zeroed, handle_alloc_error, Layout};
use std::ffi::{c_char, c_int, c_short, c_void, CStr, CString};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

/// Heap-allocate an all-zero `T` without staging it on the stack.
///
/// Only used for the `sys` records, where zero is a valid value for every
/// field (integers, floats, null pointers).
fn zeroed_box<T>() -> Box<T> {
    let layout = Layout::new::<T>();
    unsafe {
        let ptr = alloc_zeroed(layout) as *mut T;
        if ptr.is_null() {
            handle_alloc_error(layout);
        }
        Box::from_raw(ptr)
    }
}

fn write_name(buf: &mut [c_char; sys::MAX_NAMELENGTH], name: &str) {
    let len = name.len().min(sys::MAX_NAMELENGTH - 1);
    for (dst, &b) in buf.iter_mut().zip(&name.as_bytes()[..len]) {
        *dst = b as c_char;
    }
    buf[len] = 0;
}

fn native_rigid_body(id: i32, position: [f32; 3], orientation: [f32; 4]) -> sys::sRigidBodyData {
    sys::sRigidBodyData {
        ID: id,
        x: position[0],
        y: position[1],
        z: position[2],
        qx: orientation[0],
        qy: orientation[1],
        qz: orientation[2],
        qw: orientation[3],
        nMarkers: 0,
        Markers: std::ptr::null_mut(),
        MarkerIDs: std::ptr::null_mut(),
        MarkerSizes: std::ptr::null_mut(),
        MeanError: 0.0,
        params: 0,
    }
}

/// A native `sFrameOfMocapData` together with the arrays it points into.
pub struct NativeFrame {
    raw: Box<sys::sFrameOfMocapData>,
    _markers: Vec<Box<[sys::MarkerData]>>,
    _skeleton_bodies: Vec<Box<[sys::sRigidBodyData]>>,
    other_markers: Vec<sys::MarkerData>,
}

// Owns every buffer its pointers refer to.
unsafe impl Send for NativeFrame {}

impl NativeFrame {
    pub fn new(frame_number: i32) -> Self {
        let mut raw = zeroed_box::<sys::sFrameOfMocapData>();
        raw.iFrame = frame_number;
        NativeFrame {
            raw,
            _markers: Vec::new(),
            _skeleton_bodies: Vec::new(),
            other_markers: Vec::new(),
        }
    }

    pub fn latency(&mut self, latency: f32) -> &mut Self {
        self.raw.fLatency = latency;
        self
    }

    pub fn timecode(&mut self, timecode: u32, subframe: u32) -> &mut Self {
        self.raw.Timecode = timecode;
        self.raw.TimecodeSubframe = subframe;
        self
    }

    pub fn timestamp(&mut self, timestamp: f64) -> &mut Self {
        self.raw.fTimestamp = timestamp;
        self
    }

    pub fn params(&mut self, params: c_short) -> &mut Self {
        self.raw.params = params;
        self
    }

    pub fn rigid_body(&mut self, id: i32, position: [f32; 3], orientation: [f32; 4]) -> &mut Self {
        let n = self.raw.nRigidBodies as usize;
        assert!(n < sys::MAX_RIGIDBODIES, "too many rigid bodies");
        self.raw.RigidBodies[n] = native_rigid_body(id, position, orientation);
        self.raw.nRigidBodies += 1;
        self
    }

    pub fn marker_set(&mut self, name: &str, markers: &[[f32; 3]]) -> &mut Self {
        let n = self.raw.nMarkerSets as usize;
        assert!(n < sys::MAX_MODELS, "too many marker sets");
        let mut storage: Box<[sys::MarkerData]> = markers.into();
        let set = &mut self.raw.MocapData[n];
        write_name(&mut set.szName, name);
        set.nMarkers = storage.len() as c_int;
        set.Markers = if storage.is_empty() {
            std::ptr::null_mut()
        } else {
            storage.as_mut_ptr()
        };
        self._markers.push(storage);
        self.raw.nMarkerSets += 1;
        self
    }

    /// Add a skeleton whose bodies carry an identity orientation.
    pub fn skeleton(&mut self, id: i32, bodies: &[(i32, [f32; 3])]) -> &mut Self {
        let n = self.raw.nSkeletons as usize;
        assert!(n < sys::MAX_SKELETONS, "too many skeletons");
        let mut storage: Box<[sys::sRigidBodyData]> = bodies
            .iter()
            .map(|&(body_id, position)| native_rigid_body(body_id, position, [0.0, 0.0, 0.0, 1.0]))
            .collect();
        let skel = &mut self.raw.Skeletons[n];
        skel.skeletonID = id;
        skel.nRigidBodies = storage.len() as c_int;
        skel.RigidBodyData = storage.as_mut_ptr();
        self._skeleton_bodies.push(storage);
        self.raw.nSkeletons += 1;
        self
    }

    pub fn labeled_marker(&mut self, id: i32, position: [f32; 3], size: f32) -> &mut Self {
        let n = self.raw.nLabeledMarkers as usize;
        assert!(n < sys::MAX_LABELED_MARKERS, "too many labeled markers");
        self.raw.LabeledMarkers[n] = sys::sMarker {
            ID: id,
            x: position[0],
            y: position[1],
            z: position[2],
            size,
            params: 0,
        };
        self.raw.nLabeledMarkers += 1;
        self
    }

    pub fn other_marker(&mut self, position: [f32; 3]) -> &mut Self {
        self.other_markers.push(position);
        self.raw.nOtherMarkers = self.other_markers.len() as c_int;
        self.raw.OtherMarkers = self.other_markers.as_mut_ptr();
        self
    }

    pub fn as_native(&self) -> &sys::sFrameOfMocapData {
        &self.raw
    }

    /// Direct access for shaping records the builder methods don't cover.
    pub fn as_native_mut(&mut self) -> &mut sys::sFrameOfMocapData {
        &mut self.raw
    }
}

struct MarkerNames {
    _names: Vec<CString>,
    _ptrs: Vec<*mut c_char>,
}

/// A native `sDataDescriptions` list together with the records it points to.
pub struct NativeDescriptions {
    raw: Box<sys::sDataDescriptions>,
    _rigid_bodies: Vec<Box<sys::sRigidBodyDescription>>,
    _marker_sets: Vec<(Box<sys::sMarkerSetDescription>, MarkerNames)>,
    _skeletons: Vec<Box<sys::sSkeletonDescription>>,
}

unsafe impl Send for NativeDescriptions {}

impl Default for NativeDescriptions {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeDescriptions {
    pub fn new() -> Self {
        NativeDescriptions {
            raw: zeroed_box(),
            _rigid_bodies: Vec::new(),
            _marker_sets: Vec::new(),
            _skeletons: Vec::new(),
        }
    }

    fn push(&mut self, type_: c_int, data: sys::sDataDescriptionData) {
        let n = self.raw.nDataDescriptions as usize;
        assert!(n < sys::MAX_MODELS, "too many data descriptions");
        self.raw.arrDataDescriptions[n] = sys::sDataDescription { type_, Data: data };
        self.raw.nDataDescriptions += 1;
    }

    pub fn rigid_body(&mut self, name: &str, id: i32, parent_id: i32, offset: [f32; 3]) -> &mut Self {
        let mut desc = zeroed_box::<sys::sRigidBodyDescription>();
        write_name(&mut desc.szName, name);
        desc.ID = id;
        desc.parentID = parent_id;
        desc.offsetx = offset[0];
        desc.offsety = offset[1];
        desc.offsetz = offset[2];
        let ptr: *mut sys::sRigidBodyDescription = &mut *desc;
        self._rigid_bodies.push(desc);
        self.push(
            sys::Descriptor_RigidBody,
            sys::sDataDescriptionData {
                RigidBodyDescription: ptr,
            },
        );
        self
    }

    pub fn marker_set(&mut self, name: &str, marker_names: &[&str]) -> &mut Self {
        let names: Vec<CString> = marker_names
            .iter()
            .map(|n| CString::new(*n).expect("marker name contains NUL"))
            .collect();
        let mut ptrs: Vec<*mut c_char> = names.iter().map(|n| n.as_ptr() as *mut c_char).collect();

        let mut desc = zeroed_box::<sys::sMarkerSetDescription>();
        write_name(&mut desc.szName, name);
        desc.nMarkers = ptrs.len() as c_int;
        desc.szMarkerNames = ptrs.as_mut_ptr();
        let ptr: *mut sys::sMarkerSetDescription = &mut *desc;
        self._marker_sets.push((desc, MarkerNames { _names: names, _ptrs: ptrs }));
        self.push(
            sys::Descriptor_MarkerSet,
            sys::sDataDescriptionData {
                MarkerSetDescription: ptr,
            },
        );
        self
    }

    pub fn skeleton(&mut self, name: &str, id: i32) -> &mut Self {
        let mut desc = zeroed_box::<sys::sSkeletonDescription>();
        write_name(&mut desc.szName, name);
        desc.skeletonID = id;
        let ptr: *mut sys::sSkeletonDescription = &mut *desc;
        self._skeletons.push(desc);
        self.push(
            sys::Descriptor_Skeleton,
            sys::sDataDescriptionData {
                SkeletonDescription: ptr,
            },
        );
        self
    }

    /// Append an entry as-is, for descriptor kinds or pointers the typed
    /// builders never produce.
    pub fn raw_entry(&mut self, type_: c_int, data: sys::sDataDescriptionData) -> &mut Self {
        self.push(type_, data);
        self
    }

    pub fn as_native(&self) -> &sys::sDataDescriptions {
        &self.raw
    }

    fn as_ptr(&mut self) -> *mut sys::sDataDescriptions {
        &mut *self.raw
    }
}

/// A call received by [`MockClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Initialize {
        local: String,
        server: String,
    },
    InitializeCommandPort {
        local: String,
        server: String,
        command_port: i32,
    },
    InitializePorts {
        local: String,
        server: String,
        command_port: i32,
        data_port: i32,
    },
    Uninitialize,
    SetVerbosityLevel(i32),
}

#[derive(Clone, Copy)]
struct Handler {
    func: sys::FrameHandler,
    user: *mut c_void,
}

// `user` is the Dispatch pointer, which is Sync.
unsafe impl Send for Handler {}

struct MockState {
    calls: Vec<Call>,
    status: c_int,
    version: [u8; 4],
    handler: Option<Handler>,
    descriptions: Option<NativeDescriptions>,
    descriptions_freed: usize,
}

pub struct MockClient {
    state: Mutex<MockState>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClient {
    pub fn new() -> Self {
        MockClient {
            state: Mutex::new(MockState {
                calls: Vec::new(),
                status: 0,
                version: [2, 10, 0, 0],
                handler: None,
                descriptions: None,
                descriptions_freed: 0,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Status returned by initialize and uninitialize.
    pub fn set_status(&self, status: c_int) {
        self.state().status = status;
    }

    pub fn set_version(&self, version: [u8; 4]) {
        self.state().version = version;
    }

    /// Descriptions returned by the next `data_descriptions` calls; `None`
    /// makes the query return null.
    pub fn set_descriptions(&self, descriptions: Option<NativeDescriptions>) {
        self.state().descriptions = descriptions;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn descriptions_freed(&self) -> usize {
        self.state().descriptions_freed
    }

    pub fn has_data_callback(&self) -> bool {
        self.state().handler.is_some()
    }

    /// Run the registered frame handler on the calling thread.
    pub fn deliver(&self, frame: &NativeFrame) {
        let handler = self.state().handler;
        if let Some(h) = handler {
            unsafe { (h.func)(frame.as_native(), h.user) };
        }
    }

    /// Run the registered frame handler on a fresh thread, like the SDK's
    /// delivery thread.
    pub fn deliver_from_thread(&self, frame: NativeFrame) -> JoinHandle<()> {
        let handler = self.state().handler;
        std::thread::Builder::new()
            .name("natnet-mock-delivery".into())
            .spawn(move || {
                if let Some(h) = handler {
                    unsafe { (h.func)(frame.as_native(), h.user) };
                }
            })
            .expect("failed to spawn delivery thread")
    }

    fn record(&self, call: Call) -> c_int {
        let mut state = self.state();
        state.calls.push(call);
        state.status
    }
}

fn lossy(s: &CStr) -> String {
    s.to_string_lossy().into_owned()
}

impl NativeClient for MockClient {
    fn initialize(&self, local: &CStr, server: &CStr) -> c_int {
        self.record(Call::Initialize {
            local: lossy(local),
            server: lossy(server),
        })
    }

    fn initialize_with_command_port(
        &self,
        local: &CStr,
        server: &CStr,
        command_port: c_int,
    ) -> c_int {
        self.record(Call::InitializeCommandPort {
            local: lossy(local),
            server: lossy(server),
            command_port,
        })
    }

    fn initialize_with_ports(
        &self,
        local: &CStr,
        server: &CStr,
        command_port: c_int,
        data_port: c_int,
    ) -> c_int {
        self.record(Call::InitializePorts {
            local: lossy(local),
            server: lossy(server),
            command_port,
            data_port,
        })
    }

    fn uninitialize(&self) -> c_int {
        self.record(Call::Uninitialize)
    }

    fn natnet_version(&self) -> [u8; 4] {
        self.state().version
    }

    fn data_descriptions(&self) -> *mut sys::sDataDescriptions {
        match self.state().descriptions.as_mut() {
            Some(d) => d.as_ptr(),
            None => std::ptr::null_mut(),
        }
    }

    unsafe fn free_data_descriptions(&self, _descriptions: *mut sys::sDataDescriptions) {
        self.state().descriptions_freed += 1;
    }

    fn set_verbosity_level(&self, level: c_int) {
        self.state().calls.push(Call::SetVerbosityLevel(level));
    }

    unsafe fn set_data_callback(&self, handler: sys::FrameHandler, user: *mut c_void) {
        self.state().handler = Some(Handler {
            func: handler,
            user,
        });
    }
}
