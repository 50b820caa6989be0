//! Native data layouts of the NatNet 2.x client SDK (`NatNetTypes.h`).
//!
//! These mirror the vendor headers field for field so that frame and
//! description pointers handed out by the SDK can be read in place. All
//! memory behind them is owned by the SDK.

#![allow(non_camel_case_types, non_snake_case, non_upper_case_globals)]

use std::ffi::{c_char, c_int, c_short, c_uint, c_void};

pub const MAX_MODELS: usize = 200;
pub const MAX_NAMELENGTH: usize = 256;
pub const MAX_RIGIDBODIES: usize = 1000;
pub const MAX_SKELETONS: usize = 100;
pub const MAX_SKELRIGIDBODIES: usize = 200;
pub const MAX_LABELED_MARKERS: usize = 1000;
pub const MAX_FORCEPLATES: usize = 8;
pub const MAX_ANALOG_CHANNELS: usize = 32;
pub const MAX_ANALOG_SUBFRAMES: usize = 30;

// -- Data descriptor kinds --
pub const Descriptor_MarkerSet: c_int = 0;
pub const Descriptor_RigidBody: c_int = 1;
pub const Descriptor_Skeleton: c_int = 2;
pub const Descriptor_ForcePlate: c_int = 3;

pub type MarkerData = [f32; 3];

/// Per-frame delivery callback installed with `SetDataCallback`.
pub type FrameHandler = unsafe extern "C" fn(data: *const sFrameOfMocapData, user: *mut c_void);

#[repr(C)]
#[derive(Clone, Copy)]
pub struct sMarker {
    pub ID: c_int,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub size: f32,
    pub params: c_short,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct sMarkerSetData {
    pub szName: [c_char; MAX_NAMELENGTH],
    pub nMarkers: c_int,
    pub Markers: *mut MarkerData,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct sRigidBodyData {
    pub ID: c_int,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
    pub nMarkers: c_int,
    pub Markers: *mut MarkerData,
    pub MarkerIDs: *mut c_int,
    pub MarkerSizes: *mut f32,
    pub MeanError: f32,
    pub params: c_short,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct sSkeletonData {
    pub skeletonID: c_int,
    pub nRigidBodies: c_int,
    pub RigidBodyData: *mut sRigidBodyData,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct sAnalogChannelData {
    pub nFrames: c_int,
    pub Values: [f32; MAX_ANALOG_SUBFRAMES],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct sForcePlateData {
    pub ID: c_int,
    pub nChannels: c_int,
    pub ChannelData: [sAnalogChannelData; MAX_ANALOG_CHANNELS],
    pub params: c_short,
}

/// One frame of mocap data as delivered to the data callback.
#[repr(C)]
pub struct sFrameOfMocapData {
    pub iFrame: c_int,
    pub nMarkerSets: c_int,
    pub MocapData: [sMarkerSetData; MAX_MODELS],
    pub nOtherMarkers: c_int,
    pub OtherMarkers: *mut MarkerData,
    pub nRigidBodies: c_int,
    pub RigidBodies: [sRigidBodyData; MAX_RIGIDBODIES],
    pub nSkeletons: c_int,
    pub Skeletons: [sSkeletonData; MAX_SKELETONS],
    pub nLabeledMarkers: c_int,
    pub LabeledMarkers: [sMarker; MAX_LABELED_MARKERS],
    pub nForcePlates: c_int,
    pub ForcePlates: [sForcePlateData; MAX_FORCEPLATES],
    pub fLatency: f32,
    pub Timecode: c_uint,
    pub TimecodeSubframe: c_uint,
    pub fTimestamp: f64,
    pub params: c_short,
}

#[repr(C)]
pub struct sMarkerSetDescription {
    pub szName: [c_char; MAX_NAMELENGTH],
    pub nMarkers: c_int,
    pub szMarkerNames: *mut *mut c_char,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct sRigidBodyDescription {
    pub szName: [c_char; MAX_NAMELENGTH],
    pub ID: c_int,
    pub parentID: c_int,
    pub offsetx: f32,
    pub offsety: f32,
    pub offsetz: f32,
}

#[repr(C)]
pub struct sSkeletonDescription {
    pub szName: [c_char; MAX_NAMELENGTH],
    pub skeletonID: c_int,
    pub nRigidBodies: c_int,
    pub RigidBodies: [sRigidBodyDescription; MAX_SKELRIGIDBODIES],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub union sDataDescriptionData {
    pub MarkerSetDescription: *mut sMarkerSetDescription,
    pub RigidBodyDescription: *mut sRigidBodyDescription,
    pub SkeletonDescription: *mut sSkeletonDescription,
    pub ForcePlateDescription: *mut c_void,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct sDataDescription {
    pub type_: c_int,
    pub Data: sDataDescriptionData,
}

#[repr(C)]
pub struct sDataDescriptions {
    pub nDataDescriptions: c_int,
    pub arrDataDescriptions: [sDataDescription; MAX_MODELS],
}
