use crate::NatNetError;
use std::fmt;
use std::str::FromStr;

/// Transport used between the client and the tracking server.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionType {
    Multicast = 0,
    Unicast = 1,
}

impl ConnectionType {
    pub fn from_raw(raw: i32) -> Option<ConnectionType> {
        match raw {
            0 => Some(ConnectionType::Multicast),
            1 => Some(ConnectionType::Unicast),
            _ => None,
        }
    }
}

/// Vendor SDK logging verbosity.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    None = 0,
    Debug = 1,
    Info = 2,
    Warning = 3,
    Error = 4,
}

/// Accepts a level name (`none`, `debug`, `info`, `warning`, `error`) or its
/// numeric value.
impl FromStr for Verbosity {
    type Err = NatNetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "0" => Ok(Verbosity::None),
            "debug" | "1" => Ok(Verbosity::Debug),
            "info" | "2" => Ok(Verbosity::Info),
            "warning" | "warn" | "3" => Ok(Verbosity::Warning),
            "error" | "4" => Ok(Verbosity::Error),
            _ => Err(NatNetError::invalid(
                "verbosity",
                format!("unknown level '{}'", s.trim()),
            )),
        }
    }
}

/// Integer status returned by the vendor SDK. Zero means success; any other
/// value is a vendor-defined failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(pub i32);

impl Status {
    pub const OK: Status = Status(0);

    pub fn is_success(self) -> bool {
        self.0 == 0
    }

    pub fn code(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            write!(f, "ok")
        } else {
            write!(f, "error code {}", self.0)
        }
    }
}

/// NatNet protocol version negotiated with the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
    pub build: u8,
}

impl From<[u8; 4]> for Version {
    fn from(v: [u8; 4]) -> Self {
        Version {
            major: v[0],
            minor: v[1],
            patch: v[2],
            build: v[3],
        }
    }
}

impl From<Version> for [u8; 4] {
    fn from(v: Version) -> Self {
        [v.major, v.minor, v.patch, v.build]
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.patch, self.build)
    }
}

bitflags::bitflags! {
    /// Per rigid body tracking flags (`sRigidBodyData::params`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RigidBodyFlags: u16 {
        const TRACKING_VALID = 1 << 0;
    }
}

bitflags::bitflags! {
    /// Per frame flags (`sFrameOfMocapData::params`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FrameFlags: u16 {
        const RECORDING              = 1 << 0;
        const TRACKED_MODELS_CHANGED = 1 << 1;
    }
}

/// 6DOF pose of one tracked rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RigidBody {
    pub id: i32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
    /// Mean marker error in meters.
    pub mean_error: f32,
    pub flags: RigidBodyFlags,
}

impl RigidBody {
    pub fn position(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Orientation as [qx, qy, qz, qw].
    pub fn orientation(&self) -> [f32; 4] {
        [self.qx, self.qy, self.qz, self.qw]
    }

    pub fn tracking_valid(&self) -> bool {
        self.flags.contains(RigidBodyFlags::TRACKING_VALID)
    }
}

/// Named group of unlabeled 3D points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkerSet {
    pub name: String,
    pub markers: Vec<[f32; 3]>,
}

/// Hierarchy of rigid bodies reported under one skeleton id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Skeleton {
    pub id: i32,
    pub rigid_bodies: Vec<RigidBody>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LabeledMarker {
    pub id: i32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub size: f32,
}

/// SMPTE timecode unpacked from the frame's packed representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timecode {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u8,
    pub subframe: u32,
}

impl Timecode {
    /// Unpack `hh:mm:ss:ff` stored one byte each, high to low.
    pub fn decode(timecode: u32, subframe: u32) -> Timecode {
        Timecode {
            hours: (timecode >> 24) as u8,
            minutes: (timecode >> 16) as u8,
            seconds: (timecode >> 8) as u8,
            frames: timecode as u8,
            subframe,
        }
    }

    /// Inverse of [`decode`](Self::decode), without the subframe.
    pub fn packed(&self) -> u32 {
        (self.hours as u32) << 24
            | (self.minutes as u32) << 16
            | (self.seconds as u32) << 8
            | self.frames as u32
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}.{}",
            self.hours, self.minutes, self.seconds, self.frames, self.subframe
        )
    }
}

/// One snapshot of everything the server is tracking.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub frame_number: i32,
    pub rigid_bodies: Vec<RigidBody>,
    pub marker_sets: Vec<MarkerSet>,
    pub skeletons: Vec<Skeleton>,
    pub labeled_markers: Vec<LabeledMarker>,
    /// Markers not belonging to any marker set.
    pub other_markers: Vec<[f32; 3]>,
    /// Server-side latency in seconds.
    pub latency: f32,
    pub timecode: Timecode,
    /// Server timestamp in seconds.
    pub timestamp: f64,
    pub flags: FrameFlags,
}

impl Frame {
    pub fn rigid_body(&self, id: i32) -> Option<&RigidBody> {
        self.rigid_bodies.iter().find(|b| b.id == id)
    }

    pub fn marker_set(&self, name: &str) -> Option<&MarkerSet> {
        self.marker_sets.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RigidBodyDescription {
    pub name: String,
    pub id: i32,
    pub parent_id: i32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub offset_z: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSetDescription {
    pub name: String,
    pub marker_names: Vec<String>,
}

/// Static asset metadata published by the server.
#[derive(Debug, Clone, PartialEq)]
pub enum DataDescription {
    RigidBody(RigidBodyDescription),
    MarkerSet(MarkerSetDescription),
}

impl DataDescription {
    pub fn name(&self) -> &str {
        match self {
            DataDescription::RigidBody(d) => &d.name,
            DataDescription::MarkerSet(d) => &d.name,
        }
    }
}

/// Server identity. Never produced: the server description query is not
/// implemented by this binding.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerDescription {
    pub host_name: String,
    pub host_app: String,
    pub host_app_version: Version,
    pub natnet_version: Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timecode_decode() {
        let tc = Timecode::decode(0x0102_0304, 7);
        assert_eq!(tc.hours, 1);
        assert_eq!(tc.minutes, 2);
        assert_eq!(tc.seconds, 3);
        assert_eq!(tc.frames, 4);
        assert_eq!(tc.subframe, 7);
        assert_eq!(tc.to_string(), "01:02:03:04.7");
        assert_eq!(tc.packed(), 0x0102_0304);
    }

    #[test]
    fn test_verbosity_parse() {
        assert_eq!("Warning".parse::<Verbosity>().unwrap(), Verbosity::Warning);
        assert_eq!(" 1 ".parse::<Verbosity>().unwrap(), Verbosity::Debug);
        assert_eq!("none".parse::<Verbosity>().unwrap(), Verbosity::None);
        assert!(matches!(
            "loud".parse::<Verbosity>(),
            Err(NatNetError::InvalidArgument { name: "verbosity", .. })
        ));
    }

    #[test]
    fn test_version_components() {
        let v = Version::from([2, 10, 0, 255]);
        assert_eq!(v.to_string(), "2.10.0.255");
        assert_eq!(<[u8; 4]>::from(v), [2, 10, 0, 255]);
    }

    #[test]
    fn test_connection_type_from_raw() {
        assert_eq!(ConnectionType::from_raw(0), Some(ConnectionType::Multicast));
        assert_eq!(ConnectionType::from_raw(1), Some(ConnectionType::Unicast));
        assert_eq!(ConnectionType::from_raw(7), None);
    }
}
