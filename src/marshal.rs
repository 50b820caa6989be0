//! Conversion of vendor-owned native records into owned Rust values.
//!
//! Every function here deep-copies: nothing returned borrows from the SDK's
//! buffers, which are only valid for the duration of the callback or
//! accessor call that produced them. Vendor count fields bound every read.

use crate::sys;
use crate::types::{
    DataDescription, Frame, FrameFlags, LabeledMarker, MarkerSet, MarkerSetDescription,
    RigidBody, RigidBodyDescription, RigidBodyFlags, Skeleton, Timecode,
};
use std::ffi::{c_char, c_int, CStr};

/// Marshal one native frame.
///
/// # Safety
/// All pointers reachable from `native` must be valid for the counts the
/// record declares.
pub unsafe fn frame(native: &sys::sFrameOfMocapData) -> Frame {
    let bodies = rigid_bodies(inline(&native.RigidBodies, native.nRigidBodies, "rigid bodies"));

    let marker_sets = inline(&native.MocapData, native.nMarkerSets, "marker sets")
        .iter()
        .map(|set| MarkerSet {
            name: fixed_name(&set.szName),
            markers: raw(set.Markers, set.nMarkers).to_vec(),
        })
        .collect();

    let skeletons = inline(&native.Skeletons, native.nSkeletons, "skeletons")
        .iter()
        .map(|skel| Skeleton {
            id: skel.skeletonID,
            rigid_bodies: rigid_bodies(raw(skel.RigidBodyData, skel.nRigidBodies)),
        })
        .collect();

    let labeled_markers = inline(&native.LabeledMarkers, native.nLabeledMarkers, "labeled markers")
        .iter()
        .map(|m| LabeledMarker {
            id: m.ID,
            x: m.x,
            y: m.y,
            z: m.z,
            size: m.size,
        })
        .collect();

    Frame {
        frame_number: native.iFrame,
        rigid_bodies: bodies,
        marker_sets,
        skeletons,
        labeled_markers,
        other_markers: raw(native.OtherMarkers, native.nOtherMarkers).to_vec(),
        latency: native.fLatency,
        timecode: Timecode::decode(native.Timecode, native.TimecodeSubframe),
        timestamp: native.fTimestamp,
        flags: FrameFlags::from_bits_truncate(native.params as u16),
    }
}

fn rigid_bodies(bodies: &[sys::sRigidBodyData]) -> Vec<RigidBody> {
    bodies.iter().map(rigid_body).collect()
}

fn rigid_body(body: &sys::sRigidBodyData) -> RigidBody {
    RigidBody {
        id: body.ID,
        x: body.x,
        y: body.y,
        z: body.z,
        qx: body.qx,
        qy: body.qy,
        qz: body.qz,
        qw: body.qw,
        mean_error: body.MeanError,
        flags: RigidBodyFlags::from_bits_truncate(body.params as u16),
    }
}

/// Marshal a native description list. Skeleton, force plate and unknown
/// descriptor kinds are skipped.
///
/// # Safety
/// Every description pointer within `nDataDescriptions` must be valid, and
/// marker name arrays must hold `nMarkers` entries.
pub unsafe fn descriptions(native: &sys::sDataDescriptions) -> Vec<DataDescription> {
    let mut out = Vec::new();

    for desc in inline(&native.arrDataDescriptions, native.nDataDescriptions, "descriptions") {
        match desc.type_ {
            sys::Descriptor_RigidBody => {
                let Some(rb) = desc.Data.RigidBodyDescription.as_ref() else {
                    log::warn!("Null rigid body description skipped");
                    continue;
                };
                out.push(DataDescription::RigidBody(RigidBodyDescription {
                    name: fixed_name(&rb.szName),
                    id: rb.ID,
                    parent_id: rb.parentID,
                    offset_x: rb.offsetx,
                    offset_y: rb.offsety,
                    offset_z: rb.offsetz,
                }));
            }
            sys::Descriptor_MarkerSet => {
                let Some(ms) = desc.Data.MarkerSetDescription.as_ref() else {
                    log::warn!("Null marker set description skipped");
                    continue;
                };
                let marker_names = raw(ms.szMarkerNames as *const *mut c_char, ms.nMarkers)
                    .iter()
                    .map(|&name| c_string(name))
                    .collect();
                out.push(DataDescription::MarkerSet(MarkerSetDescription {
                    name: fixed_name(&ms.szName),
                    marker_names,
                }));
            }
            sys::Descriptor_Skeleton => {
                log::debug!("Skeleton description not supported, skipping");
            }
            other => {
                log::debug!("Skipping data description of type {}", other);
            }
        }
    }

    out
}

/// First `count` entries of an inline fixed-capacity array.
fn inline<'a, T>(array: &'a [T], count: c_int, what: &str) -> &'a [T] {
    let count = count.max(0) as usize;
    if count > array.len() {
        log::warn!(
            "Native frame reports {} {}, capacity is {}; clamping",
            count,
            what,
            array.len()
        );
    }
    &array[..count.min(array.len())]
}

/// View a vendor pointer/count pair. Null or non-positive counts are empty.
unsafe fn raw<'a, T>(ptr: *const T, count: c_int) -> &'a [T] {
    if ptr.is_null() || count <= 0 {
        return &[];
    }
    std::slice::from_raw_parts(ptr, count as usize)
}

fn fixed_name(buf: &[c_char]) -> String {
    let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    let bytes: Vec<u8> = buf[..end].iter().map(|&c| c as u8).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

unsafe fn c_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{NativeDescriptions, NativeFrame};

    #[test]
    fn test_single_rigid_body_frame() {
        let mut native = NativeFrame::new(42);
        native
            .latency(0.016)
            .rigid_body(3, [1.0, 2.0, 3.0], [0.0, 0.0, 0.0, 1.0]);

        let frame = unsafe { frame(native.as_native()) };

        assert_eq!(frame.frame_number, 42);
        assert_eq!(frame.latency, 0.016);
        assert_eq!(frame.rigid_bodies.len(), 1);
        let body = &frame.rigid_bodies[0];
        assert_eq!(body.id, 3);
        assert_eq!(body.position(), [1.0, 2.0, 3.0]);
        assert_eq!(body.orientation(), [0.0, 0.0, 0.0, 1.0]);
        assert!(frame.marker_sets.is_empty());
        assert!(frame.skeletons.is_empty());
    }

    #[test]
    fn test_counts_and_order_preserved() {
        let mut native = NativeFrame::new(7);
        native
            .rigid_body(9, [0.1, 0.2, 0.3], [0.5, 0.5, 0.5, 0.5])
            .rigid_body(2, [-1.0, 0.0, 1.0], [0.0, 1.0, 0.0, 0.0])
            .rigid_body(5, [1e-7, 3.402_823e38, -0.0], [0.0, 0.0, 0.0, 1.0])
            .marker_set("wand", &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])
            .marker_set("all", &[[7.5, 8.25, 9.125]])
            .skeleton(1, &[(10, [1.0, 1.0, 1.0]), (11, [2.0, 2.0, 2.0])]);

        let frame = unsafe { frame(native.as_native()) };

        let ids: Vec<i32> = frame.rigid_bodies.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![9, 2, 5]);
        assert_eq!(frame.rigid_bodies[2].x, 1e-7);
        assert_eq!(frame.rigid_bodies[2].y, 3.402_823e38);

        assert_eq!(frame.marker_sets.len(), 2);
        assert_eq!(frame.marker_sets[0].name, "wand");
        assert_eq!(frame.marker_sets[0].markers, vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(frame.marker_set("all").unwrap().markers, vec![[7.5, 8.25, 9.125]]);

        assert_eq!(frame.skeletons.len(), 1);
        assert_eq!(frame.skeletons[0].id, 1);
        let skel_ids: Vec<i32> = frame.skeletons[0].rigid_bodies.iter().map(|b| b.id).collect();
        assert_eq!(skel_ids, vec![10, 11]);
        assert_eq!(frame.skeletons[0].rigid_bodies[1].position(), [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_empty_marker_set_is_kept() {
        let mut native = NativeFrame::new(1);
        native.marker_set("empty", &[]).marker_set("one", &[[0.0, 0.0, 1.0]]);

        let frame = unsafe { frame(native.as_native()) };

        assert_eq!(frame.marker_sets.len(), 2);
        assert_eq!(frame.marker_sets[0].name, "empty");
        assert!(frame.marker_sets[0].markers.is_empty());
    }

    #[test]
    fn test_supplementary_fields() {
        let mut native = NativeFrame::new(100);
        native
            .rigid_body(1, [0.0; 3], [0.0, 0.0, 0.0, 1.0])
            .labeled_marker(4, [0.5, 0.25, 0.125], 0.014)
            .other_marker([3.0, 2.0, 1.0])
            .timecode(0x0A0B_0C0D, 3)
            .timestamp(12.5)
            .params(0x02);
        native.as_native_mut().RigidBodies[0].params = 0x01;
        native.as_native_mut().RigidBodies[0].MeanError = 0.0005;

        let frame = unsafe { frame(native.as_native()) };

        assert!(frame.rigid_bodies[0].tracking_valid());
        assert_eq!(frame.rigid_bodies[0].mean_error, 0.0005);
        assert_eq!(
            frame.labeled_markers,
            vec![LabeledMarker { id: 4, x: 0.5, y: 0.25, z: 0.125, size: 0.014 }]
        );
        assert_eq!(frame.other_markers, vec![[3.0, 2.0, 1.0]]);
        assert_eq!(frame.timecode.to_string(), "10:11:12:13.3");
        assert_eq!(frame.timestamp, 12.5);
        assert_eq!(frame.flags, FrameFlags::TRACKED_MODELS_CHANGED);
    }

    #[test]
    fn test_counts_are_clamped_and_nulls_are_empty() {
        let mut native = NativeFrame::new(1);
        {
            let raw = native.as_native_mut();
            raw.nRigidBodies = (sys::MAX_RIGIDBODIES + 5) as c_int;
            raw.nSkeletons = -3;
            raw.nMarkerSets = 1;
            raw.MocapData[0].nMarkers = 12;
            raw.MocapData[0].Markers = std::ptr::null_mut();
        }

        let frame = unsafe { frame(native.as_native()) };

        assert_eq!(frame.rigid_bodies.len(), sys::MAX_RIGIDBODIES);
        assert!(frame.skeletons.is_empty());
        assert_eq!(frame.marker_sets.len(), 1);
        assert!(frame.marker_sets[0].markers.is_empty());
    }

    #[test]
    fn test_descriptions_skip_skeletons() {
        let mut native = NativeDescriptions::new();
        native
            .rigid_body("head", 1, -1, [0.0, 0.1, 0.0])
            .skeleton("actor", 2)
            .marker_set("head", &["head_1", "head_2", "head_3"])
            .rigid_body("hand", 3, 1, [0.5, 0.0, -0.5]);

        let descs = unsafe { descriptions(native.as_native()) };

        assert_eq!(descs.len(), 3);
        assert_eq!(
            descs[0],
            DataDescription::RigidBody(RigidBodyDescription {
                name: "head".into(),
                id: 1,
                parent_id: -1,
                offset_x: 0.0,
                offset_y: 0.1,
                offset_z: 0.0,
            })
        );
        assert_eq!(
            descs[1],
            DataDescription::MarkerSet(MarkerSetDescription {
                name: "head".into(),
                marker_names: vec!["head_1".into(), "head_2".into(), "head_3".into()],
            })
        );
        assert_eq!(descs[2].name(), "hand");
    }

    #[test]
    fn test_descriptions_skip_unsupported_and_null_entries() {
        let mut native = NativeDescriptions::new();
        native
            .rigid_body("a", 1, -1, [0.0; 3])
            .marker_set("m", &["m1"])
            .raw_entry(
                sys::Descriptor_ForcePlate,
                sys::sDataDescriptionData {
                    ForcePlateDescription: std::ptr::null_mut(),
                },
            )
            .raw_entry(
                99,
                sys::sDataDescriptionData {
                    RigidBodyDescription: std::ptr::null_mut(),
                },
            )
            .raw_entry(
                sys::Descriptor_RigidBody,
                sys::sDataDescriptionData {
                    RigidBodyDescription: std::ptr::null_mut(),
                },
            )
            .raw_entry(
                sys::Descriptor_MarkerSet,
                sys::sDataDescriptionData {
                    MarkerSetDescription: std::ptr::null_mut(),
                },
            )
            .rigid_body("b", 2, 1, [0.0; 3]);

        let descs = unsafe { descriptions(native.as_native()) };

        let names: Vec<&str> = descs.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["a", "m", "b"]);
        assert!(matches!(descs[1], DataDescription::MarkerSet(_)));
        assert!(matches!(&descs[2], DataDescription::RigidBody(rb) if rb.id == 2));
    }

    #[test]
    fn test_fixed_name_stops_at_nul() {
        let mut buf = [0 as c_char; 8];
        for (i, b) in b"abc".iter().enumerate() {
            buf[i] = *b as c_char;
        }
        buf[4] = b'z' as c_char;
        assert_eq!(fixed_name(&buf), "abc");
    }
}
