//! # natnet - Rust binding for the NatNet motion capture client SDK
//!
//! Wraps the vendor NatNet client library, loaded at runtime. Provides:
//! - Session setup against a tracking server over multicast or unicast
//! - Per-frame delivery of rigid bodies, marker sets and skeletons as owned values
//! - Rigid body and marker set data descriptions
//! - C FFI for integration with C/C++/Unity
//!
//! ## Quick Start
//! ```no_run
//! use natnet::{Client, ConnectionType, Endpoints};
//! use std::time::Duration;
//!
//! let client = Client::new(ConnectionType::Multicast).unwrap();
//! let status = client.initialize(&Endpoints::new("127.0.0.1", "127.0.0.1")).unwrap();
//! assert!(status.is_success());
//!
//! let frames = client.frame_stream();
//! for _ in 0..100 {
//!     let frame = frames.recv_timeout(Duration::from_secs(1)).unwrap();
//!     for body in &frame.rigid_bodies {
//!         println!("{}: {:?}", body.id, body.position());
//!     }
//! }
//! ```

pub mod error;
pub mod types;
pub mod sys;
pub mod config;
pub mod native;
pub mod library;
pub mod marshal;
mod dispatch;
pub mod stream;
pub mod client;
pub mod ffi;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::NatNetError;
pub use types::*;
pub use config::ClientConfig;
pub use native::NativeClient;
pub use library::{VendorClient, VendorLibrary};
pub use stream::FrameStream;
pub use client::{Client, Endpoints, Ports};

/// Result type alias for natnet operations.
pub type Result<T> = std::result::Result<T, NatNetError>;
