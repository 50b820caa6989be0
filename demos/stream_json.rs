//! Stream rigid body poses as JSON lines, one object per rigid body per frame:
//!
//! {"frame":1234,"id":3,"x":0.021,"y":0.002,"z":0.028,"qx":0,"qy":0,"qz":0,"qw":1,"latency":0.004}
//!
//! Usage: cargo run --release --example stream_json -- <local_ip> <server_ip> [ports...]

use natnet::{Client, ConnectionType, Endpoints, NatNetError};
use std::io::{self, Write};
use std::time::Duration;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let endpoints = match Endpoints::from_args(&args) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let client = match Client::new(ConnectionType::Multicast) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            std::process::exit(1);
        }
    };

    match client.initialize(&endpoints) {
        Ok(status) if status.is_success() => {}
        Ok(status) => {
            eprintln!("Failed to connect: {}", status);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    }

    eprintln!("NatNet:   {}", client.natnet_version());
    eprintln!("Streaming JSON (Ctrl+C to stop)...");

    let stream = client.frame_stream();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut idle_timeouts: u32 = 0;

    loop {
        match stream.recv_timeout(Duration::from_secs(2)) {
            Ok(frame) => {
                idle_timeouts = 0;
                for b in &frame.rigid_bodies {
                    let _ = writeln!(
                        out,
                        "{{\"frame\":{},\"id\":{},\"x\":{:.4},\"y\":{:.4},\"z\":{:.4},\"qx\":{:.4},\"qy\":{:.4},\"qz\":{:.4},\"qw\":{:.4},\"latency\":{:.4}}}",
                        frame.frame_number,
                        b.id,
                        b.x,
                        b.y,
                        b.z,
                        b.qx,
                        b.qy,
                        b.qz,
                        b.qw,
                        frame.latency,
                    );
                }
                let _ = out.flush();
            }
            Err(NatNetError::Timeout) => {
                idle_timeouts += 1;
                eprintln!("No frame for 2s (timeout #{})", idle_timeouts);
                if idle_timeouts >= 15 {
                    eprintln!("Stopping after 30s without frames");
                    break;
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    client.uninitialize();
}
