//! Stream NatNet frames to stdout.
//!
//! Usage: cargo run --example stream -- <local_ip> <server_ip> [command_port [data_port]]
//! Set NATNET_LIBRARY to the vendor library path if it is not on the loader path.
//! Press Ctrl+C to stop.

use natnet::{Client, ClientConfig, ConnectionType, Endpoints, NatNetError};
use std::time::{Duration, Instant};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let endpoints = match Endpoints::from_args(&args) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: stream <local_ip> <server_ip> [command_port [data_port]]");
            std::process::exit(2);
        }
    };

    let config = ClientConfig::from_env();
    let client = match Client::with_config(ConnectionType::Multicast, &config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            std::process::exit(1);
        }
    };

    match client.initialize(&endpoints) {
        Ok(status) if status.is_success() => {}
        Ok(status) => {
            eprintln!("Failed to connect to {}: {}", endpoints.server_address, status);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Invalid connection parameters: {}", e);
            std::process::exit(2);
        }
    }

    println!("NatNet:   {}", client.natnet_version());
    println!();

    let stream = client.frame_stream();

    println!("Streaming frames (Ctrl+C to stop)...");

    let start = Instant::now();
    let mut count: u64 = 0;
    let mut last_report = Instant::now();

    loop {
        match stream.recv_timeout(Duration::from_secs(2)) {
            Ok(frame) => {
                count += 1;

                // Print every ~100th frame to avoid flooding the terminal
                if count % 100 == 1 {
                    println!(
                        "frame={:<8} tc={} latency={:.4}s bodies={} sets={} skeletons={}",
                        frame.frame_number,
                        frame.timecode,
                        frame.latency,
                        frame.rigid_bodies.len(),
                        frame.marker_sets.len(),
                        frame.skeletons.len(),
                    );
                    for b in &frame.rigid_bodies {
                        println!(
                            "  id={:<4} pos=[{:+.4}, {:+.4}, {:+.4}]  quat=[{:+.3}, {:+.3}, {:+.3}, {:+.3}]",
                            b.id, b.x, b.y, b.z, b.qx, b.qy, b.qz, b.qw,
                        );
                    }
                }

                // Report rate every 3 seconds
                let now = Instant::now();
                if now.duration_since(last_report) >= Duration::from_secs(3) {
                    let elapsed = start.elapsed().as_secs_f64();
                    let hz = count as f64 / elapsed;
                    println!("--- {} frames in {:.1}s ({:.1} Hz) ---", count, elapsed, hz);
                    last_report = now;
                }
            }
            Err(NatNetError::Timeout) => {
                eprintln!("Timeout waiting for frames");
                break;
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    client.uninitialize();

    let elapsed = start.elapsed().as_secs_f64();
    println!(
        "\nTotal: {} frames in {:.1}s ({:.1} Hz)",
        count,
        elapsed,
        count as f64 / elapsed
    );
}
