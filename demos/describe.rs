//! Print the rigid body and marker set descriptions a server publishes.

use natnet::{Client, ConnectionType, DataDescription, Endpoints};

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
            eprintln!("Error: {}", e);
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

    let descriptions = client.data_descriptions();
    println!("Found {} description(s):", descriptions.len());
    for (i, desc) in descriptions.iter().enumerate() {
        match desc {
            DataDescription::RigidBody(rb) => println!(
                "  [{}] RigidBody {} id={} parent={} offset=[{:.4}, {:.4}, {:.4}]",
                i, rb.name, rb.id, rb.parent_id, rb.offset_x, rb.offset_y, rb.offset_z
            ),
            DataDescription::MarkerSet(ms) => println!(
                "  [{}] MarkerSet {} markers={}",
                i,
                ms.name,
                ms.marker_names.join(", ")
            ),
        }
    }

    client.uninitialize();
}
