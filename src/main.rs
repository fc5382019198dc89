// src/main.rs
// Entry point for the wall follower: loads configuration, connects to ROS 2
// and runs the decision loop until Ctrl+C.
//
// Usage: wall_follower [config.yaml]

use log::info;
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use wall_follower::{
    MonotonicClock, WallFollower, WallFollowerConfig, ros_interface::RosInterface,
};

fn main() -> Result<(), Box<dyn Error>> {
    // RUST_LOG controls verbosity
    env_logger::init();
    info!("Starting wall follower...");

    let config = match std::env::args().nth(1) {
        Some(path) => WallFollowerConfig::from_file(path)?,
        None => {
            info!("No configuration file given, using defaults");
            WallFollowerConfig::default()
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = running.clone();
    ctrlc::set_handler(move || {
        handler_flag.store(false, Ordering::SeqCst);
    })?;

    let (mut feed, publisher) = RosInterface::connect(&config.ros)?;
    let mut follower = WallFollower::new(&config, publisher, MonotonicClock::new())?;

    follower.run(&mut feed, &running);

    info!("Wall follower exited");
    Ok(())
}
