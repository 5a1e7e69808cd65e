use std::env;

use heatzy_pilote::{HeatzyClient, Mode};

#[tokio::main]
async fn main() -> heatzy_pilote::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let usage = "usage: set_mode <device_id> <username> <password> <off|heat|eco|program>";
    let device_id = args.get(1).expect(usage);
    let username = args.get(2).expect(usage);
    let password = args.get(3).expect(usage);
    let mode = match args.get(4).expect(usage).as_str() {
        "off" => Mode::Off,
        "heat" => Mode::Heat,
        "eco" => Mode::Eco,
        "program" => Mode::Program,
        other => panic!("unknown mode: {other}"),
    };

    let mut client = HeatzyClient::builder(device_id, username, password).build();
    let applied = client.set_target_mode(mode).await?;
    println!("target mode set to {applied}");

    let confirmed = client.target_mode().await?;
    println!("device reports target {confirmed}");
    Ok(())
}
