use std::env;

use heatzy_pilote::{HeatzyClient, Thermostat};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let usage = "usage: monitor <device_id> <username> <password>";
    let device_id = args.get(1).expect(usage);
    let username = args.get(2).expect(usage);
    let password = args.get(3).expect(usage);

    let client = HeatzyClient::builder(device_id, username, password)
        .on_event(|event| {
            println!("{event:?}");
        })
        .build();
    let mut thermostat = Thermostat::new(client);

    println!(
        "Polling {device_id} every {:?}...",
        thermostat.poll_interval()
    );

    let mut ticker = tokio::time::interval(thermostat.poll_interval());
    loop {
        ticker.tick().await;
        thermostat.refresh().await;
        if let Some(mode) = thermostat.client().last_current_mode() {
            println!(
                "current: {mode} | target: {} | {}\u{00b0}",
                thermostat
                    .client()
                    .last_target_mode()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
                thermostat.current_temperature(),
            );
        }
    }
}
