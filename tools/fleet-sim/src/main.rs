//! Fleet-Sim: randomized telemetry producer for local testing.
//!
//! Publishes one reading per simulated car on every tick, using the same
//! wire payload the runtime ingests. Point it at any broker and watch the
//! dashboard fill up.

use anyhow::{Context, Result};
use clap::Parser;
use fleet_types::TelemetryPayload;
use rand::Rng;
use rumqttc::{AsyncClient, MqttOptions, QoS};
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Fleet-Sim: randomized telemetry producer
#[derive(Parser, Debug)]
#[command(name = "fleet-sim")]
#[command(about = "Publishes randomized vehicle telemetry to a broker")]
struct Args {
    /// Broker hostname
    #[arg(long, default_value = "broker.hivemq.com")]
    host: String,

    /// Broker port
    #[arg(long, default_value = "1883")]
    port: u16,

    /// Telemetry topic
    #[arg(long, default_value = "cars/data")]
    topic: String,

    /// Number of simulated cars
    #[arg(long, default_value = "10")]
    cars: usize,

    /// Seconds between publish rounds
    #[arg(long, default_value = "1")]
    interval: u64,
}

/// One randomized reading for the given car.
///
/// Speeds sit in the 60-120 band and engine temperatures in 80-120, so a
/// scorer trained on highway traffic sees plausible inputs.
fn random_reading(rng: &mut impl Rng, car: usize) -> TelemetryPayload {
    let engine_temp = rng.gen_range(80.0..120.0);
    TelemetryPayload {
        car_id: format!("car_{:02}", car),
        speed: rng.gen_range(60.0..120.0),
        engine_temp,
        speed_diff: rng.gen_range(-0.5..0.5),
        temp_normalized: (engine_temp - 80.0) / 40.0,
        timestamp: None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!(
        host = %args.host,
        port = args.port,
        topic = %args.topic,
        cars = args.cars,
        "Starting telemetry simulator"
    );

    let mut options = MqttOptions::new("fleet-sim", args.host, args.port);
    options.set_keep_alive(Duration::from_secs(30));
    let (client, mut eventloop) = AsyncClient::new(options, 64);

    // The event loop must be driven for publishes to go out.
    tokio::spawn(async move {
        loop {
            if let Err(e) = eventloop.poll().await {
                warn!(error = %e, "Broker connection lost, retrying");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    });

    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval.max(1)));
    let mut rng = rand::thread_rng();
    loop {
        ticker.tick().await;
        for car in 1..=args.cars {
            let reading = random_reading(&mut rng, car);
            let body = serde_json::to_vec(&reading).context("encode reading")?;
            debug!(car_id = %reading.car_id, speed = reading.speed, "Publishing reading");
            client
                .publish(&args.topic, QoS::AtMostOnce, false, body)
                .await
                .context("publish reading")?;
        }
    }
}
