use std::error::Error;
use std::process::ExitCode;

use serde_json::Map;
use vzm35_zigbee::transport::mock::MockTransport;
use vzm35_zigbee::wire::Cluster;
use vzm35_zigbee::{IncomingMessage, ParameterService, ReportDecoder, StateDelta};

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .try_init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let transport = MockTransport::new().with_attribute(Cluster::Inovelli, 257, 0);
    let mut service = ParameterService::new(transport)?;
    let mut state = Map::new();

    service.configure()?;

    let ack = service.set("outputMode", "Fan Controller")?;
    StateDelta::single("outputMode", ack).merge_into(&mut state);
    let ack = service.set("maximumLevel", 254)?;
    StateDelta::single("maximumLevel", ack).merge_into(&mut state);
    let protection = service.get("remoteProtection")?;
    StateDelta::single("remoteProtection", protection).merge_into(&mut state);

    service.set_fan_mode("high")?.merge_into(&mut state);
    println!("fan mode read back: {}", service.get_fan_mode()?);

    let led = service.set_led_effect("Slow Blink", 170, 80, 10)?;
    println!("led effect payload: {:02x?}", led.payload());

    let decoder = ReportDecoder::default();
    let mut published = Vec::new();
    let up_double = IncomingMessage::Raw {
        endpoint: 2,
        cluster: Cluster::Inovelli,
        data: vec![0x05, 0x2F, 0x12, 0x2A, 0x00, 0x02, 0x03],
    };
    decoder.dispatch(&up_double, &mut published);
    for delta in published {
        delta.merge_into(&mut state);
    }

    println!("state: {}", serde_json::to_string_pretty(&state)?);
    println!("requests issued: {}", service.transport().requests().len());
    Ok(())
}
