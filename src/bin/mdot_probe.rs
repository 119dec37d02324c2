//! Probe an mDot: open the port from a driver profile, check the AT
//! channel and print the device identification.
//!
//!   RUST_LOG=loradot_lib=debug mdot-probe profile.json
//!   mdot-probe --list

use std::path::PathBuf;
use std::process::ExitCode;

use loradot_lib::adapters::serial_port::SerialPortFactory;
use loradot_lib::domain::{DriverConfig, Outcome};
use loradot_lib::ports::TransportFactory;
use loradot_lib::{Mdot, MdotResult};

fn main() -> ExitCode {
    env_logger::init();

    let Some(arg) = std::env::args().nth(1) else {
        eprintln!("usage: mdot-probe <profile.json> | --list");
        return ExitCode::from(2);
    };

    let result = if arg == "--list" {
        list_ports()
    } else {
        probe(PathBuf::from(arg))
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn list_ports() -> MdotResult<()> {
    for port in SerialPortFactory::list_ports()? {
        println!("{}\t{}", port.name, port.port_type);
    }
    Ok(())
}

fn probe(path: PathBuf) -> MdotResult<()> {
    let config = DriverConfig::load(&path)?;
    log::info!("Probing with profile '{}'", config.name);
    let mut mdot = Mdot::open::<SerialPortFactory>(&config)?;

    match mdot.attention()? {
        Outcome::Complete(_) => println!("AT: OK"),
        other => {
            println!("AT: {}", other.status().message());
            return Ok(());
        }
    }

    match mdot.request_id()? {
        Some(id) => println!("{id}"),
        None => println!("ATI: {}", mdot.last_command_status_message()),
    }
    if let Some(eui) = mdot.device_id()? {
        println!("Device EUI: {eui}");
    }
    Ok(())
}
