//! Print a summary of an OctoPrint instance: version, connection, job and files.
//!
//! Run with:
//! OCTOPRINT_URL=http://octopi.local OCTOPRINT_API_KEY=... cargo run --example print_status

use anyhow::Context;
use octoprint_client::resources::files::Location;
use octoprint_client::{OctoPrintClient, OctoPrintError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let client = OctoPrintClient::from_env().context("set OCTOPRINT_URL and OCTOPRINT_API_KEY")?;

    let version = client.server().version().await?;
    println!("OctoPrint Print Status");
    println!("======================\n");
    println!("Server: {} (API {})", version.server, version.api);

    let connection = client.connection().get().await?;
    println!(
        "Connection: {} on {}",
        connection.current.state,
        connection.current.port.as_deref().unwrap_or("-")
    );

    let job = client.job().get().await?;
    match job.job.file.display_name() {
        Some(name) => {
            let done = job.progress.completion.unwrap_or(0.0);
            let left = job.progress.print_time_left.unwrap_or(0.0) / 60.0;
            println!("Job: {} [{}] {:.1}% done, {:.0} min left", name, job.state, done, left);
        }
        None => println!("Job: no file selected [{}]", job.state),
    }

    match client.printer().state().await {
        Ok(printer) => {
            for (name, heater) in &printer.temperature.heaters {
                println!(
                    "  {}: {:.1} / {:.1} °C",
                    name,
                    heater.actual.unwrap_or_default(),
                    heater.target.unwrap_or_default()
                );
            }
        }
        Err(OctoPrintError::Conflict(_)) => println!("  printer not operational"),
        Err(e) => return Err(e.into()),
    }

    let files = client.files().list_location(Location::Local, true).await?;
    println!("\nPrintable files:");
    for file in files.iter_recursive().filter(|f| f.is_printable()) {
        println!("  {} ({} bytes)", file.path, file.size.unwrap_or(0));
    }

    Ok(())
}
