//! Output device listing.

use hypersaw_io::{default_output_device, list_output_devices};

pub fn run() -> anyhow::Result<()> {
    let devices = list_output_devices()?;
    if devices.is_empty() {
        println!("No output devices found.");
        return Ok(());
    }

    let default_name = default_output_device().map(|d| d.name);
    println!("Output Devices:");
    for device in &devices {
        let marker = if default_name.as_deref() == Some(device.name.as_str()) {
            " (default)"
        } else {
            ""
        };
        println!(
            "  [{}] {} ({} Hz, {} ch){}",
            device.index, device.name, device.default_sample_rate, device.channels, marker
        );
    }
    println!();
    println!("Tip: pass an index or partial name to play --device");
    Ok(())
}
