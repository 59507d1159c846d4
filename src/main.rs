use orbital_launch::*;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = LaunchConfig::from_env()?;
    info!(
        "Launching to {:.0} km, heading {:.0}",
        config.target_altitude / 1000.0,
        config.heading
    );

    let vessel = SimulatedVessel::from_config(&config);
    let mut autopilot = Autopilot::new(vessel, ConsolePanel::new(), config);

    if let Err(e) = autopilot.run() {
        error!("Flight aborted in {:?}: {}", autopilot.phase(), e);
        autopilot.telemetry().display_data();
        return Err(e.into());
    }

    let vessel = autopilot.vessel_mut();
    info!(
        "Final orbit: apoapsis {:.1} km, periapsis {:.1} km",
        vessel.apoapsis_altitude()? / 1000.0,
        vessel.periapsis_altitude()? / 1000.0
    );
    Ok(())
}
