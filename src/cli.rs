//! Command-line arguments for the headless runner.

use std::path::PathBuf;

use clap::Parser;

use crate::settings::{IntensityChangePolicy, Settings};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "groovy-surf")]
#[command(about = "Headless surfing simulation: swell, rider physics and trick scoring", long_about = None)]
pub struct Args {
    /// Number of 60 Hz frames to simulate
    #[arg(long, value_name = "FRAMES", default_value = "3600")]
    pub frames: u64,

    /// Simulated host frame rate; fixed 60 Hz frames are paced from it
    #[arg(long, value_name = "FPS", default_value = "60")]
    pub fps: f32,

    /// Wave intensity (0.0 - 1.0); overrides the settings file
    #[arg(long, value_name = "INTENSITY")]
    pub intensity: Option<f32>,

    /// Session seed (random if omitted)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// JSON settings file
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Score policy on intensity change: keep, reset
    #[arg(long, value_name = "POLICY")]
    pub on_intensity_change: Option<String>,

    /// Let the autopilot ride (otherwise the rider idles)
    #[arg(long)]
    pub autopilot: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Settings from file (or defaults) with command-line overrides applied
    pub fn resolve_settings(&self) -> Settings {
        let mut settings = match &self.settings {
            Some(path) => Settings::load(path),
            None => Settings::default(),
        };

        if let Some(intensity) = self.intensity {
            settings.wave_intensity = intensity;
        }
        if let Some(policy) = &self.on_intensity_change {
            match IntensityChangePolicy::from_str(policy) {
                Some(policy) => settings.intensity_change = policy,
                None => log::warn!(
                    "Unknown intensity policy '{}', keeping {}",
                    policy,
                    settings.intensity_change.as_str()
                ),
            }
        }

        settings.validate();
        settings
    }
}
