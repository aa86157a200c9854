use anyhow::{bail, Context};
use clap::ArgMatches;
use ionseries_core::ion_series::MIN_INTENSITY_FRACTION;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resolved run parameters - config file values with CLI overrides and
/// defaults applied. Serialized to the output directory for reproducibility.
#[derive(Serialize, Debug, Clone)]
pub struct Search {
    pub version: String,
    pub mzid_paths: Vec<String>,
    pub output_directory: PathBuf,
    /// Intensity threshold fraction; the classifier clamps this from below
    pub intensity_fraction: f64,
    pub fallback_to_all: bool,
    pub threads: usize,
}

/// Raw parameters deserialized from the JSON configuration file.
#[derive(Deserialize, Default)]
pub struct Input {
    mzid_paths: Option<Vec<String>>,
    output_directory: Option<String>,
    /// Threshold in any of the accepted forms: "95.0", "95%", "0.95"
    intensity: Option<String>,
    fallback_to_all: Option<bool>,
    threads: Option<usize>,
}

impl Input {
    pub fn load<S: AsRef<str>>(path: S) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    pub fn from_arguments(matches: ArgMatches) -> anyhow::Result<Self> {
        let mut input = match matches.get_one::<String>("parameters") {
            Some(path) => Input::load(path)
                .with_context(|| format!("Failed to read parameters from `{}`", path))?,
            None => Input::default(),
        };

        if let Some(paths) = matches.get_many::<String>("mzid_paths") {
            input.mzid_paths = Some(paths.cloned().collect());
        }
        if let Some(dir) = matches.get_one::<String>("output_directory") {
            input.output_directory = Some(dir.clone());
        }
        if let Some(threshold) = matches.get_one::<String>("intensity") {
            input.intensity = Some(threshold.clone());
        }
        if matches.get_flag("fallback-to-all") {
            input.fallback_to_all = Some(true);
        }
        if let Some(threads) = matches.get_one::<u16>("threads") {
            input.threads = Some(*threads as usize);
        }

        Ok(input)
    }

    /// Validate everything eagerly - a bad threshold string must be
    /// rejected before any document is touched.
    pub fn build(self) -> anyhow::Result<Search> {
        let mzid_paths = self
            .mzid_paths
            .filter(|paths| !paths.is_empty())
            .context("no identification documents supplied (positional arguments or `mzid_paths` in the configuration file)")?;

        let intensity_fraction = match self.intensity.as_deref() {
            Some(threshold) => {
                let fraction = parse_intensity(threshold)?;
                log::info!("intensity threshold set to {}", fraction);
                fraction
            }
            None => {
                log::info!("intensity threshold set to base value of 5% (0.05)");
                MIN_INTENSITY_FRACTION
            }
        };

        Ok(Search {
            version: env!("CARGO_PKG_VERSION").into(),
            mzid_paths,
            output_directory: self
                .output_directory
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            intensity_fraction,
            fallback_to_all: self.fallback_to_all.unwrap_or(false),
            threads: self.threads.unwrap_or_else(num_cpus::get),
        })
    }
}

/// Parse an intensity threshold string into a fraction.
///
/// Values written with a leading zero ("0.95") are fractions; anything else
/// numeric ("95", "95.0", "95%") is a percentage. The `%` suffix is
/// optional in the percentage form.
pub fn parse_intensity(threshold: &str) -> anyhow::Result<f64> {
    let value = threshold.trim();
    let value = value.strip_suffix('%').unwrap_or(value).trim();
    let fraction = Regex::new(r"^0(\.\d+)?$").expect("valid regex");
    let percentage = Regex::new(r"^[1-9]\d*(\.\d+)?$").expect("valid regex");

    if fraction.is_match(value) {
        Ok(value.parse()?)
    } else if percentage.is_match(value) {
        Ok(value.parse::<f64>()? / 100.0)
    } else {
        bail!(
            "invalid intensity threshold `{}`: expected a number such as 95.0, 95% or 0.95",
            threshold
        )
    }
}
