use std::{
    fs, io,
    path::Path,
    time::Instant,
};

use anyhow::{Context, Result};
use boids_kernel::{
    options::{Boundary, InitiationStrategy, SaveOptions, SimulationOptions},
    run_headless,
};
use clap_serde_derive::{clap::Parser, ClapSerde};
use tracing::info;

mod cliargs;
use cliargs::{Args, Config};

fn main() -> Result<()> {
    init_tracing();

    let mut args = Args::parse();
    let config = load_config(&mut args)?;
    let options = build_options(&config);

    info!(
        agents = options.init_agents,
        ticks = config.ticks,
        delta_time = config.delta_time,
        "starting run"
    );

    let started = Instant::now();
    let run = run_headless(config.ticks, config.delta_time, options).context("run failed")?;
    let elapsed = started.elapsed();

    let summary = run.summary;
    info!(
        ticks = run.ticks,
        elapsed_ms = elapsed.as_millis() as u64,
        samples = run.samples.len(),
        mean_speed = summary.mean_speed,
        min_speed = summary.min_speed,
        max_speed = summary.max_speed,
        centroid_x = summary.centroid.x,
        centroid_y = summary.centroid.y,
        "run finished"
    );

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Merges the config file (when there is one) with what clap parsed, CLI winning.
fn load_config(args: &mut Args) -> Result<Config> {
    let contents = match fs::read_to_string(&args.config_path) {
        Ok(contents) => Some(contents),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err)
                .with_context(|| format!("can't read {}", args.config_path.display()))
        }
    };

    let config = match contents {
        Some(contents) => {
            let file_config = parse_config_file(&args.config_path, &contents)?;
            Config::from(file_config).merge(&mut args.config)
        }
        None => Config::from(&mut args.config),
    };

    Ok(config)
}

fn parse_config_file(path: &Path, contents: &str) -> Result<<Config as ClapSerde>::Opt> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();

    let parsed: Result<<Config as ClapSerde>::Opt> = match extension {
        "toml" => toml::from_str(contents).map_err(anyhow::Error::from),
        "json" => serde_json::from_str(contents).map_err(anyhow::Error::from),
        _ => serde_yaml::from_str(contents).map_err(anyhow::Error::from),
    };

    parsed.with_context(|| format!("error in configuration file {}", path.display()))
}

fn build_options(config: &Config) -> SimulationOptions {
    SimulationOptions {
        init_agents: config.no_agents,
        initiation_strat: if config.ring_start {
            InitiationStrategy::CircleCircumferenceIn
        } else {
            InitiationStrategy::RandomRandom
        },
        seed: (config.seed != 0).then_some(config.seed),
        avoidance_distance: config.avoidance_distance,
        sight_distance: config.sight_distance,
        cohesion_factor: config.cohesion_factor,
        separation_factor: config.separation_factor,
        alignment_factor: config.alignment_factor,
        separation_falloff: config.separation_falloff,
        area_size: config.area_size,
        border_sight_distance: config.border_sight_distance,
        border_avoidance_factor: config.border_avoidance_factor,
        boundary: if config.toroidal {
            Boundary::Toroidal
        } else {
            Boundary::Clamp
        },
        maximum_velocity: config.maximum_velocity,
        minimum_velocity: config.minimum_velocity,
        sample_rate: config.sample_rate,
        save_options: SaveOptions {
            save_locations: config.save,
            save_locations_path: Some(config.output.clone()),
            save_locations_timestamp: config.save_timestamp,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use boids_kernel::options::{Boundary, InitiationStrategy, SimulationOptions};

    use super::{build_options, parse_config_file, Config};

    #[test]
    fn yaml_file_over_defaults() {
        let yaml = "no_agents: 64\narea_size: 250.0\ntoroidal: true\n";
        let opt = parse_config_file(Path::new("run.yaml"), yaml).unwrap();

        let options = build_options(&Config::from(opt));

        assert_eq!(options.init_agents, 64);
        assert_eq!(options.area_size, 250.);
        assert_eq!(options.boundary, Boundary::Toroidal);
        assert_eq!(options.initiation_strat, InitiationStrategy::RandomRandom);
        assert_eq!(
            options.sight_distance,
            SimulationOptions::default().sight_distance
        );
        assert_eq!(options.validate(), Ok(()));
    }

    #[test]
    fn toml_and_json_files() {
        let toml = "ticks = 10\nseed = 42\nring_start = true\n";
        let opt = parse_config_file(Path::new("run.toml"), toml).unwrap();
        let config = Config::from(opt);
        let options = build_options(&config);

        assert_eq!(config.ticks, 10);
        assert_eq!(options.seed, Some(42));
        assert_eq!(
            options.initiation_strat,
            InitiationStrategy::CircleCircumferenceIn
        );

        let json = r#"{"maximum_velocity": 7.5, "save": false}"#;
        let opt = parse_config_file(Path::new("run.json"), json).unwrap();

        assert_eq!(build_options(&Config::from(opt)).maximum_velocity, 7.5);
    }

    #[test]
    fn broken_file_is_reported() {
        let res = parse_config_file(Path::new("run.toml"), "ticks = [");

        assert!(res.is_err());
    }
}
