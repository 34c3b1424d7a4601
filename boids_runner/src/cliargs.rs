use clap_serde_derive::{
    clap::{self, Parser},
    serde::Serialize,
    ClapSerde,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Headless boids flocking run: seeds a population, drives fixed ticks and records positions.
pub struct Args {
    /// Config file (.toml, .json, anything else is read as YAML)
    #[arg(short, long = "config", default_value = "config.toml")]
    pub config_path: std::path::PathBuf,

    /// Rest of arguments
    #[command(flatten)]
    pub config: <Config as ClapSerde>::Opt,
}

#[derive(ClapSerde, Serialize)]
/// Programatic configuration
///
/// Uses defaults, which can be overwritten by specifying a filepath for the `-c` or `--config` arg option
pub struct Config {
    #[default(512)]
    #[arg(short = 'n', long)]
    /// number of agents
    pub no_agents: usize,

    #[default(600)]
    #[arg(short = 't', long)]
    /// number of physics ticks to run
    pub ticks: u64,

    #[default(0.016)]
    #[arg(long = "dt")]
    /// seconds per tick
    pub delta_time: f32,

    #[default(0)]
    #[arg(long)]
    /// population seed, 0 draws one from the OS
    pub seed: u64,

    #[default(false)]
    #[arg(long = "ring")]
    /// start on a ring heading inwards instead of uniformly scattered
    pub ring_start: bool,

    #[default(4)]
    #[arg(short = 'r', long)]
    /// ratio of ticks/samples, e.g. 4 = sample every 4th tick
    pub sample_rate: u64,

    #[default(true)]
    #[arg(short = 's', long)]
    pub save: bool,

    #[default(false)]
    #[arg(long = "timestamp")]
    pub save_timestamp: bool,

    #[default("./".to_owned())]
    #[arg(short = 'o', long)]
    /// directory the CSV lands in
    pub output: String,

    #[default(100.)]
    #[arg(long = "area")]
    pub area_size: f32,

    #[default(10.)]
    #[arg(long = "sight")]
    pub sight_distance: f32,
    #[default(2.)]
    #[arg(long = "avoid")]
    pub avoidance_distance: f32,

    #[default(1.)]
    #[arg(long = "coh_coef")]
    pub cohesion_factor: f32,
    #[default(4.)]
    #[arg(long = "sep_coef")]
    pub separation_factor: f32,
    #[default(0.5)]
    #[arg(long = "ali_coef")]
    pub alignment_factor: f32,
    #[default(1.)]
    #[arg(long = "sep_falloff")]
    /// exponent k of the 1/d^k separation weighting
    pub separation_falloff: f32,

    #[default(10.)]
    #[arg(long = "border_sight")]
    pub border_sight_distance: f32,
    #[default(20.)]
    #[arg(long = "border_coef")]
    pub border_avoidance_factor: f32,
    #[default(false)]
    #[arg(long)]
    /// wrap around the area instead of clamping at the walls
    pub toroidal: bool,

    #[default(2.)]
    #[arg(long = "min_speed")]
    pub minimum_velocity: f32,
    #[default(10.)]
    #[arg(long = "max_speed")]
    pub maximum_velocity: f32,
}
