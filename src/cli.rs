use clap::Parser;
use config::{Config, Environment, File};
use engine::OptimizationSettings;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Searches multi-gameweek transfer strategies", long_about = None)]
pub struct Args {
    /// TOML file with run defaults
    #[arg(short, long, env = "FPLOPT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding players, predictions and transactions
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Suggestions file, appended to on every run
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory receiving one file per explored strategy
    #[arg(long)]
    pub leaf_dir: Option<PathBuf>,

    /// Explicit horizon, e.g. 12,13,14
    #[arg(long, alias = "weeks", value_delimiter = ',', conflicts_with = "weeks_ahead")]
    pub gameweeks: Option<Vec<u32>>,

    /// First gameweek of the horizon, used with --weeks-ahead
    #[arg(long, requires = "weeks_ahead")]
    pub start_gameweek: Option<u32>,

    #[arg(long, requires = "start_gameweek")]
    pub weeks_ahead: Option<u32>,

    #[arg(long)]
    pub season: Option<String>,

    /// Prediction tag to optimize against
    #[arg(long)]
    pub tag: Option<String>,

    #[arg(short, long)]
    pub workers: Option<usize>,

    #[arg(long)]
    pub num_iterations: Option<usize>,

    /// Free transfers going into the first gameweek (1 or 2)
    #[arg(long)]
    pub free_transfers: Option<u8>,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub wildcard: bool,

    #[arg(long)]
    pub free_hit: bool,

    #[arg(long)]
    pub triple_captain: bool,

    #[arg(long)]
    pub bench_boost: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub output: PathBuf,
    pub leaf_dir: PathBuf,
    pub optimization: OptimizationSettings,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            data_dir: PathBuf::from("data"),
            output: PathBuf::from("suggestions.json"),
            leaf_dir: PathBuf::from("strategies"),
            optimization: OptimizationSettings::default(),
        }
    }
}

impl RunConfig {
    /// Config file, then `FPLOPT_*` variables (nested keys joined by `__`),
    /// then command line flags.
    pub fn load(args: &Args) -> Result<RunConfig, config::ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = &args.config {
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("FPLOPT")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("optimization.gameweeks")
                .try_parsing(true),
        );

        let mut config: RunConfig = builder.build()?.try_deserialize()?;
        config.apply_args(args);

        Ok(config)
    }

    fn apply_args(&mut self, args: &Args) {
        if let Some(dir) = &args.data_dir {
            self.data_dir = dir.clone();
        }
        if let Some(output) = &args.output {
            self.output = output.clone();
        }
        if let Some(dir) = &args.leaf_dir {
            self.leaf_dir = dir.clone();
        }

        let settings = &mut self.optimization;

        if let Some(gameweeks) = &args.gameweeks {
            settings.gameweeks = gameweeks.clone();
        }
        if let (Some(start), Some(ahead)) = (args.start_gameweek, args.weeks_ahead) {
            settings.gameweeks = (start..start + ahead).collect();
        }
        if let Some(season) = &args.season {
            settings.season = season.clone();
        }
        if let Some(tag) = &args.tag {
            settings.tag = tag.clone();
        }
        if let Some(workers) = args.workers {
            settings.workers = workers;
        }
        if let Some(iterations) = args.num_iterations {
            settings.num_iterations = iterations;
        }
        if args.free_transfers.is_some() {
            settings.free_transfers = args.free_transfers;
        }
        if let Some(seed) = args.seed {
            settings.seed = seed;
        }

        settings.chips.wildcard |= args.wildcard;
        settings.chips.free_hit |= args.free_hit;
        settings.chips.triple_captain |= args.triple_captain;
        settings.chips.bench_boost |= args.bench_boost;
    }
}
