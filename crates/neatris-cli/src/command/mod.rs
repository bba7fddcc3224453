use std::path::PathBuf;

use clap::{Parser, Subcommand};
use neatris_engine::{PieceRule, PieceSeed};
use neatris_evaluator::{config::EvaluatorConfig, orchestrator::OrchestratorConfig};
use serde::{Deserialize, Serialize};

use self::{demo::DemoArg, evaluate::EvaluateArg};
use crate::util;

mod demo;
mod evaluate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evaluate a population of random decision-makers
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Watch one random decision-maker play, logging every move
    Demo(#[clap(flatten)] DemoArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Demo(arg) => demo::run(&arg)?,
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
enum RuleArg {
    Uniform,
    Bag7,
}

/// Options shared by every mode that plays games.
#[derive(Debug, Clone, clap::Args)]
struct SimulationArg {
    /// JSON file with `evaluator` and `orchestrator` settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Base piece seed as 32 hex digits (random when omitted)
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Piece selection rule (uniform or bag7)
    #[arg(long)]
    rule: Option<RuleArg>,
    /// Standard deviation of the initial decision-maker weights
    #[arg(long, default_value_t = 0.1, value_parser = parse_std_dev)]
    weight_std_dev: f64,
}

fn parse_std_dev(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("must be a finite non-negative number, got {value}"))
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct RunConfig {
    evaluator: EvaluatorConfig,
    orchestrator: OrchestratorConfig,
}

impl SimulationArg {
    /// Loads the config file, if any, and applies command-line overrides.
    fn load_config(&self) -> anyhow::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("config", path)?,
            None => RunConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.orchestrator.seed = Some(seed);
        }
        if let Some(rule) = self.rule {
            config.orchestrator.piece_rule = match rule {
                RuleArg::Uniform => PieceRule::Uniform,
                RuleArg::Bag7 => PieceRule::Bag7,
            };
        }
        Ok(config)
    }
}
