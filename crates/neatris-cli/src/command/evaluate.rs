use std::{path::PathBuf, time::Duration};

use chrono::{DateTime, Utc};
use neatris_engine::PieceSeed;
use neatris_evaluator::{
    config::EvaluatorConfig,
    decision_maker::LinearPhenome,
    evaluator::{EvaluateError, Evaluation, TetrisEvaluator},
    orchestrator::{EngineOrchestrator, OrchestratorConfig},
    population::{FitnessStats, best_index, evaluate_population},
};
use serde::Serialize;

use super::{SimulationArg, demo};
use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    #[clap(flatten)]
    pub(super) simulation: SimulationArg,
    /// Number of random decision-makers to evaluate
    #[arg(long, default_value_t = 16)]
    population: usize,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Replay the best decision-maker on a new game, logging every move
    #[arg(long)]
    demo: bool,
}

#[derive(Debug, Serialize)]
struct EvaluationReport {
    generated_at: DateTime<Utc>,
    seed: PieceSeed,
    population: usize,
    max_fitness: f64,
    stats: Option<FitnessStats>,
    best: Option<usize>,
    evaluations: Vec<Evaluation>,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        simulation,
        population,
        output,
        demo,
    } = arg;
    let config = simulation.load_config()?;
    let orchestrator = EngineOrchestrator::new(config.orchestrator.clone());
    let seed = orchestrator.seed();
    tracing::info!(%seed, population, "evaluating population");
    let evaluator = TetrisEvaluator::new(Box::new(orchestrator), config.evaluator);

    let mut rng = rand::rng();
    let mut phenomes: Vec<_> = (0..*population)
        .map(|_| LinearPhenome::random(&mut rng, simulation.weight_std_dev))
        .collect();
    let evaluations = evaluate_population(&evaluator, &mut phenomes)?;

    for (i, evaluation) in evaluations.iter().enumerate() {
        tracing::debug!(
            individual = i,
            outcome = ?evaluation.outcome,
            fitness = evaluation.fitness.raw_fitness,
            score = evaluation.score,
            "evaluated"
        );
    }
    let stats = FitnessStats::new(&evaluations);
    if let Some(stats) = &stats {
        tracing::info!(
            min = stats.min,
            max = stats.max,
            mean = stats.mean,
            max_fitness = evaluator.max_fitness(),
            "fitness stats"
        );
    }
    let best = best_index(&evaluations);

    let report = EvaluationReport {
        generated_at: Utc::now(),
        seed,
        population: *population,
        max_fitness: evaluator.max_fitness(),
        stats,
        best,
        evaluations,
    };
    util::save_json(&report, output.as_deref())?;
    if let Some(path) = output {
        tracing::info!(path = %path.display(), "report saved");
    }

    if let Some(best) = best.filter(|_| *demo) {
        tracing::info!(individual = best, "replaying best decision-maker");
        let orchestrator = OrchestratorConfig {
            seed: Some(seed),
            ..config.orchestrator
        };
        let replayed = replay(orchestrator, config.evaluator, &mut phenomes[best])?;
        tracing::info!(
            outcome = ?replayed.outcome,
            fitness = replayed.fitness.raw_fitness,
            score = replayed.score,
            "replay finished"
        );
    }
    Ok(())
}

/// Plays `phenome` once in demo mode on its own evaluator, so the replay does
/// not count towards the population's running maximum.
fn replay(
    orchestrator: OrchestratorConfig,
    config: EvaluatorConfig,
    phenome: &mut LinearPhenome,
) -> Result<Evaluation, EvaluateError> {
    let orchestrator =
        EngineOrchestrator::new(orchestrator).with_observer(demo::move_logger(Duration::ZERO));
    TetrisEvaluator::new(Box::new(orchestrator), config).evaluate(phenome, true)
}

#[cfg(test)]
mod tests {
    use neatris_engine::PieceRule;

    use super::*;

    #[test]
    fn test_replay_leaves_population_evaluator_untouched() {
        let orchestrator = OrchestratorConfig {
            piece_rule: PieceRule::Bag7,
            seed: Some(PieceSeed::from_bytes([5; 16])),
        };
        let config = EvaluatorConfig::default();
        let evaluator = TetrisEvaluator::new(
            Box::new(EngineOrchestrator::new(orchestrator.clone())),
            config,
        );
        let mut phenomes = vec![
            LinearPhenome::constant([0.0, 0.0, 1.0]),
            LinearPhenome::constant([-1.0, 0.0, 0.0]),
        ];
        evaluate_population(&evaluator, &mut phenomes).unwrap();
        let max_fitness = evaluator.max_fitness();

        let mut champion = LinearPhenome::constant([0.0, 1.0, 0.0]);
        let replayed = replay(orchestrator, config, &mut champion).unwrap();

        assert!(replayed.outcome.is_stalled());
        assert_eq!(evaluator.evaluation_count(), 2);
        assert!((evaluator.max_fitness() - max_fitness).abs() < f64::EPSILON);
    }
}
