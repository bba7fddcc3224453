//! Parallel evaluation of many decision-makers.

use std::thread;

use serde::Serialize;

use crate::{
    decision_maker::DecisionMaker,
    evaluator::{EvaluateError, Evaluation, TetrisEvaluator},
};

/// Evaluates every decision-maker on its own thread.
///
/// Results are returned in the order of `population`. All evaluations share
/// the running maximum fitness of `evaluator`.
pub fn evaluate_population<D>(
    evaluator: &TetrisEvaluator,
    population: &mut [D],
) -> Result<Vec<Evaluation>, EvaluateError>
where
    D: DecisionMaker + Send,
{
    let mut results = vec![None; population.len()];
    thread::scope(|s| {
        for (decision_maker, result) in population.iter_mut().zip(&mut results) {
            s.spawn(move || {
                *result = Some(evaluator.evaluate(decision_maker, false));
            });
        }
    });

    let evaluations = results
        .into_iter()
        .map(|result| result.expect("every evaluation thread stores its result"))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(
        count = evaluations.len(),
        max_fitness = evaluator.max_fitness(),
        "population evaluated"
    );
    Ok(evaluations)
}

/// Summary of the fitness values of a set of evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitnessStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl FitnessStats {
    /// Returns `None` for an empty set.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(evaluations: &[Evaluation]) -> Option<Self> {
        let mut values = evaluations.iter().map(|e| e.fitness.raw_fitness);
        let first = values.next()?;
        let (min, max, sum) = values.fold((first, first, first), |(min, max, sum), v| {
            (min.min(v), max.max(v), sum + v)
        });
        Some(Self {
            min,
            max,
            mean: sum / evaluations.len() as f64,
        })
    }
}

/// Index of the evaluation with the highest fitness, first one on ties.
#[must_use]
pub fn best_index(evaluations: &[Evaluation]) -> Option<usize> {
    evaluations
        .iter()
        .enumerate()
        .reduce(|best, cur| {
            if cur.1.fitness.raw_fitness > best.1.fitness.raw_fitness {
                cur
            } else {
                best
            }
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use neatris_engine::{PieceRule, PieceSeed};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{
        config::EvaluatorConfig,
        decision_maker::LinearPhenome,
        evaluator::EvaluationOutcome,
        fitness::FitnessInfo,
        orchestrator::{EngineOrchestrator, OrchestratorConfig},
        protocol::NUM_OUTPUTS,
    };

    fn evaluator() -> TetrisEvaluator {
        let orchestrator = EngineOrchestrator::new(OrchestratorConfig {
            piece_rule: PieceRule::Bag7,
            seed: Some(PieceSeed::from_bytes([1; 16])),
        });
        TetrisEvaluator::new(Box::new(orchestrator), EvaluatorConfig::default())
    }

    fn evaluation(fitness: f64) -> Evaluation {
        Evaluation {
            fitness: FitnessInfo::new(fitness),
            outcome: EvaluationOutcome::Completed,
            score: 0,
            decisions: 0,
            pieces: 0,
            max_fitness: fitness,
        }
    }

    #[test]
    fn test_evaluates_in_order() {
        let evaluator = evaluator();
        let mut population = vec![
            LinearPhenome::constant([0.0, 0.0, 1.0]),
            LinearPhenome::constant([0.0, 0.0, 0.0]),
            LinearPhenome::constant([0.0, 0.0, 1.0]),
        ];
        let evaluations = evaluate_population(&evaluator, &mut population).unwrap();

        assert_eq!(evaluations.len(), 3);
        assert!((evaluations[0].fitness.raw_fitness - 1.0).abs() < f64::EPSILON);
        assert!(evaluations[1].outcome.is_stalled());
        assert!((evaluations[2].fitness.raw_fitness - 1.0).abs() < f64::EPSILON);
        assert_eq!(evaluator.evaluation_count(), 3);
        assert!((evaluator.max_fitness() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_random_population() {
        let evaluator = evaluator();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut population: Vec<_> = (0..8)
            .map(|_| LinearPhenome::random(&mut rng, 0.2))
            .collect();
        let evaluations = evaluate_population(&evaluator, &mut population).unwrap();

        let stats = FitnessStats::new(&evaluations).unwrap();
        assert!(stats.min >= 0.0);
        assert!(stats.min <= stats.mean && stats.mean <= stats.max);
        assert!((stats.max - evaluator.max_fitness()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mismatched_member_fails() {
        let evaluator = evaluator();
        let mut population = vec![
            LinearPhenome::constant([0.0, 0.0, 1.0]),
            LinearPhenome::new(1, NUM_OUTPUTS, vec![0.0; 3], vec![0.0; 3]),
        ];
        let err = evaluate_population(&evaluator, &mut population).unwrap_err();
        assert!(matches!(err, EvaluateError::InputCountMismatch { .. }));
    }

    #[test]
    fn test_fitness_stats() {
        assert_eq!(FitnessStats::new(&[]), None);
        let evaluations = [evaluation(4.0), evaluation(1.0), evaluation(7.0)];
        let stats = FitnessStats::new(&evaluations).unwrap();
        assert!((stats.min - 1.0).abs() < f64::EPSILON);
        assert!((stats.max - 7.0).abs() < f64::EPSILON);
        assert!((stats.mean - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_best_index() {
        assert_eq!(best_index(&[]), None);
        let evaluations = [evaluation(4.0), evaluation(7.0), evaluation(7.0)];
        assert_eq!(best_index(&evaluations), Some(1));
    }
}
