//! Drives one game to completion with a decision-maker.
//!
//! Each decision runs:
//!
//! 1. [`reset_state`](DecisionMaker::reset_state) on the decision-maker
//! 2. [`encode`] the game into an observation
//! 3. [`activate`](DecisionMaker::activate) the decision-maker
//! 4. [`decode`] its action into game commands
//!
//! until the game is over. If the current piece is not dropped within
//! [`EvaluatorConfig::max_moves_per_piece`] decisions the evaluation is
//! abandoned with fitness `0`.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::{
    config::EvaluatorConfig,
    decision_maker::DecisionMaker,
    fitness::{FitnessInfo, MaxFitness, compute_fitness},
    orchestrator::GameOrchestrator,
    protocol::{NUM_INPUTS, NUM_OUTPUTS, decode, encode},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EvaluateError {
    #[display("decision-maker takes {actual} inputs, but observations have {expected}")]
    InputCountMismatch { expected: usize, actual: usize },
    #[display("decision-maker produces {actual} outputs, but actions have {expected}")]
    OutputCountMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationOutcome {
    /// The game reached game over.
    Completed,
    /// A piece was not dropped in time.
    Stalled,
}

/// Result of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub fitness: FitnessInfo,
    pub outcome: EvaluationOutcome,
    /// Rows cleared before the game ended.
    pub score: usize,
    /// Number of decisions made.
    pub decisions: usize,
    /// Number of pieces dropped.
    pub pieces: usize,
    /// Running maximum fitness right after this evaluation was recorded.
    pub max_fitness: f64,
}

/// Evaluates decision-makers on games created by an orchestrator.
///
/// Shareable across threads; every call to [`evaluate`](Self::evaluate) uses a
/// fresh game.
pub struct TetrisEvaluator {
    orchestrator: Box<dyn GameOrchestrator>,
    config: EvaluatorConfig,
    max_fitness: MaxFitness,
    evaluations: AtomicU64,
}

impl std::fmt::Debug for TetrisEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TetrisEvaluator")
            .field("config", &self.config)
            .field("max_fitness", &self.max_fitness)
            .field("evaluations", &self.evaluations)
            .finish_non_exhaustive()
    }
}

impl TetrisEvaluator {
    #[must_use]
    pub fn new(orchestrator: Box<dyn GameOrchestrator>, config: EvaluatorConfig) -> Self {
        Self {
            orchestrator,
            config,
            max_fitness: MaxFitness::new(),
            evaluations: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Highest fitness recorded by any evaluation so far.
    #[must_use]
    pub fn max_fitness(&self) -> f64 {
        self.max_fitness.get()
    }

    /// Number of evaluations started.
    #[must_use]
    pub fn evaluation_count(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }

    /// Plays one game with `decision_maker` and scores it.
    ///
    /// Fails before any game is created if the decision-maker is not sized
    /// for the protocol.
    pub fn evaluate<D>(
        &self,
        decision_maker: &mut D,
        demo_mode: bool,
    ) -> Result<Evaluation, EvaluateError>
    where
        D: DecisionMaker + ?Sized,
    {
        check_sizes(decision_maker)?;
        self.evaluations.fetch_add(1, Ordering::Relaxed);

        let mut game = self.orchestrator.create_game_instance(demo_mode);
        let mut inputs = [0.0; NUM_INPUTS];
        let mut outputs = [0.0; NUM_OUTPUTS];
        let mut moves = 0;
        let mut decisions = 0;
        let mut pieces = 0;
        let mut dropped_every_time = true;

        let outcome = loop {
            if game.game_over() {
                break EvaluationOutcome::Completed;
            }
            if moves >= self.config.max_moves_per_piece {
                break EvaluationOutcome::Stalled;
            }

            decision_maker.reset_state();
            encode(game.as_ref(), &mut inputs);
            decision_maker.activate(&inputs, &mut outputs);
            moves += 1;
            decisions += 1;

            if decode(&outputs, game.as_mut()) {
                moves = 0;
                pieces += 1;
            } else {
                dropped_every_time = false;
            }
        };

        let fitness = match outcome {
            EvaluationOutcome::Completed => compute_fitness(game.as_ref(), dropped_every_time),
            EvaluationOutcome::Stalled => 0.0,
        };
        let max_fitness = self.max_fitness.record(fitness);
        let score = game.score();

        tracing::debug!(
            ?outcome,
            fitness,
            score,
            decisions,
            pieces,
            dropped_every_time,
            max_fitness,
            "evaluation finished"
        );

        Ok(Evaluation {
            fitness: FitnessInfo::new(fitness),
            outcome,
            score,
            decisions,
            pieces,
            max_fitness,
        })
    }
}

fn check_sizes<D>(decision_maker: &D) -> Result<(), EvaluateError>
where
    D: DecisionMaker + ?Sized,
{
    if decision_maker.input_count() != NUM_INPUTS {
        return Err(EvaluateError::InputCountMismatch {
            expected: NUM_INPUTS,
            actual: decision_maker.input_count(),
        });
    }
    if decision_maker.output_count() != NUM_OUTPUTS {
        return Err(EvaluateError::OutputCountMismatch {
            expected: NUM_OUTPUTS,
            actual: decision_maker.output_count(),
        });
    }
    Ok(())
}
