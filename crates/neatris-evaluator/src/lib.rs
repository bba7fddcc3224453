//! Evaluation of decision-makers by letting them play the falling-block game.
//!
//! A decision-maker (a "phenome", typically an evolved neural network) sees
//! the game as a fixed observation vector and answers with an action vector.
//! The evaluator plays a whole game with it and turns the final board into a
//! fitness score for a search algorithm.
//!
//! # Architecture
//!
//! ```text
//! evaluate_population (one thread per decision-maker)
//!     ↓ uses
//! TetrisEvaluator (turn loop, stall guard, fitness)
//!     ↓ creates games via          ↓ talks to decision-makers via
//! GameOrchestrator               protocol (encode / decode)
//! ```
//!
//! - [`protocol`] - Observation and action vector layouts
//! - [`decision_maker`] - The [`DecisionMaker`](decision_maker::DecisionMaker)
//!   trait and a linear reference implementation
//! - [`orchestrator`] - Factories of independent game instances
//! - [`fitness`] - Fitness formula and the shared running maximum
//! - [`evaluator`] - The evaluation loop
//! - [`population`] - Parallel evaluation and fitness statistics
//!
//! # Example
//!
//! ```
//! use neatris_engine::{PieceRule, PieceSeed};
//! use neatris_evaluator::{
//!     config::EvaluatorConfig,
//!     decision_maker::LinearPhenome,
//!     evaluator::TetrisEvaluator,
//!     orchestrator::{EngineOrchestrator, OrchestratorConfig},
//! };
//!
//! let orchestrator = EngineOrchestrator::new(OrchestratorConfig {
//!     piece_rule: PieceRule::Bag7,
//!     seed: Some(PieceSeed::from_bytes([0; 16])),
//! });
//! let evaluator = TetrisEvaluator::new(Box::new(orchestrator), EvaluatorConfig::default());
//!
//! let mut always_drop = LinearPhenome::constant([0.0, 0.0, 1.0]);
//! let evaluation = evaluator.evaluate(&mut always_drop, false).unwrap();
//! assert!((evaluation.fitness.raw_fitness - 1.0).abs() < f64::EPSILON);
//! ```

pub mod config;
pub mod decision_maker;
pub mod evaluator;
pub mod fitness;
pub mod orchestrator;
pub mod population;
pub mod protocol;
