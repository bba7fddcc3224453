use std::{sync::Arc, thread, time::Duration};

use neatris_engine::{Game, GameInstance as _, MoveObserver};
use neatris_evaluator::{
    decision_maker::LinearPhenome,
    evaluator::TetrisEvaluator,
    orchestrator::EngineOrchestrator,
};

use super::SimulationArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DemoArg {
    #[clap(flatten)]
    pub(super) simulation: SimulationArg,
    /// Pause after every finished move, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
}

pub(crate) fn run(arg: &DemoArg) -> anyhow::Result<()> {
    let DemoArg {
        simulation,
        delay_ms,
    } = arg;
    let config = simulation.load_config()?;
    let orchestrator = EngineOrchestrator::new(config.orchestrator)
        .with_observer(move_logger(Duration::from_millis(*delay_ms)));
    tracing::info!(seed = %orchestrator.seed(), "starting demo");
    let evaluator = TetrisEvaluator::new(Box::new(orchestrator), config.evaluator);

    let mut phenome = LinearPhenome::random(&mut rand::rng(), simulation.weight_std_dev);
    let evaluation = evaluator.evaluate(&mut phenome, true)?;
    tracing::info!(
        outcome = ?evaluation.outcome,
        fitness = evaluation.fitness.raw_fitness,
        score = evaluation.score,
        pieces = evaluation.pieces,
        decisions = evaluation.decisions,
        "demo finished"
    );
    Ok(())
}

/// Observer that logs every finished move and the board after it.
pub(crate) fn move_logger(delay: Duration) -> MoveObserver {
    Arc::new(move |game: &Game| {
        tracing::info!(
            score = game.score(),
            pieces = game.stats().completed_pieces(),
            current = %game.current_block().as_char(),
            next = %game.next_block().as_char(),
            game_over = game.game_over(),
            "move finished"
        );
        tracing::debug!("board:\n{}", game.render_board());
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    })
}
