//! Creation of game instances for evaluations.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use neatris_engine::{Game, GameInstance, MoveObserver, PieceRule, PieceSeed};
use serde::{Deserialize, Serialize};

/// Factory of independent game instances.
///
/// Implementations must be callable from several evaluation threads at once.
pub trait GameOrchestrator: Send + Sync {
    /// Creates a fresh game.
    ///
    /// In demo mode the game reports every finished move to an observer.
    fn create_game_instance(&self, demo_mode: bool) -> Box<dyn GameInstance>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub piece_rule: PieceRule,
    /// Base seed; a random one is drawn when absent.
    pub seed: Option<PieceSeed>,
}

/// Orchestrator backed by [`Game`].
///
/// Every created game gets its own seed derived from the base seed and the
/// creation index, so a run is reproducible from the base seed alone.
pub struct EngineOrchestrator {
    piece_rule: PieceRule,
    seed: PieceSeed,
    created: AtomicU64,
    observer: Option<MoveObserver>,
}

impl fmt::Debug for EngineOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineOrchestrator")
            .field("piece_rule", &self.piece_rule)
            .field("seed", &self.seed)
            .field("created", &self.created)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

impl EngineOrchestrator {
    #[must_use]
    pub fn new(config: OrchestratorConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            piece_rule: config.piece_rule,
            seed,
            created: AtomicU64::new(0),
            observer: None,
        }
    }

    /// Sets the observer attached to games created in demo mode.
    #[must_use]
    pub fn with_observer(mut self, observer: MoveObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    /// Number of games created so far.
    #[must_use]
    pub fn created_count(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }
}

impl GameOrchestrator for EngineOrchestrator {
    fn create_game_instance(&self, demo_mode: bool) -> Box<dyn GameInstance> {
        let index = self.created.fetch_add(1, Ordering::Relaxed);
        let generator = self.piece_rule.build(self.seed.derive(index));
        let game = Game::new(generator);
        match &self.observer {
            Some(observer) if demo_mode => Box::new(game.with_observer(observer.clone())),
            _ => Box::new(game),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use neatris_engine::BlockType;

    use super::*;

    fn config(rule: PieceRule) -> OrchestratorConfig {
        OrchestratorConfig {
            piece_rule: rule,
            seed: Some(PieceSeed::from_bytes([3; 16])),
        }
    }

    fn pieces(game: &mut dyn GameInstance, n: usize) -> Vec<BlockType> {
        (0..n)
            .map(|_| {
                let kind = game.current_block();
                game.finish_move();
                kind
            })
            .collect()
    }

    #[test]
    fn test_instances_are_reproducible() {
        let a = EngineOrchestrator::new(config(PieceRule::Uniform));
        let b = EngineOrchestrator::new(config(PieceRule::Uniform));
        for _ in 0..3 {
            let mut ga = a.create_game_instance(false);
            let mut gb = b.create_game_instance(false);
            assert_eq!(pieces(ga.as_mut(), 5), pieces(gb.as_mut(), 5));
        }
        assert_eq!(a.created_count(), 3);
    }

    #[test]
    fn test_observer_only_in_demo_mode() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let orchestrator = EngineOrchestrator::new(config(PieceRule::Bag7))
            .with_observer(Arc::new(move |_: &Game| {
                counter.fetch_add(1, Ordering::SeqCst);
            }));

        let mut game = orchestrator.create_game_instance(false);
        game.finish_move();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let mut game = orchestrator.create_game_instance(true);
        game.finish_move();
        game.finish_move();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_config_serialization() {
        let config: OrchestratorConfig =
            serde_json::from_str(r#"{"piece_rule":"bag7","seed":"000102030405060708090a0b0c0d0e0f"}"#)
                .unwrap();
        assert_eq!(config.piece_rule, PieceRule::Bag7);
        assert_eq!(
            config.seed,
            Some(PieceSeed::from_bytes([
                0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15
            ]))
        );
        let config: OrchestratorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, OrchestratorConfig::default());
    }
}
