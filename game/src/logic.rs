use engine::GameLogic;

use crate::input::InputAction;
use crate::spawner::{SpawnedTile, TileDistribution};
use crate::twenty48_core::{CoreError, MoveOutcome, Twenty48Core};

/// What a single key press did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutcome {
    pub action: InputAction,
    pub moved: MoveOutcome,
    /// Present exactly when the move changed the grid.
    pub spawned: Option<SpawnedTile>,
    pub game_over: bool,
}

/// Move, then spawn one tile if the move changed anything.
pub fn play_turn(core: &mut Twenty48Core, action: InputAction) -> Result<TurnOutcome, CoreError> {
    let moved = core.apply_move(action.direction());
    let spawned = if moved.changed {
        Some(core.spawn_random_tile()?)
    } else {
        None
    };
    Ok(TurnOutcome {
        action,
        moved,
        spawned,
        game_over: core.is_game_over(),
    })
}

/// Headless 2048: every input is one turn on a seeded board.
#[derive(Debug, Clone, Copy)]
pub struct Twenty48Logic {
    seed: u64,
    distribution: TileDistribution,
}

impl Twenty48Logic {
    pub fn new(seed: u64, distribution: TileDistribution) -> Self {
        Self { seed, distribution }
    }

    pub fn standard(seed: u64) -> Self {
        Self::new(seed, TileDistribution::default())
    }
}

impl GameLogic for Twenty48Logic {
    type State = Twenty48Core;
    type Input = InputAction;

    fn initial_state(&self) -> Self::State {
        let mut core = Twenty48Core::with_distribution(self.seed, self.distribution);
        if let Err(err) = core.initialize_game() {
            tracing::error!(%err, "could not place starting tiles");
        }
        core
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        let mut next = state.clone();
        match play_turn(&mut next, input) {
            Ok(turn) => {
                tracing::debug!(?input, changed = turn.moved.changed, score = next.score(), "turn");
                next
            }
            Err(err) => {
                tracing::error!(%err, ?input, "turn aborted");
                state.clone()
            }
        }
    }
}
