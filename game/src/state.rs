use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use winit::event::VirtualKeyCode;

use crate::input::{InputAction, MenuCommand, map_key_to_action, map_key_to_command};
use crate::logic::{TurnOutcome, play_turn};
use crate::score_store::HighScore;
use crate::spawner::TileDistribution;
use crate::twenty48_core::{CoreError, Twenty48Core};
use crate::view::{GameView, GameViewEffect, GameViewEvent};
use crate::view_tree::GameUiAction;

/// One applied turn, as seen by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub turn: TurnOutcome,
    /// Set when this turn beat the best score; the caller persists it.
    pub new_record: Option<u64>,
}

/// Work the app has to do outside the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    SaveHighScore(u64),
    Exit,
}

/// Everything the running game owns: current screen, board, best score and the seed source
/// for future boards.
#[derive(Debug, Clone)]
pub struct GameState {
    pub view: GameView,
    pub core: Twenty48Core,
    pub high_score: HighScore,
    seeds: ChaCha8Rng,
    distribution: TileDistribution,
}

impl GameState {
    /// Starts on the home screen with a ready board. Boards are seeded from `seed` in sequence.
    pub fn new(seed: u64, distribution: TileDistribution, best: u64) -> Result<Self, CoreError> {
        let mut seeds = ChaCha8Rng::seed_from_u64(seed);
        let core = fresh_core(&mut seeds, distribution)?;
        Ok(Self {
            view: GameView::default(),
            core,
            high_score: HighScore::new(best),
            seeds,
            distribution,
        })
    }

    pub fn core(&self) -> &Twenty48Core {
        &self.core
    }

    pub fn best(&self) -> u64 {
        self.high_score.best()
    }

    /// Applies a screen event. `ResetCore` is handled here; anything else is returned.
    pub fn handle_event(&mut self, event: GameViewEvent) -> Result<GameViewEffect, CoreError> {
        let (next, effect) = self.view.handle(event);
        if next != self.view {
            tracing::info!(from = ?self.view, to = ?next, "view transition");
        }
        self.view = next;
        if effect == GameViewEffect::ResetCore {
            self.core = fresh_core(&mut self.seeds, self.distribution)?;
            tracing::info!("new board ready");
        }
        Ok(effect)
    }

    /// Plays one move while on the playing screen; other screens ignore it.
    ///
    /// A failed turn leaves the board as it was before the move.
    pub fn play(&mut self, action: InputAction) -> Result<Option<TurnReport>, CoreError> {
        if !self.view.is_playing() {
            return Ok(None);
        }

        let before = self.core.clone();
        let turn = match play_turn(&mut self.core, action) {
            Ok(turn) => turn,
            Err(err) => {
                self.core = before;
                return Err(err);
            }
        };
        tracing::debug!(
            ?action,
            changed = turn.moved.changed,
            delta = turn.moved.score_delta,
            score = self.core.score(),
            "turn"
        );

        let new_record = self.high_score.observe(self.core.score());
        if let Some(best) = new_record {
            tracing::info!(best, "new high score");
        }
        if turn.game_over {
            tracing::info!(
                score = self.core.score(),
                max_tile = self.core.max_tile(),
                "game over"
            );
            self.handle_event(GameViewEvent::GameOver)?;
        }

        Ok(Some(TurnReport { turn, new_record }))
    }

    /// Applies one frame of input: fresh key presses in order, then clicked buttons.
    pub fn apply_input(
        &mut self,
        keys: &[VirtualKeyCode],
        actions: &[GameUiAction],
    ) -> Vec<SessionEffect> {
        let mut effects = Vec::new();
        for &key in keys {
            self.press_key(key, &mut effects);
        }
        for action in actions {
            self.apply_event(action.event(), &mut effects);
        }
        effects
    }

    fn press_key(&mut self, key: VirtualKeyCode, effects: &mut Vec<SessionEffect>) {
        if self.view.is_playing() {
            let Some(action) = map_key_to_action(key) else {
                return;
            };
            match self.play(action) {
                Ok(Some(TurnReport {
                    new_record: Some(best),
                    ..
                })) => effects.push(SessionEffect::SaveHighScore(best)),
                Ok(_) => {}
                Err(err) => tracing::error!(%err, ?action, "turn aborted; board left unchanged"),
            }
            return;
        }

        let event = match (self.view, map_key_to_command(key)) {
            (GameView::Home, Some(MenuCommand::Confirm)) => GameViewEvent::StartGame,
            (GameView::GameOver, Some(MenuCommand::Confirm)) => GameViewEvent::Restart,
            (_, Some(MenuCommand::Quit)) => GameViewEvent::Exit,
            _ => return,
        };
        self.apply_event(event, effects);
    }

    fn apply_event(&mut self, event: GameViewEvent, effects: &mut Vec<SessionEffect>) {
        match self.handle_event(event) {
            Ok(GameViewEffect::Exit) => effects.push(SessionEffect::Exit),
            Ok(_) => {}
            Err(err) => tracing::error!(%err, ?event, "could not apply view event"),
        }
    }
}

fn fresh_core(
    seeds: &mut ChaCha8Rng,
    distribution: TileDistribution,
) -> Result<Twenty48Core, CoreError> {
    let mut core = Twenty48Core::with_distribution(seeds.next_u64(), distribution);
    core.initialize_game()?;
    Ok(core)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twenty48_core::Grid;

    #[test]
    fn moves_are_ignored_outside_playing() {
        let mut state = GameState::new(1, TileDistribution::Uniform, 0).unwrap();
        let before = *state.core.grid();
        assert_eq!(state.play(InputAction::MoveLeft), Ok(None));
        assert_eq!(state.core.grid(), &before);
    }

    #[test]
    fn last_move_into_a_locked_board_ends_the_game() {
        let mut state = GameState::new(1, TileDistribution::Uniform, 0).unwrap();
        state.handle_event(GameViewEvent::StartGame).unwrap();
        // Sliding right leaves one hole at (0, 0); the spawn fills it and no merge remains.
        let grid = Grid::from_rows([
            [8, 16, 32, 0],
            [64, 128, 256, 512],
            [8, 16, 32, 64],
            [128, 256, 512, 1024],
        ])
        .unwrap();
        state.core = Twenty48Core::from_grid(grid, 3);

        let report = state.play(InputAction::MoveRight).unwrap().unwrap();
        assert!(report.turn.moved.changed);
        assert!(report.turn.game_over);
        assert_eq!(state.view, GameView::GameOver);
    }

    #[test]
    fn restart_returns_home_with_a_fresh_board() {
        let mut state = GameState::new(11, TileDistribution::Uniform, 0).unwrap();
        state.view = GameView::GameOver;
        assert_eq!(
            state.handle_event(GameViewEvent::Restart),
            Ok(GameViewEffect::ResetCore)
        );
        assert_eq!(state.view, GameView::Home);
        assert_eq!(state.core.score(), 0);
        assert_eq!(state.core.grid().tile_count(), 2);
    }

    #[test]
    fn escape_quits_from_menus_but_not_mid_game() {
        let mut state = GameState::new(2, TileDistribution::Uniform, 0).unwrap();
        assert_eq!(
            state.apply_input(&[VirtualKeyCode::Escape], &[]),
            vec![SessionEffect::Exit]
        );

        state.apply_input(&[VirtualKeyCode::Return], &[]);
        assert_eq!(state.view, GameView::Playing);
        assert!(state.apply_input(&[VirtualKeyCode::Escape], &[]).is_empty());
        assert_eq!(state.view, GameView::Playing);
    }

    #[test]
    fn scoring_past_the_best_requests_a_save() {
        let mut state = GameState::new(4, TileDistribution::Uniform, 2).unwrap();
        state.view = GameView::Playing;
        let grid = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        state.core = Twenty48Core::from_grid(grid, 4);

        let effects = state.apply_input(&[VirtualKeyCode::Left], &[]);
        assert_eq!(effects, vec![SessionEffect::SaveHighScore(4)]);
        assert_eq!(state.best(), 4);
    }

    #[test]
    fn clicked_buttons_drive_the_game_over_screen() {
        let mut state = GameState::new(5, TileDistribution::Uniform, 0).unwrap();
        state.view = GameView::GameOver;
        assert_eq!(
            state.apply_input(&[], &[GameUiAction::Exit]),
            vec![SessionEffect::Exit]
        );
        assert!(state.apply_input(&[], &[GameUiAction::Restart]).is_empty());
        assert_eq!(state.view, GameView::Home);
    }
}
