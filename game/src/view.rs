use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameView {
    #[default]
    Home,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameViewEvent {
    StartGame,
    GameOver,
    Restart,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameViewEffect {
    None,
    ResetCore,
    Exit,
}

impl GameView {
    /// Pure transition function for the session screens.
    ///
    /// Side-effects (building a fresh board, leaving the event loop) are reported via
    /// `GameViewEffect` so callers stay deterministic and easy to test.
    pub fn handle(self, event: GameViewEvent) -> (GameView, GameViewEffect) {
        match (self, event) {
            (GameView::Home, GameViewEvent::StartGame) => (GameView::Playing, GameViewEffect::None),
            (GameView::Playing, GameViewEvent::GameOver) => {
                (GameView::GameOver, GameViewEffect::None)
            }
            (GameView::GameOver, GameViewEvent::Restart) => {
                (GameView::Home, GameViewEffect::ResetCore)
            }
            (state, GameViewEvent::Exit) => (state, GameViewEffect::Exit),

            // Ignore irrelevant events in the current state.
            (state, _) => (state, GameViewEffect::None),
        }
    }

    pub fn is_playing(self) -> bool {
        matches!(self, GameView::Playing)
    }
}
