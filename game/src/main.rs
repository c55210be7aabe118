use std::time::Duration;

use anyhow::{Context, anyhow};
use engine::app::{AppContext, GameApp, InputFrame, run_game};
use engine::graphics::Renderer2d;
use engine::view_tree::ViewTree;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use game2048::config::GameConfig;
use game2048::score_store::{FileScoreStore, ScoreStore};
use game2048::state::{GameState, SessionEffect};
use game2048::ui::draw_game;
use game2048::view_tree::{GameUiAction, build_menu_view_tree};

struct HeadfulApp {
    store: FileScoreStore,
    initial: GameState,
    exit: bool,
}

impl GameApp for HeadfulApp {
    type State = GameState;
    type Action = GameUiAction;
    type Effect = SessionEffect;

    fn init_state(&mut self, _ctx: &mut AppContext) -> Self::State {
        self.initial.clone()
    }

    fn build_view(&self, state: &Self::State, ctx: &AppContext) -> ViewTree<Self::Action> {
        build_menu_view_tree(
            state.view,
            ctx.surface_size.width,
            ctx.surface_size.height,
        )
    }

    fn update_state(
        &mut self,
        state: &mut Self::State,
        input: &InputFrame,
        _dt: Duration,
        actions: &[Self::Action],
        _ctx: &mut AppContext,
    ) -> Vec<Self::Effect> {
        state.apply_input(&input.keys_pressed, actions)
    }

    fn render(
        &mut self,
        state: &Self::State,
        _view: &ViewTree<Self::Action>,
        input: &InputFrame,
        renderer: &mut dyn Renderer2d,
    ) {
        draw_game(renderer, state, input.mouse_pos);
    }

    fn handle_effects(&mut self, effects: Vec<Self::Effect>, _ctx: &mut AppContext) {
        for effect in effects {
            match effect {
                SessionEffect::SaveHighScore(best) => {
                    if let Err(err) = self.store.save(best) {
                        tracing::error!(%err, best, path = %self.store.path().display(), "could not save high score");
                    }
                }
                SessionEffect::Exit => {
                    tracing::info!("exit requested");
                    self.exit = true;
                }
            }
        }
    }

    fn exit_requested(&self) -> bool {
        self.exit
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GameConfig::from_env();
    let store = FileScoreStore::new(config.highscore_path.clone());
    let best = store.load();
    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(
        seed,
        best,
        distribution = %config.distribution,
        path = %store.path().display(),
        "starting 2048"
    );

    let initial = GameState::new(seed, config.distribution, best)
        .context("failed to set up the first board")?;
    let app = HeadfulApp {
        store,
        initial,
        exit: false,
    };

    run_game(config.app_config(), app)
        .map_err(|err| anyhow!("{err}"))
        .context("failed to start the game window")
}
