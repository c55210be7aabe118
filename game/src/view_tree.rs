use engine::ui::Rect;
use engine::view_tree::{ButtonNode, PanelNode, ViewNode, ViewTree};
use serde::{Deserialize, Serialize};

use crate::ui::compute_game_over_layout;
use crate::view::{GameView, GameViewEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameUiAction {
    Restart,
    Exit,
}

impl GameUiAction {
    pub fn event(self) -> GameViewEvent {
        match self {
            GameUiAction::Restart => GameViewEvent::Restart,
            GameUiAction::Exit => GameViewEvent::Exit,
        }
    }
}

pub fn build_menu_view_tree(view: GameView, width: u32, height: u32) -> ViewTree<GameUiAction> {
    let mut tree = ViewTree::new();
    if view == GameView::GameOver {
        let layout = compute_game_over_layout(width, height);
        if !layout.panel.is_empty() {
            tree.push(ViewNode::Panel(PanelNode { rect: layout.panel }));
            push_button(
                &mut tree,
                20,
                layout.restart_button,
                "RESTART",
                GameUiAction::Restart,
            );
            push_button(&mut tree, 21, layout.exit_button, "EXIT", GameUiAction::Exit);
        }
    }
    tree
}

fn push_button(
    tree: &mut ViewTree<GameUiAction>,
    id: u32,
    rect: Rect,
    label: &str,
    action: GameUiAction,
) {
    tree.push(ViewNode::Button(ButtonNode {
        id,
        rect,
        label: label.to_string(),
        action,
        enabled: !rect.is_empty(),
    }));
}
