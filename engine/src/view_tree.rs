use serde::{Deserialize, Serialize};

use crate::ui::Rect;

/// Pointer state for one frame, as seen by hit testing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiInput {
    pub mouse_pos: Option<(u32, u32)>,
    pub mouse_down: bool,
    pub mouse_up: bool,
}

/// Interactive regions of one frame. Later nodes sit on top of earlier ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewTree<A> {
    pub nodes: Vec<ViewNode<A>>,
}

impl<A> Default for ViewTree<A> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<A> ViewTree<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: ViewNode<A>) {
        self.nodes.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn buttons(&self) -> impl Iterator<Item = &ButtonNode<A>> {
        self.nodes.iter().filter_map(|node| match node {
            ViewNode::Button(button) => Some(button),
            ViewNode::Panel(_) => None,
        })
    }

    /// The topmost enabled button under `pos`, if any.
    pub fn button_at(&self, pos: (u32, u32)) -> Option<&ButtonNode<A>> {
        self.nodes.iter().rev().find_map(|node| match node {
            ViewNode::Button(button) if button.enabled && button.rect.contains(pos.0, pos.1) => {
                Some(button)
            }
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ViewNode<A> {
    Button(ButtonNode<A>),
    Panel(PanelNode),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonNode<A> {
    pub id: u32,
    pub rect: Rect,
    pub label: String,
    pub action: A,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelNode {
    pub rect: Rect,
}

/// Actions triggered this frame: a click is a mouse release over an enabled button.
pub fn hit_test_actions<A: Clone>(view: &ViewTree<A>, input: UiInput) -> Vec<A> {
    if !input.mouse_up {
        return Vec::new();
    }
    let Some(pos) = input.mouse_pos else {
        return Vec::new();
    };
    view.button_at(pos)
        .map(|button| vec![button.action.clone()])
        .unwrap_or_default()
}
