use engine::graphics::{Color, Renderer2d, text_height, text_width};
use engine::ui::{Anchor, Insets, Rect, Size};

use crate::state::GameState;
use crate::twenty48_core::{GRID_SIZE, Grid};
use crate::view::GameView;

pub const WINDOW_WIDTH: u32 = 490;
pub const WINDOW_HEIGHT: u32 = 600;
pub const TITLE_HEIGHT: u32 = 110;
pub const MARGIN: u32 = 10;
pub const TITLE: &str = "2048";

pub const COLOR_BACKGROUND: Color = [171, 158, 145, 255];
pub const COLOR_EMPTY_CELL: Color = [205, 193, 181, 255];
pub const COLOR_TITLE_BG: Color = [222, 213, 197, 255];
pub const COLOR_TEXT: Color = [114, 115, 113, 255];
pub const COLOR_WHITE: Color = [255, 255, 255, 255];
pub const COLOR_BLACK: Color = [0, 0, 0, 255];

const OVERLAY_ALPHA: u8 = 150;
const BUTTON_HOVER_BRIGHTEN: f32 = 0.35;
const TILE_TEXT_PAD: u32 = 8;
const TILE_TEXT_MAX_SCALE: u32 = 7;

pub fn tile_color(value: u32) -> Color {
    match value {
        0 => COLOR_EMPTY_CELL,
        2 => [238, 228, 218, 255],
        4 => [236, 224, 202, 255],
        8 => [244, 177, 122, 255],
        16 => [245, 149, 117, 255],
        32 => [245, 124, 95, 255],
        64 => [246, 93, 59, 255],
        128 => [237, 206, 113, 255],
        256 => [237, 204, 99, 255],
        512 => [237, 198, 81, 255],
        1024 => [238, 199, 68, 255],
        2048 => [236, 194, 48, 255],
        4096 => [254, 61, 61, 255],
        _ => [255, 32, 32, 255],
    }
}

pub fn tile_text_color(value: u32) -> Color {
    if value <= 4 { COLOR_TEXT } else { COLOR_WHITE }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardLayout {
    pub title: Rect,
    pub score_box: Rect,
    pub best_box: Rect,
    pub board: Rect,
}

impl BoardLayout {
    pub fn cell(&self, row: usize, col: usize) -> Rect {
        let n = GRID_SIZE as u32;
        self.board.grid_cell(n, n, MARGIN, row as u32, col as u32)
    }
}

/// Title bar on top, square board centred in the space below it.
pub fn compute_layout(width: u32, height: u32) -> BoardLayout {
    let (title, rest) = Rect::from_size(width, height).split_top(TITLE_HEIGHT);
    let side = rest.w.min(rest.h);
    let board = rest.place(Size::square(side), Anchor::TopCenter);

    let boxes = title.inset(Insets::all(MARGIN * 2));
    let half = boxes.w.saturating_sub(MARGIN * 2) / 2;
    let score_box = Rect::new(boxes.x, boxes.y, half, boxes.h);
    let best_box = Rect::new(boxes.x + boxes.w - half, boxes.y, half, boxes.h);

    BoardLayout {
        title,
        score_box,
        best_box,
        board,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameOverLayout {
    pub panel: Rect,
    pub restart_button: Rect,
    pub exit_button: Rect,
}

pub fn compute_game_over_layout(width: u32, height: u32) -> GameOverLayout {
    let screen = Rect::from_size(width, height);
    let panel = screen.place(
        Size::new(380, 260).clamp_max(Size::new(
            width.saturating_sub(40),
            height.saturating_sub(40),
        )),
        Anchor::Center,
    );
    if panel.is_empty() {
        return GameOverLayout::default();
    }

    let pad = 20;
    let button_h = 50u32.min(panel.h / 4);
    let row = panel
        .inset(Insets {
            left: pad,
            top: 0,
            right: pad,
            bottom: pad,
        })
        .place(Size::new(panel.w, button_h), Anchor::BottomCenter);
    let button_w = row.w.saturating_sub(pad) / 2;

    GameOverLayout {
        panel,
        restart_button: Rect::new(row.x, row.y, button_w, row.h),
        exit_button: Rect::new(row.x + row.w - button_w, row.y, button_w, row.h),
    }
}

/// Largest scale (up to `max_scale`) at which `text` fits inside `rect` with padding.
pub fn fit_text_scale(text: &str, rect: Rect, max_scale: u32) -> u32 {
    let avail_w = rect.w.saturating_sub(TILE_TEXT_PAD * 2);
    let avail_h = rect.h.saturating_sub(TILE_TEXT_PAD * 2);
    (1..=max_scale.max(1))
        .rev()
        .find(|&s| text_width(text, s) <= avail_w && text_height(text, s) <= avail_h)
        .unwrap_or(1)
}

pub fn draw_board(gfx: &mut dyn Renderer2d, grid: &Grid, score: u64, best: u64) -> BoardLayout {
    let size = gfx.size();
    let layout = compute_layout(size.width, size.height);

    gfx.fill_rect(layout.title, COLOR_TITLE_BG);
    draw_counter(gfx, layout.score_box, "SCORE", score);
    draw_counter(gfx, layout.best_box, "BEST", best);

    gfx.fill_rect(layout.board, COLOR_BACKGROUND);
    for (row, values) in grid.rows().iter().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            let cell = layout.cell(row, col);
            gfx.fill_rect(cell, tile_color(value));
            if value != 0 {
                let label = value.to_string();
                let scale = fit_text_scale(&label, cell, TILE_TEXT_MAX_SCALE);
                gfx.draw_text_centered(cell, &label, tile_text_color(value), scale);
            }
        }
    }
    layout
}

fn draw_counter(gfx: &mut dyn Renderer2d, rect: Rect, label: &str, value: u64) {
    gfx.fill_rect(rect, COLOR_EMPTY_CELL);
    let (label_rect, value_rect) = rect.split_top(rect.h / 3);
    gfx.draw_text_centered(label_rect, label, COLOR_TEXT, 2);
    let text = value.to_string();
    let scale = fit_text_scale(&text, value_rect, 5);
    gfx.draw_text_centered(value_rect, &text, COLOR_WHITE, scale);
}

pub fn draw_home(gfx: &mut dyn Renderer2d, best: u64) {
    let size = gfx.size();
    gfx.clear(COLOR_TITLE_BG);

    let screen = Rect::from_size(size.width, size.height);
    let (top, rest) = screen.split_top(size.height / 2);
    gfx.draw_text_centered(top, TITLE, COLOR_TEXT, 16);

    let lines = [
        "PRESS ENTER TO START".to_string(),
        "USE ARROW KEYS TO MOVE TILES.".to_string(),
        format!("BEST: {best}"),
    ];
    let mut area = rest;
    for line in &lines {
        let (slot, next) = area.split_top(40);
        gfx.draw_text_centered(slot, line, COLOR_TEXT, 3);
        area = next;
    }
}

fn brighten_color(mut c: Color, amount: f32) -> Color {
    let t = amount.clamp(0.0, 1.0);
    for channel in c.iter_mut().take(3) {
        let v = *channel as f32;
        *channel = (v + (255.0 - v) * t).round().clamp(0.0, 255.0) as u8;
    }
    c
}

fn draw_button(gfx: &mut dyn Renderer2d, rect: Rect, label: &str, hovered: bool) {
    let fill = if hovered {
        brighten_color(COLOR_BACKGROUND, BUTTON_HOVER_BRIGHTEN)
    } else {
        COLOR_BACKGROUND
    };
    gfx.fill_rect(rect, fill);
    gfx.rect_outline(rect, COLOR_TEXT);
    gfx.draw_text_centered(rect, label, COLOR_WHITE, 3);
}

/// Final score, best score and the two buttons, over a dimmed board.
pub fn draw_game_over(
    gfx: &mut dyn Renderer2d,
    score: u64,
    best: u64,
    cursor: Option<(u32, u32)>,
) -> GameOverLayout {
    let size = gfx.size();
    gfx.blend_rect(
        Rect::from_size(size.width, size.height),
        COLOR_BLACK,
        OVERLAY_ALPHA,
    );

    let layout = compute_game_over_layout(size.width, size.height);
    if layout.panel.is_empty() {
        return layout;
    }
    gfx.fill_rect(layout.panel, COLOR_TITLE_BG);
    gfx.rect_outline(layout.panel, COLOR_TEXT);

    let text_area = layout.panel.inset(Insets::all(MARGIN * 2));
    let (heading, rest) = text_area.split_top(50);
    gfx.draw_text_centered(heading, "GAME OVER!", COLOR_TEXT, 5);
    let (score_line, rest) = rest.split_top(30);
    gfx.draw_text_centered(score_line, &format!("SCORE: {score}"), COLOR_TEXT, 3);
    let (best_line, _) = rest.split_top(30);
    gfx.draw_text_centered(best_line, &format!("YOUR HIGHSCORE: {best}"), COLOR_TEXT, 3);

    let hovered = |rect: Rect| cursor.is_some_and(|(x, y)| rect.contains(x, y));
    draw_button(
        gfx,
        layout.restart_button,
        "RESTART",
        hovered(layout.restart_button),
    );
    draw_button(gfx, layout.exit_button, "EXIT", hovered(layout.exit_button));
    layout
}

/// Draws whichever screen `state` is on.
pub fn draw_game(gfx: &mut dyn Renderer2d, state: &GameState, cursor: Option<(u32, u32)>) {
    let core = state.core();
    match state.view {
        GameView::Home => draw_home(gfx, state.best()),
        GameView::Playing => {
            gfx.clear(COLOR_BACKGROUND);
            draw_board(gfx, core.grid(), core.score(), state.best());
        }
        GameView::GameOver => {
            gfx.clear(COLOR_BACKGROUND);
            draw_board(gfx, core.grid(), core.score(), state.best());
            draw_game_over(gfx, core.score(), state.best(), cursor);
        }
    }
}
