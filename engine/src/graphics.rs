use crate::{surface::SurfaceSize, ui::Rect};

pub type Color = [u8; 4];

// Block font: 3x5 glyphs, scaled by an integer factor.
const GLYPH_W: u32 = 3;
const GLYPH_H: u32 = 5;

fn glyph_advance_x(scale: u32) -> u32 {
    (GLYPH_W + 1) * scale.max(1)
}

fn line_advance_y(scale: u32) -> u32 {
    (GLYPH_H + 1) * scale.max(1)
}

/// Pixel width of the widest line of `text` at `scale` (no trailing spacing column).
pub fn text_width(text: &str, scale: u32) -> u32 {
    text.lines()
        .map(|line| {
            let chars = line.chars().count() as u32;
            chars
                .saturating_mul(glyph_advance_x(scale))
                .saturating_sub(scale.max(1))
        })
        .max()
        .unwrap_or(0)
}

/// Pixel height of `text` at `scale`.
pub fn text_height(text: &str, scale: u32) -> u32 {
    let lines = text.lines().count().max(1) as u32;
    (lines - 1)
        .saturating_mul(line_advance_y(scale))
        .saturating_add(GLYPH_H * scale.max(1))
}

/// Unified 2D rendering interface.
///
/// Game code only talks to this trait; it never touches the pixel buffer directly.
pub trait Renderer2d {
    fn begin_frame(&mut self, size: SurfaceSize);
    fn size(&self) -> SurfaceSize;

    /// Opaque fill.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Alpha-blended rect over existing content (alpha is applied to `color`'s RGB).
    fn blend_rect(&mut self, rect: Rect, color: Color, alpha: u8);

    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32);

    /// Draws `text` centred inside `rect`. Text larger than the rect is pinned to its origin.
    fn draw_text_centered(&mut self, rect: Rect, text: &str, color: Color, scale: u32) {
        let w = text_width(text, scale);
        let h = text_height(text, scale);
        let x = rect.x.saturating_add(rect.w.saturating_sub(w) / 2);
        let y = rect.y.saturating_add(rect.h.saturating_sub(h) / 2);
        self.draw_text_scaled(x, y, text, color, scale);
    }

    fn rect_outline(&mut self, rect: Rect, color: Color) {
        if rect.w == 0 || rect.h == 0 {
            return;
        }
        let right = rect.x.saturating_add(rect.w).saturating_sub(1);
        let bottom = rect.y.saturating_add(rect.h).saturating_sub(1);
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, 1), color);
        self.fill_rect(Rect::new(rect.x, bottom, rect.w, 1), color);
        self.fill_rect(Rect::new(rect.x, rect.y, 1, rect.h), color);
        self.fill_rect(Rect::new(right, rect.y, 1, rect.h), color);
    }

    fn clear(&mut self, color: Color) {
        let s = self.size();
        self.fill_rect(Rect::from_size(s.width, s.height), color);
    }
}

/// CPU renderer that draws into an RGBA frame buffer.
pub struct CpuRenderer<'a> {
    frame: &'a mut [u8],
    size: SurfaceSize,
}

impl<'a> CpuRenderer<'a> {
    pub fn new(frame: &'a mut [u8], size: SurfaceSize) -> Self {
        Self { frame, size }
    }

    /// Calls `f` on each clipped row of `rect` as a slice of whole RGBA pixels.
    fn for_each_row<F>(&mut self, rect: Rect, mut f: F)
    where
        F: FnMut(&mut [u8]),
    {
        let width = self.size.width;
        let height = self.size.height;
        let max_x = rect.x.saturating_add(rect.w).min(width);
        let max_y = rect.y.saturating_add(rect.h).min(height);
        if rect.x >= max_x || rect.y >= max_y {
            return;
        }
        if self.frame.len() < self.size.rgba_len() {
            return;
        }

        let stride = width as usize * 4;
        let row_bytes = (max_x - rect.x) as usize * 4;
        let mut row_start = rect.y as usize * stride + rect.x as usize * 4;
        for _ in rect.y..max_y {
            f(&mut self.frame[row_start..row_start + row_bytes]);
            row_start += stride;
        }
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.size.width || y >= self.size.height {
            return;
        }
        let idx = (y as usize * self.size.width as usize + x as usize) * 4;
        if let Some(px) = self.frame.get_mut(idx..idx + 4) {
            px.copy_from_slice(&color);
        }
    }

    fn draw_char(&mut self, x: u32, y: u32, ch: char, color: Color, scale: u32) {
        for (row, bits) in glyph_rows(ch).into_iter().enumerate() {
            let py0 = y.saturating_add((row as u32).saturating_mul(scale));
            for col in 0..GLYPH_W {
                if bits & (1u8 << (GLYPH_W - 1 - col)) == 0 {
                    continue;
                }
                let px0 = x.saturating_add(col.saturating_mul(scale));
                for dy in 0..scale {
                    for dx in 0..scale {
                        self.set_pixel(px0 + dx, py0 + dy, color);
                    }
                }
            }
        }
    }
}

impl Renderer2d for CpuRenderer<'_> {
    fn begin_frame(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.for_each_row(rect, |row| {
            for px in row.chunks_exact_mut(4) {
                px.copy_from_slice(&color);
            }
        });
    }

    fn blend_rect(&mut self, rect: Rect, color: Color, alpha: u8) {
        match alpha {
            0 => return,
            255 => return self.fill_rect(rect, color),
            _ => {}
        }

        let a = alpha as u32;
        let inv = 255 - a;
        self.for_each_row(rect, |row| {
            for px in row.chunks_exact_mut(4) {
                for c in 0..3 {
                    px[c] = ((px[c] as u32 * inv + color[c] as u32 * a + 127) / 255) as u8;
                }
                px[3] = 255;
            }
        });
    }

    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32) {
        let scale = scale.max(1);
        let adv_x = glyph_advance_x(scale);
        let adv_y = line_advance_y(scale);

        let mut cursor_x = x;
        let mut cursor_y = y;
        for ch in text.chars() {
            if cursor_y >= self.size.height {
                break;
            }
            match ch {
                '\n' => {
                    cursor_x = x;
                    cursor_y = cursor_y.saturating_add(adv_y);
                }
                ' ' => cursor_x = cursor_x.saturating_add(adv_x),
                _ => {
                    if cursor_x < self.size.width {
                        self.draw_char(cursor_x, cursor_y, ch, color, scale);
                    }
                    cursor_x = cursor_x.saturating_add(adv_x);
                }
            }
        }
    }
}

fn glyph_rows(ch: char) -> [u8; GLYPH_H as usize] {
    match ch.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],

        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b111, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b101, 0b111, 0b111, 0b111, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b111, 0b101, 0b111, 0b110, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],

        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],

        _ => [0b111, 0b001, 0b010, 0b000, 0b010], // '?'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_metrics_follow_glyph_grid() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("8", 2), 6);
        assert_eq!(text_width("2048", 1), 15);
        assert_eq!(text_width("AB\nLONGER", 1), 23);
        assert_eq!(text_height("X", 3), 15);
        assert_eq!(text_height("A\nB", 1), 11);
    }

    #[test]
    fn blend_rect_mixes_toward_color() {
        let size = SurfaceSize::new(2, 1);
        let mut frame = vec![0u8; size.rgba_len()];
        let mut cpu = CpuRenderer::new(&mut frame, size);
        cpu.blend_rect(Rect::new(0, 0, 1, 1), [255, 255, 255, 255], 128);
        assert_eq!(&frame[0..4], &[128, 128, 128, 255]);
        assert_eq!(&frame[4..8], &[0, 0, 0, 0]);
    }

    #[test]
    fn fill_rect_clips_to_surface() {
        let size = SurfaceSize::new(4, 4);
        let mut frame = vec![0u8; size.rgba_len()];
        let mut cpu = CpuRenderer::new(&mut frame, size);
        cpu.fill_rect(Rect::new(3, 3, 10, 10), [1, 2, 3, 4]);
        assert_eq!(&frame[frame.len() - 4..], &[1, 2, 3, 4]);
        assert_eq!(frame.iter().filter(|&&b| b == 4).count(), 1);
    }

    #[test]
    fn draw_text_centered_positions_glyph_inside_rect() {
        let size = SurfaceSize::new(20, 20);
        let mut frame = vec![0u8; size.rgba_len()];
        let mut cpu = CpuRenderer::new(&mut frame, size);
        // "1" is 3x5 at scale 1; centred in 20x20 it starts at (8, 7).
        cpu.draw_text_centered(Rect::from_size(20, 20), "1", [255, 0, 0, 255], 1);
        let top_middle = ((7 * 20 + 9) * 4) as usize;
        assert_eq!(&frame[top_middle..top_middle + 4], &[255, 0, 0, 255]);
    }
}
