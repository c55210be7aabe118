use crate::graphics::{Color, CpuRenderer, Renderer2d};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// An offscreen RGBA frame for headless rendering and tests.
///
/// Draws go through the same [`Renderer2d`] interface as the windowed path, so a frame
/// rendered here matches what the CPU backend would present.
#[derive(Debug, Clone)]
pub struct RgbaBufferSurface {
    size: SurfaceSize,
    buf: Vec<u8>,
}

impl RgbaBufferSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            buf: vec![0u8; size.rgba_len()],
        }
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn frame(&self) -> &[u8] {
        &self.buf
    }

    pub fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.buf.resize(size.rgba_len(), 0u8);
    }

    /// Runs `f` against a CPU renderer targeting this buffer.
    pub fn draw<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut dyn Renderer2d) -> R,
    {
        let mut cpu = CpuRenderer::new(&mut self.buf, self.size);
        cpu.begin_frame(self.size);
        f(&mut cpu)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = (y as usize * self.size.width as usize + x as usize) * 4;
        let px = self.buf.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Rect;

    #[test]
    fn draw_writes_through_cpu_renderer() {
        let mut surface = RgbaBufferSurface::new(SurfaceSize::new(8, 4));
        surface.draw(|gfx| gfx.fill_rect(Rect::new(2, 1, 2, 2), [9, 8, 7, 255]));

        assert_eq!(surface.pixel(2, 1), Some([9, 8, 7, 255]));
        assert_eq!(surface.pixel(3, 2), Some([9, 8, 7, 255]));
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(8, 0), None);
    }

    #[test]
    fn resize_tracks_buffer_length() {
        let mut surface = RgbaBufferSurface::new(SurfaceSize::new(2, 2));
        surface.resize(SurfaceSize::new(3, 5));
        assert_eq!(surface.frame().len(), 3 * 5 * 4);
        assert!(!surface.size().is_empty());
    }
}
