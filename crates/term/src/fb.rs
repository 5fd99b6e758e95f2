//! Framebuffer and style types for terminal rendering.

use crate::types::Color;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
}

impl From<Color> for Rgb {
    fn from(color: Color) -> Self {
        let (r, g, b) = color.rgb();
        Self { r, g, b }
    }
}

/// Minimal per-glyph styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub dim: bool,
}

impl Style {
    pub const fn new(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg,
            bold: false,
            dim: false,
        }
    }

    pub const fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub const fn dim(self) -> Self {
        Self { dim: true, ..self }
    }

    pub const fn glyph(self, ch: char) -> Glyph {
        Glyph { ch, style: self }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new(Rgb::new(220, 220, 220), Rgb::BLACK)
    }
}

/// One terminal character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub style: Style,
}

impl Default for Glyph {
    fn default() -> Self {
        Style::default().glyph(' ')
    }
}

/// 2D framebuffer of styled glyphs, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    glyphs: Vec<Glyph>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            glyphs: vec![Glyph::default(); (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize, keeping the allocation when possible. Contents are unspecified afterwards.
    pub fn resize(&mut self, width: u16, height: u16) {
        if (self.width, self.height) == (width, height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.glyphs
            .resize((width as usize) * (height as usize), Glyph::default());
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Glyph> {
        self.idx(x, y).map(|i| self.glyphs[i])
    }

    /// Write one glyph; out-of-range writes are dropped.
    pub fn set(&mut self, x: u16, y: u16, glyph: Glyph) {
        if let Some(i) = self.idx(x, y) {
            self.glyphs[i] = glyph;
        }
    }

    pub fn clear(&mut self, glyph: Glyph) {
        self.glyphs.fill(glyph);
    }

    pub fn put_char(&mut self, x: u16, y: u16, ch: char, style: Style) {
        self.set(x, y, style.glyph(ch));
    }

    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: Style) {
        for (i, ch) in s.chars().enumerate() {
            let Some(cx) = x.checked_add(i as u16) else {
                break;
            };
            if cx >= self.width {
                break;
            }
            self.put_char(cx, y, ch, style);
        }
    }

    /// Write a number without allocating.
    pub fn put_u32(&mut self, x: u16, y: u16, value: u32, style: Style) {
        let mut digits = [0u8; 10];
        let mut n = value;
        let mut len = 0;
        loop {
            digits[len] = b'0' + (n % 10) as u8;
            len += 1;
            n /= 10;
            if n == 0 {
                break;
            }
        }
        for i in 0..len {
            self.put_char(x.saturating_add(i as u16), y, digits[len - 1 - i] as char, style);
        }
    }

    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: Style) {
        for dy in 0..h {
            for dx in 0..w {
                self.put_char(x.saturating_add(dx), y.saturating_add(dy), ch, style);
            }
        }
    }

    /// Single-line box outline with its top-left corner at `(x, y)`.
    pub fn draw_box(&mut self, x: u16, y: u16, w: u16, h: u16, style: Style) {
        if w < 2 || h < 2 {
            return;
        }
        let (right, bottom) = (x + w - 1, y + h - 1);
        for cx in x + 1..right {
            self.put_char(cx, y, '─', style);
            self.put_char(cx, bottom, '─', style);
        }
        for cy in y + 1..bottom {
            self.put_char(x, cy, '│', style);
            self.put_char(right, cy, '│', style);
        }
        self.put_char(x, y, '┌', style);
        self.put_char(right, y, '┐', style);
        self.put_char(x, bottom, '└', style);
        self.put_char(right, bottom, '┘', style);
    }

    /// Row `y` as a string (tests and debugging).
    pub fn row_string(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|g| g.ch)
            .collect()
    }
}
