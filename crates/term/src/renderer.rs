//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Frames are diffed against the previous one and only changed runs are
//! rewritten. The encoders write crossterm commands into a byte buffer so they
//! can be tested without a terminal.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{FrameBuffer, Rgb, Style};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
    active: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(32 * 1024),
            active: false,
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        self.active = true;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    /// Undo [`enter`](Self::enter). Safe to call more than once.
    pub fn exit(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode().context("disable raw mode")?;
        Ok(())
    }

    /// Force the next draw to be a full redraw (terminal resized).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw `fb`, then swap it with the previous frame.
    ///
    /// After the call `fb` holds stale contents the caller is expected to
    /// overwrite; no frame is ever cloned.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        let mut prev = match self.last.take() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                encode_diff_into(&prev, fb, &mut self.buf)?;
                prev
            }
            Some(mut prev) => {
                encode_full_into(fb, &mut self.buf)?;
                prev.resize(fb.width(), fb.height());
                prev
            }
            None => {
                encode_full_into(fb, &mut self.buf)?;
                FrameBuffer::new(fb.width(), fb.height())
            }
        };
        self.flush_buf()?;

        std::mem::swap(&mut prev, fb);
        self.last = Some(prev);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut style = None;
    for y in 0..fb.height() {
        encode_run(fb, 0, y, fb.width(), &mut style, out)?;
    }
    finish(out)
}

/// Encode only the runs that differ from `prev` into `out`.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut style = None;
    for (x, y, len) in changed_runs(prev, next) {
        encode_run(next, x, y, len, &mut style, out)?;
    }
    finish(out)
}

fn encode_run(
    fb: &FrameBuffer,
    x: u16,
    y: u16,
    len: u16,
    current: &mut Option<Style>,
    out: &mut Vec<u8>,
) -> Result<()> {
    out.queue(cursor::MoveTo(x, y))?;
    for dx in 0..len {
        let glyph = fb.get(x + dx, y).unwrap_or_default();
        if *current != Some(glyph.style) {
            apply_style_into(out, glyph.style)?;
            *current = Some(glyph.style);
        }
        out.queue(Print(glyph.ch))?;
    }
    Ok(())
}

fn finish(out: &mut Vec<u8>) -> Result<()> {
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn apply_style_into(out: &mut Vec<u8>, style: Style) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Maximal horizontal runs `(x, y, len)` where the two frames differ.
/// Frames of different size are treated as entirely changed.
fn changed_runs(prev: &FrameBuffer, next: &FrameBuffer) -> Vec<(u16, u16, u16)> {
    let (w, h) = (next.width(), next.height());
    if prev.width() != w || prev.height() != h {
        return (0..h).map(|y| (0, y, w)).collect();
    }

    let mut runs = Vec::new();
    for y in 0..h {
        let mut start = None;
        for x in 0..w {
            let differs = prev.get(x, y) != next.get(x, y);
            match (differs, start) {
                (true, None) => start = Some(x),
                (false, Some(s)) => {
                    runs.push((s, y, x - s));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push((s, y, w - s));
        }
    }
    runs
}
