//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! Pure (no I/O), so it can be unit-tested. Layout, left to right: the hold
//! box, the playfield, then the preview column and the score panel.

use crate::core::catalog;
use crate::core::GameSnapshot;
use crate::fb::{FrameBuffer, Rgb, Style};
use crate::types::{Pos, Shape, BOARD_HEIGHT, BOARD_WIDTH};

const FIELD_BG: Rgb = Rgb::new(30, 30, 40);
const HOLD_PANEL_W: u16 = 14;
const SIDE_PANEL_W: u16 = 14;
/// Terminal rows reserved per preview icon.
const ICON_ROWS: u16 = 3;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Transient decoration owned by the orchestrator, not by the game state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decor<'a> {
    /// Board rows painted solid white (line-clear flash).
    pub flash_rows: &'a [u8],
}

pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Lines shown on the pause/instructions screen.
    help: &'static [&'static str],
}

impl Default for GameView {
    fn default() -> Self {
        // Two columns per cell compensates for the usual glyph aspect ratio.
        Self { cell_w: 2, help: &[] }
    }
}

/// Top-left corners of the three regions, in terminal cells.
#[derive(Debug, Clone, Copy)]
struct Layout {
    hold_x: u16,
    field_x: u16,
    side_x: u16,
    top: u16,
    frame_w: u16,
    frame_h: u16,
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            ..Self::default()
        }
    }

    pub fn with_help(mut self, help: &'static [&'static str]) -> Self {
        self.help = help;
        self
    }

    fn layout(&self, viewport: Viewport) -> Layout {
        let frame_w = BOARD_WIDTH as u16 * self.cell_w + 2;
        let frame_h = BOARD_HEIGHT as u16 + 2;
        let total_w = HOLD_PANEL_W + frame_w + SIDE_PANEL_W;
        let hold_x = viewport.width.saturating_sub(total_w) / 2;
        let field_x = hold_x + HOLD_PANEL_W;
        Layout {
            hold_x,
            field_x,
            side_x: field_x + frame_w + 2,
            top: viewport.height.saturating_sub(frame_h) / 2,
            frame_w,
            frame_h,
        }
    }

    /// Render into an existing framebuffer (resized to the viewport).
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        decor: Decor<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Style::default().glyph(' '));
        let layout = self.layout(viewport);

        self.draw_field(fb, snap, &layout);
        for &row in decor.flash_rows {
            let style = Style::new(Rgb::WHITE, Rgb::WHITE);
            self.fill_row(fb, &layout, row as i8, '█', style);
        }
        self.draw_hold(fb, snap, &layout);
        self.draw_side_panel(fb, snap, &layout, viewport);

        if snap.game_over {
            self.draw_game_over(fb, snap, &layout);
        } else if snap.paused {
            self.draw_help(fb, &layout);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, decor: Decor<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, decor, viewport, &mut fb);
        fb
    }

    fn draw_field(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, layout: &Layout) {
        let border = Style::new(Rgb::new(200, 200, 200), Rgb::BLACK);
        fb.draw_box(layout.field_x, layout.top, layout.frame_w, layout.frame_h, border);

        let empty = Style::new(Rgb::new(90, 90, 100), FIELD_BG).dim();
        for (row, cells) in snap.board.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let pos = Pos::new(col as i8, row as i8);
                match cell {
                    Some(shape) => self.put_cell(fb, layout, pos, '█', block_style(*shape)),
                    None => self.put_cell(fb, layout, pos, '·', empty),
                }
            }
        }

        let Some(active) = snap.active else {
            return;
        };
        let ghost = Style::new(Rgb::new(170, 170, 170), FIELD_BG).dim();
        for pos in active.ghost {
            self.put_cell(fb, layout, pos, '░', ghost);
        }
        for pos in active.cells {
            self.put_cell(fb, layout, pos, '█', block_style(active.shape));
        }
    }

    /// Paint one board cell; positions off the field (including above it) are skipped.
    fn put_cell(&self, fb: &mut FrameBuffer, layout: &Layout, pos: Pos, ch: char, style: Style) {
        if pos.col < 0 || pos.row < 0 || pos.col >= BOARD_WIDTH as i8 || pos.row >= BOARD_HEIGHT as i8
        {
            return;
        }
        let x = layout.field_x + 1 + pos.col as u16 * self.cell_w;
        let y = layout.top + 1 + pos.row as u16;
        fb.fill_rect(x, y, self.cell_w, 1, ch, style);
    }

    fn fill_row(&self, fb: &mut FrameBuffer, layout: &Layout, row: i8, ch: char, style: Style) {
        for col in 0..BOARD_WIDTH as i8 {
            self.put_cell(fb, layout, Pos::new(col, row), ch, style);
        }
    }

    /// Mini icon of `shape`, anchored on its reference cell and nudged by the
    /// catalog's centering offset (half cells, so one column horizontally).
    fn draw_icon(&self, fb: &mut FrameBuffer, x: u16, y: u16, shape: Shape, style: Style) {
        let def = catalog::shape_def(shape);
        let anchor = def.spawn[0];
        let (off_x, off_y) = def.preview_offset;
        for cell in def.spawn {
            let cx = i32::from(x) + i32::from(cell.col - anchor.col) * 2 + i32::from(off_x);
            let cy = i32::from(y) + i32::from(cell.row - anchor.row) + i32::from(off_y / 2);
            if let (Ok(cx), Ok(cy)) = (u16::try_from(cx), u16::try_from(cy)) {
                fb.put_str(cx, cy, "██", style);
            }
        }
    }

    fn draw_hold(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, layout: &Layout) {
        let label = Style::default().bold();
        fb.put_str(layout.hold_x + 1, layout.top, "HOLD", label);
        fb.draw_box(layout.hold_x, layout.top + 1, HOLD_PANEL_W - 2, 4, Style::default().dim());
        if let Some(shape) = snap.held {
            let style = if snap.can_hold {
                block_style(shape)
            } else {
                block_style(shape).dim()
            };
            self.draw_icon(fb, layout.hold_x + 3, layout.top + 3, shape, style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        layout: &Layout,
        viewport: Viewport,
    ) {
        let x = layout.side_x;
        if x.saturating_add(SIDE_PANEL_W) > viewport.width {
            return;
        }
        let label = Style::default().bold();
        let value = Style::new(Rgb::new(200, 200, 200), Rgb::BLACK);

        let mut y = layout.top;
        fb.put_str(x, y, "NEXT", label);
        y += 1;
        for shape in &snap.preview {
            self.draw_icon(fb, x + 2, y + 1, *shape, block_style(*shape));
            y += ICON_ROWS;
        }
        y += 1;

        for (name, number) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
        ] {
            fb.put_str(x, y, name, label);
            fb.put_u32(x, y + 1, number, value);
            y += 3;
        }
    }

    fn draw_help(&self, fb: &mut FrameBuffer, layout: &Layout) {
        let style = Style::new(Rgb::WHITE, Rgb::BLACK);
        let mut y = layout.top + 2;
        self.put_centered(fb, layout, y, "PAUSED", style.bold());
        y += 2;
        let inner = layout.frame_w.saturating_sub(2);
        for line in self.help {
            fb.fill_rect(layout.field_x + 1, y, inner, 1, ' ', style);
            fb.put_str(layout.field_x + 1, y, line, style);
            y += 1;
        }
        y += 1;
        self.put_centered(fb, layout, y, "any key: resume", style.dim());
    }

    fn draw_game_over(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, layout: &Layout) {
        let style = Style::new(Rgb::WHITE, Rgb::BLACK).bold();
        let mid = layout.top + layout.frame_h / 2;
        self.put_centered(fb, layout, mid - 1, "GAME OVER", style);

        let line = format!("Score: {}", snap.score);
        self.put_centered(fb, layout, mid, &line, style);
    }

    fn put_centered(&self, fb: &mut FrameBuffer, layout: &Layout, y: u16, text: &str, style: Style) {
        let w = text.chars().count() as u16;
        let x = layout.field_x + layout.frame_w.saturating_sub(w) / 2;
        fb.put_str(x, y, text, style);
    }
}

fn block_style(shape: Shape) -> Style {
    Style::new(catalog::color_of(shape).into(), FIELD_BG).bold()
}
