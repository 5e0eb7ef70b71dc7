//! GameView: maps a `core::SessionSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Layout, top to bottom: the track frame (the sequence scrolls right to left
//! while a round is in play), then the selection pool grid. A side panel on
//! the right shows score, lives, round, mode and time.

use crate::core::{SessionSnapshot, TrackCell};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Family, SessionPhase, Tile};

/// Columns used by one tile label, e.g. `[B3]`.
pub const TILE_W: u16 = 4;
/// Columns from one tile to the next.
pub const TILE_PITCH: u16 = TILE_W + 1;
/// Inner width of the track frame.
pub const TRACK_INNER_W: u16 = 40;
/// Minimum columns for the side panel to be drawn.
pub const PANEL_W: u16 = 14;

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Screen positions computed for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub track_x: u16,
    pub track_y: u16,
    pub track_w: u16,
    pub pool_x: u16,
    pub pool_y: u16,
    pub pool_w: u16,
    pub pool_h: u16,
    pub block_w: u16,
    pub block_h: u16,
}

const BG: Rgb = Rgb::new(0, 0, 0);
const PLAY_BG: Rgb = Rgb::new(30, 30, 40);

/// A lightweight terminal renderer for the gap runner.
pub struct GameView {
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Where the track and pool frames land for `snap` in `viewport`.
    pub fn layout(&self, snap: &SessionSnapshot, viewport: Viewport) -> Layout {
        let track_w = TRACK_INNER_W + 2;
        let cols = snap.pool_cols.max(1) as u16;
        let rows = snap.pool_rows.max(1) as u16;
        let pool_w = cols * TILE_PITCH + 3;
        let pool_h = rows * 2 + 1;

        let block_w = track_w.max(pool_w);
        let block_h = 3 + 1 + pool_h;

        let start_x = viewport.width.saturating_sub(block_w + PANEL_W) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(block_h) / 2,
            AnchorY::Top => 0,
        };

        Layout {
            track_x: start_x,
            track_y: start_y,
            track_w,
            pool_x: start_x + block_w.saturating_sub(pool_w) / 2,
            pool_y: start_y + 4,
            pool_w,
            pool_h,
            block_w,
            block_h,
        }
    }

    /// Render the session into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, snap: &SessionSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        self.render_into_with_cursor(snap, None, viewport, fb);
    }

    /// As [`GameView::render_into`], highlighting the pool cell at `cursor`
    /// (row-major index).
    pub fn render_into_with_cursor(
        &self,
        snap: &SessionSnapshot,
        cursor: Option<usize>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(Rgb::new(220, 220, 220), BG).into_cell(' '));

        let layout = self.layout(snap, viewport);
        let border = CellStyle::new(Rgb::new(200, 200, 200), BG);
        let play = CellStyle::new(Rgb::new(80, 80, 90), PLAY_BG);

        // Track.
        fb.fill_rect(layout.track_x + 1, layout.track_y + 1, TRACK_INNER_W, 1, ' ', play);
        fb.draw_box(layout.track_x, layout.track_y, layout.track_w, 3, border);
        self.draw_track(fb, snap, &layout);

        // Pool.
        if snap.pool_rows > 0 && snap.pool_cols > 0 {
            fb.fill_rect(
                layout.pool_x + 1,
                layout.pool_y + 1,
                layout.pool_w - 2,
                layout.pool_h - 2,
                ' ',
                play,
            );
            fb.draw_box(layout.pool_x, layout.pool_y, layout.pool_w, layout.pool_h, border);
            self.draw_pool(fb, snap, cursor, &layout);
        }

        self.draw_side_panel(fb, snap, viewport, &layout);

        match snap.phase {
            SessionPhase::NotStarted => {
                self.draw_overlay_text(fb, &layout, 0, "PRESS R TO START");
            }
            SessionPhase::RoundComplete => {
                self.draw_overlay_text(fb, &layout, 0, "ROUND CLEAR");
            }
            SessionPhase::Ended => {
                self.draw_overlay_text(fb, &layout, 0, "GAME OVER");
                self.draw_overlay_text(fb, &layout, 2, "R: AGAIN  M: MODE  Q: QUIT");
            }
            SessionPhase::InRound => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SessionSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    pub fn render_with_cursor(
        &self,
        snap: &SessionSnapshot,
        cursor: Option<usize>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into_with_cursor(snap, cursor, viewport, &mut fb);
        fb
    }

    /// Leftmost column of the track's first tile, relative to the frame's
    /// inner edge. Enters from the right edge and leaves past the left edge
    /// as progress goes from 0 to 1. Centered while not in play.
    pub fn track_offset(&self, snap: &SessionSnapshot) -> i32 {
        let inner = TRACK_INNER_W as i32;
        let seq_w = (snap.track.len() as i32 * TILE_PITCH as i32 - 1).max(0);
        if snap.phase != SessionPhase::InRound {
            return (inner - seq_w) / 2;
        }
        let travel = (inner + seq_w) as f32;
        inner - (snap.progress.clamp(0.0, 1.0) * travel).round() as i32
    }

    fn draw_track(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, layout: &Layout) {
        if snap.track.is_empty() || snap.phase == SessionPhase::Ended {
            return;
        }
        let inner_x = layout.track_x + 1;
        let y = layout.track_y + 1;
        let origin = inner_x as i32 + self.track_offset(snap);

        for (slot, cell) in snap.track.iter().enumerate() {
            let x = origin + (slot as u16 * TILE_PITCH) as i32;
            let (chars, style) = match *cell {
                TrackCell::Shown(tile) => (tile_chars(tile), family_style(tile.family())),
                TrackCell::Placed(tile) => (
                    tile_chars(tile),
                    CellStyle::new(Rgb::new(100, 220, 120), PLAY_BG).bold(),
                ),
                TrackCell::Open(_) if snap.next_gap == Some(slot) => (
                    ['[', '?', '?', ']'],
                    CellStyle::new(Rgb::new(240, 220, 80), PLAY_BG).bold(),
                ),
                TrackCell::Open(_) => (
                    ['[', ' ', ' ', ']'],
                    CellStyle::new(Rgb::new(140, 140, 140), PLAY_BG),
                ),
            };
            fb.put_chars_clipped(x, y, chars, style, inner_x, TRACK_INNER_W);
        }
    }

    fn draw_pool(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        cursor: Option<usize>,
        layout: &Layout,
    ) {
        let empty = CellStyle::new(Rgb::new(90, 90, 100), PLAY_BG).dim();
        for row in 0..snap.pool_rows {
            for col in 0..snap.pool_cols {
                let index = row * snap.pool_cols + col;
                let x = layout.pool_x + 2 + col as u16 * TILE_PITCH;
                let y = layout.pool_y + 1 + row as u16 * 2;
                let (chars, mut style) = match snap.pool.get(index).copied().flatten() {
                    Some(tile) => (tile_chars(tile), family_style(tile.family())),
                    None => ([' ', '·', '·', ' '], empty),
                };
                if cursor == Some(index) {
                    style = style.inverted().bold();
                }
                for (i, ch) in chars.iter().enumerate() {
                    fb.put_char(x + i as u16, y, *ch, style);
                }
            }
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        viewport: Viewport,
        layout: &Layout,
    ) {
        let panel_x = layout.track_x.saturating_add(layout.block_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < PANEL_W - 2 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), BG);

        let mut y = layout.track_y;
        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LIVES", label);
        y = y.saturating_add(1);
        let hearts = CellStyle::new(Rgb::new(220, 80, 80), BG);
        for i in 0..snap.max_lives.max(snap.lives) {
            if i < snap.lives {
                fb.put_char(panel_x + i as u16, y, '♥', hearts);
            } else {
                fb.put_char(panel_x + i as u16, y, '·', value.dim());
            }
        }
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "ROUND", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.round, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "MODE", label);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, snap.mode.as_str(), value);
        y = y.saturating_add(2);

        if snap.phase == SessionPhase::InRound {
            fb.put_str(panel_x, y, "TIME", label);
            let end = fb.put_u32(panel_x + 5, y, (snap.remaining_ms / 1000) as u32, value);
            fb.put_char(end, y, 's', value);
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, layout: &Layout, line: u16, text: &str) {
        let mid_y = layout
            .pool_y
            .saturating_add(layout.pool_h / 2)
            .saturating_add(line);
        let text_w = text.chars().count() as u16;
        let x = layout
            .track_x
            .saturating_add(layout.block_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), BG).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

fn tile_chars(tile: Tile) -> [char; 4] {
    let digit = char::from_digit(tile.value() as u32, 10).unwrap_or('?');
    ['[', tile.family().letter(), digit, ']']
}

fn family_style(family: Family) -> CellStyle {
    let fg = match family {
        Family::Bamboo => Rgb::new(100, 200, 120),
        Family::Character => Rgb::new(220, 90, 90),
        Family::Dot => Rgb::new(90, 150, 230),
    };
    CellStyle::new(fg, PLAY_BG)
}
