// Window + software drawing utilities for the preview.
// On screen:
// 1) the displaced image,
// 2) a crosshair following the mouse and, while LMB is held, the magnifier next to it,
// 3) a one-line HUD in a tiny 5x7 bitmap font.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use pattern_glass::{Error, FrameBuffer, Result};

/// What a key press asks the preview to do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    CycleMode,
    NextPattern,
    PrevPattern,
    XShift(i32),
    YShift(i32),
    Scale(f64),
    Randomize,
    Save,
}

/// Key bindings in the order their actions are reported.
/// Shift and scale keys repeat while held; the rest fire once per press.
const BINDINGS: [(Key, KeyRepeat, Action); 11] = [
    (Key::M, KeyRepeat::No, Action::CycleMode),
    (Key::Right, KeyRepeat::No, Action::NextPattern),
    (Key::Left, KeyRepeat::No, Action::PrevPattern),
    (Key::A, KeyRepeat::Yes, Action::XShift(-1)),
    (Key::D, KeyRepeat::Yes, Action::XShift(1)),
    (Key::Up, KeyRepeat::Yes, Action::YShift(-1)),
    (Key::Down, KeyRepeat::Yes, Action::YShift(1)),
    (Key::Q, KeyRepeat::Yes, Action::Scale(-0.1)),
    (Key::E, KeyRepeat::Yes, Action::Scale(0.1)),
    (Key::R, KeyRepeat::No, Action::Randomize),
    (Key::S, KeyRepeat::No, Action::Save),
];

pub struct Drawer {
    window: Window,
}

impl Drawer {
    /// Open a window the size of the image.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        // Nothing animates on its own; no need to spin faster than this.
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push this frame's pixels to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<()> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Mouse position in buffer pixels, clamped to the window.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| (x.max(0.0), y.max(0.0)))
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Everything pressed since the last frame, in [`BINDINGS`] order.
    pub fn actions(&self) -> Vec<Action> {
        BINDINGS
            .iter()
            .filter(|&&(key, repeat, _)| self.window.is_key_pressed(key, repeat))
            .map(|&(_, _, action)| action)
            .collect()
    }
}

/* ---------- Software drawing: pixels, lines, crosshair, magnifier frame ---------- */

/// Set (x,y) if it is inside the framebuffer.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    fb.pixels[y * fb.width + x] = color;
}

/// Axis-aligned lines are all the preview needs.
fn hline(fb: &mut FrameBuffer, x0: i32, x1: i32, y: i32, color: u32) {
    for x in x0.min(x1)..=x0.max(x1) {
        put_pixel(fb, x, y, color);
    }
}

fn vline(fb: &mut FrameBuffer, x: i32, y0: i32, y1: i32, color: u32) {
    for y in y0.min(y1)..=y0.max(y1) {
        put_pixel(fb, x, y, color);
    }
}

/// A "+" with a small gap in the middle, centred at (cx,cy).
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    hline(fb, cx - size, cx - 3, cy, color);
    hline(fb, cx + 3, cx + size, cy, color);
    vline(fb, cx, cy - size, cy - 3, color);
    vline(fb, cx, cy + 3, cy + size, color);
    put_pixel(fb, cx, cy, color);
}

/// Copy `view` into `fb` with a 1px frame, next to the cursor at (cx,cy).
///
/// The view sits below-right of the cursor and flips to the other side when
/// it would leave the window.
pub fn draw_magnifier(fb: &mut FrameBuffer, view: &FrameBuffer, cx: i32, cy: i32, frame: u32) {
    const GAP: i32 = 16;
    let (vw, vh) = (view.width as i32, view.height as i32);

    let mut left = cx + GAP;
    if left + vw > fb.width as i32 {
        left = cx - GAP - vw;
    }
    let mut top = cy + GAP;
    if top + vh > fb.height as i32 {
        top = cy - GAP - vh;
    }

    for y in 0..vh {
        let row = &view.pixels[y as usize * view.width..(y as usize + 1) * view.width];
        for (x, &p) in row.iter().enumerate() {
            put_pixel(fb, left + x as i32, top + y, p);
        }
    }

    hline(fb, left - 1, left + vw, top - 1, frame);
    hline(fb, left - 1, left + vw, top + vh, frame);
    vline(fb, left - 1, top - 1, top + vh, frame);
    vline(fb, left + vw, top - 1, top + vh, frame);
}

/* ---------- 5x7 bitmap font (uppercase, digits, a little punctuation) ---------- */

// Each row's low 5 bits are pixels, bit 4 leftmost.
const FONT: &[(char, [u8; 7])] = &[
    ('0', [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
    ('1', [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('2', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
    ('3', [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110]),
    ('4', [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
    ('5', [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
    ('6', [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
    ('7', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
    ('8', [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
    ('9', [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
    ('A', [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('B', [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
    ('C', [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
    ('D', [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100]),
    ('E', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
    ('F', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('G', [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
    ('H', [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('I', [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('J', [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
    ('K', [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
    ('L', [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
    ('M', [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
    ('N', [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001]),
    ('O', [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('P', [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('Q', [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
    ('R', [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
    ('S', [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
    ('T', [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('U', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('V', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
    ('W', [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010]),
    ('X', [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
    ('Y', [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('Z', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
    (' ', [0; 7]),
    ('|', [0b00100; 7]),
    (':', [0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000]),
    ('.', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00000]),
    ('-', [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000]),
];

fn glyph(ch: char) -> Option<&'static [u8; 7]> {
    let ch = ch.to_ascii_uppercase();
    FONT.iter().find(|(c, _)| *c == ch).map(|(_, rows)| rows)
}

fn stamp_glyph(fb: &mut FrameBuffer, x: i32, y: i32, rows: &[u8; 7], color: u32) {
    for (ry, bits) in rows.iter().enumerate() {
        for rx in 0..5 {
            if bits & (1 << (4 - rx)) != 0 {
                put_pixel(fb, x + rx, y + ry as i32, color);
            }
        }
    }
}

/// Draw `text` with 6px advance; unknown characters leave a blank.
/// Each glyph gets a black drop shadow so it reads on any image.
pub fn draw_text_5x7(fb: &mut FrameBuffer, x: i32, y: i32, text: &str, color: u32) {
    for (i, ch) in text.chars().enumerate() {
        if let Some(rows) = glyph(ch) {
            let gx = x + 6 * i as i32;
            stamp_glyph(fb, gx + 1, y + 1, rows, 0x0000_0000);
            stamp_glyph(fb, gx, y, rows, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(w: usize, h: usize) -> FrameBuffer {
        FrameBuffer {
            width: w,
            height: h,
            pixels: vec![0; w * h],
        }
    }

    #[test]
    fn drawing_off_screen_is_ignored() {
        let mut fb = blank(8, 8);
        draw_crosshair(&mut fb, -20, 50, 6, 0xFF);
        draw_text_5x7(&mut fb, 100, 100, "MODE", 0xFF);
        assert!(fb.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn crosshair_leaves_gap() {
        let mut fb = blank(32, 32);
        draw_crosshair(&mut fb, 16, 16, 8, 0xAB);
        assert_eq!(fb.pixels[16 * 32 + 16], 0xAB);
        assert_eq!(fb.pixels[16 * 32 + 17], 0);
        assert_eq!(fb.pixels[16 * 32 + 24], 0xAB);
    }

    #[test]
    fn magnifier_flips_near_right_edge() {
        let mut fb = blank(100, 100);
        let view = FrameBuffer {
            width: 10,
            height: 10,
            pixels: vec![0x11; 100],
        };
        draw_magnifier(&mut fb, &view, 90, 10, 0xFF);
        // Left of the cursor: x in [64, 74), below it: y in [26, 36).
        assert_eq!(fb.pixels[30 * 100 + 64], 0x11);
        assert_eq!(fb.pixels[30 * 100 + 63], 0xFF);
        assert_eq!(fb.pixels[30 * 100 + 80], 0);
    }

    #[test]
    fn every_binding_has_its_own_key() {
        for (i, (key, _, _)) in BINDINGS.iter().enumerate() {
            assert!(BINDINGS[i + 1..].iter().all(|(k, _, _)| k != key));
        }
        assert!(BINDINGS.iter().any(|&(_, _, a)| a == Action::Save));
    }

    #[test]
    fn font_covers_hud_text() {
        for ch in "MODE: RADIAL | X: -15 Y: 0 | SCALE: 1.0 | BUILTIN:3 WAVES | FPS: 60.0".chars() {
            assert!(glyph(ch).is_some(), "missing glyph {ch:?}");
        }
    }
}
