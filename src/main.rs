// What you SEE:
// • The input image, displaced by the selected pattern, fills the window.
// • Hold Left Mouse: a magnifier follows the cursor.
// • M / arrows / A D / Q E change the effect; R randomizes; S saves a PNG. ESC quits.
// With --headless nothing is shown: the image is rendered once and written out.

mod config;
mod draw;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use config::{Args, HELP, PatternArg};
use draw::{Action, Drawer, draw_crosshair, draw_magnifier, draw_text_5x7};
use pattern_glass::{
    DisplacementMode, DisplacementParams, MagnifierRequest, PatternGallery, PatternRef,
    PixelBuffer, Randomizer, Result, codec, displace, magnifier,
};

/// UI range for both shifts; the engine itself accepts any value.
const SHIFT_LIMIT: i32 = 100;
/// UI range for the scale.
const SCALE_MAX: f64 = 5.0;

fn main() {
    let mut input = pico_args::Arguments::from_env();

    if input.contains("--help") {
        print!("{}", HELP);
        return;
    }
    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let args = match Args::parse(input) {
        Ok(args) => args,
        Err(e) => {
            println!("{}", HELP);
            eprintln!("Error: {}.", e);
            std::process::exit(1);
        }
    };

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let source = codec::load(&args.input)?;

    let mut gallery = PatternGallery::new();
    for path in &args.custom_patterns {
        gallery.add_custom(codec::load(path)?)?;
    }
    let mut pattern = match &args.pattern {
        PatternArg::Ref(r) => {
            gallery.get(*r)?;
            *r
        }
        PatternArg::File(path) => gallery.add_custom(codec::load(path)?)?,
    };

    log::info!(
        "gallery: {} built-in, {} custom patterns",
        gallery.builtin_count(),
        gallery.custom_count()
    );
    for r in gallery.refs() {
        log::debug!("  {r} {}", gallery.name(r));
    }

    // An explicit --mode wins over the slot pairing, also after --random.
    let mode_pinned = args.mode.is_some();
    let mut params = args.params(gallery.slot(pattern).unwrap_or(0));
    let mut randomizer = Randomizer::new();
    if args.random {
        let draw = randomizer.draw_with_pattern(&gallery);
        draw.apply_with_pattern(&mut params, &mut pattern, &gallery, mode_pinned);
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(codec::DEFAULT_EXPORT_NAME));

    if args.headless {
        let out = displace::apply(&source, gallery.get(pattern)?, &params)?;
        return codec::save_png(&out, &output_path);
    }

    let preview = Preview {
        source,
        gallery,
        pattern,
        params,
        mode_pinned,
        randomizer,
        output_path,
        zoom: args.zoom,
        magnifier_size: args.magnifier_size,
    };
    preview.run()
}

/// Everything the interactive loop owns.
struct Preview {
    source: PixelBuffer,
    gallery: PatternGallery,
    pattern: PatternRef,
    params: DisplacementParams,
    /// Set by `--mode` or `M`; a pattern change from `R` then keeps the mode.
    mode_pinned: bool,
    randomizer: Randomizer<rand::rngs::ThreadRng>,
    output_path: PathBuf,
    zoom: f64,
    magnifier_size: u32,
}

impl Preview {
    fn run(mut self) -> Result<()> {
        let (w, h) = (self.source.width() as usize, self.source.height() as usize);
        let mut drawer = Drawer::new("Pattern Glass", w, h)?;

        /* --- The displaced image, re-rendered only when a parameter changes --- */
        let mut output = self.render()?;
        let mut base = output.to_frame_buffer();
        let mut screen = base.clone();

        /* --- HUD / FPS --- */
        let mut last_fps_time = Instant::now();
        let mut frames_this_second: u32 = 0;
        let mut hud_fps_text = String::from("FPS: 0.0");

        while drawer.is_open() && !drawer.esc_pressed() {
            let now = Instant::now();

            /* 1) Inputs */
            let (actions, save) = split_save(drawer.actions());
            let mut dirty = false;
            for action in actions {
                dirty |= self.handle(action);
            }

            /* 2) Re-displace if anything changed, then export what is on screen */
            if dirty {
                output = self.render()?;
                base = output.to_frame_buffer();
            }
            if save {
                // A failed export should not close the preview.
                if let Err(e) = codec::save_png(&output, &self.output_path) {
                    log::error!("{e}");
                }
            }
            screen.pixels.copy_from_slice(&base.pixels);

            /* 3) Magnifier + crosshair under the cursor */
            if let Some((mx, my)) = drawer.mouse_pos() {
                if drawer.left_mouse_down() {
                    let request = MagnifierRequest {
                        zoom: self.zoom,
                        focal: (mx as f64, my as f64),
                        output_size: self.magnifier_size,
                    };
                    let view = magnifier::extract(&output, &request)?;
                    draw_magnifier(
                        &mut screen,
                        &view.to_frame_buffer(),
                        mx as i32,
                        my as i32,
                        0x00_FF_FF_FF,
                    );
                }
                draw_crosshair(&mut screen, mx as i32, my as i32, 10, 0x00_FF_CC_33);
            }

            /* 4) HUD */
            let hud = format!(
                "{} | X: {} Y: {} | SCALE: {:.1} | {} {} | {}",
                self.params.mode,
                self.params.x_shift,
                self.params.y_shift,
                self.params.scale,
                self.pattern,
                self.gallery.name(self.pattern),
                hud_fps_text
            );
            draw_text_5x7(&mut screen, 8, 8, &hud, 0x00_FF_FF_FF);

            drawer.present(&screen)?;

            /* 5) FPS, once per second */
            frames_this_second += 1;
            if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
                let secs = now.duration_since(last_fps_time).as_secs_f32();
                let fps = frames_this_second as f32 / secs;
                log::trace!("FPS: {:.1}", fps);
                hud_fps_text = format!("FPS: {:.1}", fps);
                frames_this_second = 0;
                last_fps_time = now;
            }
        }

        Ok(())
    }

    fn render(&self) -> Result<PixelBuffer> {
        let started = Instant::now();
        let out = displace::apply(&self.source, self.gallery.get(self.pattern)?, &self.params)?;
        log::debug!("rendered in {:.2}ms", started.elapsed().as_micros() as f64 / 1000.0);
        Ok(out)
    }

    /// Apply one key action. Returns true when the image must be re-rendered.
    fn handle(&mut self, action: Action) -> bool {
        let p = &mut self.params;
        match action {
            Action::CycleMode => {
                p.mode = p.mode.next();
                self.mode_pinned = true;
            }
            Action::NextPattern | Action::PrevPattern => {
                self.pattern = if action == Action::NextPattern {
                    self.gallery.next(self.pattern)
                } else {
                    self.gallery.prev(self.pattern)
                };
                let slot = self.gallery.slot(self.pattern).unwrap_or(0);
                p.mode = DisplacementMode::for_slot(slot);
                self.mode_pinned = false;
            }
            Action::XShift(d) => p.x_shift = (p.x_shift + d).clamp(-SHIFT_LIMIT, SHIFT_LIMIT),
            Action::YShift(d) => p.y_shift = (p.y_shift + d).clamp(-SHIFT_LIMIT, SHIFT_LIMIT),
            Action::Scale(d) => {
                p.scale = ((p.scale + d) * 10.0).round().clamp(0.0, SCALE_MAX * 10.0) / 10.0;
            }
            Action::Randomize => {
                let draw = self.randomizer.draw_with_pattern(&self.gallery);
                draw.apply_with_pattern(p, &mut self.pattern, &self.gallery, self.mode_pinned);
            }
            // Exported by the loop after the frame's re-render.
            Action::Save => return false,
        }
        log::info!(
            "{} shift=({}, {}) scale={:.1} pattern={}",
            self.params.mode,
            self.params.x_shift,
            self.params.y_shift,
            self.params.scale,
            self.pattern
        );
        true
    }
}

/// Pull `Save` out of a frame's actions; the export runs once the others are applied.
fn split_save(actions: Vec<Action>) -> (Vec<Action>, bool) {
    let save = actions.contains(&Action::Save);
    let rest = actions.into_iter().filter(|&a| a != Action::Save).collect();
    (rest, save)
}
