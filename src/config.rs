// Command-line options for the preview / export tool.

use std::path::PathBuf;

use pattern_glass::{DisplacementMode, DisplacementParams, PatternRef};

pub const DEFAULT_ZOOM: f64 = 3.0;
pub const DEFAULT_MAGNIFIER_SIZE: u32 = 160;

pub const HELP: &str = "\
pattern-glass displaces an image by a tileable pattern (pattern glass, noise and glitch effects).

USAGE:
  pattern-glass [OPTIONS] <input> [<output>]

  pattern-glass photo.jpg                          # interactive preview
  pattern-glass -p builtin:3 -m radial photo.jpg   # pick a pattern and mode
  pattern-glass --headless --x-shift=-20 photo.jpg out.png

OPTIONS:
      --help                  Prints this help
  -V, --version               Prints version

  -p, --pattern REF|PATH      builtin:N, custom:N or an image file
                              [default: builtin:0]
      --custom-pattern PATH   Loads a custom pattern (custom:0, custom:1, ...)
                              This option can be set multiple times
  -x, --x-shift N             Pattern offset along x [default: 15]
  -y, --y-shift N             Pattern offset along y [default: 0]
                              Negative values need the '=' form: --y-shift=-8
  -s, --scale F               Displacement strength, >= 0 [default: 1]
  -m, --mode MODE             horizontal, vertical or radial
                              [default: paired with the pattern slot]
      --random                Randomizes shifts, scale and pattern first

  -z, --zoom F                Magnifier zoom, >= 1 [default: 3]
      --magnifier-size N      Magnifier side in pixels [default: 160]

      --headless              Renders once, writes <output> and exits
  -v, --verbose               Enables debug logging

ARGS:
  <input>                     Image to displace
  <output>                    PNG to write [default: displaced_image.png]

KEYS (preview):
  M mode, Left/Right pattern, A/D x shift, Up/Down y shift, Q/E scale,
  R random, S save, hold LMB to magnify, Esc quit
";

/// A pattern given on the command line.
#[derive(Clone, Debug, PartialEq)]
pub enum PatternArg {
    Ref(PatternRef),
    /// Loaded and registered as the next custom pattern.
    File(PathBuf),
}

#[derive(Clone, Debug)]
pub struct Args {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub pattern: PatternArg,
    pub custom_patterns: Vec<PathBuf>,
    pub x_shift: i32,
    pub y_shift: i32,
    pub scale: f64,
    pub mode: Option<DisplacementMode>,
    pub random: bool,
    pub zoom: f64,
    pub magnifier_size: u32,
    pub headless: bool,
    pub verbose: bool,
}

impl Args {
    /// Parse everything except `--help` / `--version`, which `main` handles first.
    pub fn parse(mut input: pico_args::Arguments) -> Result<Self, pico_args::Error> {
        let defaults = DisplacementParams::default();

        let args = Args {
            pattern: input
                .opt_value_from_fn(["-p", "--pattern"], parse_pattern)?
                .unwrap_or(PatternArg::Ref(PatternRef::Builtin(0))),
            custom_patterns: input.values_from_str("--custom-pattern")?,
            x_shift: input
                .opt_value_from_str(["-x", "--x-shift"])?
                .unwrap_or(defaults.x_shift),
            y_shift: input
                .opt_value_from_str(["-y", "--y-shift"])?
                .unwrap_or(defaults.y_shift),
            scale: input
                .opt_value_from_fn(["-s", "--scale"], parse_scale)?
                .unwrap_or(defaults.scale),
            mode: input.opt_value_from_str(["-m", "--mode"])?,
            random: input.contains("--random"),
            zoom: input
                .opt_value_from_fn(["-z", "--zoom"], parse_zoom)?
                .unwrap_or(DEFAULT_ZOOM),
            magnifier_size: input
                .opt_value_from_fn("--magnifier-size", parse_size)?
                .unwrap_or(DEFAULT_MAGNIFIER_SIZE),
            headless: input.contains("--headless"),
            verbose: input.contains(["-v", "--verbose"]),

            input: input.free_from_str()?,
            output: input.opt_free_from_str()?,
        };

        let rest = input.finish();
        if !rest.is_empty() {
            let cause = format!("unexpected arguments: {rest:?}");
            return Err(pico_args::Error::ArgumentParsingFailed { cause });
        }
        Ok(args)
    }

    /// Starting parameters; the mode falls back to the one paired with `slot`.
    pub fn params(&self, slot: usize) -> DisplacementParams {
        DisplacementParams {
            x_shift: self.x_shift,
            y_shift: self.y_shift,
            scale: self.scale,
            mode: self.mode.unwrap_or_else(|| DisplacementMode::for_slot(slot)),
        }
    }
}

fn parse_pattern(s: &str) -> Result<PatternArg, String> {
    if s.starts_with("builtin:") || s.starts_with("custom:") {
        return s.parse().map(PatternArg::Ref);
    }
    if s.is_empty() {
        return Err("pattern cannot be empty".to_string());
    }
    Ok(PatternArg::File(PathBuf::from(s)))
}

fn parse_scale(s: &str) -> Result<f64, String> {
    let n: f64 = s.parse().map_err(|_| "invalid scale")?;

    if n.is_finite() && n >= 0.0 {
        Ok(n)
    } else {
        Err("SCALE should be a non-negative number".to_string())
    }
}

fn parse_zoom(s: &str) -> Result<f64, String> {
    let n: f64 = s.parse().map_err(|_| "invalid zoom factor")?;

    if n.is_finite() && n >= 1.0 {
        Ok(n)
    } else {
        Err("ZOOM should be at least 1".to_string())
    }
}

fn parse_size(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid size")?;

    if n > 0 {
        Ok(n)
    } else {
        Err("SIZE cannot be zero".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn parse(args: &[&str]) -> Result<Args, pico_args::Error> {
        let args = args.iter().map(OsString::from).collect();
        Args::parse(pico_args::Arguments::from_vec(args))
    }

    #[test]
    fn defaults() {
        let a = parse(&["photo.png"]).unwrap();
        assert_eq!(a.input, PathBuf::from("photo.png"));
        assert_eq!(a.output, None);
        assert_eq!(a.pattern, PatternArg::Ref(PatternRef::Builtin(0)));
        assert_eq!((a.x_shift, a.y_shift, a.scale), (15, 0, 1.0));
        assert_eq!(a.mode, None);
        assert_eq!(a.zoom, DEFAULT_ZOOM);
        assert_eq!(a.magnifier_size, DEFAULT_MAGNIFIER_SIZE);
        assert!(!a.headless && !a.random && !a.verbose);
    }

    #[test]
    fn full_command_line() {
        let a = parse(&[
            "--headless",
            "-p",
            "custom:1",
            "--custom-pattern",
            "a.png",
            "--custom-pattern",
            "b.png",
            "--x-shift=-20",
            "-y",
            "7",
            "--scale=2.5",
            "-m",
            "radial",
            "--zoom=4",
            "in.png",
            "out.png",
        ])
        .unwrap();
        assert!(a.headless);
        assert_eq!(a.pattern, PatternArg::Ref(PatternRef::Custom(1)));
        assert_eq!(
            a.custom_patterns,
            vec![PathBuf::from("a.png"), PathBuf::from("b.png")]
        );
        assert_eq!((a.x_shift, a.y_shift, a.scale), (-20, 7, 2.5));
        assert_eq!(a.mode, Some(DisplacementMode::Radial));
        assert_eq!(a.zoom, 4.0);
        assert_eq!(a.output, Some(PathBuf::from("out.png")));
    }

    #[test]
    fn pattern_file_argument() {
        let a = parse(&["-p", "tiles/glass.png", "in.png"]).unwrap();
        assert_eq!(a.pattern, PatternArg::File(PathBuf::from("tiles/glass.png")));
        assert!(parse(&["-p", "builtin:x", "in.png"]).is_err());
    }

    #[test]
    fn value_checks() {
        assert!(parse(&["--scale=-1", "in.png"]).is_err());
        assert!(parse(&["--zoom=0.5", "in.png"]).is_err());
        assert!(parse(&["--magnifier-size", "0", "in.png"]).is_err());
        assert!(parse(&["-m", "diagonal", "in.png"]).is_err());
        assert!(parse(&[]).is_err());
        assert!(matches!(
            parse(&["a.png", "b.png", "c.png"]),
            Err(pico_args::Error::ArgumentParsingFailed { .. })
        ));
    }

    #[test]
    fn mode_follows_slot_unless_given() {
        let a = parse(&["in.png"]).unwrap();
        assert_eq!(a.params(2).mode, DisplacementMode::Radial);
        assert_eq!(a.params(4).mode, DisplacementMode::Vertical);
        let a = parse(&["-m", "h", "in.png"]).unwrap();
        assert_eq!(a.params(2).mode, DisplacementMode::Horizontal);
    }
}
