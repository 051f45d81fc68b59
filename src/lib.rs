//! Pattern glass: displace an image by a tileable pattern.
//!
//! Each output pixel is copied (nearest neighbour) from a source location
//! pushed along x, y or outward from the centre by the red channel of a
//! tiled pattern. A magnifier cuts zoomed views out of the result.
//!
//! ```no_run
//! use pattern_glass::{DisplacementParams, PatternGallery, PatternRef, codec, displace};
//!
//! let source = codec::load("photo.jpg")?;
//! let gallery = PatternGallery::new();
//! let pattern = gallery.get(PatternRef::Builtin(1))?;
//! let out = displace::apply(&source, pattern, &DisplacementParams::default())?;
//! codec::save_png(&out, codec::DEFAULT_EXPORT_NAME)?;
//! # Ok::<(), pattern_glass::Error>(())
//! ```

pub mod codec;
pub mod displace;
pub mod error;
pub mod gallery;
pub mod magnifier;
pub mod randomize;
pub mod types;

pub use error::{Error, Result};
pub use gallery::PatternGallery;
pub use randomize::{RandomDraw, Randomizer};
pub use types::{
    DisplacementMode, DisplacementParams, FrameBuffer, MagnifierRequest, PatternRef, PixelBuffer,
};
