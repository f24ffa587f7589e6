//! Omniconvert Processing Library
//!
//! The converter classes. Each converter is a thin dispatch table from
//! (source format, target format) to a library call or an ffmpeg
//! invocation; there is no conversion logic of our own here. The crate also
//! carries the upload validator, the conversion-warning table, and the ZIP
//! archive builder for the download center.

pub mod archive;
pub mod convert;
pub mod ffmpeg;
pub mod validator;
pub mod warnings;

pub use convert::{ConversionService, ConvertedOutput};
pub use ffmpeg::FfmpegRunner;
pub use validator::{validator_for_category, MediaValidator, ValidationError};
pub use warnings::conversion_warnings;
