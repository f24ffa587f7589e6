//! Validation modules

pub mod filename;

pub use filename::{
    clean_filename, validate_batch_size, validate_filename, FilenameError, MAX_BATCH_SIZE,
    MAX_FILENAME_LENGTH,
};
