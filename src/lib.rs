pub mod charset;
pub mod config;
pub mod engine;
pub mod error;
pub mod outcome;

// 公開API
pub use charset::Charset;
pub use config::{Config, OutputFormat};
pub use engine::{
    AsciiOverflow, Direction, TranscodeOptions, Transcoder, decode, decode_with, encode,
    encode_with, is_strict_base64, is_valid_base64, transcode_auto,
};
pub use error::TranscodeError;
pub use outcome::Outcome;
