use thiserror::Error;

/// 変換処理のエラー
///
/// 表示文字列はホスト側にそのまま表示される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscodeError {
    #[error("No text provided for encoding")]
    EmptyText,

    #[error("No Base64 string provided for decoding")]
    EmptyBase64,

    #[error("Invalid Base64 input")]
    InvalidBase64,

    #[error("Unsupported character encoding: {0}")]
    UnsupportedCharset(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Decoding error: {0}")]
    Decoding(String),
}

impl TranscodeError {
    /// 機械処理向けの分類タグ
    pub fn kind(&self) -> &'static str {
        match self {
            TranscodeError::EmptyText | TranscodeError::EmptyBase64 => "empty_input",
            TranscodeError::InvalidBase64 => "invalid_base64_syntax",
            TranscodeError::UnsupportedCharset(_) => "unsupported_charset",
            TranscodeError::Encoding(_) => "encoding_failure",
            TranscodeError::Decoding(_) => "decoding_failure",
        }
    }
}
