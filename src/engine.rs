use crate::charset::Charset;
use crate::error::TranscodeError;
use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose},
};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ブラウザの atob と同じく、パディングの有無と末尾の余りビットを許容するデコーダ
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// ASCII 指定時に U+00FF を超える文字をどう扱うか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsciiOverflow {
    /// エンコードエラーにする
    #[default]
    Reject,
    /// 0xFF に丸める
    Clamp,
    /// '?' に置き換える
    Substitute,
}

impl AsciiOverflow {
    fn resolve(self, position: usize, ch: char) -> Result<u8, TranscodeError> {
        match self {
            AsciiOverflow::Reject => Err(TranscodeError::Encoding(format!(
                "character {ch:?} (U+{:04X}) at position {position} is outside the single-byte range",
                ch as u32
            ))),
            AsciiOverflow::Clamp => Ok(0xFF),
            AsciiOverflow::Substitute => Ok(b'?'),
        }
    }
}

/// 変換オプション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeOptions {
    /// ASCII の範囲外文字の扱い
    pub ascii_overflow: AsciiOverflow,
    /// 長さとパディングまで検査する厳格モード
    pub strict_base64: bool,
}

/// 自動判定で選ばれた変換方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Encode,
    Decode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encode => f.write_str("encode"),
            Direction::Decode => f.write_str("decode"),
        }
    }
}

/// 文字コードを考慮した Base64 変換器
///
/// 状態を持たないため、複数スレッドから同時に呼び出してよい。
#[derive(Debug, Clone, Copy, Default)]
pub struct Transcoder {
    options: TranscodeOptions,
}

impl Transcoder {
    pub fn new(options: TranscodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TranscodeOptions {
        &self.options
    }

    /// テキストを Base64 にエンコード（文字コードはラベルで指定）
    pub fn encode(&self, text: &str, charset: &str) -> Result<String, TranscodeError> {
        // 空入力は文字コードの判定より先に報告する
        if text.is_empty() {
            return Err(TranscodeError::EmptyText);
        }
        let charset = charset.parse::<Charset>()?;
        self.encode_with(text, charset)
    }

    /// テキストを Base64 にエンコード
    pub fn encode_with(&self, text: &str, charset: Charset) -> Result<String, TranscodeError> {
        if text.is_empty() {
            return Err(TranscodeError::EmptyText);
        }

        let bytes = text_to_bytes(text, charset, self.options.ascii_overflow)?;
        let encoded = general_purpose::STANDARD.encode(&bytes);

        debug!(
            "encoded {} chars as {charset}: {} bytes -> {} Base64 chars",
            text.chars().count(),
            bytes.len(),
            encoded.len()
        );
        Ok(encoded)
    }

    /// Base64 をテキストにデコード（文字コードはラベルで指定）
    ///
    /// 構文チェックは文字コードの判定より先に行う。
    pub fn decode(&self, base64: &str, charset: &str) -> Result<String, TranscodeError> {
        self.check_base64(base64)?;
        let charset = charset.parse::<Charset>()?;
        self.decode_checked(base64, charset)
    }

    /// Base64 をテキストにデコード
    pub fn decode_with(&self, base64: &str, charset: Charset) -> Result<String, TranscodeError> {
        self.check_base64(base64)?;
        self.decode_checked(base64, charset)
    }

    /// 入力が Base64 として妥当ならデコード、そうでなければエンコード
    pub fn transcode_auto(
        &self,
        input: &str,
        charset: &str,
    ) -> Result<(Direction, String), TranscodeError> {
        let direction = if self.is_valid(input) {
            Direction::Decode
        } else {
            Direction::Encode
        };
        debug!("auto-detected direction: {direction}");

        let value = match direction {
            Direction::Encode => self.encode(input, charset)?,
            Direction::Decode => self.decode(input, charset)?,
        };
        Ok((direction, value))
    }

    /// 現在のモードで Base64 構文を検査
    pub fn is_valid(&self, s: &str) -> bool {
        if self.options.strict_base64 {
            is_strict_base64(s)
        } else {
            is_valid_base64(s)
        }
    }

    fn check_base64(&self, base64: &str) -> Result<(), TranscodeError> {
        if base64.is_empty() {
            return Err(TranscodeError::EmptyBase64);
        }
        if !self.is_valid(base64) {
            trace!("rejected Base64 input of {} bytes", base64.len());
            return Err(TranscodeError::InvalidBase64);
        }
        Ok(())
    }

    fn decode_checked(&self, base64: &str, charset: Charset) -> Result<String, TranscodeError> {
        let bytes = if self.options.strict_base64 {
            general_purpose::STANDARD
                .decode(base64)
                .map_err(|e| TranscodeError::Decoding(e.to_string()))?
        } else {
            forgiving_decode(base64)?
        };

        let byte_len = bytes.len();
        let text = bytes_to_text(bytes, charset)?;

        debug!(
            "decoded {} Base64 chars as {charset}: {byte_len} bytes -> {} chars",
            base64.len(),
            text.chars().count()
        );
        Ok(text)
    }
}

/// テキストを Base64 にエンコード（既定オプション）
pub fn encode(text: &str, charset: &str) -> Result<String, TranscodeError> {
    Transcoder::default().encode(text, charset)
}

/// テキストを Base64 にエンコード（既定オプション）
pub fn encode_with(text: &str, charset: Charset) -> Result<String, TranscodeError> {
    Transcoder::default().encode_with(text, charset)
}

/// Base64 をテキストにデコード（既定オプション）
pub fn decode(base64: &str, charset: &str) -> Result<String, TranscodeError> {
    Transcoder::default().decode(base64, charset)
}

/// Base64 をテキストにデコード（既定オプション）
pub fn decode_with(base64: &str, charset: Charset) -> Result<String, TranscodeError> {
    Transcoder::default().decode_with(base64, charset)
}

/// 入力に応じてエンコードかデコードを選んで実行（既定オプション）
pub fn transcode_auto(input: &str, charset: &str) -> Result<(Direction, String), TranscodeError> {
    Transcoder::default().transcode_auto(input, charset)
}

/// 緩い Base64 構文チェック
///
/// 末尾の '=' をすべて取り除き、残りが標準アルファベットだけで構成されていれば true。
/// 長さやパディング数の整合性は見ないので、"====" も true になる。
pub fn is_valid_base64(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    s.trim_end_matches('=').bytes().all(is_alphabet_byte)
}

/// 厳格な Base64 構文チェック
///
/// 長さが4の倍数で、パディングは末尾の2文字以内に限る。
pub fn is_strict_base64(s: &str) -> bool {
    if s.is_empty() || s.len() % 4 != 0 {
        return false;
    }
    let data = s
        .strip_suffix("==")
        .or_else(|| s.strip_suffix('='))
        .unwrap_or(s);
    data.bytes().all(is_alphabet_byte)
}

/// atob 相当のデコード
///
/// パディングは長さが4の倍数のときだけ認める。"Zg=" のような途中までのパディングは不正。
fn forgiving_decode(base64: &str) -> Result<Vec<u8>, TranscodeError> {
    if base64.ends_with('=') && base64.len() % 4 != 0 {
        return Err(TranscodeError::Decoding(format!(
            "padded input length {} is not a multiple of 4",
            base64.len()
        )));
    }
    FORGIVING
        .decode(base64)
        .map_err(|e| TranscodeError::Decoding(e.to_string()))
}

fn is_alphabet_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+' || b == b'/'
}

fn text_to_bytes(
    text: &str,
    charset: Charset,
    overflow: AsciiOverflow,
) -> Result<Vec<u8>, TranscodeError> {
    match charset {
        Charset::Utf8 => Ok(text.as_bytes().to_vec()),
        // リトルエンディアン、BOMなし
        Charset::Utf16 => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
        // 範囲外は '?' に置換（不可逆）
        Charset::Iso8859_1 => Ok(text
            .chars()
            .map(|ch| u8::try_from(ch).unwrap_or(b'?'))
            .collect()),
        Charset::Ascii => text
            .chars()
            .enumerate()
            .map(|(position, ch)| match u8::try_from(ch) {
                Ok(byte) => Ok(byte),
                Err(_) => overflow.resolve(position, ch),
            })
            .collect(),
    }
}

fn bytes_to_text(bytes: Vec<u8>, charset: Charset) -> Result<String, TranscodeError> {
    match charset {
        // 0x80-0xFF も Latin-1 の文字としてそのまま通す
        Charset::Ascii | Charset::Iso8859_1 => Ok(bytes.into_iter().map(char::from).collect()),
        Charset::Utf8 => String::from_utf8(bytes).map_err(|e| TranscodeError::Decoding(e.to_string())),
        Charset::Utf16 => utf16_le_to_string(&bytes),
    }
}

fn utf16_le_to_string(bytes: &[u8]) -> Result<String, TranscodeError> {
    if bytes.len() % 2 != 0 {
        return Err(TranscodeError::Decoding(format!(
            "UTF-16 input has an odd number of bytes ({})",
            bytes.len()
        )));
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    String::from_utf16(&units).map_err(|e| TranscodeError::Decoding(e.to_string()))
}
