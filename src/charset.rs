use crate::error::TranscodeError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// テキストとバイト列の対応規則
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Charset {
    #[default]
    #[serde(rename = "UTF-8")]
    Utf8,
    #[serde(rename = "ASCII")]
    Ascii,
    #[serde(rename = "ISO-8859-1")]
    Iso8859_1,
    #[serde(rename = "UTF-16")]
    Utf16,
}

impl Charset {
    /// 選択肢の表示順
    pub const ALL: [Charset; 4] = [
        Charset::Utf8,
        Charset::Ascii,
        Charset::Iso8859_1,
        Charset::Utf16,
    ];

    /// ホスト側とやり取りするラベル
    pub fn label(self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Ascii => "ASCII",
            Charset::Iso8859_1 => "ISO-8859-1",
            Charset::Utf16 => "UTF-16",
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Charset {
    type Err = TranscodeError;

    // ラベルは大文字小文字を区別して完全一致のみ受け付ける
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Charset::ALL
            .into_iter()
            .find(|charset| charset.label() == s)
            .ok_or_else(|| TranscodeError::UnsupportedCharset(s.to_string()))
    }
}
