use crate::charset::Charset;
use crate::engine::TranscodeOptions;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// 設定ファイルの構造
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 設定ファイルのバージョン
    pub version: String,
    /// 文字コードの既定値
    pub default_charset: Charset,
    /// 詳細出力をデフォルトで有効にするか
    pub default_verbose: bool,
    /// デフォルトの出力形式
    pub output_format: OutputFormat,
    /// ログレベル（error|warn|info|debug|trace）
    pub log_level: String,
    /// 変換オプション
    pub transcode: TranscodeOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            default_charset: Charset::Utf8,
            default_verbose: false,
            output_format: OutputFormat::Text,
            log_level: "warn".to_string(),
            transcode: TranscodeOptions::default(),
        }
    }
}

/// 設定ファイルを読み込み
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => get_default_config_path()?,
    };

    if !path.exists() {
        log::debug!("設定ファイルなし、既定値を使用: {}", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("設定ファイルの読み取りに失敗: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("設定ファイルの解析に失敗: {}", path.display()))?;

    log::debug!("設定ファイルを読み込み: {}", path.display());
    Ok(config)
}

/// デフォルトの設定ファイルパスを取得
pub fn get_default_config_path() -> Result<PathBuf> {
    let config_dir =
        dirs::config_dir().ok_or_else(|| anyhow!("設定ディレクトリが見つかりません"))?;

    Ok(config_dir.join("b64-transcoder").join("config.toml"))
}

/// 既定値で設定ファイルを作成
pub fn create_config_file(path: &Path) -> Result<()> {
    save_config(path, &Config::default())
}

/// 設定をファイルに保存
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("設定ディレクトリの作成に失敗: {}", parent.display()))?;
    }

    let toml_content =
        toml::to_string_pretty(config).context("設定ファイルの生成に失敗しました")?;

    fs::write(path, toml_content)
        .with_context(|| format!("設定ファイルの書き込みに失敗: {}", path.display()))?;

    Ok(())
}

/// 設定ファイルを削除
pub fn delete_config_file(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)
            .with_context(|| format!("設定ファイルの削除に失敗: {}", path.display()))?;
    }
    Ok(())
}
