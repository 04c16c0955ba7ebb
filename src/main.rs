use anyhow::{Context, Result, bail};
use b64_transcoder::{
    Outcome, TranscodeOptions, Transcoder,
    config::{
        OutputFormat, create_config_file, delete_config_file, get_default_config_path, load_config,
    },
};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process::ExitCode,
};

#[derive(Parser, Debug)]
#[command(
    name = "b64-transcoder",
    version,
    about = "文字コードを指定してテキストとBase64を相互変換"
)]
struct Cli {
    /// 設定ファイルのパス
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// 文字コード（UTF-8|ASCII|ISO-8859-1|UTF-16）
    #[arg(short = 'c', long = "charset", global = true)]
    charset: Option<String>,

    /// 結果をJSONで出力
    #[arg(long, global = true)]
    json: bool,

    /// 長さとパディングまで検査する
    #[arg(long, global = true)]
    strict: bool,

    /// 詳細出力
    #[arg(short, long, global = true)]
    verbose: bool,

    /// ログレベル（error|warn|info|debug|trace）
    #[arg(long = "log-level", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// テキストをBase64にエンコード
    Encode(InputArgs),
    /// Base64をテキストにデコード
    Decode(InputArgs),
    /// 入力がBase64ならデコード、そうでなければエンコード
    Auto(InputArgs),
    /// Base64として妥当か検査
    Validate(InputArgs),
    /// 設定ファイルの管理
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// 入力テキスト（省略時は --file か標準入力）
    text: Option<String>,

    /// 入力ファイル
    #[arg(short = 'f', long = "file", conflicts_with = "text")]
    file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// 既定値で設定ファイルを作成
    Init {
        /// 既存のファイルを上書き
        #[arg(long)]
        force: bool,
    },
    /// 現在の設定を表示
    Show,
    /// 設定ファイルのパスを表示
    Path,
    /// 設定ファイルを削除
    Delete,
}

fn init_logger(level: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .try_init();
}

/// 入力テキストを取得（末尾の改行1つは取り除く）
fn read_input(args: &InputArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }

    let raw = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("入力ファイルの読み込みに失敗: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("標準入力の読み込みに失敗")?;
            buf
        }
    };

    Ok(trim_line_ending(raw))
}

fn trim_line_ending(mut s: String) -> String {
    if s.ends_with("\r\n") {
        s.truncate(s.len() - 2);
    } else if s.ends_with('\n') {
        s.truncate(s.len() - 1);
    }
    s
}

/// 結果を出力して終了コードを返す
fn emit(outcome: &Outcome, format: OutputFormat) -> Result<ExitCode> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string(outcome).context("結果のJSON変換に失敗")?;
            println!("{json}");
        }
        OutputFormat::Text => match outcome {
            Outcome::Success { value } => println!("{value}"),
            Outcome::Failure { error } => eprintln!("{error}"),
        },
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn config_path(cli_path: Option<&Path>) -> Result<PathBuf> {
    match cli_path {
        Some(p) => Ok(p.to_path_buf()),
        None => get_default_config_path(),
    }
}

/// 設定ファイルの操作（Show 以外はファイルの中身を解析しない）
fn run_config_action(action: &ConfigAction, path: &Path) -> Result<ExitCode> {
    match action {
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "設定ファイルが既に存在します（--force で上書き）: {}",
                    path.display()
                );
            }
            create_config_file(path)?;
            println!("設定ファイルを作成しました: {}", path.display());
        }
        ConfigAction::Show => {
            let config = load_config(Some(path))?;
            let content =
                toml::to_string_pretty(&config).context("設定ファイルの生成に失敗しました")?;
            print!("{content}");
        }
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Delete => {
            delete_config_file(path)?;
            println!("設定ファイルを削除しました: {}", path.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Encode,
    Decode,
    Auto,
    Validate,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 壊れた設定ファイルも作り直せるよう、設定の読み込みより先に処理する
    let (operation, args) = match &cli.command {
        Command::Config { action } => {
            init_logger(cli.log_level.as_deref().unwrap_or(if cli.verbose {
                "debug"
            } else {
                "warn"
            }));
            let path = config_path(cli.config.as_deref())?;
            return run_config_action(action, &path);
        }
        Command::Encode(args) => (Operation::Encode, args),
        Command::Decode(args) => (Operation::Decode, args),
        Command::Auto(args) => (Operation::Auto, args),
        Command::Validate(args) => (Operation::Validate, args),
    };

    let config = load_config(cli.config.as_deref())?;
    let verbose = cli.verbose || config.default_verbose;
    let level = match &cli.log_level {
        Some(level) => level.clone(),
        None if verbose => "debug".to_string(),
        None => config.log_level.clone(),
    };
    init_logger(&level);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        config.output_format
    };
    let charset = cli
        .charset
        .clone()
        .unwrap_or_else(|| config.default_charset.label().to_string());
    let transcoder = Transcoder::new(TranscodeOptions {
        strict_base64: cli.strict || config.transcode.strict_base64,
        ..config.transcode
    });
    debug!("operation={operation:?} charset={charset} options={:?}", transcoder.options());

    let input = read_input(args)?;
    match operation {
        Operation::Encode => {
            let outcome = Outcome::from(transcoder.encode(&input, &charset));
            if outcome.is_success() {
                info!("Text encoded successfully");
            }
            emit(&outcome, format)
        }
        Operation::Decode => {
            let outcome = Outcome::from(transcoder.decode(&input, &charset));
            if outcome.is_success() {
                info!("Base64 decoded successfully");
            }
            emit(&outcome, format)
        }
        Operation::Auto => {
            let result = transcoder
                .transcode_auto(&input, &charset)
                .map(|(direction, value)| {
                    info!("auto: {direction} succeeded");
                    value
                });
            emit(&Outcome::from(result), format)
        }
        Operation::Validate => {
            let valid = transcoder.is_valid(&input);
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({ "valid": valid, "strict": transcoder.options().strict_base64 })
                ),
                OutputFormat::Text => println!("{valid}"),
            }
            Ok(if valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
