// pandrs-eda コマンドラインドライバ
//
// 使い方:
//   pandrs-eda <PATH|URL> [--sep S] [--no-header] [--encoding E] [--rows N]
//              [--config FILE] [--json] [--download OUT.csv]
//
// ログは RUST_LOG で制御する（例: RUST_LOG=debug）

use std::process::ExitCode;

use log::error;
use pandrs_eda::{DataSource, Error, ExplorationSession, ExplorerConfig, Result, TextEncoding};

const USAGE: &str = "usage: pandrs-eda <PATH|URL> [--sep S] [--no-header] [--encoding E] \
[--rows N] [--config FILE] [--json] [--download OUT.csv]";

/// コマンドライン引数
#[derive(Debug, Default)]
struct Args {
    location: String,
    separator: Option<String>,
    no_header: bool,
    encoding: Option<TextEncoding>,
    rows: Option<usize>,
    config: Option<String>,
    json: bool,
    download: Option<String>,
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Args> {
    let mut parsed = Args::default();
    let mut location = None;

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| Error::InvalidInput(format!("{} needs a value", flag)))
        };
        match arg.as_str() {
            "--sep" => parsed.separator = Some(value("--sep")?),
            "--no-header" => parsed.no_header = true,
            "--encoding" => parsed.encoding = Some(value("--encoding")?.parse()?),
            "--rows" => {
                let rows = value("--rows")?;
                parsed.rows = Some(
                    rows.parse()
                        .map_err(|_| Error::InvalidInput(format!("invalid row count: {}", rows)))?,
                );
            }
            "--config" => parsed.config = Some(value("--config")?),
            "--json" => parsed.json = true,
            "--download" => parsed.download = Some(value("--download")?),
            flag if flag.starts_with("--") => {
                return Err(Error::InvalidInput(format!("unknown option: {}", flag)))
            }
            _ if location.is_none() => location = Some(arg),
            _ => return Err(Error::InvalidInput(format!("unexpected argument: {}", arg))),
        }
    }

    parsed.location = location.ok_or_else(|| Error::InvalidInput("missing data source".to_string()))?;
    Ok(parsed)
}

/// 設定ファイルの値をコマンドライン引数で上書きする
fn build_config(args: &Args) -> Result<ExplorerConfig> {
    let mut config = match &args.config {
        Some(path) => ExplorerConfig::from_file(path)?,
        None => ExplorerConfig::default(),
    };
    if let Some(sep) = &args.separator {
        config.csv.separator = sep.clone();
    }
    if args.no_header {
        config.csv.has_header = false;
    }
    if let Some(encoding) = args.encoding {
        config.csv.encoding = encoding;
    }
    if let Some(rows) = args.rows {
        config.report.preview_rows = rows;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let config = build_config(&args)?;
    let source = DataSource::parse(&args.location)?;

    // HTTPクライアントは組み込まないため、URLは取得エラーになる
    let mut session = ExplorationSession::new(config);
    let report = session.load_source(&source, None)?;

    if args.json {
        println!("{}", report.to_json_pretty()?);
    } else {
        print!("{}", report);
    }

    if let Some(out) = &args.download {
        std::fs::write(out, session.download_csv()?)?;
        eprintln!("wrote {}", out);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}", e);
            if e.is_load_error() {
                eprintln!("Error loading data: {}", e);
            } else {
                eprintln!("error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}
