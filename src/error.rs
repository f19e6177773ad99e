use thiserror::Error;

/// エラー型の定義
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to fetch data: {0}")]
    Fetch(String),

    #[error("cannot decode input as {encoding}: invalid byte sequence at offset {position}")]
    Decode { encoding: String, position: usize },

    #[error("CSV parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("duplicate column name: {0}")]
    DuplicateColumnName(String),

    #[error("inconsistent row count: expected {expected}, found {found}")]
    InconsistentRowCount { expected: usize, found: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid regular expression: {0}")]
    InvalidRegex(String),

    #[error("configuration error: {0}")]
    Config(String),

    // 下位ライブラリのエラー
    #[error("I/O error")]
    Io(#[source] std::io::Error),

    #[error("CSV error")]
    Csv(#[source] csv::Error),

    #[error("JSON error")]
    Json(#[source] serde_json::Error),
}

/// Resultの型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// 読み込み段階（デコード・CSV解析）で発生したエラーかどうか
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Error::Decode { .. } | Error::Parse { .. } | Error::Csv(_) | Error::UnsupportedEncoding(_)
        )
    }
}

// 標準エラーからの変換
impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidRegex(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
