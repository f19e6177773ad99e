use csv::{ReaderBuilder, Writer};
use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::column::{Column, Float64Column, StringColumn};
use crate::error::{Error, Result};
use crate::io::encoding::TextEncoding;
use crate::DataFrame;

lazy_static! {
    /// 欠損として扱う既定のトークン
    pub static ref DEFAULT_NA_VALUES: Vec<String> = [
        "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None",
        "#N/A", "#NA", "<NA>", "1.#IND", "1.#QNAN", "-1.#IND", "-1.#QNAN", "#N/A N/A",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
}

/// CSV読み込みのオプション
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvReadOptions {
    /// 区切り文字。1文字のASCIIならCSVとして、それ以外は正規表現として扱う
    pub separator: String,
    /// 先頭行がヘッダーかどうか
    pub has_header: bool,
    /// 入力バイト列の文字コード
    pub encoding: TextEncoding,
    /// 欠損として扱う値
    pub na_values: Vec<String>,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            separator: ",".to_string(),
            has_header: true,
            encoding: TextEncoding::Utf8,
            na_values: DEFAULT_NA_VALUES.clone(),
        }
    }
}

impl CsvReadOptions {
    /// 既定のオプションを作成する
    pub fn new() -> Self {
        Self::default()
    }

    /// 区切り文字を設定する
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// ヘッダーの有無を設定する
    pub fn has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// 文字コードを設定する
    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// 欠損トークンを置き換える
    pub fn na_values(mut self, na_values: Vec<String>) -> Self {
        self.na_values = na_values;
        self
    }

    /// 区切り文字を検証する
    pub fn validate(&self) -> Result<()> {
        match self.delimiter() {
            Delimiter::Byte(_) => Ok(()),
            Delimiter::Pattern(pattern) if pattern.is_empty() => {
                Err(Error::InvalidInput("separator must not be empty".to_string()))
            }
            Delimiter::Pattern(pattern) => Regex::new(pattern).map(|_| ()).map_err(Error::from),
        }
    }

    fn delimiter(&self) -> Delimiter<'_> {
        let bytes = self.separator.as_bytes();
        if bytes.len() == 1 && bytes[0].is_ascii() {
            Delimiter::Byte(bytes[0])
        } else {
            Delimiter::Pattern(&self.separator)
        }
    }
}

/// 区切り文字の解釈
enum Delimiter<'a> {
    Byte(u8),
    Pattern(&'a str),
}

/// 行番号付きのレコード
type RawRecord = (usize, Vec<String>);

/// バイト列からDataFrameを読み込む
///
/// 文字コードでデコードし、レコードに分割し、列ごとに型を推論する。
/// 途中で失敗した場合は部分的なDataFrameを返さずにエラーを返す。
pub fn read_csv_bytes(bytes: &[u8], options: &CsvReadOptions) -> Result<DataFrame> {
    options.validate()?;
    let text = options.encoding.decode(bytes)?;
    debug!(
        "decoded {} bytes as {} into {} chars",
        bytes.len(),
        options.encoding,
        text.chars().count()
    );
    let df = parse_text(&text, options)?;
    info!(
        "loaded CSV: {} rows, {} columns",
        df.row_count(),
        df.column_count()
    );
    Ok(df)
}

/// デコード済みの文字列からDataFrameを読み込む
pub fn read_csv_str(text: &str, options: &CsvReadOptions) -> Result<DataFrame> {
    options.validate()?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    parse_text(text, options)
}

/// CSVファイルからDataFrameを読み込む
pub fn read_csv<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> Result<DataFrame> {
    let bytes = std::fs::read(path.as_ref()).map_err(Error::Io)?;
    read_csv_bytes(&bytes, options)
}

fn parse_text(text: &str, options: &CsvReadOptions) -> Result<DataFrame> {
    let records = match options.delimiter() {
        Delimiter::Byte(delim) => {
            debug!("tokenizing with CSV reader, delimiter {:?}", delim as char);
            split_quoted(text, delim)?
        }
        Delimiter::Pattern(pattern) => {
            debug!("tokenizing with regex separator {:?}", pattern);
            split_pattern(text, pattern)?
        }
    };

    let mut records = records.into_iter();

    // ヘッダー行を取得
    let (headers, first_data) = if options.has_header {
        match records.next() {
            Some((_, header)) => (dedupe_names(header), None),
            None => return Ok(DataFrame::new()),
        }
    } else {
        // ヘッダーがない場合は、最初の行の列数から "0", "1", ... とする
        match records.next() {
            Some(first) => (
                (0..first.1.len()).map(|i| i.to_string()).collect::<Vec<_>>(),
                Some(first),
            ),
            None => return Ok(DataFrame::new()),
        }
    };

    let width = headers.len();
    let na_values: HashSet<&str> = options.na_values.iter().map(String::as_str).collect();
    let mut raw_columns: Vec<Vec<Option<String>>> = vec![Vec::new(); width];

    // 各行を処理
    for (line, record) in first_data.into_iter().chain(records) {
        if record.len() > width {
            return Err(Error::Parse {
                line,
                message: format!("expected {} fields, saw {}", width, record.len()),
            });
        }
        if record.len() < width {
            warn!(
                "line {} has {} fields, padding to {} with missing values",
                line,
                record.len(),
                width
            );
        }
        let mut fields = record.into_iter();
        for column in raw_columns.iter_mut() {
            let cell = fields.next().filter(|f| !na_values.contains(f.as_str()));
            column.push(cell);
        }
    }

    // 列をDataFrameに追加
    let mut df = DataFrame::new();
    for (name, values) in headers.into_iter().zip(raw_columns) {
        df.add_column(name, infer_column(values))?;
    }
    Ok(df)
}

/// 引用符付きフィールドに対応したCSV分割
fn split_quoted(text: &str, delim: u8) -> Result<Vec<RawRecord>> {
    if let Some(line) = find_unterminated_quote(text, delim as char) {
        return Err(Error::Parse {
            line,
            message: "unterminated quoted field".to_string(),
        });
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delim)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|err| {
            let line = err.position().map(|p| p.line() as usize).unwrap_or(0);
            Error::Parse {
                line,
                message: err.to_string(),
            }
        })?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        records.push((line, record.iter().map(|f| f.to_string()).collect()));
    }
    Ok(records)
}

/// 閉じられていない引用符があれば、その開始行を返す
fn find_unterminated_quote(text: &str, delim: char) -> Option<usize> {
    let mut in_quotes = false;
    let mut field_start = true;
    let mut line = 1;
    let mut quote_line = 0;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else if c == '\n' {
                line += 1;
            }
            continue;
        }
        match c {
            '"' if field_start => {
                in_quotes = true;
                quote_line = line;
                field_start = false;
            }
            '\n' => {
                line += 1;
                field_start = true;
            }
            '\r' => {}
            c if c == delim => field_start = true,
            _ => field_start = false,
        }
    }

    if in_quotes {
        Some(quote_line)
    } else {
        None
    }
}

/// 正規表現の区切り文字で行ごとに分割する（引用符は解釈しない）
fn split_pattern(text: &str, pattern: &str) -> Result<Vec<RawRecord>> {
    let re = Regex::new(pattern)?;
    Ok(text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| (i + 1, re.split(line).map(|f| f.to_string()).collect()))
        .collect())
}

/// 列名を一意にする（2つ目の "x" は "x.1"、3つ目は "x.2"）
fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut result = Vec::with_capacity(names.len());

    for (i, name) in names.into_iter().enumerate() {
        let mut name = if name.is_empty() {
            format!("Unnamed: {}", i)
        } else {
            name
        };
        let mut cur_count = counts.get(&name).copied().unwrap_or(0);
        while cur_count > 0 {
            counts.insert(name.clone(), cur_count + 1);
            name = format!("{}.{}", name, cur_count);
            cur_count = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), cur_count + 1);
        result.push(name);
    }
    result
}

/// 数値として解釈する。NaNの綴りは数値とみなさない
fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// 列の種類を推論する
///
/// 欠損以外のすべてのセルが数値なら数値列、1つでも数値でなければ
/// カテゴリ列、すべて欠損なら空の列になる。
fn infer_column(values: Vec<Option<String>>) -> Column {
    if values.iter().all(Option::is_none) {
        return Column::Empty(values.len());
    }

    let numbers: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|cell| match cell {
            Some(s) => parse_number(s).map(Some),
            None => Some(None),
        })
        .collect();

    match numbers {
        Some(numbers) => Column::Numeric(Float64Column::from_options(numbers)),
        None => Column::Categorical(StringColumn::from_options(values)),
    }
}

/// DataFrameをCSVとして書き込む（UTF-8、カンマ区切り、ヘッダーあり、行番号なし）
pub fn write_csv_to<W: Write>(df: &DataFrame, writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);

    // ヘッダー行を書き込む
    wtr.write_record(df.column_names())?;

    // 各行のデータを書き込む（欠損は空フィールド）
    for i in 0..df.row_count() {
        let row: Vec<String> = df
            .columns()
            .map(|(_, col)| col.cell_string(i).into_option().unwrap_or_default())
            .collect();
        wtr.write_record(&row)?;
    }

    wtr.flush().map_err(Error::Io)?;
    Ok(())
}

/// DataFrameをCSVファイルに書き込む
pub fn write_csv<P: AsRef<Path>>(df: &DataFrame, path: P) -> Result<()> {
    let file = File::create(path.as_ref()).map_err(Error::Io)?;
    write_csv_to(df, file)
}

/// DataFrameをCSVのバイト列に変換する（ダウンロード用）
pub fn to_csv_bytes(df: &DataFrame) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv_to(df, &mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnKind;
    use crate::na::NA;

    fn load(text: &str, options: &CsvReadOptions) -> Result<DataFrame> {
        read_csv_bytes(text.as_bytes(), options)
    }

    #[test]
    fn test_basic_inference() {
        let df = load("a,b\n1,x\n2,y\n3,x\n", &CsvReadOptions::default()).unwrap();
        assert_eq!(df.shape(), (3, 2));
        assert_eq!(df.column("a").unwrap().kind(), ColumnKind::Numeric);
        assert_eq!(df.column("b").unwrap().kind(), ColumnKind::Categorical);
    }

    #[test]
    fn test_quoted_fields() {
        let text = "name,note\n\"Smith, J\",\"line1\nline2\"\nDoe,\"say \"\"hi\"\"\"\n";
        let df = load(text, &CsvReadOptions::default()).unwrap();
        assert_eq!(df.row_count(), 2);
        let name = df.column("name").unwrap().as_categorical().unwrap();
        assert_eq!(name.get(0), NA::Value("Smith, J"));
        let note = df.column("note").unwrap().as_categorical().unwrap();
        assert_eq!(note.get(0), NA::Value("line1\nline2"));
        assert_eq!(note.get(1), NA::Value("say \"hi\""));
    }

    #[test]
    fn test_unterminated_quote() {
        let err = load("a,b\n1,\"open\n2,3\n", &CsvReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn test_too_many_fields() {
        let err = load("a,b\n1,2\n3,4,5\n", &CsvReadOptions::default()).unwrap_err();
        match err {
            Error::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("expected 2 fields"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_short_rows_are_padded() {
        let df = load("a,b,c\n1,2,3\n4\n", &CsvReadOptions::default()).unwrap();
        assert_eq!(df.shape(), (2, 3));
        let c = df.column("c").unwrap().as_numeric().unwrap();
        assert!(c.get(1).is_na());
    }

    #[test]
    fn test_na_tokens_and_empty_column() {
        let df = load("a,b,c\n1,NA,\n,x,null\n3,,N/A\n", &CsvReadOptions::default()).unwrap();
        let a = df.column("a").unwrap();
        assert_eq!(a.kind(), ColumnKind::Numeric);
        assert_eq!(a.non_missing_count(), 2);
        assert_eq!(df.column("b").unwrap().kind(), ColumnKind::Categorical);
        assert_eq!(df.column("c").unwrap().kind(), ColumnKind::Empty);

        let custom = CsvReadOptions::default().na_values(vec!["-".to_string()]);
        let df = load("a\nNA\n-\n", &custom).unwrap();
        let a = df.column("a").unwrap().as_categorical().unwrap();
        assert_eq!(a.get(0), NA::Value("NA"));
        assert!(a.get(1).is_na());
    }

    #[test]
    fn test_mixed_column_is_categorical() {
        let df = load("v\n1\n2\nthree\n", &CsvReadOptions::default()).unwrap();
        let v = df.column("v").unwrap().as_categorical().unwrap();
        assert_eq!(v.get(0), NA::Value("1"));
        assert_eq!(v.unique_count(), 3);
    }

    #[test]
    fn test_numeric_forms() {
        let df = load("v\n 1.5 \n-2e3\ninf\n.5\n", &CsvReadOptions::default()).unwrap();
        let v = df.column("v").unwrap().as_numeric().unwrap();
        assert_eq!(v.get(0), NA::Value(1.5));
        assert_eq!(v.get(1), NA::Value(-2000.0));
        assert_eq!(v.get(2), NA::Value(f64::INFINITY));
        assert_eq!(v.get(3), NA::Value(0.5));
    }

    #[test]
    fn test_without_header() {
        let options = CsvReadOptions::default().has_header(false);
        let df = load("1,a\n2,b\n", &options).unwrap();
        assert_eq!(df.column_names(), &["0", "1"]);
        assert_eq!(df.row_count(), 2);
    }

    #[test]
    fn test_duplicate_header_names() {
        assert_eq!(
            dedupe_names(vec!["x".into(), "x".into(), "x.1".into(), "x".into(), "".into()]),
            vec!["x", "x.1", "x.1.1", "x.2", "Unnamed: 4"]
        );
        let df = load("a,a\n1,2\n", &CsvReadOptions::default()).unwrap();
        assert_eq!(df.column_names(), &["a", "a.1"]);
    }

    #[test]
    fn test_other_separators() {
        let df = load("a;b\n1;2\n", &CsvReadOptions::default().separator(";")).unwrap();
        assert_eq!(df.shape(), (1, 2));

        let df = load("a::b\n1::x\n\n2::y\n", &CsvReadOptions::default().separator("::")).unwrap();
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.column("a").unwrap().kind(), ColumnKind::Numeric);

        let df = load("a  b\n1 2\n", &CsvReadOptions::default().separator(r"\s+")).unwrap();
        assert_eq!(df.column_names(), &["a", "b"]);
    }

    #[test]
    fn test_invalid_separator() {
        let empty = load("a\n1\n", &CsvReadOptions::default().separator(""));
        assert!(matches!(empty, Err(Error::InvalidInput(_))));
        let bad = load("a\n1\n", &CsvReadOptions::default().separator("(("));
        assert!(matches!(bad, Err(Error::InvalidRegex(_))));
    }

    #[test]
    fn test_empty_input() {
        let df = load("", &CsvReadOptions::default()).unwrap();
        assert_eq!(df.shape(), (0, 0));

        let df = load("a,b\n", &CsvReadOptions::default()).unwrap();
        assert_eq!(df.shape(), (0, 2));
        assert_eq!(df.column("a").unwrap().kind(), ColumnKind::Empty);
    }

    #[test]
    fn test_decode_failure_returns_no_frame() {
        let bytes = b"name\ncaf\xE9\n";
        let err = read_csv_bytes(bytes, &CsvReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));

        let df = read_csv_bytes(bytes, &CsvReadOptions::default().encoding(TextEncoding::Latin1))
            .unwrap();
        let name = df.column("name").unwrap().as_categorical().unwrap();
        assert_eq!(name.get(0), NA::Value("café"));
    }

    #[test]
    fn test_to_csv_bytes() {
        let df = load("a,b,c\n1,x,\n2.5,\"y,z\",\n", &CsvReadOptions::default()).unwrap();
        let bytes = to_csv_bytes(&df).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "a,b,c\n1,x,\n2.5,\"y,z\",\n");
    }
}
