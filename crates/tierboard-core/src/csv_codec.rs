// Quote-aware CSV row codec.
//
// Callers work in terms of `Vec<Vec<String>>` rows so header detection and
// column aliasing stay in the import code. The `csv` crate does the
// tokenizing and quoting; this module only fixes the reader/writer
// configuration and the trailing-blank-row policy.

use tracing::debug;

/// Parse CSV text into raw rows.
///
/// - Rows may have different lengths.
/// - Quoted fields may contain commas, doubled quotes and newlines.
/// - Trailing rows whose cells are all blank are dropped.
///
/// Returns a `csv::Error` only for input the reader cannot tokenize at all
/// (in practice, invalid UTF-8 inside a field).
pub fn parse_rows(text: &str) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|field| field.to_string()).collect::<Vec<_>>());
    }

    while rows
        .last()
        .is_some_and(|row: &Vec<String>| row.iter().all(|cell| cell.trim().is_empty()))
    {
        rows.pop();
    }

    debug!(rows = rows.len(), "parsed csv text");
    Ok(rows)
}

/// Serialize rows to CSV text.
///
/// Fields are quoted only when they contain a comma, quote, or line break.
/// Rows are joined with `\n` and the output has no trailing newline.
pub fn write_rows<I, R, S>(rows: I) -> Result<String, csv::Error>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    // Every field came in as text, so the bytes are valid UTF-8.
    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}
