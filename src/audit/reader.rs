use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::warn;

use crate::audit::{AuditError, AuditRow};

const COLUMNS: [(&str, &str); 3] = [
    ("事業名", "project"),
    ("決算額", "budget"),
    ("推定受益者数", "beneficiaries"),
];

pub fn read_rows_from_path(path: &Path) -> Result<Vec<AuditRow>, AuditError> {
    let file = File::open(path)?;
    read_rows(file)
}

/// Rows that fail to parse are logged and skipped; a missing column fails the
/// whole read.
pub fn read_rows<R: Read>(input: R) -> Result<Vec<AuditRow>, AuditError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let headers = reader.headers()?.clone();
    for (japanese, english) in COLUMNS {
        if !headers.iter().any(|h| h == japanese || h == english) {
            return Err(AuditError::MissingColumn(japanese));
        }
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.deserialize::<AuditRow>().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            Err(err) => warn!("skipping CSV row {}: {err}", idx + 2),
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn reads_japanese_headers_and_skips_bad_rows() {
        let data = "事業名,決算額,推定受益者数\n窓口DX,120000000,3000\n壊れた行,abc,10\n子育て支援,50000000,40000\n";
        let rows = read_rows(data.as_bytes()).expect("readable csv");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].project, "窓口DX");
        assert_eq!(rows[1].beneficiaries, 40_000.0);
    }

    #[test]
    fn accepts_english_headers() {
        let data = "project, budget, beneficiaries\nportal, 1000, 10\n";
        let rows = read_rows(data.as_bytes()).expect("readable csv");
        assert_eq!(rows[0].budget, 1_000.0);
    }

    #[test]
    fn missing_column_is_an_error() {
        let data = "project,budget\nportal,1000\n";
        assert!(matches!(
            read_rows(data.as_bytes()),
            Err(AuditError::MissingColumn("推定受益者数"))
        ));
    }

    #[test]
    fn reads_from_a_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "事業名,決算額,推定受益者数").expect("write header");
        writeln!(file, "図書館,30000000,12000").expect("write row");
        let rows = read_rows_from_path(file.path()).expect("readable file");
        assert_eq!(rows.len(), 1);
    }
}
