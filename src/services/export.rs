// src/services/export.rs
use csv::{ReaderBuilder, WriterBuilder};
use log::{error, info};
use rust_xlsxwriter::Workbook;

use crate::error::{DashboardError, Result};
use crate::models::{ExportFormat, Indicator, MacroRecord, TimeSeriesTable};

/// Worksheet name used for spreadsheet exports.
pub const SHEET_NAME: &str = "Datos";

/// Column order shared by CSV and spreadsheet exports.
pub const HEADER: [&str; 6] = ["date", "gdp", "inflation", "interest_rate", "unemployment", "fx_rate"];

#[derive(Debug, Clone)]
pub struct ExportFile {
    pub format: ExportFormat,
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn export_table(table: &TimeSeriesTable, format: ExportFormat) -> Result<ExportFile> {
    let bytes = match format {
        ExportFormat::Csv => to_csv(table),
        ExportFormat::Xlsx => to_xlsx(table),
    }
    .map_err(|e| {
        error!("Failed to export {} rows as {:?}: {}", table.len(), format, e);
        e
    })?;

    info!("Exported {} rows as {} ({} bytes)", table.len(), format.file_name(), bytes.len());
    Ok(ExportFile {
        format,
        file_name: format.file_name(),
        mime_type: format.mime_type(),
        bytes,
    })
}

/// UTF-8 CSV with a header row and no index column.
pub fn to_csv(table: &TimeSeriesTable) -> Result<Vec<u8>> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    wtr.write_record(HEADER)?;
    for record in &table.rows {
        wtr.serialize(record)?;
    }
    wtr.into_inner()
        .map_err(|e| DashboardError::ExportEncoding(e.to_string()))
}

/// Parse a CSV produced by `to_csv` back into a table.
pub fn read_csv(bytes: &[u8]) -> Result<TimeSeriesTable> {
    let mut rdr = ReaderBuilder::new().from_reader(bytes);

    let headers = rdr.headers()?.clone();
    if headers.iter().map(str::trim).ne(HEADER.iter().copied()) {
        return Err(DashboardError::ExportEncoding(format!(
            "unexpected CSV header: {:?}",
            headers.iter().collect::<Vec<_>>()
        )));
    }

    let rows = rdr
        .deserialize::<MacroRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(TimeSeriesTable::new(rows))
}

fn xlsx_error(e: rust_xlsxwriter::XlsxError) -> DashboardError {
    DashboardError::ExportEncoding(e.to_string())
}

/// Single-sheet workbook named `Datos`; header row, then one row per record.
pub fn to_xlsx(table: &TimeSeriesTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME).map_err(xlsx_error)?;

        for (col, name) in HEADER.iter().enumerate() {
            worksheet.write_string(0, col as u16, *name).map_err(xlsx_error)?;
        }

        for (i, record) in table.rows.iter().enumerate() {
            let row = (i + 1) as u32;
            worksheet
                .write_string(row, 0, record.date.format("%Y-%m-%d").to_string())
                .map_err(xlsx_error)?;

            for (col, indicator) in Indicator::ALL.iter().enumerate() {
                let value = indicator.value(record);
                if !value.is_finite() {
                    return Err(DashboardError::ExportEncoding(format!(
                        "{} on {} is not a finite number",
                        indicator, record.date
                    )));
                }
                worksheet
                    .write_number(row, (col + 1) as u16, value)
                    .map_err(xlsx_error)?;
            }
        }
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::generator::generate_with_seed;
    use approx::assert_relative_eq;
    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn sample() -> TimeSeriesTable {
        generate_with_seed(NaiveDate::from_ymd_opt(2021, 6, 30).unwrap(), Some(9))
    }

    #[test]
    fn test_csv_round_trip() {
        let table = sample();
        let bytes = to_csv(&table).unwrap();
        let parsed = read_csv(&bytes).unwrap();

        assert_eq!(parsed.len(), table.len());
        for (a, b) in table.rows.iter().zip(&parsed.rows) {
            assert_eq!(a.date, b.date);
            for indicator in Indicator::ALL {
                assert_relative_eq!(indicator.value(a), indicator.value(b), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_csv_layout() {
        let table = sample();
        let text = String::from_utf8(to_csv(&table).unwrap()).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("date,gdp,inflation,interest_rate,unemployment,fx_rate"));
        let first = lines.next().unwrap();
        assert!(first.starts_with("2020-01-31,"));
        assert_eq!(first.split(',').count(), 6);
        assert_eq!(text.lines().count(), table.len() + 1);
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let text = String::from_utf8(to_csv(&TimeSeriesTable::default()).unwrap()).unwrap();
        assert_eq!(text.trim_end(), HEADER.join(","));
        assert!(read_csv(text.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_read_csv_rejects_foreign_header() {
        let err = read_csv(b"Fecha,PIB\n2020-01-31,101.0\n").unwrap_err();
        assert!(matches!(err, DashboardError::ExportEncoding(_)));
    }

    #[test]
    fn test_xlsx_is_a_workbook() {
        let file = export_table(&sample(), ExportFormat::Xlsx).unwrap();
        assert_eq!(file.file_name, "datos_macro.xlsx");
        assert_eq!(
            file.mime_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(&file.bytes[..2], b"PK");
    }

    #[test]
    fn test_xlsx_reads_back_as_single_datos_sheet() {
        let table = sample();
        let bytes = to_xlsx(&table).unwrap();

        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);

        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        assert_eq!(range.height(), table.len() + 1);
        assert_eq!(range.width(), HEADER.len());
        for (col, name) in HEADER.iter().enumerate() {
            assert_eq!(range.get((0, col)), Some(&Data::String(name.to_string())));
        }

        let first = &table.rows[0];
        assert_eq!(range.get((1, 0)), Some(&Data::String("2020-01-31".to_string())));
        for (col, indicator) in Indicator::ALL.iter().enumerate() {
            match range.get((1, col + 1)) {
                Some(Data::Float(v)) => assert_relative_eq!(*v, indicator.value(first), epsilon = 1e-12),
                other => panic!("expected a number for {}, got {:?}", indicator, other),
            }
        }
    }

    #[test]
    fn test_xlsx_rejects_non_finite_values() {
        let mut table = sample();
        table.rows[2].inflation = f64::NAN;
        assert!(matches!(to_xlsx(&table), Err(DashboardError::ExportEncoding(_))));
    }

    #[test]
    fn test_csv_file_metadata() {
        let file = export_table(&sample(), ExportFormat::Csv).unwrap();
        assert_eq!(file.file_name, "datos_macro.csv");
        assert_eq!(file.mime_type, "text/csv");
    }
}
