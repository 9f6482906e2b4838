use std::path::Path;

use log::info;
use rust_xlsxwriter::Workbook;
use serde::Serialize;

use crate::error::GenError;
use crate::record::Record;

/// The literal header keys and sheet name the consumer application reads.
pub const HEADERS: [&str; 6] = [
    "Тип",
    "Дата",
    "Категория",
    "Сумма",
    "Описание",
    "ID (Не трогать)",
];
pub const SHEET_NAME: &str = "Бюджет";

/// Column widths matching the consumer application's own export.
const COLUMN_WIDTHS: [f64; 6] = [10.0, 12.0, 20.0, 10.0, 30.0, 25.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Тип")]
    kind: &'static str,
    #[serde(rename = "Дата")]
    date: String,
    #[serde(rename = "Категория")]
    category: &'a str,
    #[serde(rename = "Сумма")]
    amount: u32,
    #[serde(rename = "Описание")]
    description: &'a str,
    #[serde(rename = "ID (Не трогать)")]
    id: String,
}

impl<'a> From<&'a Record> for CsvRow<'a> {
    fn from(record: &'a Record) -> Self {
        CsvRow {
            kind: record.kind.label(),
            date: record.date.format("%Y-%m-%d").to_string(),
            category: &record.category,
            amount: record.amount.get(),
            description: &record.description,
            id: record.id.to_string(),
        }
    }
}

/// # Errors
/// Errors when the target file cannot be created or written. The whole batch
/// is buffered in memory first, so a failed write leaves no partial file.
pub fn export(records: &[Record], path: &Path, format: ExportFormat) -> Result<(), GenError> {
    match format {
        ExportFormat::Xlsx => write_xlsx(records, path),
        ExportFormat::Csv => write_csv(records, path),
    }
}

/// # Errors
/// Errors when the workbook cannot be built or saved.
pub fn write_xlsx(records: &[Record], path: &Path) -> Result<(), GenError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (col, header) in (0u16..).zip(HEADERS) {
        sheet.write_string(0, col, header)?;
    }
    for (col, width) in (0u16..).zip(COLUMN_WIDTHS) {
        sheet.set_column_width(col, width)?;
    }
    for (row, record) in (1u32..).zip(records) {
        sheet.write_string(row, 0, record.kind.label())?;
        sheet.write_string(row, 1, record.date.format("%Y-%m-%d").to_string())?;
        sheet.write_string(row, 2, record.category.as_str())?;
        sheet.write_number(row, 3, f64::from(record.amount.get()))?;
        sheet.write_string(row, 4, record.description.as_str())?;
        sheet.write_string(row, 5, record.id.to_string())?;
    }
    workbook.save(path)?;
    info!("wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// # Errors
/// Errors when the target file cannot be created or a row fails to serialize.
pub fn write_csv(records: &[Record], path: &Path) -> Result<(), GenError> {
    let mut writer = csv::WriterBuilder::new().from_path(path)?;
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    writer.flush()?;
    info!("wrote {} rows to {}", records.len(), path.display());
    Ok(())
}
