// Primitives for reading Excel workbooks, as exported by Google Forms and
// Microsoft Forms.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::matching::{io_common::text_cell, *};

/// Reads a worksheet whose first row is the header.
///
/// Without a worksheet name, the workbook should contain a single worksheet.
/// Otherwise the first one is used.
pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> BMatchResult<Table> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyExcelSnafu { path })?;
    let headers: Vec<String> = header
        .iter()
        .map(|cell| read_cell(cell).as_trimmed_text().unwrap_or_default())
        .collect();
    debug!("read_excel_table: headers: {:?}", headers);

    let mut table = Table::new(headers);
    for (idx, row) in iter.enumerate() {
        let cells: Vec<CellValue> = row.iter().map(read_cell).collect();
        if cells.iter().all(|c| *c == CellValue::Empty) {
            debug!("read_excel_table: skipping empty row {}", idx + 2);
            continue;
        }
        table.push_row(cells);
    }
    Ok(table)
}

fn read_cell(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(s) => text_cell(s),
        DataType::Float(f) => CellValue::Float(*f),
        DataType::Int(i) => CellValue::Int(*i),
        DataType::Bool(b) => CellValue::Bool(*b),
        DataType::DateTime(f) => match time_of_day(*f) {
            Some(t) => CellValue::Text(t),
            None => CellValue::Float(*f),
        },
        DataType::Error(e) => {
            warn!("read_cell: cell with error {:?}, read as empty", e);
            CellValue::Empty
        }
        DataType::Empty => CellValue::Empty,
    }
}

/// The `HH:MM` rendering of an Excel time of day.
///
/// Excel stores times as fractions of a day. Values of a day or more carry a
/// date and are not converted.
fn time_of_day(value: f64) -> Option<String> {
    if !(0.0..1.0).contains(&value) {
        return None;
    }
    let minutes = (value * 24.0 * 60.0).round() as u32;
    // 23:59:30 and later round up to the next day.
    let minutes = minutes.min(24 * 60 - 1);
    Some(format!("{:02}:{:02}", minutes / 60, minutes % 60))
}

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> BMatchResult<calamine::Range<DataType>> {
    debug!(
        "read_excel_table: path: {:?} worksheet: {:?}",
        path, worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name,
                path,
            })?
            .context(OpeningExcelSnafu { path })?;
        return Ok(wrange);
    }

    let all_worksheets = workbook.worksheets();
    match all_worksheets.as_slice() {
        [] => Err(Box::new(MatchError::EmptyExcel {
            path: path.to_string(),
        })),
        [(worksheet_name, wrange)] => {
            debug!("read_excel_table: using worksheet {:?}", worksheet_name);
            Ok(wrange.clone())
        }
        [(worksheet_name, wrange), ..] => {
            warn!(
                "{} contains {} worksheets, reading the first one ({:?}). Use excelWorksheetName to pick another one.",
                path,
                all_worksheets.len(),
                worksheet_name
            );
            Ok(wrange.clone())
        }
    }
}
