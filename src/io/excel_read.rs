use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};

use crate::error::{Result, ToolError};
use crate::io::excel_write::{FIRST_BOOK_ROW, RANK_COL, STATUS_COL, TEXT_FIRST_COL};

/// Text content of one worksheet written by
/// [`write_workbook`](crate::io::excel_write::write_workbook).
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSummary {
    pub sheet_name: String,
    pub title: String,
    pub date_header: String,
    pub rows: Vec<RowSummary>,
}

/// A book row as it reads back from the workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSummary {
    pub status: String,
    pub rank: u32,
    pub text: String,
}

/// Reads back every sheet of a generated workbook.
pub fn read_report(path: &Path) -> Result<Vec<SheetSummary>> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let names = workbook.sheet_names().to_vec();
    names
        .into_iter()
        .map(|name| {
            let range = read_required_sheet(&mut workbook, &name)?;
            summarize_sheet(name, &range)
        })
        .collect()
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    Ok(range_result?)
}

fn summarize_sheet(sheet_name: String, range: &Range<DataType>) -> Result<SheetSummary> {
    let cell = |row: u32, col: u16| cell_to_string(range.get_value((row, u32::from(col))));

    let mut rows = Vec::new();
    let mut row_idx = FIRST_BOOK_ROW;
    while let Some(rank) = cell_rank(range.get_value((row_idx, u32::from(RANK_COL)))) {
        rows.push(RowSummary {
            status: cell(row_idx, STATUS_COL),
            rank: rank.map_err(|value| {
                ToolError::InvalidWorkbook(format!(
                    "sheet '{sheet_name}' row {} has invalid rank '{value}'",
                    row_idx + 1
                ))
            })?,
            text: cell(row_idx, TEXT_FIRST_COL),
        });
        row_idx += 1;
    }

    Ok(SheetSummary {
        title: cell(0, 0),
        date_header: cell(1, 0),
        sheet_name,
        rows,
    })
}

// `None` marks the end of the book rows.
fn cell_rank(cell: Option<&DataType>) -> Option<std::result::Result<u32, String>> {
    match cell {
        Some(DataType::Int(value)) => Some(u32::try_from(*value).map_err(|_| value.to_string())),
        Some(DataType::Float(value)) if value.fract() == 0.0 && *value >= 0.0 => {
            Some(Ok(*value as u32))
        }
        Some(DataType::Empty) | None => None,
        Some(other) => Some(Err(other.to_string())),
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
