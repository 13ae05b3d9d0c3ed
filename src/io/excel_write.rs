use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet, XlsxError};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::layout::{BookRow, Report, SheetLayout, TITLE_LEAD};

const FONT_NAME: &str = "Cooper Hewitt Book";
const TITLE_COLOR: u32 = 0x44546A;
const DATE_COLOR: u32 = 0x4472C4;

const TITLE_FONT_SIZE: f64 = 36.0;
const DATE_FONT_SIZE: f64 = 26.0;
const BODY_FONT_SIZE: f64 = 22.0;

const TITLE_ROW: u32 = 0;
const DATE_ROW: u32 = 1;
/// Zero-based row of the first book.
pub const FIRST_BOOK_ROW: u32 = 2;

pub const STATUS_COL: u16 = 0;
pub const RANK_COL: u16 = 1;
pub const TEXT_FIRST_COL: u16 = 2;
const TEXT_LAST_COL: u16 = 15;
pub const IMAGE_COL: u16 = 16;
/// Last column covered by the title block (S).
const TITLE_LAST_COL: u16 = 18;

const COVER_SCALE: f64 = 0.32;

/// Paper size 5 is US Legal.
const PAPER_SIZE: u8 = 5;
const PRINT_SCALE: u16 = 44;

struct SheetFormats {
    title_bold: Format,
    title_plain: Format,
    date: Format,
    status: Format,
    book_title: Format,
    book_details: Format,
    book_cell: Format,
}

impl SheetFormats {
    fn new() -> Self {
        let font = |size: f64| Format::new().set_font_name(FONT_NAME).set_font_size(size);

        Self {
            title_bold: font(TITLE_FONT_SIZE)
                .set_font_color(Color::RGB(TITLE_COLOR))
                .set_bold(),
            title_plain: font(TITLE_FONT_SIZE).set_font_color(Color::RGB(TITLE_COLOR)),
            date: font(DATE_FONT_SIZE)
                .set_font_color(Color::RGB(DATE_COLOR))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            status: font(BODY_FONT_SIZE)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap(),
            book_title: font(BODY_FONT_SIZE).set_bold(),
            book_details: font(BODY_FONT_SIZE),
            book_cell: Format::new()
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap(),
        }
    }
}

/// Writes the report to `path`.
///
/// A missing destination directory is created and the save retried once;
/// every other failure is returned as is.
#[instrument(level = "info", skip(report), fields(path = %path.display()))]
pub fn write_workbook(path: &Path, report: &Report) -> Result<()> {
    let mut workbook = Workbook::new();
    let formats = SheetFormats::new();

    for sheet in &report.sheets {
        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, sheet, &formats)?;
        info!(
            sheet = %sheet.sheet_name,
            rows = sheet.rows.len(),
            "sheet rendered"
        );
    }

    save_creating_parent(&mut workbook, path)
}

fn save_creating_parent(workbook: &mut Workbook, path: &Path) -> Result<()> {
    match workbook.save(path) {
        Err(XlsxError::IoError(err)) if err.kind() == ErrorKind::NotFound => {
            let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) else {
                return Err(XlsxError::IoError(err).into());
            };
            info!(dir = %parent.display(), "creating output directory");
            fs::create_dir_all(parent)?;
            workbook.save(path)?;
            Ok(())
        }
        other => Ok(other?),
    }
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &SheetLayout,
    formats: &SheetFormats,
) -> Result<()> {
    worksheet.set_name(&sheet.sheet_name)?;
    worksheet.set_paper_size(PAPER_SIZE);
    worksheet.set_print_scale(PRINT_SCALE);

    worksheet.set_column_width(STATUS_COL, 16.25)?;
    worksheet.set_column_width(TEXT_FIRST_COL, 25)?;
    worksheet.set_column_width(IMAGE_COL, 14.2)?;

    worksheet.set_row_height(TITLE_ROW, 40)?;
    worksheet.merge_range(TITLE_ROW, 0, TITLE_ROW, TITLE_LAST_COL, "", &Format::new())?;
    worksheet.write_rich_string(
        TITLE_ROW,
        0,
        &[
            (&formats.title_bold, TITLE_LEAD),
            (&formats.title_plain, sheet.title_suffix.as_str()),
        ],
    )?;

    worksheet.set_row_height(DATE_ROW, 95)?;
    worksheet.merge_range(DATE_ROW, 0, DATE_ROW, IMAGE_COL, "", &formats.date)?;
    worksheet.write_string_with_format(DATE_ROW, 0, &sheet.date_header, &formats.date)?;

    for (offset, row) in sheet.rows.iter().enumerate() {
        write_book_row(worksheet, FIRST_BOOK_ROW + offset as u32, row, formats)?;
    }

    Ok(())
}

fn write_book_row(
    worksheet: &mut Worksheet,
    row_idx: u32,
    row: &BookRow,
    formats: &SheetFormats,
) -> Result<()> {
    worksheet.set_row_height(row_idx, 125)?;
    worksheet.merge_range(
        row_idx,
        TEXT_FIRST_COL,
        row_idx,
        TEXT_LAST_COL,
        "",
        &formats.book_cell,
    )?;

    worksheet.write_string_with_format(row_idx, STATUS_COL, &row.status, &formats.status)?;
    worksheet.write_number_with_format(row_idx, RANK_COL, row.rank, &formats.status)?;
    // Rich strings reject empty runs, so a blank title leaves only the details.
    let segments: Vec<(&Format, &str)> = [
        (&formats.book_title, row.title.as_str()),
        (&formats.book_details, row.details.as_str()),
    ]
    .into_iter()
    .filter(|(_, text)| !text.is_empty())
    .collect();
    worksheet.write_rich_string_with_format(
        row_idx,
        TEXT_FIRST_COL,
        &segments,
        &formats.book_cell,
    )?;

    match &row.cover {
        Some(cover) => {
            let mut image = cover.image.clone();
            image
                .set_scale_width(COVER_SCALE)
                .set_scale_height(COVER_SCALE)
                .set_alt_text(&row.title);
            worksheet.insert_image(row_idx, IMAGE_COL, &image)?;
            debug!(rank = row.rank, url = %cover.url, "cover image inserted");
        }
        None => debug!(rank = row.rank, "row written without cover image"),
    }

    Ok(())
}
