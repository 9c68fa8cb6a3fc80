use super::sheets::{ReportCell, ReportSection, ReportSheets};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, XlsxError};

const NUMBER_FORMAT: &str = "#,##0.00";

struct ReportFormats {
    header: Format,
    text: Format,
    number: Format,
}

impl ReportFormats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_background_color(0x4472C4)
                .set_font_color(0xFFFFFF)
                .set_border(FormatBorder::Thin),
            text: Format::new().set_border(FormatBorder::Thin),
            number: Format::new()
                .set_num_format(NUMBER_FORMAT)
                .set_border(FormatBorder::Thin),
        }
    }
}

/// Renders the report sections into `.xlsx` bytes without touching disk.
pub(crate) fn render_workbook(sheets: &ReportSheets) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let formats = ReportFormats::new();

    for section in ReportSection::ordered() {
        let headers = section.headers();
        let rows = sheets.rows(section);

        let sheet = workbook.add_worksheet();
        sheet.set_name(section.sheet_name())?;

        for (col, header) in (0u16..).zip(headers.iter()) {
            sheet.write_with_format(0, col, *header, &formats.header)?;
        }
        sheet.set_freeze_panes(1, 0)?;

        for (row_idx, row) in (1u32..).zip(rows.iter()) {
            for (col, cell) in (0u16..).zip(row.iter()) {
                match cell {
                    ReportCell::Text(value) => {
                        sheet.write_with_format(row_idx, col, value.as_str(), &formats.text)?;
                    }
                    ReportCell::Number(value) => {
                        sheet.write_with_format(row_idx, col, *value, &formats.number)?;
                    }
                }
            }
        }

        for (col, header) in (0u16..).zip(headers.iter()) {
            let widest = rows
                .iter()
                .filter_map(|row| match row.get(usize::from(col)) {
                    Some(ReportCell::Text(value)) => Some(value.chars().count()),
                    _ => None,
                })
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or_default();
            sheet.set_column_width(col, (widest.clamp(10, 60) + 2) as f64)?;
        }
    }

    workbook.save_to_buffer()
}
