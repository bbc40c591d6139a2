// ============================================================================
// wildtrack-core/src/export/summary.rs
// ============================================================================
//
// CROSS-VIDEO SUMMARY: One Row per Submitted Video
//
// The table is filled in submission order by the session coordinator and
// rendered twice with identical content: CSV text and an XLSX workbook.
// Failed jobs keep their row, flagged in the status column with the reason
// in the error column.

// ---- External crate imports ----
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook};
use serde::Serialize;

// ---- Internal crate imports ----
use super::build_csv;
use crate::error::CoreResult;
use crate::model::SummaryRow;

/// Column order shared by both renderings.
pub const SUMMARY_COLUMNS: [&str; 5] = [
    "Video Name",
    "Animals Detected",
    "Detected Animals",
    "Animal Counts",
    "Error",
];

/// Value of the "Animals Detected" column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SummaryStatus {
    Yes,
    No,
    Failed,
}

impl SummaryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStatus::Yes => "Yes",
            SummaryStatus::No => "No",
            SummaryStatus::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct SummaryRecord {
    video_name: String,
    status: SummaryStatus,
    animals: String,
    counts: String,
    error: String,
}

impl SummaryRecord {
    fn cells(&self) -> [String; 5] {
        [
            self.video_name.clone(),
            self.status.as_str().to_string(),
            self.animals.clone(),
            self.counts.clone(),
            self.error.clone(),
        ]
    }
}

/// Cross-video summary in row insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTable {
    rows: Vec<SummaryRecord>,
}

impl SummaryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the row of a job that completed.
    pub fn push_row(&mut self, row: &SummaryRow) {
        let animals = row.categories.iter().cloned().collect::<Vec<_>>().join(", ");
        let counts = row
            .counts
            .iter()
            .map(|(label, count)| format!("{}: {}", label, count))
            .collect::<Vec<_>>()
            .join(", ");
        self.rows.push(SummaryRecord {
            video_name: row.video_name.clone(),
            status: if row.detected { SummaryStatus::Yes } else { SummaryStatus::No },
            animals,
            counts,
            error: String::new(),
        });
    }

    /// Appends the row of a job that failed.
    pub fn push_failure(&mut self, video_name: &str, reason: &str) {
        self.rows.push(SummaryRecord {
            video_name: video_name.to_string(),
            status: SummaryStatus::Failed,
            animals: String::new(),
            counts: String::new(),
            error: reason.to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Video names in row order.
    pub fn video_names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.video_name.as_str()).collect()
    }

    /// Delimited text rendering.
    pub fn to_csv(&self) -> String {
        build_csv(&SUMMARY_COLUMNS, self.rows.iter().map(|r| r.cells()))
    }

    /// Spreadsheet rendering with a bold header row.
    ///
    /// The document creation time is pinned so equal tables render to equal
    /// bytes.
    pub fn to_xlsx(&self) -> CoreResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let created = ExcelDateTime::from_ymd(1980, 1, 1)?;
        workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));
        let header_format = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Summary")?;

        for (col, title) in SUMMARY_COLUMNS.iter().enumerate() {
            let col = col as u16;
            worksheet.write_string_with_format(0, col, *title, &header_format)?;
            worksheet.set_column_width(col, 24)?;
        }
        for (row_idx, record) in self.rows.iter().enumerate() {
            let row = row_idx as u32 + 1;
            for (col, cell) in record.cells().iter().enumerate() {
                worksheet.write_string(row, col as u16, cell.as_str())?;
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}
