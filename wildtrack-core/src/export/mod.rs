//! Report rendering.
//!
//! Pure functions from already aggregated data to bytes: the per-video
//! detailed detection record, the per-video summary text and the
//! cross-video summary table in delimited text and spreadsheet form.

mod detailed;
mod summary;

pub use detailed::{DETAILED_COLUMNS, render_detailed_csv, render_video_summary};
pub use summary::{SUMMARY_COLUMNS, SummaryStatus, SummaryTable};

/// Quotes a CSV field when it contains a delimiter, quote or newline.
pub(crate) fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Joins header and rows into CSV text with a trailing newline.
pub(crate) fn build_csv<R, C>(header: &[&str], rows: R) -> String
where
    R: IntoIterator<Item = C>,
    C: IntoIterator<Item = String>,
{
    let mut out = header
        .iter()
        .map(|h| csv_escape(h))
        .collect::<Vec<_>>()
        .join(",");
    out.push('\n');
    for row in rows {
        let line = row
            .into_iter()
            .map(|cell| csv_escape(&cell))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}
