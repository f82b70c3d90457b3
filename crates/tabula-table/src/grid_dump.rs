//! Text dump of the cell grid.
//!
//! One line per row. Each cell shows its section letter followed by the
//! marker kind: `B` background, `C` content, `F` retired placeholder, and
//! `..` for undefined cells. Retired rows without placeholders print as
//! `--`.

use std::fmt::Write;

use crate::content_producer::TableContentProducer;
use crate::marker::CellMarker;

/// Render the grid of `producer`.
#[must_use]
pub fn render(producer: &TableContentProducer) -> String {
    let rows = producer.row_count();
    let columns = producer.column_count();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{rows} rows x {columns} columns, finished {}, filled {}",
        producer.finished_rows(),
        producer.filled_rows()
    );
    for row in 0..rows {
        let _ = write!(out, "{row:>5} |");
        for column in 0..columns {
            out.push(' ');
            out.push_str(&cell_token(producer, row, column));
        }
        out.push('\n');
    }
    out
}

/// Two-character token for one cell.
#[must_use]
pub fn cell_token(producer: &TableContentProducer, row: usize, column: usize) -> String {
    match producer.marker(row, column) {
        None if row < producer.finished_rows() => "--".to_string(),
        None => "..".to_string(),
        Some(marker) => {
            let kind = match marker {
                CellMarker::Background { .. } => 'B',
                CellMarker::Content { .. } => 'C',
                CellMarker::Finished { .. } => 'F',
            };
            format!("{}{kind}", marker.section().letter())
        }
    }
}
