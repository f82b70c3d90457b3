//! Overlapping content boxes.
//!
//! Kept in its own test binary because it installs a process-wide logger.

use std::sync::{Arc, Mutex};

use log::{Level, LevelFilter, Log, Metadata, Record};
use tabula_common::OutputFeatures;
use tabula_layout::{BoxId, BoxKind, BreakSheetLayout, PageArea, PageBox, RenderBox};
use tabula_style::{ChangeTracker, InstanceId, StyleSheet, derive_box_definition};
use tabula_table::{TableContentProducer, TableLayoutProducer};

/// Collects warnings for inspection.
struct CapturingLogger {
    warnings: Mutex<Vec<String>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.warnings
                .lock()
                .unwrap()
                .push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger {
    warnings: Mutex::new(Vec::new()),
};

fn text(page: &mut PageBox, x: i64, width: i64) -> BoxId {
    let style = Arc::new(StyleSheet::new("element/text"));
    let definition = Arc::new(derive_box_definition(&style));
    let instance = InstanceId(page.tree().len() as u64);
    let body = page.area(PageArea::Body);
    page.add_box(
        body,
        RenderBox::new(BoxKind::Text, instance, style, ChangeTracker(0), definition)
            .with_bounds(x, 0, width, 10),
    )
}

fn run(page: &PageBox, report_cell_conflicts: bool) -> TableContentProducer {
    let features = OutputFeatures {
        report_cell_conflicts,
        ..OutputFeatures::default()
    };
    let mut sheet = BreakSheetLayout::new(false);
    let mut layout = TableLayoutProducer::new(&features);
    let mut content = TableContentProducer::new(features);
    let _ = layout.update(page, &mut sheet, false);
    content.compute(page, &sheet, false);
    content
}

fn conflict_warnings() -> usize {
    LOGGER
        .warnings
        .lock()
        .unwrap()
        .iter()
        .filter(|message| message.contains("cell conflict"))
        .count()
}

#[test]
fn test_overlapping_content_keeps_first_marker() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Warn);

    let mut page = PageBox::new(100, 0, 100);
    let first = text(&mut page, 0, 60);
    let second = text(&mut page, 40, 60);

    // Breaks at 0, 40, 60 and 100: the boxes share column 1.
    let content = run(&page, true);
    assert_eq!(content.content(0, 0), Some(first));
    assert_eq!(content.content(0, 1), Some(first));
    assert_eq!(content.content(0, 2), None);
    assert_eq!(content.conflicts(), 1);
    assert!(content.is_finished(second));
    assert_eq!(conflict_warnings(), 1);

    // Without the feature the conflict is still counted, but not logged.
    let quiet = run(&page, false);
    assert_eq!(quiet.conflicts(), 1);
    assert_eq!(quiet.content(0, 1), Some(first));
    assert_eq!(conflict_warnings(), 1);
}
