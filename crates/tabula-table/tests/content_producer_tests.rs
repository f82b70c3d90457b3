//! Integration tests for the two table passes.

use std::sync::Arc;

use tabula_common::OutputFeatures;
use tabula_layout::{BoxId, BoxKind, BreakSheetLayout, PageArea, PageBox, RenderBox, SheetLayout};
use tabula_style::{ChangeTracker, Color, InstanceId, StyleKey, StyleSheet, derive_box_definition};
use tabula_table::{
    CellMarker, LinkTargetsAsContent, SectionType, TableContentProducer, TableLayoutProducer,
    TableProcessor, Traversal, grid_dump,
};

/// Helper: attach a committed box to `parent`.
fn add(
    page: &mut PageBox,
    parent: BoxId,
    kind: BoxKind,
    style: StyleSheet,
    bounds: (i64, i64, i64, i64),
) -> BoxId {
    let (x, y, width, height) = bounds;
    let style = Arc::new(style);
    let definition = Arc::new(derive_box_definition(&style));
    let instance = InstanceId(page.tree().len() as u64);
    page.add_box(
        parent,
        RenderBox::new(kind, instance, style, ChangeTracker(0), definition)
            .with_bounds(x, y, width, height),
    )
}

fn text(page: &mut PageBox, parent: BoxId, y: i64) -> BoxId {
    add(
        page,
        parent,
        BoxKind::Text,
        StyleSheet::new("element/text"),
        (0, y, 100, 10),
    )
}

fn painted_band(page: &mut PageBox, parent: BoxId, y: i64) -> BoxId {
    add(
        page,
        parent,
        BoxKind::Row,
        StyleSheet::new("band").with(StyleKey::BackgroundColor, Color::WHITE),
        (0, y, 100, 10),
    )
}

/// Helper: run both passes once without retiring rows.
fn run_passes(
    page: &PageBox,
    features: &OutputFeatures,
    iterative: bool,
) -> (BreakSheetLayout, TableContentProducer) {
    let mut sheet = BreakSheetLayout::new(features.strict_layout);
    let mut layout = TableLayoutProducer::new(features);
    let mut content = TableContentProducer::new(features.clone());
    let _ = layout.update(page, &mut sheet, iterative);
    content.compute(page, &sheet, iterative);
    (sheet, content)
}

// ---------------------------------------------------------------------------
// Final (single-shot) processing
// ---------------------------------------------------------------------------

/// A header line and two body lines.
fn header_and_body() -> (PageBox, [BoxId; 3]) {
    let mut page = PageBox::new(100, 0, 1000);
    page.set_area_bounds(PageArea::Header, 0, 10);
    page.set_area_bounds(PageArea::Body, 10, 20);
    let header = page.area(PageArea::Header);
    let body = page.area(PageArea::Body);
    let title = text(&mut page, header, 0);
    let first = text(&mut page, body, 10);
    let second = text(&mut page, body, 20);
    (page, [title, first, second])
}

#[test]
fn test_header_and_body_rows_are_all_filled_after_final_compute() {
    let (page, [title, first, second]) = header_and_body();
    let (sheet, content) = run_passes(&page, &OutputFeatures::default(), false);

    assert_eq!(sheet.row_count(), 3);
    assert_eq!(content.row_count(), 3);
    assert_eq!(content.column_count(), 1);
    assert_eq!(content.filled_rows(), 3);
    assert_eq!(content.finished_rows(), 0);

    assert_eq!(content.content(0, 0), Some(title));
    assert_eq!(content.content(1, 0), Some(first));
    assert_eq!(content.content(2, 0), Some(second));
    assert_eq!(content.section_type(0, 0), SectionType::Header);
    assert_eq!(content.section_type(2, 0), SectionType::NormalFlow);
    assert_eq!(content.content_offset(1, 0), Some(0));
    assert_eq!(content.background(1, 0), None);
    assert_eq!(content.conflicts(), 0);
}

#[test]
fn test_processor_retires_every_row_of_a_finished_page() {
    let (page, _) = header_and_body();
    let mut processor = TableProcessor::new(&OutputFeatures::default());
    let retired = processor.finish_page(&page);

    let content = processor.content();
    assert_eq!(retired, 3);
    assert_eq!(content.finished_rows(), 3);
    assert_eq!(content.filled_rows(), 3);
    assert!(content.marker(0, 0).is_none());

    processor.page_completed();
    assert_eq!(processor.pages(), 1);
    assert_eq!(processor.sheet().page_breaks(), &[3]);
    assert_eq!(processor.content().row_count(), 0);
    assert!(!processor.layout().is_header_processed());
}

#[test]
fn test_verbose_markers_keep_snapshots() {
    let (page, _) = header_and_body();
    let features = OutputFeatures {
        verbose_cell_markers: true,
        ..OutputFeatures::default()
    };
    let mut processor = TableProcessor::new(&features);
    let _ = processor.finish_page(&page);

    let marker = processor.content().marker(1, 0);
    assert!(matches!(
        marker,
        Some(CellMarker::Finished {
            section: SectionType::NormalFlow,
            ..
        })
    ));
    assert_eq!(processor.content().section_type(0, 0), SectionType::Header);
}

#[test]
fn test_verbose_markers_respect_threshold() {
    let (page, _) = header_and_body();
    let features = OutputFeatures {
        verbose_cell_markers: true,
        verbose_cell_marker_threshold: 3,
        ..OutputFeatures::default()
    };
    let mut processor = TableProcessor::new(&features);
    let _ = processor.finish_page(&page);
    assert!(processor.content().marker(1, 0).is_none());
}

#[test]
fn test_unaligned_areas_are_stacked() {
    // Every area starts at zero in its own frame.
    let mut page = PageBox::new(100, 500, 520);
    page.set_area_bounds(PageArea::Header, 0, 10);
    page.set_area_bounds(PageArea::Body, 500, 20);
    page.set_area_bounds(PageArea::Footer, 0, 10);
    let header = page.area(PageArea::Header);
    let body = page.area(PageArea::Body);
    let footer = page.area(PageArea::Footer);
    let title = text(&mut page, header, 0);
    let line = text(&mut page, body, 510);
    let page_number = text(&mut page, footer, 0);
    // Before the window: not part of this page.
    let _earlier = text(&mut page, body, 480);

    let features = OutputFeatures {
        unaligned_pagebands: true,
        ..OutputFeatures::default()
    };
    let (sheet, content) = run_passes(&page, &features, false);

    // header 0..10, body window 10..30, footer 30..40
    assert_eq!(sheet.row_breaks(), &[0, 10, 20, 30, 40]);
    assert_eq!(content.content(0, 0), Some(title));
    assert_eq!(content.content(2, 0), Some(line));
    assert_eq!(content.content_offset(2, 0), Some(10 - 500));
    assert_eq!(content.content(3, 0), Some(page_number));
    assert_eq!(content.section_type(3, 0), SectionType::Footer);
    assert_eq!(content.content_offset(3, 0), Some(30));
}

#[test]
fn test_watermark_only_with_feature() {
    let mut page = PageBox::new(100, 0, 100);
    page.set_area_bounds(PageArea::Watermark, 0, 10);
    let watermark = page.area(PageArea::Watermark);
    let stamp = text(&mut page, watermark, 0);

    let (_, without) = run_passes(&page, &OutputFeatures::default(), false);
    assert_eq!(without.content(0, 0), None);

    let features = OutputFeatures {
        watermark_section: true,
        ..OutputFeatures::default()
    };
    let (_, with) = run_passes(&page, &features, false);
    assert_eq!(with.content(0, 0), Some(stamp));
    assert_eq!(with.section_type(0, 0), SectionType::Header);
}

#[test]
fn test_footers_wait_for_the_final_call() {
    let mut page = PageBox::new(100, 0, 100);
    page.set_area_bounds(PageArea::Footer, 90, 10);
    let footer = page.area(PageArea::Footer);
    let page_number = text(&mut page, footer, 90);

    let (sheet, content) = run_passes(&page, &OutputFeatures::default(), true);
    assert_eq!(sheet.row_count(), 0);
    assert_eq!(content.content(0, 0), None);

    let (_, content) = run_passes(&page, &OutputFeatures::default(), false);
    assert_eq!(content.content(0, 0), Some(page_number));
}

#[test]
fn test_deeper_backgrounds_paint_on_top() {
    let mut page = PageBox::new(100, 0, 100);
    page.set_area_bounds(PageArea::Body, 0, 20);
    let body = page.area(PageArea::Body);
    let outer = add(
        &mut page,
        body,
        BoxKind::Block,
        StyleSheet::new("band").with(StyleKey::BackgroundColor, Color::BLACK),
        (0, 0, 100, 20),
    );
    let inner = painted_band(&mut page, outer, 10);

    let (_, content) = run_passes(&page, &OutputFeatures::default(), false);
    assert_eq!(content.background(0, 0), Some(outer));
    assert_eq!(content.background(1, 0), Some(inner));
    assert!(matches!(
        content.marker(1, 0),
        Some(CellMarker::Background { depth: 2, .. })
    ));
}

#[test]
fn test_sheet_name_is_first_found() {
    let mut page = PageBox::new(100, 0, 100);
    let body = page.area(PageArea::Body);
    let _ = add(
        &mut page,
        body,
        BoxKind::Block,
        StyleSheet::new("band").with(StyleKey::SheetName, "Summary"),
        (0, 0, 100, 10),
    );
    let _ = add(
        &mut page,
        body,
        BoxKind::Block,
        StyleSheet::new("band").with(StyleKey::SheetName, "Details"),
        (0, 10, 100, 10),
    );
    let (_, content) = run_passes(&page, &OutputFeatures::default(), false);
    assert_eq!(content.sheet_name(), Some("Summary"));
}

#[test]
fn test_paragraph_children_are_not_visited() {
    let mut page = PageBox::new(100, 0, 100);
    let body = page.area(PageArea::Body);
    let paragraph = add(
        &mut page,
        body,
        BoxKind::Paragraph,
        StyleSheet::new("element/text"),
        (0, 0, 100, 20),
    );
    let line = text(&mut page, paragraph, 0);

    let (sheet, content) = run_passes(&page, &OutputFeatures::default(), false);
    assert_eq!(sheet.row_breaks(), &[0, 20]);
    assert_eq!(content.content(0, 0), Some(paragraph));
    assert!(!content.is_finished(line));
    assert_eq!(content.conflicts(), 0);
}

#[test]
fn test_extra_content_policy() {
    let mut page = PageBox::new(100, 0, 100);
    let body = page.area(PageArea::Body);
    let link = add(
        &mut page,
        body,
        BoxKind::Block,
        StyleSheet::new("band")
            .with(StyleKey::Href, "https://example.org")
            .with(StyleKey::BackgroundColor, Color::WHITE),
        (0, 0, 100, 10),
    );

    let features = OutputFeatures::default();
    let mut sheet = BreakSheetLayout::new(false);
    let mut layout = TableLayoutProducer::new(&features);
    let mut content = TableContentProducer::with_policy(features, Box::new(LinkTargetsAsContent));
    let _ = layout.update(&page, &mut sheet, false);
    content.compute(&page, &sheet, false);
    assert_eq!(content.content(0, 0), Some(link));
}

// ---------------------------------------------------------------------------
// Idempotence
// ---------------------------------------------------------------------------

#[test]
fn test_revisiting_finished_boxes_changes_nothing() {
    let (page, [_, first, _]) = header_and_body();
    let features = OutputFeatures::default();
    let (sheet, mut content) = run_passes(&page, &features, false);
    let before = grid_dump::render(&content);

    let body = page.area(PageArea::Body);
    assert_eq!(
        content.visit(&page, &sheet, PageArea::Body, first, 1),
        Traversal::Skip
    );
    assert_eq!(
        content.visit(&page, &sheet, PageArea::Body, body, 0),
        Traversal::Descend
    );
    content.compute(&page, &sheet, false);

    assert_eq!(grid_dump::render(&content), before);
    assert_eq!(content.conflicts(), 0);
}

#[test]
fn test_boxes_are_registered_once() {
    let (page, [title, ..]) = header_and_body();
    let features = OutputFeatures::default();
    let mut sheet = BreakSheetLayout::new(false);
    let mut layout = TableLayoutProducer::new(&features);

    assert!(layout.update(&page, &mut sheet, true));
    assert!(layout.is_registered(title));
    assert!(layout.is_header_processed());
    assert!(!layout.update(&page, &mut sheet, true));

    layout.page_completed();
    assert!(!layout.is_registered(title));
    assert!(!layout.is_header_processed());
}

// ---------------------------------------------------------------------------
// Streaming
// ---------------------------------------------------------------------------

/// A header line and three bands with one line each; only the first band
/// is committed.
fn streamed_page() -> (PageBox, [BoxId; 3]) {
    let mut page = PageBox::new(100, 0, 1000);
    page.set_area_bounds(PageArea::Header, 0, 10);
    page.set_area_bounds(PageArea::Body, 10, 30);
    let header = page.area(PageArea::Header);
    let body = page.area(PageArea::Body);
    let _ = text(&mut page, header, 0);

    let mut bands = [body; 3];
    for (band, y) in bands.iter_mut().zip([10, 20, 30]) {
        *band = add(
            &mut page,
            body,
            BoxKind::Row,
            StyleSheet::new("band"),
            (0, y, 100, 10),
        );
        let _ = text(&mut page, *band, y);
    }
    page.tree_mut().set_subtree_state(body, false, true);
    page.tree_mut().set_subtree_state(bands[0], true, false);
    (page, bands)
}

#[test]
fn test_streaming_in_two_slices() {
    let (mut page, _) = streamed_page();
    let mut processor = TableProcessor::new(&OutputFeatures::default());

    let retired = processor.process_slice(&page);
    let content = processor.content();
    assert_eq!(retired, 2);
    assert_eq!(content.finished_rows(), 2);
    assert!(content.finished_rows() <= content.filled_rows());

    let body = page.area(PageArea::Body);
    page.tree_mut().set_subtree_state(body, true, false);
    let _ = processor.finish_page(&page);

    let content = processor.content();
    assert_eq!(content.row_count(), 4);
    assert_eq!(content.filled_rows(), content.row_count());
    assert_eq!(content.finished_rows(), 4);
}

#[test]
fn test_iterative_filled_rows_stop_at_open_content() {
    let (page, bands) = streamed_page();
    let (_, mut content) = run_passes(&page, &OutputFeatures::default(), true);

    // Header row and first band row are complete.
    assert_eq!(content.filled_rows(), 2);
    assert_eq!(content.update_filled_rows(page.tree()), 2);
    assert!(content.is_finished(bands[0]));
    assert!(!content.is_finished(bands[1]));
    assert_eq!(content.section_type(1, 0), SectionType::NormalFlow);
}

#[test]
fn test_open_backgrounds_are_revisited() {
    let (mut page, _) = streamed_page();
    let features = OutputFeatures::default();
    let mut sheet = BreakSheetLayout::new(false);
    let mut layout = TableLayoutProducer::new(&features);
    let mut content = TableContentProducer::new(features);
    let body = page.area(PageArea::Body);

    let _ = layout.update(&page, &mut sheet, true);
    content.compute(&page, &sheet, true);
    assert!(!content.is_finished(body));

    page.tree_mut().set_subtree_state(body, true, false);
    let _ = layout.update(&page, &mut sheet, false);
    content.compute(&page, &sheet, false);
    assert!(content.is_finished(body));
}

/// Painted full-width bands in the header and the body, and a third band
/// whose two half-width lines are still being laid out.
fn late_column_page() -> (PageBox, BoxId, BoxId) {
    let mut page = PageBox::new(100, 0, 1000);
    page.set_area_bounds(PageArea::Header, 0, 10);
    page.set_area_bounds(PageArea::Body, 10, 20);
    let header = page.area(PageArea::Header);
    let body = page.area(PageArea::Body);
    let header_band = painted_band(&mut page, header, 0);
    let _ = painted_band(&mut page, body, 10);
    let split = painted_band(&mut page, body, 20);
    for x in [0, 50] {
        let _ = add(
            &mut page,
            split,
            BoxKind::Text,
            StyleSheet::new("element/text"),
            (x, 20, 50, 10),
        );
    }
    page.tree_mut().set_subtree_state(split, true, true);
    (page, header_band, split)
}

#[test]
fn test_column_added_by_a_later_slice_keeps_rows_retirable() {
    let (mut page, _, split) = late_column_page();

    let mut closed = page.clone();
    closed.tree_mut().set_subtree_state(split, true, false);
    let mut single = TableProcessor::new(&OutputFeatures::default());
    assert_eq!(single.finish_page(&closed), 3);

    let mut processor = TableProcessor::new(&OutputFeatures::default());
    assert_eq!(processor.process_slice(&page), 0);
    assert_eq!(processor.content().column_count(), 1);

    page.tree_mut().set_subtree_state(split, true, false);
    assert_eq!(processor.finish_page(&page), 3);
    let content = processor.content();
    assert_eq!(content.finished_rows(), 3);
    assert_eq!(content.filled_rows(), 3);
    assert_eq!(content.column_count(), 2);
}

#[test]
fn test_streamed_grid_matches_single_pass_grid() {
    let (mut page, header_band, split) = late_column_page();
    let features = OutputFeatures::default();
    let mut sheet = BreakSheetLayout::new(false);
    let mut layout = TableLayoutProducer::new(&features);
    let mut content = TableContentProducer::new(features.clone());

    let _ = layout.update(&page, &mut sheet, true);
    content.compute(&page, &sheet, true);
    assert_eq!(content.background(0, 0), Some(header_band));

    page.tree_mut().set_subtree_state(split, true, false);
    let _ = layout.update(&page, &mut sheet, false);
    content.compute(&page, &sheet, false);

    // The header band was painted before the split and is not visited
    // again, yet it covers both halves.
    assert_eq!(content.background(0, 1), Some(header_band));
    assert_eq!(content.section_type(1, 1), SectionType::NormalFlow);
    assert!(content.content(2, 1).is_some());

    let (_, single) = run_passes(&page, &features, false);
    assert_eq!(grid_dump::render(&content), grid_dump::render(&single));
}

#[test]
fn test_row_split_inside_retired_rows_keeps_them_retired() {
    let (mut page, _) = header_and_body();
    let body = page.area(PageArea::Body);
    let late = text(&mut page, body, 5);
    page.tree_mut()[late].committed = false;

    let mut processor = TableProcessor::new(&OutputFeatures::default());
    assert_eq!(processor.process_slice(&page), 3);

    // The late line adds breaks at 5 and 15, splitting two retired rows.
    page.tree_mut()[late].committed = true;
    assert_eq!(processor.process_slice(&page), 0);
    let content = processor.content();
    assert_eq!(processor.sheet().row_breaks(), &[0, 5, 10, 15, 20, 30]);
    assert_eq!(content.finished_rows(), 5);
    assert_eq!(content.filled_rows(), 5);
    assert_eq!(content.conflicts(), 1);
    assert!(content.is_finished(late));
}

// ---------------------------------------------------------------------------
// Decorative pages
// ---------------------------------------------------------------------------

fn decorative_page() -> PageBox {
    let mut page = PageBox::new(100, 0, 1000);
    page.set_area_bounds(PageArea::Header, 0, 10);
    page.set_area_bounds(PageArea::Body, 10, 30);
    let header = page.area(PageArea::Header);
    let body = page.area(PageArea::Body);
    let _ = painted_band(&mut page, header, 0);
    for y in [10, 20, 30] {
        let _ = painted_band(&mut page, body, y);
    }
    page
}

#[test]
fn test_entirely_decorative_page_never_retires_rows() {
    let page = decorative_page();
    let mut processor = TableProcessor::new(&OutputFeatures::default());

    assert_eq!(processor.process_slice(&page), 0);
    assert_eq!(processor.finish_page(&page), 0);

    let content = processor.content();
    assert_eq!(content.finished_rows(), 0);
    assert_eq!(content.row_count(), 4);
    assert_eq!(content.filled_rows(), 4);
    for row in 0..4 {
        assert!(content.background(row, 0).is_some(), "row {row} lost its background");
    }
}

#[test]
fn test_decorative_rows_retire_with_later_content() {
    let mut page = decorative_page();
    let body = page.area(PageArea::Body);
    let _ = text(&mut page, body, 30);
    let mut processor = TableProcessor::new(&OutputFeatures::default());

    assert_eq!(processor.process_slice(&page), 4);
    assert_eq!(processor.content().finished_rows(), 4);
}
