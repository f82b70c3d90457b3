//! Property tests for grid occupancy, painter's order and retirement.

use std::collections::HashMap;
use std::sync::Arc;

use quickcheck_macros::quickcheck;
use tabula_common::OutputFeatures;
use tabula_layout::{
    BoxId, BoxKind, BreakSheetLayout, PageArea, PageBox, RenderBox, SheetLayout, TableRectangle,
};
use tabula_style::{ChangeTracker, InstanceId, StyleSheet, derive_box_definition};
use tabula_table::{CellMarker, TableContentProducer, TableLayoutProducer, TableProcessor};

/// One generated box: position and size in 0..256, whether it is text, and
/// which earlier block to nest under.
type BoxSeed = (u8, u8, u8, u8, bool, u8);

struct Generated {
    page: PageBox,
    /// Boxes with their nesting depth below the body area.
    boxes: Vec<(BoxId, usize)>,
}

fn generate(seeds: &[BoxSeed]) -> Generated {
    let mut page = PageBox::new(300, 0, 1000);
    page.set_area_bounds(PageArea::Body, 0, 300);
    let body = page.area(PageArea::Body);

    let mut blocks = vec![(body, 0_usize)];
    let mut boxes = Vec::new();
    for &(x, y, width, height, is_text, parent) in seeds {
        let (parent, parent_depth) = blocks[usize::from(parent) % blocks.len()];
        let kind = if is_text { BoxKind::Text } else { BoxKind::Block };
        let style = Arc::new(StyleSheet::new(if is_text { "element/text" } else { "band" }));
        let definition = Arc::new(derive_box_definition(&style));
        let instance = InstanceId(page.tree().len() as u64);
        let id = page.add_box(
            parent,
            RenderBox::new(kind, instance, style, ChangeTracker(0), definition).with_bounds(
                i64::from(x),
                i64::from(y),
                1 + i64::from(width % 64),
                1 + i64::from(height % 64),
            ),
        );
        if !is_text {
            blocks.push((id, parent_depth + 1));
        }
        boxes.push((id, parent_depth + 1));
    }
    Generated { page, boxes }
}

fn run(generated: &Generated) -> (BreakSheetLayout, TableContentProducer) {
    // Strict, so that the generated blocks shape the grid as well.
    let features = OutputFeatures {
        strict_layout: true,
        ..OutputFeatures::default()
    };
    let mut sheet = BreakSheetLayout::new(true);
    let mut layout = TableLayoutProducer::new(&features);
    let mut content = TableContentProducer::new(features);
    let _ = layout.update(&generated.page, &mut sheet, false);
    content.compute(&generated.page, &sheet, false);
    (sheet, content)
}

fn bounds(sheet: &BreakSheetLayout, page: &PageBox, id: BoxId) -> TableRectangle {
    let node = &page.tree()[id];
    sheet.table_bounds(node.x, node.y, node.width, node.height)
}

#[quickcheck]
fn prop_content_boxes_are_placed_whole_or_reported(seeds: Vec<BoxSeed>) -> bool {
    let generated = generate(&seeds);
    let (sheet, content) = run(&generated);
    let tree = generated.page.tree();

    let mut texts = 0;
    let mut placed = 0;
    for &(id, _) in &generated.boxes {
        if tree[id].kind != BoxKind::Text {
            continue;
        }
        texts += 1;
        let rect = bounds(&sheet, &generated.page, id);
        let owned = rect
            .cells()
            .filter(|&(row, column)| content.content(row, column) == Some(id))
            .count();
        if owned == rect.row_span() * rect.column_span() {
            placed += 1;
        } else if owned != 0 {
            // Partially placed content would mean a marker was overwritten.
            return false;
        }
    }
    placed + content.conflicts() == texts
}

#[quickcheck]
fn prop_deepest_background_wins(seeds: Vec<BoxSeed>) -> bool {
    let generated = generate(&seeds);
    let (sheet, content) = run(&generated);
    let tree = generated.page.tree();

    // Deepest background covering each cell, including the body area itself.
    let mut deepest: HashMap<(usize, usize), usize> = HashMap::new();
    let body = generated.page.area(PageArea::Body);
    let backgrounds = std::iter::once((body, 0)).chain(
        generated
            .boxes
            .iter()
            .copied()
            .filter(|&(id, _)| tree[id].kind == BoxKind::Block),
    );
    for (id, depth) in backgrounds {
        for cell in bounds(&sheet, &generated.page, id).cells() {
            let entry = deepest.entry(cell).or_insert(depth);
            *entry = (*entry).max(depth);
        }
    }

    (0..content.row_count()).all(|row| {
        (0..content.column_count()).all(|column| match content.marker(row, column) {
            Some(CellMarker::Background { depth, .. }) => deepest.get(&(row, column)) == Some(depth),
            _ => true,
        })
    })
}

#[quickcheck]
fn prop_streaming_never_retires_past_filled_rows(seeds: Vec<BoxSeed>, commit_steps: u8) -> bool {
    let mut generated = generate(&seeds);
    let body = generated.page.area(PageArea::Body);
    generated.page.tree_mut().set_subtree_state(body, false, true);

    let mut processor = TableProcessor::new(&OutputFeatures::default());
    let slices = usize::from(commit_steps % 4) + 1;
    let per_slice = generated.boxes.len().div_ceil(slices).max(1);

    for chunk in generated.boxes.chunks(per_slice) {
        for &(id, _) in chunk {
            let node = &mut generated.page.tree_mut()[id];
            node.committed = true;
            node.open = false;
        }
        let _ = processor.process_slice(&generated.page);
        let content = processor.content();
        if content.finished_rows() > content.filled_rows() {
            return false;
        }
    }

    generated.page.tree_mut().set_subtree_state(body, true, false);
    let _ = processor.finish_page(&generated.page);
    let content = processor.content();
    content.finished_rows() <= content.filled_rows() && content.filled_rows() == content.row_count()
}
