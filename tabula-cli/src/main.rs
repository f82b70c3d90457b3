//! Tabula CLI
//!
//! Flattens a laid-out page description into the cell grid a tabular
//! output processor would write.
//!
//! Usage:
//!   tabula <page.json>                      Flatten the page in one pass
//!   tabula <page.json> --slices 4           Stream the body in four slices
//!   tabula <page.json> --feature strict_layout --feature watermark_section
//!   tabula <page.json> --features features.json --plain
//!
//! Set `RUST_LOG=debug` to see the layout reports.

mod document;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use tabula_common::OutputFeatures;
use tabula_layout::{BoxId, PageArea, PageBox, SheetLayout};
use tabula_style::BoxDefinitionFactory;
use tabula_table::{SectionType, TableContentProducer, TableProcessor, grid_dump};

use crate::document::PageDocument;

#[derive(Debug, Parser)]
#[command(name = "tabula", version, about = "Flatten a laid-out page into a table grid")]
struct Args {
    /// Page description (JSON).
    page: PathBuf,

    /// Output features as a JSON document.
    #[arg(long, value_name = "FILE")]
    features: Option<PathBuf>,

    /// Override one output feature (`key=value`, or `key` for true).
    #[arg(long = "feature", value_name = "KEY[=VALUE]")]
    overrides: Vec<String>,

    /// Commit the body progressively over this many slices before the
    /// final pass.
    #[arg(long, default_value_t = 1)]
    slices: usize,

    /// Print the grid without colours.
    #[arg(long)]
    plain: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut features = match &args.features {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            OutputFeatures::from_json_str(&text)
                .with_context(|| format!("in {}", path.display()))?
        }
        None => OutputFeatures::default(),
    };
    features
        .apply_overrides(args.overrides.iter().map(String::as_str))
        .context("invalid --feature")?;

    let document = PageDocument::load(&args.page)?;
    let mut factory = BoxDefinitionFactory::new(features.box_definition_cache_size);
    let mut page = document
        .build(&mut factory)
        .with_context(|| format!("in {}", args.page.display()))?;
    log::info!("loaded {} boxes from {}", page.tree().len(), args.page.display());

    let mut processor = TableProcessor::new(&features);

    println!("=== Slices ===");
    stream_body(&mut page, &mut processor, args.slices.max(1));
    let retired = processor.finish_page(&page);
    println!("final: retired {retired} rows");

    println!("\n=== Grid ===");
    let content = processor.content();
    print_grid(content, args.plain);

    println!("\n=== Summary ===");
    println!(
        "{} rows x {} columns, {} finished",
        content.row_count(),
        content.column_count(),
        content.finished_rows()
    );
    println!("sheet name: {}", content.sheet_name().unwrap_or("(none)"));
    println!("cell conflicts: {}", content.conflicts());
    let stats = factory.stats();
    println!(
        "box definitions: {} cached, {} hits, {} misses",
        factory.cached_len(),
        stats.hits,
        stats.misses
    );

    let rows = processor.sheet().row_count();
    processor.page_completed();
    println!("page {} completed at row {rows}", processor.pages());

    Ok(())
}

/// Replay the layouter committing the body's top-level boxes a slice at a
/// time, running an iterative pass after each slice.
fn stream_body(page: &mut PageBox, processor: &mut TableProcessor, slices: usize) {
    let body = page.area(PageArea::Body);
    let top: Vec<BoxId> = page.tree().children(body).to_vec();
    if slices == 1 || top.is_empty() {
        return;
    }

    let states: Vec<(BoxId, bool, bool)> = page
        .tree()
        .descendants(body)
        .into_iter()
        .map(|id| (id, page.tree()[id].committed, page.tree()[id].open))
        .collect();
    for &id in &top {
        page.tree_mut().set_subtree_state(id, false, true);
    }

    let per_slice = top.len().div_ceil(slices);
    for (index, chunk) in top.chunks(per_slice).enumerate() {
        for &id in chunk {
            page.tree_mut().set_subtree_state(id, true, false);
        }
        let retired = processor.process_slice(page);
        println!(
            "slice {}: retired {retired} rows, filled {}",
            index + 1,
            processor.content().filled_rows()
        );
    }

    // Boxes the document left uncommitted stay that way for the final pass.
    for (id, committed, open) in states {
        let node = &mut page.tree_mut()[id];
        node.committed = committed;
        node.open = open;
    }
}

fn print_grid(content: &TableContentProducer, plain: bool) {
    let dump = grid_dump::render(content);
    if plain {
        print!("{dump}");
        return;
    }

    // Same layout as the plain dump, with cells coloured by section.
    if let Some(header) = dump.lines().next() {
        println!("{}", header.bold());
    }
    for row in 0..content.row_count() {
        print!("{row:>5} |");
        for column in 0..content.column_count() {
            let token = grid_dump::cell_token(content, row, column);
            match content.section_type(row, column) {
                SectionType::Header => print!(" {}", token.cyan()),
                SectionType::NormalFlow => print!(" {}", token.green()),
                SectionType::RepeatFooter => print!(" {}", token.yellow()),
                SectionType::Footer => print!(" {}", token.magenta()),
                SectionType::Invalid => print!(" {}", token.dimmed()),
            }
        }
        println!();
    }
}
