//! Display utilities for operation results.

use std::path::Path;

use bytesize::ByteSize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use console::style;

use crate::config::APP_NAME;
use crate::types::{Metrics, ProcessorMode};

/// Builds the summary table for a finished file operation.
pub fn metrics_table(mode: ProcessorMode, path: &Path, metrics: &Metrics, threads: Option<usize>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic).set_header(vec![Cell::new(APP_NAME), Cell::new("Value")]);

    table.add_row(vec![Cell::new("Mode"), Cell::new(mode)]);
    table.add_row(vec![Cell::new("Output"), Cell::new(path.display())]);
    table.add_row(vec![Cell::new("Size"), Cell::new(ByteSize::b(metrics.bytes).display().iec())]);
    table.add_row(vec![Cell::new("Time"), Cell::new(format!("{} ms", metrics.millis))]);
    table.add_row(vec![Cell::new("Speed"), Cell::new(format!("{:.3} Gbit/s", metrics.speed))]);
    table.add_row(vec![Cell::new("Threads"), Cell::new(threads.map_or_else(|| "sequential".to_owned(), |n| n.to_string()))]);

    table
}

pub fn show_metrics(mode: ProcessorMode, path: &Path, metrics: &Metrics, threads: Option<usize>) {
    println!("{}", metrics_table(mode, path, metrics, threads));
}

pub fn show_success(mode: ProcessorMode, path: &Path) {
    let action = match mode {
        ProcessorMode::Encrypt => "encrypted",
        ProcessorMode::Decrypt => "decrypted",
    };

    println!();
    println!("{} {}", style("✓").green(), style(format!("File {action} successfully: {}", path.display())).bold());
}

/// Prints a string result on its own line so it can be piped.
pub fn show_text(label: &str, text: &str) {
    eprintln!("{} {}", style("✓").green(), style(label).bold());
    println!("{text}");
}
