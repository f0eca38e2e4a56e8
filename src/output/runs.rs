use comfy_table::{Cell, Color};

use crate::cli::SortOrder;
use crate::mission::MissionRecord;
use crate::output::format::{create_styled_table, format_bytes, header_cell, right_cell};

fn sorted(records: &[MissionRecord], order: SortOrder) -> Vec<&MissionRecord> {
    let mut sorted: Vec<_> = records.iter().collect();
    match order {
        SortOrder::Asc => sorted.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        SortOrder::Desc => sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
    }
    sorted
}

pub(crate) fn print_runs_table(records: &[MissionRecord], order: SortOrder, use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Started", use_color),
        header_cell("Output", use_color),
        header_cell("Files", use_color),
        header_cell("Log", use_color),
    ]);

    let missing = if use_color { Some(Color::DarkGrey) } else { None };
    for record in sorted(records, order) {
        let started = record.started.map_or_else(
            || record.timestamp.clone(),
            |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
        );
        let log = match record.log_bytes {
            Some(bytes) => right_cell(&format_bytes(bytes), None),
            None => right_cell("-", missing),
        };
        table.add_row(vec![
            Cell::new(started),
            Cell::new(record.output_dir.display()),
            right_cell(&record.artifacts.to_string(), None),
            log,
        ]);
    }

    println!("\n  Mission Records\n");
    println!("{table}");
    println!("\n  {} mission(s)\n", records.len());
}

pub(crate) fn output_runs_json(records: &[MissionRecord], order: SortOrder) -> String {
    let sorted = sorted(records, order);
    serde_json::to_string_pretty(&sorted).unwrap_or_else(|_| "[]".to_string())
}
