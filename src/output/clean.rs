use crate::logs::CleanReport;

pub(crate) fn print_clean_report(report: &CleanReport) {
    if !report.found {
        println!("Directory '{}' not found.", report.directory.display());
        return;
    }
    for path in &report.cleared {
        println!("Cleared: {}", path.display());
    }
    for failed in &report.failed {
        eprintln!("Failed to clear {}: {}", failed.path.display(), failed.error);
    }
}

pub(crate) fn output_clean_json(report: &CleanReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}
