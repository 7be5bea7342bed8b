//! Display utilities for pack progress, summaries and settings.

use bytesize::ByteSize;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use console::style;
use toml::Value;

use crate::types::ProducedFile;

/// Formats bytes into a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}

/// Announces a step that is about to start.
pub fn show_step(action: &str, detail: &str) {
    println!("{} {detail}", style(action).bold());
}

/// Reports a finished step.
pub fn show_done(message: &str) {
    println!("{}", style(format!("✓ {message}")).green());
}

/// Builds the summary table printed after a successful pack run.
///
/// One row per produced file followed by a total row.
pub fn summary_table(archive: &ProducedFile, parity: &[ProducedFile]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED).set_content_arrangement(ContentArrangement::Dynamic).set_header(vec!["File", "Size"]);

    let total: u64 = archive.size + parity.iter().map(|f| f.size).sum::<u64>();
    for file in std::iter::once(archive).chain(parity) {
        table.add_row(vec![Cell::new(file.name()), Cell::new(format_bytes(file.size))]);
    }
    table.add_row(vec![Cell::new("Total"), Cell::new(format_bytes(total))]);

    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

/// Prints the summary table and the closing line of a pack run.
pub fn show_summary(archive: &ProducedFile, parity: &[ProducedFile], redundancy_percent: u32) {
    println!();
    println!("{}", style("Summary").cyan().bold());
    println!("{}", summary_table(archive, parity));
    println!("{} Redundancy: {redundancy_percent}%", style("Done.").green().bold());
}

/// Renders a settings value for the terminal; text is shown without quotes.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Builds the `config list` table from flattened `(key, value)` pairs.
pub fn settings_table(entries: &[(String, Value)]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED).set_content_arrangement(ContentArrangement::Dynamic).set_header(vec!["Key", "Value"]);

    for (key, value) in entries {
        table.add_row(vec![key.clone(), render_value(value)]);
    }
    table
}

/// Prints the merged settings.
pub fn show_settings(entries: &[(String, Value)]) {
    println!("{}", style(format!("{} Configuration", crate::config::APP_NAME)).cyan().bold());
    println!("{}", settings_table(entries));
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn produced(name: &str, size: u64) -> ProducedFile {
        ProducedFile { path: PathBuf::from("/staging").join(name), size }
    }

    #[test]
    fn test_format_bytes_grows_with_size() {
        assert!(format_bytes(0).starts_with('0'));
        assert_ne!(format_bytes(1536), format_bytes(1_073_741_824));
    }

    #[test]
    fn test_summary_lists_every_file_and_total() {
        let archive = produced("Familie_2025.tar", 10_240);
        let parity = [produced("Familie_2025.par2", 512), produced("Familie_2025.vol00+01.par2", 1_024)];

        let rendered = summary_table(&archive, &parity).to_string();
        assert!(rendered.contains("Familie_2025.tar"));
        assert!(rendered.contains("Familie_2025.par2"));
        assert!(rendered.contains("Familie_2025.vol00+01.par2"));
        assert!(rendered.contains("Total"));
        assert!(rendered.contains(&format_bytes(11_776)));
        assert!(!rendered.contains("/staging"));
    }

    #[test]
    fn test_settings_table_renders_values() {
        let entries = vec![("pack.default_format".to_owned(), Value::String("iso".into())), ("pack.redundancy_percent".to_owned(), Value::Integer(20))];

        let rendered = settings_table(&entries).to_string();
        assert!(rendered.contains("pack.default_format"));
        assert!(rendered.contains("iso"));
        assert!(!rendered.contains("\"iso\""));
        assert!(rendered.contains("20"));
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&Value::Integer(15)), "15");
        assert_eq!(render_value(&Value::Float(3.5)), "3.5");
        assert_eq!(render_value(&Value::String("tar".into())), "tar");
        assert_eq!(render_value(&Value::Boolean(true)), "true");
    }
}
