//! Markdown export of stored results

use crate::output::OutputResult;
use crate::storage::{RunRecord, Storage, StoredResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes every stored result to a markdown file
///
/// # Returns
///
/// * `Ok(usize)` - Number of results written
/// * `Err(OutputError)` - Failed to read storage or write the file
pub fn write_markdown_results(storage: &dyn Storage, output_path: &Path) -> OutputResult<usize> {
    let results = storage.get_results()?;
    let latest_run = storage.get_latest_run()?;
    let markdown = format_markdown_results(&results, latest_run.as_ref());

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(results.len())
}

/// Formats stored results as a markdown document
pub fn format_markdown_results(results: &[StoredResult], latest_run: Option<&RunRecord>) -> String {
    let mut md = String::new();

    md.push_str("# Search Results\n\n");

    if let Some(run) = latest_run {
        md.push_str(&format!("- **Query**: `{}`\n", run.query));
        md.push_str(&format!("- **Last Run**: {} ({})\n", run.started_at, run.status.to_db_string()));
        md.push_str(&format!("- **Stored Results**: {}\n\n", results.len()));
    }

    if results.is_empty() {
        md.push_str("_No results stored._\n");
        return md;
    }

    for result in results {
        md.push_str(&format!(
            "{}. [{}](<{}>)\n",
            result.rank,
            escape_link_text(&result.title),
            escape_link_destination(&result.link)
        ));
        if !result.snippet.is_empty() {
            md.push_str(&format!("   {}\n", result.snippet));
        }
    }

    md
}

fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

/// Angle brackets would end a `<...>` destination early
fn escape_link_destination(link: &str) -> String {
    link.replace('<', "%3C").replace('>', "%3E")
}
