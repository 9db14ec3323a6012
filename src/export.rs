//! CSV export of enriched postings.
//!
//! The layout matches what existing consumers of `enhanced_jobs.csv` read:
//! every non-numeric field is quoted, embedded quotes are doubled, and a
//! backslash is escaped with another backslash. The function list is written
//! as a bracketed list of quoted strings.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde_json::Value;

use crate::error::ExportError;
use crate::models::{EnrichedPosting, Merged, NOT_SPECIFIED};

const LEADING_COLUMNS: [&str; 7] = [
    "id",
    "site",
    "job_url",
    "title",
    "company",
    "location",
    "description",
];
const DETAIL_COLUMNS: [&str; 4] = ["summary", "essential_functions", "education", "experience"];

/// Write postings to `path`, returning the number of rows written.
pub fn write_csv(path: &Path, postings: &[EnrichedPosting]) -> Result<usize, ExportError> {
    let file = File::create(path)?;
    let rows = write_records(file, postings)?;
    tracing::info!("Successfully saved {rows} jobs to {}", path.display());
    Ok(rows)
}

pub fn write_records<W: Write>(out: W, postings: &[EnrichedPosting]) -> Result<usize, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::NonNumeric)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    let extra_columns = extra_columns(postings);

    let mut header: Vec<&str> = LEADING_COLUMNS.to_vec();
    header.extend(extra_columns.iter().map(String::as_str));
    header.extend(DETAIL_COLUMNS);
    writer.write_record(&header)?;

    for enriched in postings {
        let p = &enriched.posting;
        let mut row: Vec<String> = [
            &p.id,
            &p.site,
            &p.job_url,
            &p.title,
            &p.company,
            &p.location,
            &p.description,
        ]
        .into_iter()
        .map(|field| escape(field.as_deref().unwrap_or_default()))
        .collect();

        row.extend(
            extra_columns
                .iter()
                .map(|key| value_cell(p.extra.get(key).unwrap_or(&Value::Null))),
        );

        row.push(text_cell(&enriched.summary));
        row.push(list_cell(&enriched.essential_functions));
        row.push(text_cell(&enriched.education));
        row.push(text_cell(&enriched.experience));

        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(postings.len())
}

/// Provider columns in first-seen order across all postings.
fn extra_columns(postings: &[EnrichedPosting]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for key in postings.iter().flat_map(|p| p.posting.extra.keys()) {
        if !columns.iter().any(|c| c == key) {
            columns.push(key.clone());
        }
    }
    columns
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
}

fn value_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => escape(s),
        other => escape(&other.to_string()),
    }
}

fn text_cell(field: &Merged<String>) -> String {
    match field {
        Merged::Value(v) => escape(v),
        Merged::NotSpecified => NOT_SPECIFIED.to_string(),
        Merged::Omitted => String::new(),
    }
}

fn list_cell(field: &Merged<Vec<String>>) -> String {
    match field {
        Merged::Value(items) => {
            let quoted: Vec<String> = items.iter().map(|item| quote_item(item)).collect();
            escape(&format!("[{}]", quoted.join(", ")))
        }
        Merged::NotSpecified => NOT_SPECIFIED.to_string(),
        Merged::Omitted => String::new(),
    }
}

/// Quote one list item: single quotes unless the item itself holds a single
/// quote and no double quote.
fn quote_item(item: &str) -> String {
    let quote = if item.contains('\'') && !item.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(item.len() + 2);
    out.push(quote);
    for c in item.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
