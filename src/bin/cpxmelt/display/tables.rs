use std::io::{self, Write};

use cpx_melt::{ClassifiedWorkbook, Diagnostic, MeltResults, SheetRole, SummaryRecord};

use crate::util::text::{preview, truncate, wrap};

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

struct Column {
    title: &'static str,
    width: usize,
    align: Align,
}

impl Column {
    const fn left(title: &'static str, width: usize) -> Self {
        Self {
            title,
            width,
            align: Align::Left,
        }
    }

    const fn right(title: &'static str, width: usize) -> Self {
        Self {
            title,
            width,
            align: Align::Right,
        }
    }
}

pub fn print_sheet_roles(workbook: &ClassifiedWorkbook) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let rows: Vec<Vec<String>> = workbook
        .sheets
        .iter()
        .map(|sheet| {
            let role = match &sheet.role {
                SheetRole::StudyData => "Study data",
                SheetRole::KdTable => "Kd table",
                SheetRole::NormalizingTable => "Normalizing",
                SheetRole::Unrecognized(_) => "Unrecognized",
            };
            let status = if sheet.used { "used" } else { "skipped" };
            vec![sheet.name.clone(), role.to_string(), status.to_string()]
        })
        .collect();

    let columns = [
        Column::left("Sheet", 22),
        Column::left("Role", 12),
        Column::left("Status", 8),
    ];
    print_table(&mut out, "Worksheets", &columns, &rows);

    let tables = [
        ("Kd table", workbook.kd.as_ref()),
        ("Normalizing", workbook.normalizing.as_ref()),
    ];
    let kv: Vec<(&str, String)> = tables
        .iter()
        .map(|(name, table)| {
            let value = match table {
                Some(t) => format!("{} ({} elements)", t.label, t.len()),
                None => "missing".to_string(),
            };
            (*name, value)
        })
        .collect();
    print_kv_table(&mut out, "Reference Tables", &kv);
}

/// Per-study element and sample counts; blank-cell counts once calculated.
pub fn print_studies(workbook: &ClassifiedWorkbook, results: Option<&MeltResults>) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let rows: Vec<Vec<String>> = workbook
        .studies
        .iter()
        .map(|study| {
            let blanks = results
                .and_then(|r| r.study(&study.name))
                .map(|s| s.normalized.values.blank_count().to_string())
                .unwrap_or_else(|| "-".to_string());
            vec![
                study.name.clone(),
                study.elements().len().to_string(),
                study.samples().len().to_string(),
                blanks,
            ]
        })
        .collect();

    let columns = [
        Column::left("Study", 20),
        Column::right("Elements", 8),
        Column::right("Samples", 7),
        Column::right("Blank", 6),
    ];
    print_table(&mut out, "Studies", &columns, &rows);
}

pub fn print_summary(summary: &SummaryRecord) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let symbols: Vec<&str> = summary.elements.iter().map(|e| e.symbol()).collect();
    let rows = vec![
        ("Studies", summary.studies_processed.to_string()),
        ("Total Samples", summary.total_samples.to_string()),
        ("Elements", symbols.len().to_string()),
        ("Element Order", preview(&symbols, 8)),
        ("Kd Source", summary.kd_label.clone()),
        ("Normalizing", summary.normalizing_label.clone()),
        ("Diagnostics", summary.diagnostics.len().to_string()),
    ];

    print_kv_table(&mut out, "Run Summary", &rows);
}

/// Sheet-level diagnostics first, then those scoped to cells and studies.
pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    let (skipped, other): (Vec<&Diagnostic>, Vec<&Diagnostic>) =
        diagnostics.iter().partition(|d| d.skips_sheet());

    let stderr = io::stderr();
    let mut out = stderr.lock();

    if !skipped.is_empty() {
        print_diagnostic_table(&mut out, "Skipped Sheets", &skipped);
    }
    if !other.is_empty() {
        print_diagnostic_table(&mut out, "Diagnostics", &other);
    }
}

fn print_diagnostic_table(out: &mut impl Write, title: &str, diagnostics: &[&Diagnostic]) {
    let kind_w = 19usize;
    let detail_w = SAFE_TABLE_WIDTH.saturating_sub(kind_w + 5);
    let columns = [
        Column::left("Kind", kind_w),
        Column::left("Detail", detail_w),
    ];

    let mut rows = Vec::new();
    for diagnostic in diagnostics {
        let lines = wrap(&diagnostic.to_string(), detail_w);
        for (i, line) in lines.into_iter().enumerate() {
            let kind = if i == 0 { diagnostic.kind() } else { "" };
            rows.push(vec![kind.to_string(), line]);
        }
    }

    print_table(out, title, &columns, &rows);
}

fn print_table(out: &mut impl Write, title: &str, columns: &[Column], rows: &[Vec<String>]) {
    let rule = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = columns.iter().map(|c| "─".repeat(c.width + 2)).collect();
        format!("{INDENT}{left}{}{right}", segments.join(mid))
    };

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(out, "{}", rule("┌", "┬", "┐"));

    let header: Vec<String> = columns.iter().map(|c| c.title.to_string()).collect();
    let _ = writeln!(out, "{}", format_row(columns, &header));
    let _ = writeln!(out, "{}", rule("├", "┼", "┤"));

    for row in rows {
        let _ = writeln!(out, "{}", format_row(columns, row));
    }

    let _ = writeln!(out, "{}", rule("└", "┴", "┘"));
}

fn format_row(columns: &[Column], cells: &[String]) -> String {
    let rendered: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let text = truncate(cells.get(i).map(String::as_str).unwrap_or(""), col.width);
            match col.align {
                Align::Left => format!(" {:<w$} ", text, w = col.width),
                Align::Right => format!(" {:>w$} ", text, w = col.width),
            }
        })
        .collect();
    format!("{INDENT}│{}│", rendered.join("│"))
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let columns = [Column::left("Metric", key_w), Column::right("Value", val_w)];
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|(k, v)| vec![k.to_string(), v.clone()])
        .collect();
    print_table(out, title, &columns, &rows);
}
