use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use cpx_melt::io::Format;
use cpx_melt::{
    ClassifiedWorkbook, DETAILED_SHEET, MeltResults, SUMMARY_SHEET, calculate_equilibrium_melts,
    export_results_with, load_with_rules,
};

use crate::cli::RunArgs;
use crate::config::{build_calc_config, parse_rules};
use crate::display::{
    Context as DisplayContext, Progress, print_diagnostics, print_studies, print_summary,
};
use crate::io::default_output;
use crate::util::path::file_name;
use crate::util::text::{count, preview};

const TOTAL_STEPS: u8 = 3;

pub fn run_calculation(args: RunArgs, ctx: DisplayContext) -> Result<()> {
    let output = resolve_output(&args)?;
    let config = build_calc_config(&args)?;
    let rules = parse_rules(config.rules.as_deref(), args.common.rules.as_deref())?;

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS, "Calculation complete");

    progress.step("Reading workbook");
    let workbook = load_with_rules(&args.common.input, &rules).with_context(|| {
        format!("Failed to load workbook: {}", args.common.input.display())
    })?;
    progress.complete_step("Reading workbook", &build_read_substeps(&workbook));

    progress.step("Calculating equilibrium melts");
    let results = calculate_equilibrium_melts(&workbook).context("Calculation failed")?;
    progress.complete_step(
        "Calculating equilibrium melts",
        &build_calc_substeps(&results),
    );

    if ctx.interactive {
        print_studies(&workbook, Some(&results));
        print_summary(results.summary());
        print_diagnostics(results.diagnostics());
    }

    progress.step("Writing results");
    export_results_with(&results, &output, &config)
        .with_context(|| format!("Failed to write results: {}", output.display()))?;
    progress.complete_step(
        "Writing results",
        &build_write_substeps(&results, config.detailed, &output),
    );

    progress.finish();

    Ok(())
}

fn resolve_output(args: &RunArgs) -> Result<PathBuf> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.common.input));

    match Format::from_path(&output) {
        Some(format) if format.is_writable() => Ok(output),
        _ => bail!(
            "Output '{}' must have the .xlsx extension",
            output.display()
        ),
    }
}

fn build_read_substeps(workbook: &ClassifiedWorkbook) -> Vec<String> {
    let mut steps = vec![format!("Parse {}", count(workbook.sheets.len(), "worksheet"))];

    let names: Vec<&str> = workbook.studies.iter().map(|s| s.name.as_str()).collect();
    steps.push(format!(
        "Classify {}: {}",
        count(names.len(), "study sheet"),
        preview(&names, 3)
    ));

    if let Some(kd) = &workbook.kd {
        steps.push(format!("Kd values: {} ({})", kd.label, count(kd.len(), "element")));
    }
    if let Some(pm) = &workbook.normalizing {
        steps.push(format!(
            "Normalizing values: {} ({})",
            pm.label,
            count(pm.len(), "element")
        ));
    }

    let skipped = workbook.sheets.iter().filter(|s| !s.used).count();
    if skipped > 0 {
        steps.push(format!("Skip {}", count(skipped, "sheet")));
    }

    steps
}

fn build_calc_substeps(results: &MeltResults) -> Vec<String> {
    let summary = results.summary();
    vec![
        format!(
            "Register {} in first-seen order",
            count(summary.elements.len(), "element")
        ),
        format!(
            "Melt = Cpx / Kd for {}",
            count(summary.total_samples, "sample")
        ),
        format!("Normalize to {}", summary.normalizing_label),
    ]
}

fn build_write_substeps(results: &MeltResults, detailed: bool, output: &std::path::Path) -> Vec<String> {
    let target = file_name(output);
    let mut steps = vec![format!(
        "Write {} → {}",
        count(results.studies.len(), "study sheet"),
        target
    )];
    steps.push(format!("Write {SUMMARY_SHEET} sheet"));
    if detailed {
        steps.push(format!("Write {DETAILED_SHEET} sheet"));
    }
    steps
}
