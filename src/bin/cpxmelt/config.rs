use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cpx_melt::{CalcConfig, ClassifierRules, load_rules};

use crate::cli::{CommonOptions, RunArgs};

pub fn build_calc_config(args: &RunArgs) -> Result<CalcConfig> {
    Ok(CalcConfig {
        rules: read_rules_text(args.common.rules.as_deref())?,
        detailed: args.detailed,
    })
}

pub fn build_rules(opts: &CommonOptions) -> Result<ClassifierRules> {
    let text = read_rules_text(opts.rules.as_deref())?;
    parse_rules(text.as_deref(), opts.rules.as_deref())
}

pub fn parse_rules(text: Option<&str>, path: Option<&Path>) -> Result<ClassifierRules> {
    load_rules(text).with_context(|| match path {
        Some(p) => format!("Invalid classifier rules in {}", p.display()),
        None => "Invalid embedded classifier rules".to_string(),
    })
}

fn read_rules_text(path: Option<&Path>) -> Result<Option<String>> {
    path.map(|p| {
        fs::read_to_string(p)
            .with_context(|| format!("Failed to read rules file: {}", p.display()))
    })
    .transpose()
}
