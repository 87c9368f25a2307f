use anyhow::{Context, Result};

use cpx_melt::load_with_rules;

use crate::cli::InspectArgs;
use crate::config::build_rules;
use crate::display::{
    Context as DisplayContext, print_diagnostics, print_sheet_roles, print_studies,
};

pub fn run_inspect(args: InspectArgs, ctx: DisplayContext) -> Result<()> {
    let rules = build_rules(&args.common)?;
    let workbook = load_with_rules(&args.common.input, &rules).with_context(|| {
        format!("Failed to load workbook: {}", args.common.input.display())
    })?;

    if ctx.interactive {
        print_sheet_roles(&workbook);
        print_studies(&workbook, None);
        print_diagnostics(&workbook.diagnostics);
        return Ok(());
    }

    for sheet in &workbook.sheets {
        let role = match sheet.role.kind() {
            Some(kind) => kind.to_string(),
            None => "unrecognized".to_string(),
        };
        let status = if sheet.used { "used" } else { "skipped" };
        println!("{}\t{}\t{}", sheet.name, role, status);
    }
    for diagnostic in &workbook.diagnostics {
        println!("# {}: {}", diagnostic.kind(), diagnostic);
    }

    Ok(())
}
