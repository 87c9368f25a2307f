use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    let msg = err.to_string();
    for line in wrap(&msg, 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_io_hints(err);
        collector.collect_melt_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_io_hints(&mut self, err: &Error) {
        use cpx_melt::io::Error as IoError;

        let Some(io_err) = err.downcast_ref::<IoError>() else {
            return;
        };

        self.mark_typed();

        match io_err {
            IoError::Io { source } => {
                self.collect_std_io_hints(source);
            }

            IoError::Spreadsheet(_) => {
                self.add("The workbook could not be opened as a spreadsheet");
                self.add("Check that the file is not corrupt or password-protected");
                self.add("Re-save it from your spreadsheet application as .xlsx");
            }

            IoError::Write(_) => {
                self.add("Writing the results workbook failed");
                self.add("Close the output file if it is open in another program");
                self.add("Check output path permissions and free disk space");
            }

            IoError::UnsupportedReadFormat(ext) => {
                self.add(format!("Files ending in '.{}' cannot be read", ext));
                self.add("Supported input formats: xlsx, xlsm, xlsb, xls, ods");
            }

            IoError::UnsupportedWriteFormat(fmt) => {
                self.add(format!("The '{}' format cannot be used for output", fmt));
                self.add("Results are written as .xlsx; change the -o extension");
            }

            IoError::UnsupportedWriteExtension(ext) => {
                if ext.is_empty() {
                    self.add("The output path has no file extension");
                } else {
                    self.add(format!("Files ending in '.{}' cannot be written", ext));
                }
                self.add("Results are written as .xlsx; change the -o extension");
            }

            IoError::Worksheet { sheet, .. } => {
                self.add(format!("Worksheet '{}' could not be decoded", sheet));
                self.add("Remove charts or pivot tables from that sheet, or copy its values to a new sheet");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
                self.add("Ensure you have read/write access as needed");
            }

            ErrorKind::InvalidData | ErrorKind::UnexpectedEof => {
                self.add("File contains invalid or truncated data");
                self.add("Verify the workbook opens in a spreadsheet application");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_melt_hints(&mut self, err: &Error) {
        use cpx_melt::{MeltError, SheetKind};

        let Some(melt_err) = err.downcast_ref::<MeltError>() else {
            return;
        };

        self.mark_typed();

        match melt_err {
            MeltError::RuleParse(_) => {
                self.add("Classifier rules file has invalid TOML syntax");
                self.add("Check for missing quotes, brackets, or invalid values");
            }

            MeltError::InvalidRules(msg) => {
                self.add(format!("Rules problem: {}", msg));
                self.add("Every keyword list needs at least one non-empty entry");
            }

            MeltError::EmptyInput(kind) => {
                self.add("Run `cpxmelt inspect -i <FILE>` to see how each sheet was classified");
                match kind {
                    SheetKind::StudyData => {
                        self.add("A study sheet needs element symbols in its first column and two or more sample columns with numbers");
                    }
                    SheetKind::KdTable => {
                        self.add("The Kd sheet needs exactly one data column whose header mentions Kd, partition or coefficient");
                    }
                    SheetKind::NormalizingTable => {
                        self.add("The normalizing sheet needs exactly one data column whose header mentions PM, primitive mantle, chondrite or normalizing");
                    }
                }
                self.add("Header keywords can be changed with --rules <FILE>");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("rules file") {
            self.add("Check the --rules path");
            return;
        }

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
            self.add("Ensure you have the required access rights");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    text.push_str(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use cpx_melt::{MeltError, SheetKind};

    #[test]
    fn empty_input_hints_name_the_missing_sheet() {
        let err: Result<(), _> = Err(MeltError::EmptyInput(SheetKind::KdTable));
        let err = err.context("Calculation failed").unwrap_err();
        let hints = HintCollector::collect(&err).unwrap();
        assert!(hints.iter().any(|h| h.contains("cpxmelt inspect")));
        assert!(hints.iter().any(|h| h.contains("Kd sheet")));
    }

    #[test]
    fn unsupported_extension_lists_formats() {
        let err = anyhow::Error::new(cpx_melt::io::Error::UnsupportedReadFormat("csv".into()));
        let hints = HintCollector::collect(&err).unwrap();
        assert!(hints[0].contains(".csv"));
        assert!(hints[1].contains("xlsx"));
    }

    #[test]
    fn untyped_errors_fall_back_to_message_text() {
        let err = anyhow::anyhow!("Failed to read rules file: r.toml");
        let hints = HintCollector::collect(&err).unwrap();
        assert_eq!(hints, ["Check the --rules path"]);
    }
}
