use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use crate::util::path::with_suffix;

/// Returns `true` if stderr is a terminal (interactive).
pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

/// Output path used when `-o` is not given.
pub fn default_output(input: &Path) -> PathBuf {
    with_suffix(input, "_melt_results.xlsx")
}
