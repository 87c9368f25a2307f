use std::path::{Path, PathBuf};

pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default();
    path.with_file_name(format!("{}{}", stem.to_string_lossy(), suffix))
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_replaces_extension() {
        assert_eq!(
            with_suffix(Path::new("runs/input.xlsm"), "_out.xlsx"),
            PathBuf::from("runs/input_out.xlsx")
        );
    }

    #[test]
    fn file_name_drops_directories() {
        assert_eq!(file_name(Path::new("a/b/results.xlsx")), "results.xlsx");
    }
}
