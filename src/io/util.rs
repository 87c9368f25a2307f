use std::path::Path;

/// Extension of `path` without the dot, empty when there is none.
pub fn extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Spreadsheet column letters for a zero-based index (`0` → `A`, `27` → `AB`).
pub fn column_letters(col: usize) -> String {
    let mut n = col + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// A1-style reference for a zero-based row and column.
pub fn cell_reference(row: usize, col: usize) -> String {
    format!("{}{}", column_letters(col), row + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_wrap_after_z() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(27), "AB");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
    }

    #[test]
    fn extension_without_dot() {
        assert_eq!(extension(Path::new("out/results.CSV")), "CSV");
        assert_eq!(extension(Path::new("results")), "");
    }

    #[test]
    fn cell_reference_is_one_based() {
        assert_eq!(cell_reference(0, 0), "A1");
        assert_eq!(cell_reference(2, 1), "B3");
    }
}
