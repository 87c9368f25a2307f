use super::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("failed to write spreadsheet: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("cannot read workbooks with extension '{0}'")]
    UnsupportedReadFormat(String),

    #[error("the '{0}' format is not supported for this write operation")]
    UnsupportedWriteFormat(Format),

    #[error("cannot write workbooks with extension '{0}'")]
    UnsupportedWriteExtension(String),

    #[error("worksheet '{sheet}' could not be read: {details}")]
    Worksheet { sheet: String, details: String },
}

impl Error {
    pub fn worksheet(sheet: impl Into<String>, details: impl ToString) -> Self {
        Self::Worksheet {
            sheet: sheet.into(),
            details: details.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_part() {
        assert_eq!(
            Error::UnsupportedReadFormat("csv".into()).to_string(),
            "cannot read workbooks with extension 'csv'"
        );
        assert_eq!(
            Error::UnsupportedWriteFormat(Format::Ods).to_string(),
            "the 'ODS' format is not supported for this write operation"
        );
        assert_eq!(
            Error::worksheet("Kd", "bad zip entry").to_string(),
            "worksheet 'Kd' could not be read: bad zip entry"
        );
    }
}
