/// Options for one load → calculate → export run.
#[derive(Debug, Clone, Default)]
pub struct CalcConfig {
    /// Classifier rules as TOML text. `None` uses the embedded defaults.
    pub rules: Option<String>,
    /// Adds the long-format `Detailed Results` sheet to the output.
    pub detailed: bool,
}
