/// Result of one generation run, as reported by a generator.
///
/// `output` carries the combined stdout/stderr of the run; it only becomes
/// the instance's error record when the run failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    pub success: bool,
    pub output: String,
}

impl RunOutcome {
    pub fn succeeded(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }
}
