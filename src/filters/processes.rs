use crate::{Result, SdError};
use regex::Regex;

/// Process name allow-list. Each entry matches a name it equals exactly, or
/// any name its regular expression matches.
#[derive(Debug, Clone, Default)]
pub struct ProcessFilter {
    entries: Vec<(String, Regex)>,
}

impl ProcessFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let entries = patterns
            .iter()
            .map(|pattern| {
                let pattern: &str = pattern.as_ref();
                let pattern = pattern.trim();
                Regex::new(pattern)
                    .map(|re| (pattern.to_string(), re))
                    .map_err(|e| SdError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    pub fn enabled(&self, name: &str) -> bool {
        self.entries.is_empty()
            || self
                .entries
                .iter()
                .any(|(exact, re)| exact == name || re.is_match(name))
    }
}
