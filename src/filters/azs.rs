use std::collections::HashSet;

/// Availability zone allow-list; an empty list admits every zone
#[derive(Debug, Clone, Default)]
pub struct AzsFilter {
    azs: HashSet<String>,
}

impl AzsFilter {
    pub fn new<S: AsRef<str>>(azs: &[S]) -> Self {
        Self {
            azs: azs
                .iter()
                .map(|az| {
                    let az: &str = az.as_ref();
                    az.trim().to_string()
                })
                .filter(|az| !az.is_empty())
                .collect(),
        }
    }

    pub fn enabled(&self, az: &str) -> bool {
        self.azs.is_empty() || self.azs.contains(az)
    }
}
