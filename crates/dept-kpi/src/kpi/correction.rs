use std::collections::HashMap;

/// Weight applied to worked days for acting or interim appointments.
pub const INTERIM_FACTOR: f64 = 0.5;

/// Weight applied to every title not listed in the table.
pub const DEFAULT_FACTOR: f64 = 1.0;

/// Titles recorded for acting ("ИО") and temporarily acting ("ВРИО") appointments.
pub const DEFAULT_INTERIM_TITLES: [&str; 2] = ["ИО", "ВРИО"];

/// Job title to correction factor lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionTable {
    factors: HashMap<String, f64>,
}

impl Default for CorrectionTable {
    fn default() -> Self {
        Self::empty().with_interim_titles(DEFAULT_INTERIM_TITLES)
    }
}

impl CorrectionTable {
    pub fn empty() -> Self {
        Self {
            factors: HashMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl AsRef<str>, factor: f64) -> Self {
        let key = title.as_ref().trim();
        if !key.is_empty() {
            self.factors.insert(key.to_string(), factor);
        }
        self
    }

    pub fn with_interim_titles<I, S>(self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        titles
            .into_iter()
            .fold(self, |table, title| table.with_title(title, INTERIM_FACTOR))
    }

    pub fn factor(&self, job_title: &str) -> f64 {
        self.factors
            .get(job_title.trim())
            .copied()
            .unwrap_or(DEFAULT_FACTOR)
    }
}
