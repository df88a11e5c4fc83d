use super::series::{CategoryId, Metric};

/// Metric name to on/off, kept in the order metrics were first defined.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricToggles {
    entries: Vec<(String, bool)>,
}

impl MetricToggles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a toggle set from explicit `(name, active)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        let mut toggles = Self::new();
        for (name, active) in pairs {
            toggles.set(name, active);
        }
        toggles
    }

    /// Adds metrics that have never been seen with the given initial state.
    /// Existing entries keep their value.
    pub fn register(&mut self, metrics: &[Metric], active: bool) {
        for metric in metrics {
            if !self.contains(&metric.key) {
                self.entries.push((metric.key.clone(), active));
            }
        }
    }

    pub fn set(&mut self, name: impl Into<String>, active: bool) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = active,
            None => self.entries.push((name, active)),
        }
    }

    /// Flips `name` and returns its new value. Unknown names start from `false`.
    pub fn flip(&mut self, name: &str) -> bool {
        self.flip_or(name, false)
    }

    /// Flips `name`, reading a missing entry as `default`.
    pub fn flip_or(&mut self, name: &str, default: bool) -> bool {
        let next = !self.is_active_or(name, default);
        self.set(name, next);
        next
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.is_active_or(name, false)
    }

    /// State of `name`, or `default` when it has never been toggled.
    pub fn is_active_or(&self, name: &str, default: bool) -> bool {
        self.get(name).unwrap_or(default)
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, active)| *active)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(n, a)| (n.as_str(), *a))
    }

    pub fn active_names(&self) -> Vec<&str> {
        self.iter()
            .filter_map(|(name, active)| active.then_some(name))
            .collect()
    }
}

/// What the user is looking at: one category plus the metric toggles.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSelection {
    pub category: CategoryId,
    pub metrics: MetricToggles,
}

impl ViewSelection {
    pub fn new(category: CategoryId, metrics: MetricToggles) -> Self {
        Self { category, metrics }
    }
}
