//! Severity of a classification label.

/// Severity of a reading, from its ISO 10816 classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Severity {
    #[default]
    Healthy,
    Warning,
    Critical,
}

impl Severity {
    /// Map a classification label to a severity.
    ///
    /// Zones A and B are healthy, C is a warning, D is critical. Unknown
    /// labels are treated as healthy.
    pub fn from_classification(classification: &str) -> Self {
        match classification {
            "C (Alert)" => Severity::Warning,
            "D (Not Allowed)" => Severity::Critical,
            _ => Severity::Healthy,
        }
    }

    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Healthy => "OK",
            Severity::Warning => "ALERT",
            Severity::Critical => "CRIT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_classification() {
        assert_eq!(Severity::from_classification("A (Good)"), Severity::Healthy);
        assert_eq!(Severity::from_classification("B (Acceptable)"), Severity::Healthy);
        assert_eq!(Severity::from_classification("C (Alert)"), Severity::Warning);
        assert_eq!(Severity::from_classification("D (Not Allowed)"), Severity::Critical);
        assert_eq!(Severity::from_classification("unknown"), Severity::Healthy);
    }

    #[test]
    fn test_symbol() {
        assert_eq!(Severity::Healthy.symbol(), "OK");
        assert_eq!(Severity::Warning.symbol(), "ALERT");
        assert_eq!(Severity::Critical.symbol(), "CRIT");
    }

    #[test]
    fn test_ordering() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Healthy);
    }
}
