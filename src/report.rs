//! Validation error channel.
//!
//! The portal contract is that validation problems are reported, not thrown:
//! calling [`Reporter::report`] marks the run as failed without terminating
//! the process, and every collected message is surfaced to the caller at the
//! end of the run.

use crate::params::ValidationError;
use log::error;

/// Collects human-readable validation errors for a single run.
#[derive(Debug, Default)]
pub struct Reporter {
    errors: Vec<String>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a validation failure. Marks the run as failed.
    pub fn report(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!("Validation error: {}", message);
        self.errors.push(message);
    }

    /// Report a typed validation error through the same channel.
    pub fn report_error(&mut self, err: &ValidationError) {
        self.report(err.to_string());
    }

    /// True once any error has been reported.
    pub fn is_failed(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_reporter_has_not_failed() {
        let reporter = Reporter::new();
        assert!(!reporter.is_failed());
        assert!(reporter.errors().is_empty());
    }

    #[test]
    fn test_report_marks_failed_and_preserves_order() {
        let mut reporter = Reporter::new();
        reporter.report("first problem");
        reporter.report_error(&ValidationError::UnknownParameter(
            "bogus".to_string(),
        ));
        assert!(reporter.is_failed());
        assert_eq!(reporter.errors().len(), 2);
        assert_eq!(reporter.errors()[0], "first problem");
        assert!(reporter.errors()[1].contains("bogus"));
    }
}
