//! Diagnostic message collectors
//!
//! Decoders record non-fatal findings (stopped early, unknown tag, CRC
//! mismatch) through a [`Reporter`]. Passing [`NullReporter`] never changes
//! a decode or encode outcome, it only drops the messages.

/// Collector of diagnostic messages produced alongside a result
pub trait Reporter {
    fn add_report(&mut self, report: String);

    fn add_reports(&mut self, reports: Vec<String>) {
        for report in reports {
            self.add_report(report);
        }
    }

    /// Messages collected so far, in insertion order
    fn reports(&self) -> &[String];

    fn message_number(&self) -> usize {
        self.reports().len()
    }

    fn reset(&mut self);
}

/// Reporter that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn add_report(&mut self, _report: String) {}

    fn add_reports(&mut self, _reports: Vec<String>) {}

    fn reports(&self) -> &[String] {
        &[]
    }

    fn reset(&mut self) {}
}

/// Reporter that keeps messages in memory
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryReporter {
    messages: Vec<String>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for MemoryReporter {
    fn add_report(&mut self, report: String) {
        log::debug!("report: {}", report);
        self.messages.push(report);
    }

    fn add_reports(&mut self, reports: Vec<String>) {
        for report in reports {
            self.add_report(report);
        }
    }

    fn reports(&self) -> &[String] {
        &self.messages
    }

    fn reset(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_reporter_drops_messages() {
        let mut reporter = NullReporter;
        reporter.add_report("ignored".to_string());
        reporter.add_reports(vec!["a".to_string(), "b".to_string()]);
        assert!(reporter.reports().is_empty());
        assert_eq!(reporter.message_number(), 0);
    }

    #[test]
    fn test_memory_reporter_collects_in_order() {
        let mut reporter = MemoryReporter::new();
        reporter.add_report("first".to_string());
        reporter.add_reports(vec!["second".to_string(), "third".to_string()]);
        assert_eq!(reporter.message_number(), 3);
        assert_eq!(reporter.reports(), &["first", "second", "third"]);

        reporter.reset();
        assert_eq!(reporter.message_number(), 0);
    }
}
