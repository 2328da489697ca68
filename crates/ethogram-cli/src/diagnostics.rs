//! Diagnostic formatting for CLI output
//!
//! The matrix builder never fails on odd slot data; it records what it
//! left out. This module turns those records into rustc-style lines on
//! stderr and decides the exit code.
//!
//! ## Exit Code Semantics
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success: no errors (warnings allowed) |
//! | 1 | Failure: one or more errors emitted |
//!
//! - **Default mode**: data loss is reported as warnings, exit 0
//! - **`--strict` mode**: warnings escalate to errors, exit 1
//! - **`--quiet` mode**: hides warnings, does NOT affect the exit code

use std::io::Write;
use std::process;

use ethogram_core::MatrixDiagnostics;

// ============================================================================
// Exit Code
// ============================================================================

/// Exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: no errors (warnings allowed)
    Success = 0,
    /// Failure: one or more errors emitted
    Failure = 1,
}

impl ExitCode {
    /// Determine exit code from error count.
    pub fn from_error_count(count: usize) -> Self {
        if count > 0 {
            ExitCode::Failure
        } else {
            ExitCode::Success
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}

// ============================================================================
// Findings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// One reportable fact about data left out of the matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub code: &'static str,
    pub message: String,
}

/// Translate matrix diagnostics into findings
pub fn findings(diagnostics: &MatrixDiagnostics) -> Vec<Finding> {
    let mut findings = Vec::new();

    for key in &diagnostics.dropped_slot_keys {
        findings.push(Finding {
            code: "W001",
            message: format!("slot '{key}' is off the 5-minute grid or outside the session window"),
        });
    }

    if diagnostics.shadowed_observations > 0 {
        findings.push(Finding {
            code: "W002",
            message: format!(
                "{} observation(s) ignored: only the first observation per slot is reported",
                diagnostics.shadowed_observations
            ),
        });
    }

    for code in &diagnostics.unmatched_behaviors {
        findings.push(Finding {
            code: "W003",
            message: format!("behavior '{code}' is not in the behavior catalog"),
        });
    }

    findings
}

// ============================================================================
// Emitter
// ============================================================================

/// Configuration for diagnostic output
#[derive(Debug, Clone, Default)]
pub struct DiagnosticConfig {
    /// Escalate warnings to errors
    pub strict: bool,
    /// Suppress all output except errors
    pub quiet: bool,
}

impl DiagnosticConfig {
    pub fn effective_severity(&self) -> Severity {
        if self.strict {
            Severity::Error
        } else {
            Severity::Warning
        }
    }
}

/// Write findings as `severity[CODE]: message` and return the exit code
pub fn emit<W: Write>(
    writer: &mut W,
    findings: &[Finding],
    config: &DiagnosticConfig,
) -> std::io::Result<ExitCode> {
    let severity = config.effective_severity();
    let mut errors = 0;

    for finding in findings {
        if severity == Severity::Error {
            errors += 1;
        } else if config.quiet {
            continue;
        }
        writeln!(writer, "{}[{}]: {}", severity.as_str(), finding.code, finding.message)?;
    }

    Ok(ExitCode::from_error_count(errors))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lossy() -> MatrixDiagnostics {
        MatrixDiagnostics {
            dropped_slot_keys: vec!["14:03".into()],
            shadowed_observations: 2,
            unmatched_behaviors: vec!["moonwalking".into()],
        }
    }

    #[test]
    fn clean_diagnostics_have_no_findings() {
        assert!(findings(&MatrixDiagnostics::default()).is_empty());
    }

    #[test]
    fn findings_cover_every_kind() {
        let codes: Vec<_> = findings(&lossy()).iter().map(|f| f.code).collect();
        assert_eq!(codes, vec!["W001", "W002", "W003"]);
    }

    #[test]
    fn default_mode_warns_and_succeeds() {
        let mut out = Vec::new();
        let code = emit(&mut out, &findings(&lossy()), &DiagnosticConfig::default()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(code.is_success());
        assert!(text.contains("warning[W001]: slot '14:03'"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn strict_mode_fails() {
        let mut out = Vec::new();
        let config = DiagnosticConfig { strict: true, quiet: false };
        let code = emit(&mut out, &findings(&lossy()), &config).unwrap();

        assert_eq!(code, ExitCode::Failure);
        assert!(String::from_utf8(out).unwrap().starts_with("error[W001]"));
    }

    #[test]
    fn quiet_mode_hides_warnings_only() {
        let mut out = Vec::new();
        let config = DiagnosticConfig { strict: false, quiet: true };
        let code = emit(&mut out, &findings(&lossy()), &config).unwrap();
        assert!(code.is_success());
        assert!(out.is_empty());

        let mut out = Vec::new();
        let config = DiagnosticConfig { strict: true, quiet: true };
        let code = emit(&mut out, &findings(&lossy()), &config).unwrap();
        assert_eq!(code, ExitCode::Failure);
        assert!(!out.is_empty());
    }
}
