//! Human-readable run report.

use std::fmt::Write as _;
use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::Paint;

use crate::error::FileFailure;
use crate::pipeline::{Policy, RunSummary};

/// Console report printed after the per-file log lines.
pub struct TextReport<'a> {
    summary: &'a RunSummary,
}

impl<'a> TextReport<'a> {
    #[must_use]
    pub fn new(summary: &'a RunSummary) -> Self {
        Self { summary }
    }

    /// Render the whole report.
    #[must_use]
    pub fn render(&self) -> String {
        let s = self.summary;
        let mut out = String::new();

        let title = if s.dry_run { "Summary (dry run)" } else { "Summary" };
        let _ = writeln!(out, "{}", title.bold());
        let _ = writeln!(out, "  Directory:   {}", s.directory.display());
        let policy = match (s.policy, s.digest) {
            (Policy::Content, Some(digest)) => format!("content ({digest})"),
            (policy, _) => policy.to_string(),
        };
        let _ = writeln!(out, "  Policy:      {policy}");
        let _ = writeln!(out, "  Total files: {}", s.total_files);
        let _ = writeln!(out, "  Unique:      {}", s.unique_files.green());
        let _ = writeln!(out, "  Duplicates:  {}", s.duplicate_count().yellow());

        if s.dry_run {
            let _ = writeln!(out, "  Would delete {} file(s)", s.duplicate_count());
            let _ = writeln!(out, "  Would rename {} file(s)", s.renames.len());
        } else {
            if s.duplicate_count() > 0 {
                let _ = writeln!(
                    out,
                    "  Deleted:     {} of {} (freed {})",
                    s.deleted,
                    s.duplicate_count(),
                    ByteSize(s.bytes_freed)
                );
            }
            if s.renumbered {
                let _ = writeln!(
                    out,
                    "  Renamed:     {} ({} already numbered)",
                    s.renames.len(),
                    s.unchanged
                );
            }
        }

        if s.has_failures() {
            let _ = writeln!(out, "  Failures:    {}", s.failure_count().red().bold());
            write_failures(&mut out, "read", &s.read_failures);
            write_failures(&mut out, "delete", &s.delete_failures);
            write_failures(&mut out, "rename", &s.rename_failures);
        }

        out
    }

    /// Write the rendered report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.render().as_bytes())
    }
}

fn write_failures(out: &mut String, stage: &str, failures: &[FileFailure]) {
    for failure in failures {
        let _ = writeln!(
            out,
            "    {} {}: {}",
            format!("[{stage}]").red(),
            failure.display_name(),
            failure.reason
        );
    }
}
