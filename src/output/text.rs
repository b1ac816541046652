//! Human-readable output for scan results.
//!
//! Colors come from `yansi` and are switched off globally (see
//! [`set_color`]) for `--no-color` or when stdout is not a terminal.

use std::io::{self, Write};

use yansi::Paint;

use crate::duplicates::{DuplicateGroup, ScanSummary};

/// Fingerprint characters shown next to each group.
const SHORT_FINGERPRINT: usize = 12;

/// Enable or disable terminal colors for the whole process.
pub fn set_color(enabled: bool) {
    if enabled {
        yansi::enable();
    } else {
        yansi::disable();
    }
}

/// Plain-text report writer.
pub struct TextOutput<'a> {
    groups: &'a [DuplicateGroup],
    summary: &'a ScanSummary,
}

impl<'a> TextOutput<'a> {
    /// Create a report for the given groups and scan summary.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup], summary: &'a ScanSummary) -> Self {
        Self { groups, summary }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if self.groups.is_empty() {
            writeln!(writer, "{}", "No duplicate directories found.".green())?;
        } else {
            writeln!(
                writer,
                "{} Found {} duplicate directory {} ({} redundant {})",
                "✓".green().bold(),
                self.groups.len().cyan(),
                plural(self.groups.len(), "group", "groups"),
                self.summary.duplicate_directories.cyan(),
                plural(self.summary.duplicate_directories, "copy", "copies"),
            )?;

            for (idx, group) in self.groups.iter().enumerate() {
                writeln!(writer)?;
                self.write_group(writer, idx + 1, group)?;
            }
        }

        writeln!(writer)?;
        self.write_footer(writer)
    }

    fn write_group<W: Write>(
        &self,
        writer: &mut W,
        number: usize,
        group: &DuplicateGroup,
    ) -> io::Result<()> {
        let hex = group.fingerprint_hex();
        writeln!(
            writer,
            "{} {} directories, depth {}, {} {} {}",
            format!("Group {number}:").bold(),
            group.len(),
            group.depth,
            group.entry_count,
            plural(group.entry_count, "entry", "entries"),
            hex[..SHORT_FINGERPRINT].dim(),
        )?;

        for (i, path) in group.paths.iter().enumerate() {
            let marker = if i == 0 { "★".green() } else { "○".dim() };
            writeln!(writer, "  {} {}", marker, path.display())?;
        }
        Ok(())
    }

    fn write_footer<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let summary = self.summary;
        writeln!(
            writer,
            "{}",
            format!(
                "Scanned {} directories (depth {}) in {:.2?}",
                summary.directories_scanned, summary.max_depth, summary.scan_duration
            )
            .dim()
        )?;

        if summary.hidden_by_depth > 0 {
            writeln!(
                writer,
                "{}",
                format!("{} shallower groups hidden by --min-depth", summary.hidden_by_depth).dim()
            )?;
        }

        if !summary.collision_mismatches.is_empty() {
            writeln!(
                writer,
                "{} {} directories excluded after fingerprint collisions",
                "!".yellow().bold(),
                summary.collision_mismatches.len()
            )?;
            for mismatch in &summary.collision_mismatches {
                writeln!(
                    writer,
                    "  {} differs from {}",
                    mismatch.candidate.display(),
                    mismatch.representative.display()
                )?;
            }
        }
        Ok(())
    }
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}
