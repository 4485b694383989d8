//! Plain-text persona reports and their persistence.
//!
//! Rendering is pure formatting over a finished [`Persona`]; persistence is
//! a [`PersonaSink`]. [`FileSink`] writes UTF-8 text files named
//! `persona_{username}_{date}.txt` unless told otherwise.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::persona::{Characteristic, Persona};
use crate::schema::{CharacteristicSlot, SlotSection};

const RULE: &str =
    "================================================================================";

/// Characters of a citation quote shown in the report.
const QUOTE_PREVIEW_CHARS: usize = 100;

/// Render the full report.
pub fn format_persona_report(persona: &Persona) -> String {
    let meta = persona.metadata();
    let mut out = String::new();

    out.push('\n');
    banner(&mut out, "REDDIT USER PERSONA REPORT");
    let _ = writeln!(out);
    let _ = writeln!(out, "USERNAME: u/{}", meta.username);
    let _ = writeln!(out, "ANALYSIS DATE: {}", meta.analysis_date);
    let _ = writeln!(out, "ACCOUNT AGE: {} days", meta.account_age_days);
    let _ = writeln!(out, "TOTAL POSTS: {}", meta.total_posts);
    let _ = writeln!(out, "TOTAL COMMENTS: {}", meta.total_comments);
    let _ = writeln!(out, "KARMA: {}", meta.karma);
    let _ = writeln!(out);

    for section in SlotSection::ALL {
        banner(&mut out, section.title());
        for slot in section.slots() {
            if let Some(characteristic) = persona.characteristic(slot) {
                out.push_str(&format_characteristic(slot, characteristic));
            }
        }
        let _ = writeln!(out);
    }

    banner(&mut out, "END OF REPORT");
    out
}

fn banner(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "{:^80}", title);
    let _ = writeln!(out, "{}", RULE);
}

fn format_characteristic(slot: CharacteristicSlot, characteristic: &Characteristic) -> String {
    let mut out = format!(
        "\n{}: {}\n",
        slot.label().to_uppercase(),
        characteristic.value
    );
    if characteristic.citations.is_empty() {
        return out;
    }

    out.push_str("Citations:\n");
    for (i, citation) in characteristic.citations.iter().enumerate() {
        let preview: String = citation.quote.chars().take(QUOTE_PREVIEW_CHARS).collect();
        let _ = writeln!(
            out,
            "  {}. [{}] {}...",
            i + 1,
            citation.kind.as_str().to_uppercase(),
            preview
        );
        if !citation.url.is_empty() {
            let _ = writeln!(out, "     Source: {}", citation.url);
        }
        if citation.is_verified() {
            let _ = writeln!(
                out,
                "     Subreddit: r/{} | Score: {}\n",
                citation.subreddit, citation.score
            );
        } else {
            let _ = writeln!(out, "     Not found in the user's posts or comments\n");
        }
    }
    out
}

/// Default report file name.
pub fn default_report_name(persona: &Persona) -> String {
    format!(
        "persona_{}_{}.txt",
        persona.metadata().username,
        persona.metadata().analysis_date
    )
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Where finished personas go.
pub trait PersonaSink {
    /// Externalize `persona`. `target` overrides the sink's default name.
    /// Returns the location written.
    fn write(&self, persona: &Persona, target: Option<&Path>) -> Result<PathBuf>;
}

/// Writes text reports (and optionally JSON) into a directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    directory: PathBuf,
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new(".")
    }
}

impl FileSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn resolve(&self, persona: &Persona, target: Option<&Path>) -> PathBuf {
        match target {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.directory.join(path),
            None => self.directory.join(default_report_name(persona)),
        }
    }

    /// Write the persona as pretty JSON next to where the report would go.
    pub fn write_json(&self, persona: &Persona, target: Option<&Path>) -> Result<PathBuf> {
        let path = self.resolve(persona, target).with_extension("json");
        let json = persona
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&path, json)?;
        log::info!("Persona JSON saved to: {}", path.display());
        Ok(path)
    }
}

impl PersonaSink for FileSink {
    fn write(&self, persona: &Persona, target: Option<&Path>) -> Result<PathBuf> {
        let path = self.resolve(persona, target);
        std::fs::write(&path, format_persona_report(persona))?;
        log::info!("Persona report saved to: {}", path.display());
        Ok(path)
    }
}
