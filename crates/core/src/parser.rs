//! Provider-configuration file parser.
//!
//! Format: one provider name per line, `#` starts a comment, surrounding
//! whitespace is ignored and blank lines are skipped. A name is an
//! identifier optionally followed by `.`-separated identifier characters.

use provscope_api::{CapabilityId, ConfigResource, DiscoveryError, SyntaxErrorKind};
use std::io::BufRead;
use tracing::trace;

/// A syntactically valid provider name read from a configuration resource.
pub type CandidateName = String;

/// Parse a single line.
///
/// Returns `Ok(None)` for blank and comment-only lines.
pub fn parse_line(line: &str) -> Result<Option<&str>, SyntaxErrorKind> {
    let content = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };
    let content = content.trim();
    if content.is_empty() {
        return Ok(None);
    }
    if content.chars().any(char::is_whitespace) {
        return Err(SyntaxErrorKind::IllegalSyntax);
    }

    if !is_qualified_name(content) {
        return Err(SyntaxErrorKind::IllegalName(content.to_string()));
    }
    Ok(Some(content))
}

/// An identifier start followed by identifier characters or `.`.
pub fn is_qualified_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_identifier_start)
        && chars.all(|c| is_identifier_part(c) || c == '.')
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c) || c.is_numeric()
}

/// Read a whole resource, returning its names in file order.
///
/// Stops at the first malformed line. Duplicates are kept; the cursor
/// decides what has already been seen.
pub fn parse_resource(
    capability: &CapabilityId,
    resource: &dyn ConfigResource,
) -> Result<Vec<CandidateName>, DiscoveryError> {
    let read_error = |source: std::io::Error| DiscoveryError::ConfigRead {
        capability: capability.clone(),
        resource: resource.id().clone(),
        source,
    };

    let reader = resource.open().map_err(read_error)?;
    let mut names = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(read_error)?;
        match parse_line(&line) {
            Ok(Some(name)) => names.push(name.to_string()),
            Ok(None) => {}
            Err(kind) => {
                return Err(DiscoveryError::ConfigSyntax {
                    capability: capability.clone(),
                    resource: resource.id().clone(),
                    line: idx + 1,
                    kind,
                });
            }
        }
    }

    trace!("Parsed {} names from {}", names.len(), resource.id());
    Ok(names)
}
