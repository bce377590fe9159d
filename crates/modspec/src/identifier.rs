//! Structured module identifiers (`name[:slot]`)
//!
//! Older APIs address modules by an identifier made of a name and a slot
//! rather than a bare name. The slot defaults to `main`. A backslash escapes
//! the next character, so `a\:b` is a name containing a colon.

use crate::error::SpecError;
use std::fmt;

/// Slot used when an identifier string does not name one
pub const DEFAULT_SLOT: &str = "main";

/// A module name paired with a slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleIdentifier {
    name: String,
    slot: String,
}

impl ModuleIdentifier {
    /// Create an identifier from already-unescaped parts
    pub fn new(name: impl Into<String>, slot: impl Into<String>) -> Result<Self, SpecError> {
        let name = name.into();
        let slot = slot.into();
        if name.is_empty() {
            return Err(SpecError::malformed(&name, "name is empty"));
        }
        if slot.is_empty() {
            return Err(SpecError::malformed(&name, "slot is empty"));
        }
        if let Some(c) = name.chars().chain(slot.chars()).find(|&c| is_invalid(c)) {
            return Err(SpecError::malformed(
                &name,
                format!("invalid character {:?}", c),
            ));
        }
        Ok(Self { name, slot })
    }

    /// Parse an identifier string
    pub fn parse(s: &str) -> Result<Self, SpecError> {
        if s.is_empty() {
            return Err(SpecError::malformed(s, "identifier is empty"));
        }

        let mut name = String::new();
        let mut slot: Option<String> = None;
        let mut chars = s.chars();

        while let Some(c) = chars.next() {
            let ch = match c {
                '\\' => match chars.next() {
                    Some(escaped) => escaped,
                    None => return Err(SpecError::malformed(s, "dangling escape")),
                },
                ':' => {
                    if slot.is_some() {
                        return Err(SpecError::malformed(s, "more than one ':' separator"));
                    }
                    slot = Some(String::new());
                    continue;
                }
                c => c,
            };

            // Escaping does not make whitespace or control characters legal
            if is_invalid(ch) {
                return Err(SpecError::malformed(
                    s,
                    format!("invalid character {:?}", ch),
                ));
            }

            match slot.as_mut() {
                Some(slot) => slot.push(ch),
                None => name.push(ch),
            }
        }

        if name.is_empty() {
            return Err(SpecError::malformed(s, "name is empty"));
        }

        let slot = match slot {
            Some(slot) if slot.is_empty() => {
                return Err(SpecError::malformed(s, "slot is empty"));
            }
            Some(slot) => slot,
            None => DEFAULT_SLOT.to_string(),
        };

        Ok(Self { name, slot })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }
}

fn is_invalid(c: char) -> bool {
    c.is_whitespace() || c.is_control()
}

fn write_escaped(f: &mut fmt::Formatter<'_>, part: &str) -> fmt::Result {
    for c in part.chars() {
        if c == ':' || c == '\\' {
            write!(f, "\\")?;
        }
        write!(f, "{}", c)?;
    }
    Ok(())
}

impl fmt::Display for ModuleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_escaped(f, &self.name)?;
        write!(f, ":")?;
        write_escaped(f, &self.slot)
    }
}

impl std::str::FromStr for ModuleIdentifier {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
