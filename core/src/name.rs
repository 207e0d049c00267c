//! Qualified names and content validation.

use std::fmt;
use std::sync::OnceLock;

use regex_lite::Regex;

use crate::error::{CoreError, CoreResult};
use crate::Kind;

static NCNAME: OnceLock<Option<Regex>> = OnceLock::new();

fn ncname_pattern() -> Option<&'static Regex> {
    NCNAME
        .get_or_init(|| {
            Regex::new(r"^[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9._\-\x{80}-\x{10FFFF}]*$").ok()
        })
        .as_ref()
}

fn check_ncname(part: &str, whole: &str) -> CoreResult<()> {
    let pattern =
        ncname_pattern().ok_or_else(|| CoreError::invalid_name(whole, "name pattern unavailable"))?;
    if pattern.is_match(part) {
        Ok(())
    } else {
        Err(CoreError::invalid_name(
            whole,
            format!("'{}' is not a valid NCName", part),
        ))
    }
}

/// A qualified name: optional prefix, local part and namespace URI.
///
/// Namespace declarations use the prefix for the declared prefix, an empty
/// local part, and the URI for the bound namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct QName {
    prefix: String,
    local: String,
    uri: String,
}

impl QName {
    /// An unprefixed name in no namespace.
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            prefix: String::new(),
            local: local.into(),
            uri: String::new(),
        }
    }

    /// A fully qualified name.
    pub fn qualified(
        prefix: impl Into<String>,
        local: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            local: local.into(),
            uri: uri.into(),
        }
    }

    /// A namespace declaration binding `prefix` (empty for the default namespace) to `uri`.
    pub fn namespace(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            local: String::new(),
            uri: uri.into(),
        }
    }

    /// Split a lexical `prefix:local` name. The URI is left empty.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        match raw.split_once(':') {
            Some((prefix, local)) => {
                check_ncname(prefix, raw)?;
                check_ncname(local, raw)?;
                Ok(Self::qualified(prefix, local, ""))
            }
            None => {
                check_ncname(raw, raw)?;
                Ok(Self::new(raw))
            }
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Validate this name for a node of the given kind.
    pub fn validate_for(&self, kind: Kind) -> CoreResult<()> {
        let whole = self.to_string();
        match kind {
            Kind::Element | Kind::Attribute => {
                if !self.prefix.is_empty() {
                    check_ncname(&self.prefix, &whole)?;
                }
                check_ncname(&self.local, &whole)
            }
            Kind::Namespace => {
                if !self.local.is_empty() {
                    return Err(CoreError::invalid_name(
                        whole,
                        "namespace declarations carry no local name",
                    ));
                }
                if !self.prefix.is_empty() {
                    check_ncname(&self.prefix, &whole)?;
                }
                Ok(())
            }
            Kind::ProcessingInstruction => {
                if !self.prefix.is_empty() {
                    return Err(CoreError::invalid_name(
                        whole,
                        "processing-instruction targets cannot be prefixed",
                    ));
                }
                validate_pi_target(&self.local)
            }
            other => Err(CoreError::invalid_name(
                whole,
                format!("{} nodes carry no name", other),
            )),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.prefix.is_empty(), self.local.is_empty()) {
            (true, _) => f.write_str(&self.local),
            (false, true) => write!(f, "xmlns:{}", self.prefix),
            (false, false) => write!(f, "{}:{}", self.prefix, self.local),
        }
    }
}

/// Processing-instruction targets must be NCNames.
pub fn validate_pi_target(target: &str) -> CoreResult<()> {
    check_ncname(target, target)
}

/// Comments may not contain `--` or end with `-`.
pub fn validate_comment(content: &str) -> CoreResult<()> {
    if content.contains("--") {
        return Err(CoreError::invalid_content(
            Kind::Comment,
            "must not contain '--'",
        ));
    }
    if content.ends_with('-') {
        return Err(CoreError::invalid_content(Kind::Comment, "must not end with '-'"));
    }
    Ok(())
}

/// Processing-instruction content may not contain the closing `?>`.
pub fn validate_pi_content(content: &str) -> CoreResult<()> {
    if content.contains("?>") {
        return Err(CoreError::invalid_content(
            Kind::ProcessingInstruction,
            "must not contain '?>'",
        ));
    }
    Ok(())
}
