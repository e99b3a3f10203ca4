//! Error taxonomy: the closed table of recognised subtypes and their defaults.
//!
//! The table is a `static` built at compile time, so it is fully initialised
//! before first use and never mutated.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{ErrorParts, ErrorValue};

// ─── SubtypeTag ───────────────────────────────────────────────────────────────

/// Identifies which taxonomy entry produced an [`ErrorValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubtypeTag {
    #[serde(rename = "BaseError")]
    Base,
    #[serde(rename = "ValidationError")]
    Validation,
    #[serde(rename = "NotFoundError")]
    NotFound,
    #[serde(rename = "UnauthorizedError")]
    Unauthorized,
    #[serde(rename = "ForbiddenError")]
    Forbidden,
    #[serde(rename = "InternalServerError")]
    InternalServer,
}

impl SubtypeTag {
    pub const ALL: [SubtypeTag; 6] = [
        Self::Base,
        Self::Validation,
        Self::NotFound,
        Self::Unauthorized,
        Self::Forbidden,
        Self::InternalServer,
    ];

    /// Canonical wire name, e.g. `"ValidationError"`.
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// Resolve a canonical or short tag name.
    pub fn from_name(name: &str) -> Option<Self> {
        lookup(name).map(|e| e.tag)
    }

    pub fn classification(self) -> Classification {
        self.entry().defaults
    }

    pub fn entry(self) -> &'static TaxonomyEntry {
        let index = match self {
            Self::Base => 0,
            Self::Validation => 1,
            Self::NotFound => 2,
            Self::Unauthorized => 3,
            Self::Forbidden => 4,
            Self::InternalServer => 5,
        };
        &TAXONOMY[index]
    }
}

impl fmt::Display for SubtypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Classification ───────────────────────────────────────────────────────────

/// Default classification of a subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub status_code: u16,
    pub code: &'static str,
    pub is_operational: bool,
}

/// Builds an [`ErrorValue`] of one subtype from loose parts.
pub type ErrorFactory = fn(ErrorParts) -> ErrorValue;

/// One row of the taxonomy table.
#[derive(Debug)]
pub struct TaxonomyEntry {
    pub tag: SubtypeTag,
    /// Canonical name (`"NotFoundError"`).
    pub name: &'static str,
    /// Short name (`"NotFound"`), also accepted on lookup.
    pub short_name: &'static str,
    pub defaults: Classification,
    pub construct: ErrorFactory,
}

static TAXONOMY: [TaxonomyEntry; 6] = [
    TaxonomyEntry {
        tag: SubtypeTag::Base,
        name: "BaseError",
        short_name: "Base",
        defaults: Classification {
            status_code: 500,
            code: "BASEERROR",
            is_operational: true,
        },
        construct: |parts| ErrorValue::from_parts(SubtypeTag::Base, parts),
    },
    TaxonomyEntry {
        tag: SubtypeTag::Validation,
        name: "ValidationError",
        short_name: "Validation",
        defaults: Classification {
            status_code: 400,
            code: "VALIDATION_ERROR",
            is_operational: true,
        },
        construct: |parts| ErrorValue::from_parts(SubtypeTag::Validation, parts),
    },
    TaxonomyEntry {
        tag: SubtypeTag::NotFound,
        name: "NotFoundError",
        short_name: "NotFound",
        defaults: Classification {
            status_code: 404,
            code: "NOT_FOUND",
            is_operational: true,
        },
        construct: |parts| ErrorValue::from_parts(SubtypeTag::NotFound, parts),
    },
    TaxonomyEntry {
        tag: SubtypeTag::Unauthorized,
        name: "UnauthorizedError",
        short_name: "Unauthorized",
        defaults: Classification {
            status_code: 401,
            code: "UNAUTHORIZED",
            is_operational: true,
        },
        construct: |parts| ErrorValue::from_parts(SubtypeTag::Unauthorized, parts),
    },
    TaxonomyEntry {
        tag: SubtypeTag::Forbidden,
        name: "ForbiddenError",
        short_name: "Forbidden",
        defaults: Classification {
            status_code: 403,
            code: "FORBIDDEN",
            is_operational: true,
        },
        construct: |parts| ErrorValue::from_parts(SubtypeTag::Forbidden, parts),
    },
    TaxonomyEntry {
        tag: SubtypeTag::InternalServer,
        name: "InternalServerError",
        short_name: "InternalServer",
        defaults: Classification {
            status_code: 500,
            code: "INTERNAL_SERVER_ERROR",
            is_operational: false,
        },
        construct: |parts| ErrorValue::from_parts(SubtypeTag::InternalServer, parts),
    },
];

/// All taxonomy rows, in [`SubtypeTag::ALL`] order.
pub fn entries() -> &'static [TaxonomyEntry] {
    &TAXONOMY
}

/// Look up a row by canonical or short name (case-sensitive).
pub fn lookup(name: &str) -> Option<&'static TaxonomyEntry> {
    TAXONOMY
        .iter()
        .find(|e| e.name == name || e.short_name == name)
}

/// Default classification for a tag.
pub fn classify(tag: SubtypeTag) -> Classification {
    tag.classification()
}

/// Factory for the named subtype, or `None` if the name is unrecognised.
pub fn constructor_for(name: &str) -> Option<ErrorFactory> {
    lookup(name).map(|e| e.construct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_matches_tags() {
        for (entry, tag) in entries().iter().zip(SubtypeTag::ALL) {
            assert_eq!(entry.tag, tag);
            assert_eq!(tag.entry().tag, tag);
        }
    }

    #[test]
    fn classify_defaults() {
        let c = classify(SubtypeTag::Validation);
        assert_eq!((c.status_code, c.code, c.is_operational), (400, "VALIDATION_ERROR", true));
        let c = classify(SubtypeTag::Unauthorized);
        assert_eq!((c.status_code, c.code), (401, "UNAUTHORIZED"));
        let c = classify(SubtypeTag::Forbidden);
        assert_eq!((c.status_code, c.code), (403, "FORBIDDEN"));
        let c = classify(SubtypeTag::InternalServer);
        assert!(!c.is_operational);
    }

    #[test]
    fn lookup_by_canonical_and_short_name() {
        assert_eq!(SubtypeTag::from_name("NotFoundError"), Some(SubtypeTag::NotFound));
        assert_eq!(SubtypeTag::from_name("NotFound"), Some(SubtypeTag::NotFound));
        assert!(lookup("notfounderror").is_none());
        assert!(lookup("Error").is_none());
        assert!(lookup("CustomError").is_none());
    }

    #[test]
    fn constructor_for_builds_the_right_subtype() {
        let make = constructor_for("ForbiddenError").unwrap();
        let e = make(ErrorParts::new("no access"));
        assert_eq!(e.subtype(), Some(SubtypeTag::Forbidden));
        assert_eq!(e.status_code(), 403);
        assert_eq!(e.message(), "no access");
        assert!(constructor_for("TeapotError").is_none());
    }

    #[test]
    fn tag_serde_uses_canonical_names() {
        let json = serde_json::to_string(&SubtypeTag::InternalServer).unwrap();
        assert_eq!(json, "\"InternalServerError\"");
        let back: SubtypeTag = serde_json::from_str("\"UnauthorizedError\"").unwrap();
        assert_eq!(back, SubtypeTag::Unauthorized);
        assert_eq!(SubtypeTag::Validation.to_string(), "ValidationError");
    }
}
