//! Figure snapshots and evaluation verdicts.

use std::collections::BTreeSet;
use std::fmt;

use crate::utils::normalize_resource;

/// `typeof` value of a thumbnail image figure.
pub const THUMBNAIL_TYPEOF: &str = "mw:Image/Thumb";

/// Class token marking a figure rendered at the default size.
pub const DEFAULT_SIZE_CLASS: &str = "mw-default-size";

/// Read-only snapshot of one `<figure>` element.
///
/// Extracted from the parsed document before any await point, so it can
/// travel between tasks while the document tree itself cannot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FigureNode {
    /// The `typeof` attribute, if present
    pub type_of: Option<String>,

    /// Whitespace-separated tokens of the `class` attribute
    pub classes: BTreeSet<String>,

    /// `resource` attribute of the embedded image, if any
    pub resource: Option<String>,
}

impl FigureNode {
    /// Build a snapshot from raw attribute values.
    pub fn new(type_of: Option<&str>, class_attr: Option<&str>, resource: Option<&str>) -> Self {
        Self {
            type_of: type_of.map(str::to_string),
            classes: class_attr
                .map(|c| c.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
            resource: resource.map(str::to_string),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn is_thumbnail(&self) -> bool {
        self.type_of.as_deref() == Some(THUMBNAIL_TYPEOF)
    }

    /// The embedded image's resource name with relative prefixes stripped.
    pub fn resource_name(&self) -> Option<String> {
        self.resource.as_deref().map(|r| normalize_resource(r).to_string())
    }
}

/// Why a figure was not regenerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    MissingImage,
    NotThumbnail,
    ExplicitSize,
    UnresolvableImage,
    NotPortrait,
    ThumbnailUnavailable,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::MissingImage => "missing image",
            SkipReason::NotThumbnail => "not a thumbnail",
            SkipReason::ExplicitSize => "explicit size set",
            SkipReason::UnresolvableImage => "unresolvable image",
            SkipReason::NotPortrait => "not portrait",
            SkipReason::ThumbnailUnavailable => "thumbnail unavailable",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision for a single figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureVerdict {
    Regenerate,
    Skip(SkipReason),
}
