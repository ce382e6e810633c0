use std::fmt;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// Structural identity of a discovered element: sha1 over tag, id, class
/// string, and the first 50 chars of visible text.
///
/// Deliberately coarser than full path identity so the same element found
/// through different discovery strategies (ordinary scan, iframe, shadow
/// root, carousel) collapses to one entry. Two genuinely distinct elements
/// with identical tag/id/class/text also collapse; that imprecision is
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    pub fn of(tag_name: &str, id: &str, class_names: &str, text: &str) -> Self {
        let truncated: String = text.chars().take(50).collect();
        let joined = format!("{}|{}|{}|{}", tag_name, id, class_names, truncated);
        Fingerprint(content_hash(&joined))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hex sha1 of arbitrary text. Also used for DOM content hashes when
/// detecting mutation after a click.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
