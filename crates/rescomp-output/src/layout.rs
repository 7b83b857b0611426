use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Fixed output layout for entities without a declared output template.
///
/// Folder and file names combine a human-readable slug with a short hash of
/// the underlying entity/relationship/field names, so that names that
/// sanitize to the same slug (or differ only by case) still land on
/// distinct, filesystem-safe paths.
#[derive(Debug, Default)]
pub struct OutputLayoutPolicy;

impl OutputLayoutPolicy {
    /// Creates a layout policy.
    pub fn new() -> Self {
        Self
    }

    /// Folder name for an entity, relative to the output root.
    pub fn entity_folder(&self, entity: &str) -> String {
        format!("{}-{}", slugify(entity), short_hash(entity))
    }

    /// Path of an entity's compiled documents file.
    pub fn documents_path(&self, entity: &str) -> String {
        format!("{}/documents.json", self.entity_folder(entity))
    }

    /// Path of an entity's primary-key index file.
    pub fn pk_index_path(&self, entity: &str) -> String {
        format!("{}/indexes/by-pk.json", self.entity_folder(entity))
    }

    /// Path of a foreign-key index file, under the declaring parent's
    /// folder.
    pub fn fk_index_path(&self, parent: &str, child: &str, field: &str) -> String {
        format!(
            "{}/indexes/fk/{}-{}-{}.json",
            self.entity_folder(parent),
            slugify(child),
            slugify(field),
            short_hash(&format!("{}\u{0}{}", child, field)),
        )
    }
}

/// Lowercased, filesystem-safe slug: alphanumerics kept, every other run of
/// characters collapsed to a single `-`.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "entity".to_string()
    } else {
        slug
    }
}

/// First eight characters of the base64url SHA-256 of the name.
fn short_hash(name: &str) -> String {
    let digest = Sha256::digest(name.as_bytes());
    let mut encoded = URL_SAFE_NO_PAD.encode(digest);
    encoded.truncate(8);
    // '-' would read as a slug separator and '_' is visually noisy; fold
    // both into 'x' to keep the suffix a single plain token.
    encoded
        .chars()
        .map(|c| if c == '-' || c == '_' { 'x' } else { c })
        .collect()
}
