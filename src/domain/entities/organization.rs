use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered tenant. The id doubles as the vector-store collection name,
/// which is what isolates one organization's documents from another's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

impl Organization {
    /// Derives a collection-safe id from the display name: lowercased,
    /// whitespace collapsed to `_`, everything else non-alphanumeric dropped,
    /// plus an 8-hex random suffix (e.g. `tech_corp_a1b2c3d4`).
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        let suffix = &Uuid::new_v4().simple().to_string()[..8];

        let id = if slug.is_empty() {
            format!("org_{suffix}")
        } else {
            format!("{slug}_{suffix}")
        };

        Self { id, name }
    }

    pub fn collection_name(&self) -> &str {
        &self.id
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_sep = true;

    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_sep = false;
        } else if c.is_whitespace() || c == '-' || c == '_' {
            if !last_was_sep {
                slug.push('_');
                last_was_sep = true;
            }
        }
    }

    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}
