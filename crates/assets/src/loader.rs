use std::fs;
use std::path::Path;

use crate::{AssetError, Content, ContentPack};

/// Load and validate content from the provided JSON file path.
pub fn content_from_file(path: &Path) -> Result<Content, AssetError> {
    let data = fs::read_to_string(path)?;
    let content = content_from_str(&data)?;
    tracing::info!(
        path = %path.display(),
        items = content.items.len(),
        powers = content.powers.len(),
        "loaded content pack"
    );
    Ok(content)
}

/// Load and validate content from an in-memory JSON string.
pub fn content_from_str(input: &str) -> Result<Content, AssetError> {
    let pack: ContentPack = crate::load_pack_from_str(input)?;
    pack.into_content()
}
