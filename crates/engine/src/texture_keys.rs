use thiserror::Error;

const TEXTURE_EXTENSION: &str = ".png";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextureNameError {
    #[error("texture name must not be empty")]
    Empty,
    #[error("texture name must not contain a path separator")]
    PathSeparator,
    #[error("texture name must not contain '..'")]
    ParentTraversal,
    #[error("texture name must end with '.png'")]
    MissingPngExtension,
    #[error("texture name contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

/// Texture names are bare file names such as `stone_N.png` or
/// `Male_3_Run7.png`. Lookups are case-sensitive.
pub fn validate_texture_name(name: &str) -> Result<(), TextureNameError> {
    if name.is_empty() {
        return Err(TextureNameError::Empty);
    }
    if name.contains('/') || name.contains('\\') {
        return Err(TextureNameError::PathSeparator);
    }
    if name.contains("..") {
        return Err(TextureNameError::ParentTraversal);
    }
    if !name.ends_with(TEXTURE_EXTENSION) || name.len() == TEXTURE_EXTENSION.len() {
        return Err(TextureNameError::MissingPngExtension);
    }
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.') {
            continue;
        }
        return Err(TextureNameError::InvalidCharacter { character: ch });
    }
    Ok(())
}
