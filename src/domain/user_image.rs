// src/domain/user_image.rs
//
// Profile image reference. The image itself lives with the upload
// provider; only its public URL is stored here.

use serde::{Deserialize, Serialize};

use crate::domain::identity::validate_user_id;
use crate::domain::{DomainError, DomainResult};

/// At most one per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserImage {
    /// The owning user's id (the attribute is literally named `id`)
    #[serde(rename = "id")]
    pub user_id: String,

    pub profile_url: String,
}

impl UserImage {
    pub fn new(user_id: &str, profile_url: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            profile_url: profile_url.to_string(),
        }
    }
}

/// Validates UserImage invariants
pub fn validate_user_image(image: &UserImage) -> DomainResult<()> {
    validate_user_id(&image.user_id)?;

    let url = image.profile_url.trim();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(DomainError::InvariantViolation(format!(
            "Profile url must be an http(s) url, got '{}'",
            image.profile_url
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_image() {
        let image = UserImage::new("u1", "https://utfs.io/f/abc.png");
        assert!(validate_user_image(&image).is_ok());
    }

    #[test]
    fn test_non_url_fails() {
        assert!(validate_user_image(&UserImage::new("u1", "")).is_err());
        assert!(validate_user_image(&UserImage::new("u1", "file:///tmp/a.png")).is_err());
    }

    #[test]
    fn test_user_id_attribute_name() {
        let json = serde_json::to_value(UserImage::new("u1", "https://x/y.png")).unwrap();
        assert_eq!(json["id"], "u1");
    }
}
