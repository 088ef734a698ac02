use tubely_core::Config;

/// Declared media type rejections
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Malformed media type: {0:?}")]
    MalformedMediaType(String),

    #[error("Unsupported media subtype: {subtype} (allowed: {allowed:?})")]
    UnsupportedSubtype {
        subtype: String,
        allowed: Vec<String>,
    },
}

/// Declared media type validator
///
/// Pure check of the client-declared `type/subtype` against an allow-list of subtype
/// tokens. Runs before anything is staged so obviously bad uploads cost nothing.
#[derive(Debug, Clone)]
pub struct FormatValidator {
    allowed_subtypes: Vec<String>,
}

impl FormatValidator {
    pub fn new(allowed_subtypes: Vec<String>) -> Self {
        Self {
            allowed_subtypes: allowed_subtypes
                .into_iter()
                .map(|s| s.trim().to_lowercase())
                .collect(),
        }
    }

    /// Video uploads: `mp4` only.
    pub fn video() -> Self {
        Self::new(vec!["mp4".to_string()])
    }

    /// Thumbnail uploads.
    pub fn thumbnail() -> Self {
        Self::new(vec![
            "png".to_string(),
            "jpeg".to_string(),
            "jpg".to_string(),
        ])
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.video_allowed_subtypes().to_vec())
    }

    /// Map a declared media type to its accepted extension.
    ///
    /// Parameters after `;` are ignored and matching is case-insensitive. The value
    /// is split on `/`; fewer than two segments, or a subtype outside the
    /// allow-list, is rejected.
    pub fn accepted_extension(&self, declared: &str) -> Result<String, ValidationError> {
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        let parts: Vec<&str> = essence.split('/').collect();
        if parts.len() < 2 {
            return Err(ValidationError::MalformedMediaType(declared.to_string()));
        }

        let subtype = parts[1].trim();
        if !self.allowed_subtypes.iter().any(|s| s == subtype) {
            return Err(ValidationError::UnsupportedSubtype {
                subtype: subtype.to_string(),
                allowed: self.allowed_subtypes.clone(),
            });
        }

        Ok(subtype.to_string())
    }
}
