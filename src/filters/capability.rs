use crate::foundation::error::{EngraveError, EngraveResult};

/// Environment variable consulted by [`FilterCapability::probe`].
pub const CAPABILITY_ENV: &str = "ENGRAVE_CAPABILITIES";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which accelerated filter paths are available for a session.
///
/// Resolved once and then passed by value into [`crate::FilterEngine::new`]; it never changes
/// visual output, only which implementation runs.
pub struct FilterCapability {
    /// Accelerated single-pass per-pixel filters.
    pub single_pass: bool,
    /// Accelerated 3×3 convolution.
    pub convolution: bool,
}

impl FilterCapability {
    /// Every accelerated path enabled.
    pub const ALL: Self = Self {
        single_pass: true,
        convolution: true,
    };

    /// Reference paths only.
    pub const NONE: Self = Self {
        single_pass: false,
        convolution: false,
    };

    /// Resolve from [`CAPABILITY_ENV`]; unset means [`FilterCapability::ALL`], an unparsable
    /// value falls back to it with a warning.
    pub fn probe() -> Self {
        match std::env::var(CAPABILITY_ENV) {
            Ok(raw) => Self::parse(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring {CAPABILITY_ENV}");
                Self::ALL
            }),
            Err(_) => Self::ALL,
        }
    }

    /// Parse a comma-separated list of `none`, `filter`, `convolution`, `all`.
    pub fn parse(raw: &str) -> EngraveResult<Self> {
        let mut cap = Self::NONE;
        for token in raw.split(',').map(|t| t.trim().to_ascii_lowercase()) {
            match token.as_str() {
                "" | "none" => {}
                "filter" | "single_pass" | "single-pass" => cap.single_pass = true,
                "convolution" | "conv" => cap.convolution = true,
                "all" => cap = Self::ALL,
                other => {
                    return Err(EngraveError::validation(format!(
                        "unknown filter capability '{other}'"
                    )));
                }
            }
        }
        Ok(cap)
    }
}

impl Default for FilterCapability {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/capability.rs"]
mod tests;
