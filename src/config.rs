use crate::errors::{LandscapeError, LandscapeResult};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Generation parameters for a landscape.
///
/// Heights are in abstract "units of change"; the final world scale is the
/// renderer's business. `max_height` bounds both positive and negative patch
/// heights, with 0 as the most probable middle ground.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Largest height magnitude a patch may be raised or lowered to.
    #[validate(range(min = 0))]
    pub max_height: i32,
    /// Largest height step allowed between nearby playable squares.
    #[validate(range(min = 0))]
    pub max_height_difference: i32,
    /// Upper bound for the rolled size of a single patch.
    #[validate(range(min = 0))]
    pub max_patch_size: i32,
    /// Baseline for the number of patch-growth attempts per generation run.
    #[validate(range(min = 0))]
    pub changes_count: i32,
}

impl Config {
    /// Create a validated config; any negative parameter is rejected.
    ///
    /// Zero values are legal and degrade generation to a no-op or minimal
    /// patches.
    pub fn new(
        max_height: i32,
        max_height_difference: i32,
        max_patch_size: i32,
        changes_count: i32,
    ) -> LandscapeResult<Self> {
        let config = Self {
            max_height,
            max_height_difference,
            max_patch_size,
            changes_count,
        };
        config.ensure_valid()?;
        Ok(config)
    }

    /// Re-run validation, flattening field errors into a reason string that
    /// names each offending field and value. Fields are public, so a config
    /// built literally is checked again at `Landscape::new`.
    pub fn ensure_valid(&self) -> LandscapeResult<()> {
        self.validate().map_err(|validation_errors| {
            let error_details = validation_errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let error_msgs: Vec<String> = errors
                        .iter()
                        .map(|e| match e.params.get("value") {
                            Some(value) => format!("must not be negative, got {value}"),
                            None => e.to_string(),
                        })
                        .collect();
                    format!("{field} {}", error_msgs.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");

            LandscapeError::InvalidConfig {
                reason: error_details,
            }
        })
    }
}
