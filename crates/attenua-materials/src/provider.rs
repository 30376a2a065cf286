//! Attenuation source trait and material errors.
//!
//! Anything that can turn a `(material, energy)` pair into a linear
//! attenuation coefficient implements [`AttenuationSource`]. The layered
//! transmission engine in `attenua-core` only ever talks to this trait.

use thiserror::Error;

/// Errors from material catalogs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaterialError {
    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Resolves linear attenuation coefficients for named materials.
pub trait AttenuationSource: Send + Sync {
    /// Linear attenuation coefficient $\mu$ (cm⁻¹) of `material_id` at
    /// photon energy `energy_mev`.
    fn linear_attenuation_coefficient(
        &self,
        material_id: &str,
        energy_mev: f64,
    ) -> Result<f64, MaterialError>;

    /// Whether `material_id` can be resolved by this source.
    fn contains(&self, material_id: &str) -> bool;

    /// Human-readable label for a material, used only for presentation.
    ///
    /// Default implementation title-cases the identifier, so
    /// `soft_tissue` becomes `Soft Tissue`.
    fn display_label(&self, material_id: &str) -> String {
        title_case(material_id)
    }
}

/// Replace underscores with spaces and capitalise each word.
pub fn title_case(identifier: &str) -> String {
    identifier
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("soft_tissue"), "Soft Tissue");
        assert_eq!(title_case("bone"), "Bone");
        assert_eq!(title_case("AIR"), "Air");
        assert_eq!(title_case("cortical__bone"), "Cortical Bone");
    }
}
