//! Video Effect Catalog
//!
//! Named video effects and style presets for effect-driven generation.
//! Effect IDs are wire values understood by the upstream model; adapters
//! check reference-image prerequisites against this catalog before
//! submitting.

use serde::{Deserialize, Serialize};

// =============================================================================
// Effect Category
// =============================================================================

/// Category grouping for video effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectCategory {
    /// Subject transformation effects
    Transformation,
    /// Themed/scene effects
    Thematic,
    /// Creative/stylized effects
    Creative,
    /// Dance and motion effects
    Animation,
}

impl std::fmt::Display for EffectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectCategory::Transformation => write!(f, "transformation"),
            EffectCategory::Thematic => write!(f, "thematic"),
            EffectCategory::Creative => write!(f, "creative"),
            EffectCategory::Animation => write!(f, "animation"),
        }
    }
}

impl std::str::FromStr for EffectCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "transformation" => Ok(EffectCategory::Transformation),
            "thematic" => Ok(EffectCategory::Thematic),
            "creative" => Ok(EffectCategory::Creative),
            "animation" => Ok(EffectCategory::Animation),
            other => Err(format!("Unknown effect category: {}", other)),
        }
    }
}

// =============================================================================
// Video Effect
// =============================================================================

/// A named video effect with its reference-image requirements
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VideoEffect {
    /// Wire identifier sent to the provider
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Short description
    pub description: &'static str,
    /// Category grouping
    pub category: EffectCategory,
    /// Whether a reference image must be supplied
    pub requires_reference: bool,
    /// Maximum number of reference images accepted
    pub max_references: usize,
}

/// All supported video effects
pub const VIDEO_EFFECTS: &[VideoEffect] = &[
    VideoEffect {
        id: "muscle_surge",
        name: "Muscle Surge",
        description: "Dramatic muscle transformation",
        category: EffectCategory::Transformation,
        requires_reference: true,
        max_references: 1,
    },
    VideoEffect {
        id: "bikini_up",
        name: "Bikini Up",
        description: "Beachwear transformation",
        category: EffectCategory::Transformation,
        requires_reference: true,
        max_references: 1,
    },
    VideoEffect {
        id: "huge_cutie",
        name: "Huge Cutie",
        description: "Giant adorable version of the subject",
        category: EffectCategory::Transformation,
        requires_reference: true,
        max_references: 1,
    },
    VideoEffect {
        id: "baby_face",
        name: "Baby Face",
        description: "Baby transformation",
        category: EffectCategory::Transformation,
        requires_reference: true,
        max_references: 1,
    },
    VideoEffect {
        id: "kiss_me_ai",
        name: "Kiss Me AI",
        description: "Romantic two-subject scene",
        category: EffectCategory::Thematic,
        requires_reference: true,
        max_references: 2,
    },
    VideoEffect {
        id: "warmth_of_jesus",
        name: "Warmth of Jesus",
        description: "Warm spiritual ambiance",
        category: EffectCategory::Thematic,
        requires_reference: false,
        max_references: 0,
    },
    VideoEffect {
        id: "holy_wings",
        name: "Holy Wings",
        description: "Angelic wings",
        category: EffectCategory::Thematic,
        requires_reference: true,
        max_references: 1,
    },
    VideoEffect {
        id: "thunder_god",
        name: "Thunder God",
        description: "Thunder god transformation",
        category: EffectCategory::Thematic,
        requires_reference: true,
        max_references: 1,
    },
    VideoEffect {
        id: "black_myth_wukong",
        name: "Black Myth: Wukong",
        description: "Legendary Monkey King style",
        category: EffectCategory::Thematic,
        requires_reference: true,
        max_references: 1,
    },
    VideoEffect {
        id: "liquid_metal",
        name: "Liquid Metal",
        description: "Liquid metal transformation",
        category: EffectCategory::Creative,
        requires_reference: true,
        max_references: 1,
    },
    VideoEffect {
        id: "3d_figurine_factor",
        name: "3D Figurine",
        description: "Conversion into a 3D figurine",
        category: EffectCategory::Creative,
        requires_reference: true,
        max_references: 1,
    },
    VideoEffect {
        id: "earth_zoom_challenge",
        name: "Earth Zoom",
        description: "Dramatic zoom out from space",
        category: EffectCategory::Creative,
        requires_reference: false,
        max_references: 0,
    },
    VideoEffect {
        id: "venom",
        name: "Venom",
        description: "Symbiote transformation",
        category: EffectCategory::Creative,
        requires_reference: true,
        max_references: 1,
    },
    VideoEffect {
        id: "zombie_mode",
        name: "Zombie Mode",
        description: "Horror zombie transformation",
        category: EffectCategory::Creative,
        requires_reference: true,
        max_references: 1,
    },
    VideoEffect {
        id: "jiggle_jiggle",
        name: "Jiggle Jiggle",
        description: "Bouncy dance animation",
        category: EffectCategory::Animation,
        requires_reference: true,
        max_references: 1,
    },
    VideoEffect {
        id: "ai_dance",
        name: "AI Dance",
        description: "AI-generated dance",
        category: EffectCategory::Animation,
        requires_reference: true,
        max_references: 1,
    },
    VideoEffect {
        id: "vroom_dance",
        name: "Vroom Dance",
        description: "High-energy car-style dance",
        category: EffectCategory::Animation,
        requires_reference: true,
        max_references: 1,
    },
    VideoEffect {
        id: "pole_dance",
        name: "Pole Dance",
        description: "Acrobatic dance",
        category: EffectCategory::Animation,
        requires_reference: true,
        max_references: 1,
    },
];

/// Looks up an effect by its wire identifier
pub fn effect_by_id(id: &str) -> Option<&'static VideoEffect> {
    VIDEO_EFFECTS.iter().find(|effect| effect.id == id)
}

/// Lists all effects in a category
pub fn effects_by_category(category: EffectCategory) -> Vec<&'static VideoEffect> {
    VIDEO_EFFECTS
        .iter()
        .filter(|effect| effect.category == category)
        .collect()
}

// =============================================================================
// Style Presets
// =============================================================================

/// Style presets applied on top of a prompt or effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    /// No specific style
    #[default]
    None,
    /// Anime/manga style
    Anime,
    /// 3D animation style
    Animation3d,
    /// Claymation style
    Clay,
    /// Comic book style
    Comic,
    /// Cyberpunk style
    Cyberpunk,
}

impl StylePreset {
    /// Returns all available presets
    pub fn all() -> Vec<StylePreset> {
        vec![
            StylePreset::None,
            StylePreset::Anime,
            StylePreset::Animation3d,
            StylePreset::Clay,
            StylePreset::Comic,
            StylePreset::Cyberpunk,
        ]
    }

    /// Wire identifier sent to the provider; `None` for the no-style preset
    pub fn wire_id(&self) -> Option<&'static str> {
        match self {
            StylePreset::None => None,
            StylePreset::Anime => Some("anime"),
            StylePreset::Animation3d => Some("3d_animation"),
            StylePreset::Clay => Some("clay"),
            StylePreset::Comic => Some("comic"),
            StylePreset::Cyberpunk => Some("cyberpunk"),
        }
    }
}

impl std::fmt::Display for StylePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StylePreset::None => write!(f, "None"),
            StylePreset::Anime => write!(f, "Anime"),
            StylePreset::Animation3d => write!(f, "3D Animation"),
            StylePreset::Clay => write!(f, "Clay"),
            StylePreset::Comic => write!(f, "Comic"),
            StylePreset::Cyberpunk => write!(f, "Cyberpunk"),
        }
    }
}

impl std::str::FromStr for StylePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "" => Ok(StylePreset::None),
            "anime" => Ok(StylePreset::Anime),
            "3d_animation" => Ok(StylePreset::Animation3d),
            "clay" => Ok(StylePreset::Clay),
            "comic" => Ok(StylePreset::Comic),
            "cyberpunk" => Ok(StylePreset::Cyberpunk),
            other => Err(format!("Unknown style preset: {}", other)),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Catalog Tests
    // =========================================================================

    #[test]
    fn test_catalog_size_and_unique_ids() {
        assert_eq!(VIDEO_EFFECTS.len(), 18);

        let mut ids: Vec<&str> = VIDEO_EFFECTS.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 18);
    }

    #[test]
    fn test_effect_by_id() {
        let effect = effect_by_id("muscle_surge").unwrap();
        assert_eq!(effect.name, "Muscle Surge");
        assert_eq!(effect.category, EffectCategory::Transformation);
        assert!(effect.requires_reference);
        assert_eq!(effect.max_references, 1);

        assert!(effect_by_id("nonexistent").is_none());
    }

    #[test]
    fn test_kiss_me_ai_allows_two_references() {
        let effect = effect_by_id("kiss_me_ai").unwrap();
        assert_eq!(effect.max_references, 2);
    }

    #[test]
    fn test_promptless_effects_require_no_reference() {
        for id in ["warmth_of_jesus", "earth_zoom_challenge"] {
            let effect = effect_by_id(id).unwrap();
            assert!(!effect.requires_reference, "{} should not require a reference", id);
            assert_eq!(effect.max_references, 0);
        }
    }

    #[test]
    fn test_effects_by_category() {
        let animation = effects_by_category(EffectCategory::Animation);
        assert_eq!(animation.len(), 4);
        assert!(animation.iter().all(|e| e.category == EffectCategory::Animation));

        let transformation = effects_by_category(EffectCategory::Transformation);
        assert_eq!(transformation.len(), 4);
    }

    #[test]
    fn test_category_parse_and_display() {
        assert_eq!(
            "thematic".parse::<EffectCategory>().unwrap(),
            EffectCategory::Thematic
        );
        assert_eq!(EffectCategory::Creative.to_string(), "creative");
        assert!("cinematic".parse::<EffectCategory>().is_err());
    }

    // =========================================================================
    // Style Preset Tests
    // =========================================================================

    #[test]
    fn test_style_preset_wire_ids() {
        assert_eq!(StylePreset::None.wire_id(), None);
        assert_eq!(StylePreset::Anime.wire_id(), Some("anime"));
        assert_eq!(StylePreset::Animation3d.wire_id(), Some("3d_animation"));
    }

    #[test]
    fn test_style_preset_parse() {
        assert_eq!("anime".parse::<StylePreset>().unwrap(), StylePreset::Anime);
        assert_eq!("none".parse::<StylePreset>().unwrap(), StylePreset::None);
        assert_eq!(
            "3d_animation".parse::<StylePreset>().unwrap(),
            StylePreset::Animation3d
        );
        assert!("watercolor".parse::<StylePreset>().is_err());
    }

    #[test]
    fn test_style_preset_all() {
        assert_eq!(StylePreset::all().len(), 6);
    }
}
