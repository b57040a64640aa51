//! Render settings: which atlases to bake and how each is produced.

use crate::atlas::{ChannelClaims, ChannelMask, TextureFormat};
use crate::error::{BakerError, Result};
use crate::material::{Material, MaterialOverrides, ShaderRef};
use serde::{Deserialize, Serialize};

/// One render of the object whose selected channels go into a texture slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BakePass {
    /// Replaces the source material's shader when set.
    #[serde(default)]
    pub shader: Option<ShaderRef>,
    /// Property overrides applied after the shader swap.
    #[serde(default, skip_serializing_if = "MaterialOverrides::is_empty")]
    pub overrides: MaterialOverrides,
    /// Channels this pass writes.
    #[serde(flatten)]
    pub channels: ChannelMask,
}

impl BakePass {
    pub fn new(channels: ChannelMask) -> Self {
        Self {
            channels,
            ..Self::default()
        }
    }

    pub fn with_shader(mut self, shader: ShaderRef) -> Self {
        self.shader = Some(shader);
        self
    }

    pub fn with_overrides(mut self, overrides: MaterialOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// The material this pass renders with.
    ///
    /// A copy of `source`, or a fresh material on the replacement shader that
    /// takes `source`'s properties, with the overrides applied last.
    pub fn material_for(&self, source: &Material) -> Material {
        let mut material = match &self.shader {
            Some(shader) => Material::with_shader_from(shader.clone(), source),
            None => source.clone(),
        };
        self.overrides.apply(&mut material);
        material
    }
}

/// How the importer scales non-power-of-two textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpotScale {
    None,
    ToNearest,
}

/// Where the importer takes alpha from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaSource {
    None,
    FromInput,
}

/// Import metadata attached to each generated atlas. Not used by the bake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureImportSettings {
    pub mipmaps: bool,
    pub readable: bool,
    pub npot_scale: NpotScale,
    pub alpha_is_transparency: bool,
    pub alpha_source: AlphaSource,
}

fn default_texture_id() -> String {
    "_MainTex".to_string()
}

fn enabled() -> bool {
    true
}

/// A named output atlas and the passes that fill it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureSlot {
    /// Material property the atlas is bound to.
    #[serde(default = "default_texture_id")]
    pub texture_id: String,
    #[serde(default = "enabled")]
    pub power_of_two: bool,
    #[serde(default = "enabled")]
    pub alpha_is_transparency: bool,
    #[serde(default)]
    pub passes: Vec<BakePass>,
}

impl Default for TextureSlot {
    fn default() -> Self {
        Self {
            texture_id: default_texture_id(),
            power_of_two: true,
            alpha_is_transparency: true,
            passes: Vec::new(),
        }
    }
}

impl TextureSlot {
    pub fn new(texture_id: impl Into<String>) -> Self {
        Self {
            texture_id: texture_id.into(),
            ..Self::default()
        }
    }

    pub fn with_pass(mut self, pass: BakePass) -> Self {
        self.passes.push(pass);
        self
    }

    /// Per-channel claim counts over all passes.
    pub fn claims(&self) -> ChannelClaims {
        ChannelClaims::from_masks(self.passes.iter().map(|p| &p.channels))
    }

    /// Format of this slot's atlas.
    pub fn format(&self) -> TextureFormat {
        self.claims().format()
    }

    pub fn import_settings(&self) -> TextureImportSettings {
        TextureImportSettings {
            mipmaps: true,
            readable: false,
            npot_scale: if self.power_of_two {
                NpotScale::ToNearest
            } else {
                NpotScale::None
            },
            alpha_is_transparency: self.alpha_is_transparency,
            alpha_source: if self.alpha_is_transparency {
                AlphaSource::FromInput
            } else {
                AlphaSource::None
            },
        }
    }
}

/// The atlases to bake and the shader of the generated material.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillboardRenderSettings {
    #[serde(default)]
    pub textures: Vec<TextureSlot>,
    #[serde(default)]
    pub billboard_shader: ShaderRef,
}

impl BillboardRenderSettings {
    pub fn new(billboard_shader: ShaderRef) -> Self {
        Self {
            textures: Vec::new(),
            billboard_shader,
        }
    }

    pub fn with_texture(mut self, slot: TextureSlot) -> Self {
        self.textures.push(slot);
        self
    }

    pub fn pass_count(&self) -> usize {
        self.textures.iter().map(|t| t.passes.len()).sum()
    }

    /// Reject slots sharing a texture id. The generated material binds atlases
    /// by id, so a second slot would silently replace the first.
    pub fn validate(&self) -> Result<()> {
        for (i, slot) in self.textures.iter().enumerate() {
            if self.textures[..i].iter().any(|s| s.texture_id == slot.texture_id) {
                return Err(BakerError::InvalidSettings(format!(
                    "texture slot '{}' is listed more than once",
                    slot.texture_id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::Channel;
    use crate::material::{PropertyValue, COLOR_PROPERTY};

    #[test]
    fn test_pass_material_keeps_source_shader() {
        let source = Material::new("leaf", ShaderRef::new("standard"))
            .with_property(COLOR_PROPERTY, PropertyValue::Color([0.2, 0.8, 0.2, 1.0]));
        let pass = BakePass::new(ChannelMask::ALL).with_overrides(
            MaterialOverrides::new().with("_Glossiness", PropertyValue::Float(0.0)),
        );

        let material = pass.material_for(&source);
        assert_eq!(material.shader, source.shader);
        assert_eq!(material.color(COLOR_PROPERTY), Some([0.2, 0.8, 0.2, 1.0]));
        assert_eq!(material.float("_Glossiness"), Some(0.0));
        assert!(source.get("_Glossiness").is_none());
    }

    #[test]
    fn test_pass_material_with_replacement_shader() {
        let source = Material::new("leaf", ShaderRef::new("standard"))
            .with_property(COLOR_PROPERTY, PropertyValue::Color([1.0, 0.0, 0.0, 1.0]));
        let pass = BakePass::new(ChannelMask::RGB)
            .with_shader(ShaderRef::new("bake/normals"))
            .with_overrides(
                MaterialOverrides::new()
                    .with(COLOR_PROPERTY, PropertyValue::Color([0.0, 0.0, 1.0, 1.0])),
            );

        let material = pass.material_for(&source);
        assert_eq!(material.shader.name(), "bake/normals");
        assert_eq!(material.color(COLOR_PROPERTY), Some([0.0, 0.0, 1.0, 1.0]));
    }

    #[test]
    fn test_slot_format_from_passes() {
        let slot = TextureSlot::new("_MainTex")
            .with_pass(BakePass::new(ChannelMask::of(&[Channel::R, Channel::G])))
            .with_pass(BakePass::new(ChannelMask::of(&[Channel::B, Channel::A])));
        assert_eq!(slot.format(), TextureFormat::RGBA32);
        assert!(slot.claims().collisions().is_empty());

        let empty = TextureSlot::new("_Empty");
        assert_eq!(empty.format(), TextureFormat::R8);
    }

    #[test]
    fn test_import_settings() {
        let mut slot = TextureSlot::default();
        let settings = slot.import_settings();
        assert!(settings.mipmaps);
        assert!(!settings.readable);
        assert_eq!(settings.npot_scale, NpotScale::ToNearest);
        assert_eq!(settings.alpha_source, AlphaSource::FromInput);

        slot.power_of_two = false;
        slot.alpha_is_transparency = false;
        let settings = slot.import_settings();
        assert_eq!(settings.npot_scale, NpotScale::None);
        assert!(!settings.alpha_is_transparency);
        assert_eq!(settings.alpha_source, AlphaSource::None);
    }

    #[test]
    fn test_duplicate_texture_ids_rejected() {
        let settings = BillboardRenderSettings::default()
            .with_texture(TextureSlot::new("_MainTex"))
            .with_texture(TextureSlot::new("_NormalMap"));
        assert!(settings.validate().is_ok());

        let settings = settings.with_texture(TextureSlot::new("_MainTex"));
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, BakerError::InvalidSettings(ref msg) if msg.contains("_MainTex")));
    }

    #[test]
    fn test_settings_from_json() {
        let json = r#"{
            "billboard_shader": "billboard/unlit",
            "textures": [
                {
                    "texture_id": "_MainTex",
                    "passes": [
                        { "r": true, "g": true, "b": true, "a": false },
                        { "shader": "bake/alpha", "r": false, "g": false, "b": false }
                    ]
                },
                { "texture_id": "_NormalMap", "power_of_two": false, "passes": [ { "shader": "bake/normals", "a": false } ] }
            ]
        }"#;
        let settings: BillboardRenderSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.textures.len(), 2);
        assert_eq!(settings.pass_count(), 3);
        assert_eq!(settings.textures[0].passes[0].channels, ChannelMask::RGB);
        assert_eq!(settings.textures[0].passes[1].channels, ChannelMask::of(&[Channel::A]));
        assert!(settings.textures[0].alpha_is_transparency);
        assert_eq!(settings.textures[1].format(), TextureFormat::RGB24);
        assert!(!settings.textures[1].power_of_two);
    }
}
