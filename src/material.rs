//! Materials and named property overrides.
//!
//! A material is a shader reference plus a map of named, typed properties.
//! Bake passes tweak the source material through [`MaterialOverrides`], and the
//! generated billboard material binds each baked atlas by property name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the alpha cutoff property on the generated material.
pub const CUTOFF_PROPERTY: &str = "_Cutoff";

/// Name of the base color property read by the built-in shaders.
pub const COLOR_PROPERTY: &str = "_Color";

/// Reference to a shader by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShaderRef(pub String);

impl ShaderRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for ShaderRef {
    fn default() -> Self {
        Self::new("standard")
    }
}

/// Reference to a texture asset by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureRef(pub String);

impl TextureRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// A typed material property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PropertyValue {
    /// A texture binding. `None` clears the slot.
    Texture(Option<TextureRef>),
    Float(f32),
    Int(i32),
    Vector([f32; 4]),
    /// Linear RGBA color.
    Color([f32; 4]),
}

/// Named material properties, ordered by name.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// A shader plus its property values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub shader: ShaderRef,
    #[serde(default)]
    pub properties: PropertyMap,
}

impl Material {
    pub fn new(name: impl Into<String>, shader: ShaderRef) -> Self {
        Self {
            name: name.into(),
            shader,
            properties: PropertyMap::new(),
        }
    }

    /// A material using `shader` that starts from a copy of `source`'s properties.
    pub fn with_shader_from(shader: ShaderRef, source: &Material) -> Self {
        let mut material = Self::new(source.name.clone(), shader);
        material.copy_properties_from(source);
        material
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.properties.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn set_float(&mut self, name: impl Into<String>, value: f32) {
        self.set(name, PropertyValue::Float(value));
    }

    pub fn set_texture(&mut self, name: impl Into<String>, texture: TextureRef) {
        self.set(name, PropertyValue::Texture(Some(texture)));
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            PropertyValue::Float(v) => Some(*v),
            PropertyValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    /// Read a color, also accepting a vector-typed property.
    pub fn color(&self, name: &str) -> Option<[f32; 4]> {
        match self.get(name)? {
            PropertyValue::Color(c) | PropertyValue::Vector(c) => Some(*c),
            _ => None,
        }
    }

    pub fn texture(&self, name: &str) -> Option<&TextureRef> {
        match self.get(name)? {
            PropertyValue::Texture(t) => t.as_ref(),
            _ => None,
        }
    }

    /// Replace this material's properties with a copy of `other`'s.
    pub fn copy_properties_from(&mut self, other: &Material) {
        self.properties = other.properties.clone();
    }

    /// All bound textures as `(property, texture)` pairs.
    pub fn texture_bindings(&self) -> impl Iterator<Item = (&str, &TextureRef)> {
        self.properties.iter().filter_map(|(name, value)| match value {
            PropertyValue::Texture(Some(t)) => Some((name.as_str(), t)),
            _ => None,
        })
    }
}

/// Property overrides applied to a material before a bake pass renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialOverrides(pub PropertyMap);

impl MaterialOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Write every override into `material`, replacing existing values.
    pub fn apply(&self, material: &mut Material) {
        for (name, value) in &self.0 {
            material.set(name.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_and_add() {
        let mut material = Material::new("leaf", ShaderRef::new("standard"))
            .with_property(COLOR_PROPERTY, PropertyValue::Color([1.0, 0.0, 0.0, 1.0]))
            .with_property("_Glossiness", PropertyValue::Float(0.5));

        let overrides = MaterialOverrides::new()
            .with(COLOR_PROPERTY, PropertyValue::Color([0.0, 1.0, 0.0, 1.0]))
            .with("_Mode", PropertyValue::Int(2))
            .with("_BumpMap", PropertyValue::Texture(None));
        overrides.apply(&mut material);

        assert_eq!(material.color(COLOR_PROPERTY), Some([0.0, 1.0, 0.0, 1.0]));
        assert_eq!(material.float("_Glossiness"), Some(0.5));
        assert_eq!(material.float("_Mode"), Some(2.0));
        assert!(material.texture("_BumpMap").is_none());
    }

    #[test]
    fn test_with_shader_from_copies_properties() {
        let source = Material::new("bark", ShaderRef::new("standard"))
            .with_property(COLOR_PROPERTY, PropertyValue::Color([0.3, 0.2, 0.1, 1.0]));
        let copy = Material::with_shader_from(ShaderRef::new("normals"), &source);

        assert_eq!(copy.shader.name(), "normals");
        assert_eq!(copy.properties, source.properties);
    }

    #[test]
    fn test_texture_bindings() {
        let mut material = Material::new("billboard", ShaderRef::default());
        material.set_texture("_MainTex", TextureRef::new("main"));
        material.set("_BumpMap", PropertyValue::Texture(None));
        material.set_float(CUTOFF_PROPERTY, 0.15);

        let bindings: Vec<_> = material.texture_bindings().collect();
        assert_eq!(bindings, vec![("_MainTex", &TextureRef::new("main"))]);
    }

    #[test]
    fn test_property_json_shape() {
        let overrides: MaterialOverrides = serde_json::from_str(
            r#"{"_Color": {"type": "color", "value": [1, 1, 1, 1]}, "_Mode": {"type": "int", "value": 3}}"#,
        )
        .unwrap();
        assert_eq!(overrides.0.len(), 2);
        assert_eq!(overrides.0["_Mode"], PropertyValue::Int(3));
    }
}
