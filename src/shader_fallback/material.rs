//! Material model and the single-material patch.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const MAIN_TEX_PROPERTY: &str = "_MainTex";
pub const COLOR_PROPERTY: &str = "_Color";
pub const MODE_PROPERTY: &str = "_Mode";
pub const ALPHA_TEST_KEYWORD: &str = "_ALPHATEST_ON";
pub const ALPHA_BLEND_KEYWORD: &str = "_ALPHABLEND_ON";

/// Render queues treated as alpha-tested geometry.
const ALPHA_TEST_QUEUES: std::ops::RangeInclusive<i32> = 2450..=2550;
/// First render queue treated as transparent geometry.
const TRANSPARENT_QUEUE_START: i32 = 2950;

/// Blend mode values of the fallback shader's `_Mode` property.
const MODE_CUTOUT: f32 = 1.0;
const MODE_FADE: f32 = 2.0;

/// A shader as seen by the fallback passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shader {
    pub name: String,
    /// Whether the current GPU / graphics API can run it.
    #[serde(default = "default_supported")]
    pub supported: bool,
}

fn default_supported() -> bool {
    true
}

impl Shader {
    pub fn new(name: impl Into<String>, supported: bool) -> Self {
        Self {
            name: name.into(),
            supported,
        }
    }
}

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// A render material: shader, properties, keywords and render queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Material {
    pub name: String,
    pub shader: Option<Shader>,
    /// Texture properties, by property name.
    pub textures: BTreeMap<String, String>,
    pub colors: BTreeMap<String, Color>,
    pub floats: BTreeMap<String, f32>,
    pub keywords: BTreeSet<String>,
    pub render_queue: i32,
}

impl Material {
    pub fn new(name: impl Into<String>, shader: Shader, render_queue: i32) -> Self {
        Self {
            name: name.into(),
            shader: Some(shader),
            render_queue,
            ..Self::default()
        }
    }

    pub fn with_texture(mut self, property: &str, texture: &str) -> Self {
        self.textures.insert(property.to_string(), texture.to_string());
        self
    }

    pub fn with_color(mut self, property: &str, color: Color) -> Self {
        self.colors.insert(property.to_string(), color);
        self
    }

    pub fn enable_keyword(&mut self, keyword: &str) {
        self.keywords.insert(keyword.to_string());
    }

    pub fn needs_fallback(&self) -> bool {
        self.shader.as_ref().is_some_and(|shader| !shader.supported)
    }
}

/// Swap an unsupported shader for `fallback`, keeping the main texture and
/// color and mapping the render queue onto the fallback's blend mode.
///
/// Returns `true` if the material changed. Materials without a shader or
/// with a supported one are left alone, so the patch is idempotent.
pub fn patch_material(material: &mut Material, fallback: &Shader) -> bool {
    if !material.needs_fallback() {
        return false;
    }

    let main_tex = material.textures.get(MAIN_TEX_PROPERTY).cloned();
    let color = material
        .colors
        .get(COLOR_PROPERTY)
        .copied()
        .unwrap_or(Color::WHITE);

    material.shader = Some(fallback.clone());
    if let Some(texture) = main_tex {
        material
            .textures
            .insert(MAIN_TEX_PROPERTY.to_string(), texture);
    }
    material.colors.insert(COLOR_PROPERTY.to_string(), color);

    if ALPHA_TEST_QUEUES.contains(&material.render_queue) {
        material.enable_keyword(ALPHA_TEST_KEYWORD);
        material.floats.insert(MODE_PROPERTY.to_string(), MODE_CUTOUT);
    } else if material.render_queue >= TRANSPARENT_QUEUE_START {
        material.enable_keyword(ALPHA_BLEND_KEYWORD);
        material.floats.insert(MODE_PROPERTY.to_string(), MODE_FADE);
    }

    true
}
