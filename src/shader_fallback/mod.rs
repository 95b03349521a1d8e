//! Shader fallback passes
//!
//! Some materials reference shaders the current GPU or graphics API cannot
//! run (e.g. DX11-only shaders on Metal) and render magenta. These passes
//! periodically reconcile an externally owned set of materials, swapping
//! such shaders for the built-in fallback shader.
//!
//! - [`ShaderFallback`] walks every loaded material.
//! - [`RendererPatcher`] walks every renderer's shared materials, catching
//!   materials created outside the material registry.

mod material;

pub use material::{
    patch_material, Color, Material, Shader, ALPHA_BLEND_KEYWORD, ALPHA_TEST_KEYWORD,
    COLOR_PROPERTY, MAIN_TEX_PROPERTY, MODE_PROPERTY,
};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Name of the shader unsupported shaders are replaced with.
pub const FALLBACK_SHADER_NAME: &str = "Standard";

/// Delay before the first pass after startup.
pub const FIRST_SCAN_DELAY: Duration = Duration::from_secs(1);

/// Interval between material registry passes.
pub const MATERIAL_SCAN_INTERVAL: Duration = Duration::from_secs(5);

/// Interval between renderer passes.
pub const RENDERER_SCAN_INTERVAL: Duration = Duration::from_secs(2);

// ─────────────────────────────────────────────────────────────────────────────
// Collaborators
// ─────────────────────────────────────────────────────────────────────────────

/// Looks shaders up by name.
pub trait ShaderLibrary {
    fn find(&self, name: &str) -> Option<Shader>;
}

impl ShaderLibrary for [Shader] {
    fn find(&self, name: &str) -> Option<Shader> {
        self.iter().find(|shader| shader.name == name).cloned()
    }
}

impl ShaderLibrary for Vec<Shader> {
    fn find(&self, name: &str) -> Option<Shader> {
        self.as_slice().find(name)
    }
}

/// Every material currently loaded.
pub trait MaterialRegistry {
    fn visit_materials(&mut self, visit: &mut dyn FnMut(&mut Material));
}

impl MaterialRegistry for Vec<Material> {
    fn visit_materials(&mut self, visit: &mut dyn FnMut(&mut Material)) {
        self.iter_mut().for_each(visit);
    }
}

/// A renderer and its shared material slots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Renderer {
    pub name: String,
    shared_materials: Vec<Option<Material>>,
    assignments: usize,
}

impl Renderer {
    pub fn new(name: impl Into<String>, shared_materials: Vec<Option<Material>>) -> Self {
        Self {
            name: name.into(),
            shared_materials,
            assignments: 0,
        }
    }

    pub fn shared_materials(&self) -> &[Option<Material>] {
        &self.shared_materials
    }

    /// Replace the material list. Each call counts as a reassignment.
    pub fn set_shared_materials(&mut self, materials: Vec<Option<Material>>) {
        self.shared_materials = materials;
        self.assignments += 1;
    }

    /// How many times the material list was reassigned.
    pub fn assignments(&self) -> usize {
        self.assignments
    }
}

/// Every renderer in the scene.
pub trait RendererRegistry {
    fn visit_renderers(&mut self, visit: &mut dyn FnMut(&mut Renderer));
}

impl RendererRegistry for Vec<Renderer> {
    fn visit_renderers(&mut self, visit: &mut dyn FnMut(&mut Renderer)) {
        self.iter_mut().for_each(visit);
    }
}

/// Serialized snapshot of the loaded shaders and materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MaterialDump {
    pub shaders: Vec<Shader>,
    pub materials: Vec<Material>,
}

impl MaterialDump {
    /// Run one material pass over the dump. Returns the number patched.
    pub fn patch(&mut self) -> usize {
        ShaderFallback::new(Duration::ZERO, &self.shaders).apply_fallback(&mut self.materials)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scheduling
// ─────────────────────────────────────────────────────────────────────────────

/// Lets a pass run at most once per interval.
#[derive(Debug, Clone, Copy)]
pub struct ScanThrottle {
    next_scan: Duration,
    interval: Duration,
}

impl ScanThrottle {
    /// `now` is the time since startup.
    pub fn new(now: Duration, first_delay: Duration, interval: Duration) -> Self {
        Self {
            next_scan: now + first_delay,
            interval,
        }
    }

    /// Whether a pass is due at `now`; if so, schedules the next one.
    pub fn ready(&mut self, now: Duration) -> bool {
        if now < self.next_scan {
            return false;
        }
        self.next_scan = now + self.interval;
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Passes
// ─────────────────────────────────────────────────────────────────────────────

/// Periodic pass over the material registry.
#[derive(Debug, Clone)]
pub struct ShaderFallback {
    fallback: Option<Shader>,
    throttle: ScanThrottle,
}

impl ShaderFallback {
    pub fn new(now: Duration, shaders: &(impl ShaderLibrary + ?Sized)) -> Self {
        let fallback = shaders.find(FALLBACK_SHADER_NAME);
        if fallback.is_none() {
            info!(
                "Fallback shader '{}' not found; shader fallback disabled",
                FALLBACK_SHADER_NAME
            );
        }
        Self {
            fallback,
            throttle: ScanThrottle::new(now, FIRST_SCAN_DELAY, MATERIAL_SCAN_INTERVAL),
        }
    }

    /// Per-frame tick. Returns the number of materials patched.
    pub fn update(&mut self, now: Duration, materials: &mut impl MaterialRegistry) -> usize {
        if !self.throttle.ready(now) {
            return 0;
        }
        self.apply_fallback(materials)
    }

    /// Run a pass immediately.
    pub fn apply_fallback(&self, materials: &mut impl MaterialRegistry) -> usize {
        let Some(fallback) = &self.fallback else {
            return 0;
        };

        let mut patched = 0;
        materials.visit_materials(&mut |material| {
            if patch_material(material, fallback) {
                debug!("Patched material '{}'", material.name);
                patched += 1;
            }
        });

        if patched > 0 {
            info!("Shader fallback patched {} materials", patched);
        }
        patched
    }
}

/// Periodic pass over renderers, run from the camera-begin hook.
#[derive(Debug, Clone)]
pub struct RendererPatcher {
    fallback: Option<Shader>,
    throttle: ScanThrottle,
}

impl RendererPatcher {
    pub fn new(now: Duration, shaders: &(impl ShaderLibrary + ?Sized)) -> Self {
        Self {
            fallback: shaders.find(FALLBACK_SHADER_NAME),
            throttle: ScanThrottle::new(now, FIRST_SCAN_DELAY, RENDERER_SCAN_INTERVAL),
        }
    }

    /// Camera-begin tick. Returns the number of renderers whose materials
    /// were reassigned.
    pub fn on_begin_camera_rendering(
        &mut self,
        now: Duration,
        renderers: &mut impl RendererRegistry,
    ) -> usize {
        if !self.throttle.ready(now) {
            return 0;
        }
        let Some(fallback) = &self.fallback else {
            return 0;
        };

        let mut reassigned = 0;
        renderers.visit_renderers(&mut |renderer| {
            let mut materials = renderer.shared_materials().to_vec();
            let mut changed = false;
            for material in materials.iter_mut().flatten() {
                changed |= patch_material(material, fallback);
            }

            if changed {
                debug!("Reassigned materials of renderer '{}'", renderer.name);
                renderer.set_shared_materials(materials);
                reassigned += 1;
            }
        });

        if reassigned > 0 {
            info!("Renderer patcher updated {} renderers", reassigned);
        }
        reassigned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> Vec<Shader> {
        vec![
            Shader::new("Standard", true),
            Shader::new("Unlit/Texture", true),
        ]
    }

    fn broken(name: &str, queue: i32) -> Material {
        Material::new(name, Shader::new("Gallop/3D/Chara/Toon", false), queue)
    }

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    #[test]
    fn test_throttle_first_delay_then_interval() {
        let mut throttle = ScanThrottle::new(secs(0.0), secs(1.0), secs(5.0));
        assert!(!throttle.ready(secs(0.5)));
        assert!(throttle.ready(secs(1.0)));
        assert!(!throttle.ready(secs(5.9)));
        assert!(throttle.ready(secs(6.0)));
    }

    #[test]
    fn test_shader_fallback_waits_for_first_scan() {
        let mut pass = ShaderFallback::new(secs(10.0), &library());
        let mut materials = vec![broken("a", 2000)];

        assert_eq!(pass.update(secs(10.5), &mut materials), 0);
        assert!(materials[0].needs_fallback());

        assert_eq!(pass.update(secs(11.0), &mut materials), 1);
        assert_eq!(materials[0].shader.as_ref().unwrap().name, "Standard");
    }

    #[test]
    fn test_shader_fallback_throttles_rescans() {
        let mut pass = ShaderFallback::new(secs(0.0), &library());
        let mut materials = vec![broken("a", 2000)];
        assert_eq!(pass.update(secs(1.0), &mut materials), 1);

        materials.push(broken("late", 3000));
        assert_eq!(pass.update(secs(3.0), &mut materials), 0);
        assert_eq!(pass.update(secs(6.0), &mut materials), 1);
        assert!(materials[1].keywords.contains(ALPHA_BLEND_KEYWORD));
    }

    #[test]
    fn test_shader_fallback_skips_supported_and_empty() {
        let pass = ShaderFallback::new(secs(0.0), &library());
        let mut materials = vec![
            Material::new("ok", Shader::new("Unlit/Texture", true), 2000),
            Material::default(),
            broken("bad", 2500),
        ];
        assert_eq!(pass.apply_fallback(&mut materials), 1);
    }

    #[test]
    fn test_missing_fallback_shader_disables_pass() {
        let empty: Vec<Shader> = Vec::new();
        let mut pass = ShaderFallback::new(secs(0.0), &empty);
        let mut materials = vec![broken("a", 2000)];
        assert_eq!(pass.update(secs(2.0), &mut materials), 0);
        assert!(materials[0].needs_fallback());
    }

    #[test]
    fn test_renderer_patcher_reassigns_only_changed() {
        let mut patcher = RendererPatcher::new(secs(0.0), &library());
        let mut renderers = vec![
            Renderer::new("body", vec![Some(broken("skin", 2000)), None]),
            Renderer::new(
                "prop",
                vec![Some(Material::new("wood", Shader::new("Standard", true), 2000))],
            ),
        ];

        assert_eq!(patcher.on_begin_camera_rendering(secs(1.0), &mut renderers), 1);
        assert_eq!(renderers[0].assignments(), 1);
        assert_eq!(renderers[1].assignments(), 0);
        assert!(renderers[0].shared_materials()[1].is_none());
        assert!(!renderers[0].shared_materials()[0]
            .as_ref()
            .unwrap()
            .needs_fallback());
    }

    #[test]
    fn test_renderer_patcher_interval() {
        let mut patcher = RendererPatcher::new(secs(0.0), &library());
        let mut renderers = vec![Renderer::new("a", vec![Some(broken("m", 2000))])];
        assert_eq!(patcher.on_begin_camera_rendering(secs(1.0), &mut renderers), 1);

        renderers.push(Renderer::new("b", vec![Some(broken("n", 2500))]));
        assert_eq!(patcher.on_begin_camera_rendering(secs(2.5), &mut renderers), 0);
        assert_eq!(patcher.on_begin_camera_rendering(secs(3.0), &mut renderers), 1);
        assert_eq!(renderers[0].assignments(), 1);
    }

    #[test]
    fn test_material_dump_patch() {
        let json = r#"{
            "shaders": [{"name": "Standard"}],
            "materials": [
                {"name": "hair", "render_queue": 2500,
                 "shader": {"name": "Gallop/3D/Chara/Hair", "supported": false}},
                {"name": "eye", "shader": {"name": "Unlit/Texture"}}
            ]
        }"#;
        let mut dump: MaterialDump = serde_json::from_str(json).unwrap();

        assert_eq!(dump.patch(), 1);
        assert!(dump.materials[0].keywords.contains(ALPHA_TEST_KEYWORD));
        assert_eq!(dump.patch(), 0);
    }

    #[test]
    fn test_shader_library_lookup() {
        let shaders = library();
        assert!(shaders.find("Standard").is_some());
        assert!(shaders.find("Missing").is_none());
    }
}
