//! Preparing and rendering a scene.
//!
//! [`SceneManager`] owns the scene data together with the texture and material
//! tables built from it. Preparing loads textures, defines materials, sets up
//! the lights and loads every primitive mesh once. Rendering walks the objects
//! in order and, for each one, pushes its transform, surface and material
//! before issuing the draw.

use std::path::{Path, PathBuf};

use cgmath::{Vector2, Vector3, Vector4};

use crate::{
    data_structures::transform::Transform,
    error::SceneError,
    resources::texture::load_image,
    scene::{
        description::{DanglingReference, SceneDescription, SceneObject, Surface},
        material::MaterialLibrary,
        meshes::{Shape, ShapeMeshes},
        texture_registry::{TextureRegistry, TextureStore},
        uniforms::{self, ShaderUniforms},
    },
};

/// Colour drawn for a texture tag with neither a loaded image nor a fallback.
pub const MISSING_TEXTURE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// UV scale used when an object doesn't set one.
pub const DEFAULT_UV_SCALE: [f32; 2] = [1.0, 1.0];

#[derive(Debug)]
pub struct SceneManager<H> {
    description: SceneDescription,
    textures: TextureRegistry<H>,
    materials: MaterialLibrary,
    prepared: bool,
}

impl<H> SceneManager<H> {
    pub fn new(description: SceneDescription) -> Self {
        Self {
            description,
            textures: TextureRegistry::new(),
            materials: MaterialLibrary::new(),
            prepared: false,
        }
    }

    pub fn description(&self) -> &SceneDescription {
        &self.description
    }

    pub fn textures(&self) -> &TextureRegistry<H> {
        &self.textures
    }

    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    /// Loads the image at `path`, uploads it through `store` and registers it
    /// under `tag`. Returns the texture slot.
    pub fn create_texture<S>(
        &mut self,
        store: &mut S,
        path: &Path,
        tag: &str,
    ) -> Result<usize, SceneError>
    where
        S: TextureStore<Handle = H> + ?Sized,
    {
        let result = load_image(path).and_then(|image| {
            let handle = store
                .create_texture(&image, tag)
                .map_err(|err| SceneError::Upload {
                    tag: tag.to_string(),
                    reason: format!("{err:#}"),
                })?;
            self.textures.register(tag, handle)
        });
        if let Err(err) = &result {
            log::error!("Could not load image: {}: {}", path.display(), err);
        }
        result
    }

    /// Loads every texture of the scene from `assets_root` and binds the ones
    /// that loaded to their slots. Images that fail to load are skipped.
    ///
    /// Returns how many textures were registered.
    pub fn load_scene_textures<S>(&mut self, store: &mut S, assets_root: &Path) -> usize
    where
        S: TextureStore<Handle = H> + ?Sized,
    {
        let sources: Vec<(String, PathBuf)> = self
            .description
            .textures
            .iter()
            .map(|source| (source.tag.clone(), assets_root.join(&source.path)))
            .collect();
        for (tag, path) in sources {
            // failures are logged by create_texture
            let _ = self.create_texture(store, &path, &tag);
        }
        store.bind_textures(self.textures.slots());
        self.textures.len()
    }

    pub fn define_object_materials(&mut self) -> Result<(), SceneError> {
        for material in &self.description.materials {
            self.materials.define(material.clone())?;
        }
        Ok(())
    }

    pub fn setup_scene_lights<U>(&self, shader: &mut U) -> Result<(), SceneError>
    where
        U: ShaderUniforms + ?Sized,
    {
        self.description.lighting.apply(shader)
    }

    /// Loads everything the scene needs. Each mesh is loaded once no matter
    /// how many objects draw it.
    ///
    /// Only the first successful call does any work; later calls return
    /// `Ok` without touching `backend`.
    pub fn prepare_scene<B>(&mut self, assets_root: &Path, backend: &mut B) -> Result<(), SceneError>
    where
        B: TextureStore<Handle = H> + ShaderUniforms + ShapeMeshes,
    {
        if self.prepared {
            log::debug!("Scene is already prepared");
            return Ok(());
        }
        let loaded = self.load_scene_textures(backend, assets_root);
        log::info!(
            "Loaded {loaded} of {} scene textures",
            self.description.textures.len()
        );
        self.define_object_materials()?;
        self.setup_scene_lights(backend)?;
        for shape in Shape::ALL {
            backend.load_mesh(shape)?;
        }
        for reference in self.description.dangling_references() {
            match reference {
                DanglingReference::Texture { object, tag } => {
                    log::warn!("Object '{object}' uses undefined texture '{tag}'")
                }
                DanglingReference::Material { object, tag } => {
                    log::warn!("Object '{object}' uses undefined material '{tag}'")
                }
            }
        }
        self.prepared = true;
        Ok(())
    }

    /// Issues the transform, surface, material and draw commands for every
    /// object in the scene.
    pub fn render_scene<B>(&self, backend: &mut B) -> Result<(), SceneError>
    where
        B: ShaderUniforms + ShapeMeshes + ?Sized,
    {
        for object in self.description.objects() {
            self.render_object(backend, object)?;
        }
        Ok(())
    }

    fn render_object<B>(&self, backend: &mut B, object: &SceneObject) -> Result<(), SceneError>
    where
        B: ShaderUniforms + ShapeMeshes + ?Sized,
    {
        self.set_transformations(backend, &object.transform());
        match &object.surface {
            Surface::Texture(tag) => {
                self.set_shader_texture(backend, tag);
                let [u, v] = object.uv_scale.unwrap_or(DEFAULT_UV_SCALE);
                self.set_texture_uv_scale(backend, u, v);
            }
            Surface::Color(color) => self.set_shader_color(backend, *color),
        }
        if let Some(material) = &object.material {
            self.set_shader_material(backend, material);
        }
        backend.draw_mesh(object.shape)
    }

    pub fn set_transformations<U>(&self, shader: &mut U, transform: &Transform)
    where
        U: ShaderUniforms + ?Sized,
    {
        shader.set_mat4(uniforms::MODEL, transform.to_matrix());
    }

    pub fn set_shader_color<U>(&self, shader: &mut U, color: [f32; 4])
    where
        U: ShaderUniforms + ?Sized,
    {
        shader.set_bool(uniforms::USE_TEXTURE, false);
        shader.set_vec4(uniforms::OBJECT_COLOR, Vector4::from(color));
    }

    /// Samples the texture registered under `tag`. A tag without a loaded
    /// texture is drawn in the fallback colour of its texture source.
    pub fn set_shader_texture<U>(&self, shader: &mut U, tag: &str)
    where
        U: ShaderUniforms + ?Sized,
    {
        match self.textures.find_slot(tag) {
            Some(slot) => {
                shader.set_bool(uniforms::USE_TEXTURE, true);
                shader.set_sampler2d(uniforms::OBJECT_TEXTURE, slot as i32);
            }
            None => {
                log::trace!("Texture '{tag}' is not loaded, drawing its fallback colour");
                let color = self
                    .description
                    .texture_source(tag)
                    .and_then(|source| source.fallback_color)
                    .unwrap_or(MISSING_TEXTURE_COLOR);
                self.set_shader_color(shader, color);
            }
        }
    }

    pub fn set_texture_uv_scale<U>(&self, shader: &mut U, u: f32, v: f32)
    where
        U: ShaderUniforms + ?Sized,
    {
        shader.set_vec2(uniforms::UV_SCALE, Vector2::new(u, v));
    }

    /// Pushes the material registered under `tag`. Unknown tags leave the
    /// current material in place.
    pub fn set_shader_material<U>(&self, shader: &mut U, tag: &str)
    where
        U: ShaderUniforms + ?Sized,
    {
        let Some(material) = self.materials.find(tag) else {
            log::debug!("Material '{tag}' is not defined");
            return;
        };
        shader.set_vec3(
            uniforms::MATERIAL_AMBIENT_COLOR,
            Vector3::from(material.ambient_color),
        );
        shader.set_float(uniforms::MATERIAL_AMBIENT_STRENGTH, material.ambient_strength);
        shader.set_vec3(
            uniforms::MATERIAL_DIFFUSE_COLOR,
            Vector3::from(material.diffuse_color),
        );
        shader.set_vec3(
            uniforms::MATERIAL_SPECULAR_COLOR,
            Vector3::from(material.specular_color),
        );
        shader.set_float(uniforms::MATERIAL_SHININESS, material.shininess);
    }

    /// Empties the texture table and hands the textures back to `store`.
    pub fn destroy_textures<S>(&mut self, store: &mut S)
    where
        S: TextureStore<Handle = H> + ?Sized,
    {
        let handles = self.textures.clear();
        log::debug!("Releasing {} textures", handles.len());
        store.release_textures(handles);
    }
}
