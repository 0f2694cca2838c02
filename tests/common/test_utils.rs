use std::{
    collections::{BTreeSet, HashMap},
    path::{Path, PathBuf},
};

use diorama::{
    SceneError,
    resources::texture::DecodedImage,
    scene::{
        meshes::{Shape, ShapeMeshes},
        texture_registry::{TextureSlot, TextureStore},
        uniforms::{ShaderUniforms, UniformValue},
    },
};

/// Handle the recording backend hands out for uploaded textures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FakeTexture {
    pub(crate) id: u32,
    pub(crate) label: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

/// Everything the scene asked a backend to do, in order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Command {
    Uniform(String, UniformValue),
    LoadMesh(Shape),
    Draw(Shape),
}

/// One draw call with the uniform state in effect when it was issued.
#[derive(Clone, Debug)]
pub(crate) struct DrawRecord {
    pub(crate) shape: Shape,
    pub(crate) uniforms: HashMap<String, UniformValue>,
}

impl DrawRecord {
    pub(crate) fn get(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).copied()
    }
}

/// A backend that records instead of drawing.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub(crate) next_id: u32,
    pub(crate) created: Vec<FakeTexture>,
    pub(crate) bound: Vec<String>,
    pub(crate) released: Vec<FakeTexture>,
    pub(crate) fail_uploads: bool,
    pub(crate) commands: Vec<Command>,
    pub(crate) state: HashMap<String, UniformValue>,
    pub(crate) loaded: BTreeSet<Shape>,
    pub(crate) draws: Vec<DrawRecord>,
}

impl Recorder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.state.get(name).copied()
    }

    pub(crate) fn uniform_commands(&self) -> Vec<(String, UniformValue)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                Command::Uniform(name, value) => Some((name.clone(), *value)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn mesh_loads(&self) -> Vec<Shape> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                Command::LoadMesh(shape) => Some(*shape),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn clear_commands(&mut self) {
        self.commands.clear();
        self.draws.clear();
    }
}

impl TextureStore for Recorder {
    type Handle = FakeTexture;

    fn create_texture(&mut self, image: &DecodedImage, label: &str) -> anyhow::Result<FakeTexture> {
        if self.fail_uploads {
            anyhow::bail!("device lost");
        }
        self.next_id += 1;
        let texture = FakeTexture {
            id: self.next_id,
            label: label.to_string(),
            width: image.width,
            height: image.height,
        };
        self.created.push(texture.clone());
        Ok(texture)
    }

    fn bind_textures(&mut self, slots: &[TextureSlot<FakeTexture>]) {
        self.bound = slots.iter().map(|slot| slot.tag.clone()).collect();
    }

    fn release_textures(&mut self, handles: Vec<FakeTexture>) {
        self.released.extend(handles);
    }
}

impl ShaderUniforms for Recorder {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.commands.push(Command::Uniform(name.to_string(), value));
        self.state.insert(name.to_string(), value);
    }
}

impl ShapeMeshes for Recorder {
    fn load_mesh(&mut self, shape: Shape) -> Result<(), SceneError> {
        self.commands.push(Command::LoadMesh(shape));
        self.loaded.insert(shape);
        Ok(())
    }

    fn draw_mesh(&mut self, shape: Shape) -> Result<(), SceneError> {
        if !self.loaded.contains(&shape) {
            return Err(SceneError::MeshNotLoaded(shape));
        }
        self.commands.push(Command::Draw(shape));
        self.draws.push(DrawRecord {
            shape,
            uniforms: self.state.clone(),
        });
        Ok(())
    }
}

/// Writes a `width` x `height` RGB PNG whose top row is red and the rest blue.
pub(crate) fn write_rgb_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let img = image::RgbImage::from_fn(width, height, |_, y| {
        if y == 0 {
            image::Rgb([255, 0, 0])
        } else {
            image::Rgb([0, 0, 255])
        }
    });
    let path = dir.join(name);
    img.save(&path).expect("Failed to write test image");
    path
}

/// Writes a `width` x `height` RGBA PNG of a single colour.
pub(crate) fn write_rgba_png(dir: &Path, name: &str, width: u32, height: u32, rgba: [u8; 4]) -> PathBuf {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let path = dir.join(name);
    img.save(&path).expect("Failed to write test image");
    path
}

/// Writes a single-channel PNG.
pub(crate) fn write_gray_png(dir: &Path, name: &str) -> PathBuf {
    let img = image::GrayImage::from_pixel(2, 2, image::Luma([128]));
    let path = dir.join(name);
    img.save(&path).expect("Failed to write test image");
    path
}

/// Creates `<dir>/<path>` for every texture of `description` as a 2x2 PNG.
///
/// Texture paths in the built-in scene end in `.jpg`; the file is still PNG
/// data, which the decoder recognises by content.
pub(crate) fn write_scene_textures(dir: &Path, description: &diorama::SceneDescription) {
    for source in &description.textures {
        let path = dir.join(&source.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create texture directory");
        }
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([10, 200, 30]));
        img.save_with_format(&path, image::ImageFormat::Png)
            .expect("Failed to write test image");
    }
}
