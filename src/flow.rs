//! Application event loop.
//!
//! The scene is prepared once when the window first appears. Every redraw
//! then walks the same steps:
//! 1. Move the camera from the keys held since the last frame
//! 2. Publish the camera uniforms
//! 3. Record one draw per scene object
//! 4. Replay the draws into the surface texture and present it
//!
//! Textures are released when the loop exits.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    camera,
    config::Config,
    context::Context,
    data_structures::texture::Texture,
    render::Renderer,
    scene::{SceneDescription, SceneManager},
};

/// Everything that exists once the window is up.
struct AppState {
    ctx: Context,
    renderer: Renderer,
    scene: SceneManager<Texture>,
}

impl AppState {
    fn new(window: Arc<Window>, config: &Config, description: SceneDescription) -> anyhow::Result<Self> {
        let ctx = futures::executor::block_on(Context::new(window, config))?;
        let mut renderer = Renderer::new(&ctx.device, &ctx.queue, ctx.config.format);
        let mut scene = SceneManager::new(description);
        scene.prepare_scene(&config.assets_dir, &mut renderer)?;
        log::info!(
            "Prepared {} objects with {} textures and {} materials",
            scene.description().object_count(),
            scene.textures().len(),
            scene.materials().len()
        );
        Ok(Self {
            ctx,
            renderer,
            scene,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
    }

    fn render(&mut self, dt: Duration) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.ctx.is_surface_configured() {
            return Ok(());
        }

        let ctx = &mut self.ctx;
        ctx.controller
            .update(&mut ctx.camera, &mut ctx.projection, dt);
        camera::apply(&ctx.camera, &ctx.projection, &mut self.renderer);

        self.renderer.begin_frame();
        if let Err(e) = self.scene.render_scene(&mut self.renderer) {
            log::error!("Unable to draw the scene: {e}");
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.renderer
            .render(&view, self.ctx.depth_view(), self.ctx.clear_colour);
        output.present();
        Ok(())
    }

    fn release(&mut self) {
        self.scene.destroy_textures(&mut self.renderer);
    }
}

pub struct App {
    config: Config,
    // taken when the window is created
    description: Option<SceneDescription>,
    state: Option<AppState>,
    last_time: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: Config, description: SceneDescription) -> Self {
        Self {
            config,
            description: Some(description),
            state: None,
            last_time: Instant::now(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(description) = self.description.take() else {
            return;
        };

        let window_attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        match AppState::new(window, &self.config, description) {
            Ok(mut state) => {
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                state.ctx.window.request_redraw();
                self.last_time = Instant::now();
                self.state = Some(state);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.ctx.controller.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                match state.render(dt) {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of GPU memory, exiting");
                        event_loop.exit();
                    }
                    Err(e) => {
                        log::warn!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            state.release();
        }
    }
}

/// Opens a window and draws the configured scene until it is closed.
///
/// The scene file named in `config` is read up front; without one the
/// built-in savanna diorama is drawn.
pub fn run(config: Config) -> anyhow::Result<()> {
    let description = match &config.scene {
        Some(path) => SceneDescription::load(path)?,
        None => SceneDescription::savanna()?,
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, description);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
