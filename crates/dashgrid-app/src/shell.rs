//! Window shell: hosts a [`DashboardApp`] in a winit window and draws its
//! egui output through egui-wgpu.

use std::sync::Arc;

use dashgrid_core::Storage;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::app::DashboardApp;

#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, rc::Rc};

/// Errors that stop the shell.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("No compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("Failed to open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("Surface supports no texture format")]
    NoSurfaceFormat,
}

/// Window settings.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    /// Initial inner width in logical pixels (native only)
    pub width: u32,
    /// Initial inner height in logical pixels (native only)
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Dashgrid".to_string(),
            width: 1280,
            height: 800,
        }
    }
}

/// Surface, device and queue for one window.
struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

impl Gpu {
    async fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self, ShellError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await?;

        let caps = surface.get_capabilities(&adapter);
        // egui-wgpu expects a linear target
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(ShellError::NoSurfaceFormat)?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        log::info!("Surface configured: {}x{} {:?}", config.width, config.height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }
}

/// Everything that exists once the window has a GPU surface.
struct Running {
    window: Arc<Window>,
    gpu: Gpu,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Running {
    fn new(window: Arc<Window>, gpu: Gpu) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.config.format,
            egui_wgpu::RendererOptions::default(),
        );
        window.request_redraw();
        Self {
            window,
            gpu,
            egui_ctx,
            egui_state,
            renderer,
        }
    }

    /// Run one egui frame of `app` and present it.
    fn redraw<S: Storage>(&mut self, app: &mut DashboardApp<S>) {
        let input = self.egui_state.take_egui_input(&self.window);
        let output = self.egui_ctx.run(input, |ctx| app.show(ctx));
        self.egui_state
            .handle_platform_output(&self.window, output.platform_output);
        let primitives = self
            .egui_ctx
            .tessellate(output.shapes, output.pixels_per_point);

        let frame = match self.gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                self.window.request_redraw();
                return;
            }
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let device = &self.gpu.device;
        let queue = &self.gpu.queue;
        for (id, delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.config.width, self.gpu.config.height],
            pixels_per_point: output.pixels_per_point,
        };
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui encoder"),
        });
        let uploads = self
            .renderer
            .update_buffers(device, queue, &mut encoder, &primitives, &screen);

        {
            let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            // egui-wgpu wants a 'static pass
            let mut pass = pass.forget_lifetime();
            self.renderer.render(&mut pass, &primitives, &screen);
        }
        queue.submit(uploads.into_iter().chain(std::iter::once(encoder.finish())));

        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
        frame.present();

        let repaint_now = output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .is_some_and(|viewport| viewport.repaint_delay.is_zero());
        if repaint_now {
            self.window.request_redraw();
        }
    }
}

/// winit application wrapping the dashboard.
pub struct Shell<S: Storage> {
    app: DashboardApp<S>,
    config: WindowConfig,
    window: Option<Arc<Window>>,
    running: Option<Running>,
    /// Why the shell gave up, reported once the loop returns.
    failure: Option<ShellError>,
    /// GPU handed back by the async surface setup.
    #[cfg(target_arch = "wasm32")]
    pending: Rc<RefCell<Option<Gpu>>>,
}

impl<S: Storage> Shell<S> {
    pub fn new(app: DashboardApp<S>, config: WindowConfig) -> Self {
        Self {
            app,
            config,
            window: None,
            running: None,
            failure: None,
            #[cfg(target_arch = "wasm32")]
            pending: Rc::new(RefCell::new(None)),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: ShellError) {
        log::error!("{}", error);
        self.failure = Some(error);
        event_loop.exit();
    }

    fn window_attributes(&self) -> winit::window::WindowAttributes {
        let attributes = Window::default_attributes().with_title(&self.config.title);

        #[cfg(not(target_arch = "wasm32"))]
        let attributes =
            attributes.with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        #[cfg(target_arch = "wasm32")]
        let attributes = {
            use winit::platform::web::WindowAttributesExtWebSys;
            attributes.with_canvas(crate::web::dashboard_canvas())
        };

        attributes
    }
}

impl<S: Storage> ApplicationHandler for Shell<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(self.window_attributes()) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        self.window = Some(Arc::clone(&window));

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };
        log::info!("Window created, surface {}x{}", width, height);

        #[cfg(not(target_arch = "wasm32"))]
        {
            match pollster::block_on(Gpu::new(Arc::clone(&window), width, height)) {
                Ok(gpu) => self.running = Some(Running::new(window, gpu)),
                Err(e) => self.fail(event_loop, e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let slot = Rc::clone(&self.pending);
            wasm_bindgen_futures::spawn_local(async move {
                match Gpu::new(Arc::clone(&window), width, height).await {
                    Ok(gpu) => {
                        *slot.borrow_mut() = Some(gpu);
                        window.request_redraw();
                    }
                    Err(e) => log::error!("{}", e),
                }
            });
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        #[cfg(target_arch = "wasm32")]
        if self.running.is_none() {
            let ready = self.pending.borrow_mut().take();
            if let (Some(gpu), Some(window)) = (ready, self.window.clone()) {
                self.running = Some(Running::new(window, gpu));
            }
        }

        let Some(running) = &mut self.running else {
            return;
        };

        let response = running.egui_state.on_window_event(&running.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Closing dashboard");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                running.gpu.resize(size.width, size.height);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => running.redraw(&mut self.app),
            _ => {}
        }

        if response.repaint {
            running.window.request_redraw();
        }
    }
}

/// Open the dashboard window and block until it closes.
#[cfg(not(target_arch = "wasm32"))]
pub fn run<S: Storage + 'static>(app: DashboardApp<S>, config: WindowConfig) -> Result<(), ShellError> {
    let event_loop = EventLoop::new()?;
    let mut shell = Shell::new(app, config);
    event_loop.run_app(&mut shell)?;
    match shell.failure.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Attach the dashboard to the page canvas and hand the loop to the browser.
#[cfg(target_arch = "wasm32")]
pub fn spawn<S: Storage + 'static>(app: DashboardApp<S>, config: WindowConfig) -> Result<(), ShellError> {
    use winit::platform::web::EventLoopExtWebSys;

    let event_loop = EventLoop::new()?;
    event_loop.spawn_app(Shell::new(app, config));
    Ok(())
}
