//! Core application state and lifecycle.

use egui::Color32;
use kurbo::{Point, Size};
use peniko::Color;
use rectpad_core::{CanvasSurface, CursorKind, InputState, StrokeColor, SurfaceConfig, SurfaceEvent};
use rectpad_render::{RenderContext, RenderResult, Renderer, RendererError, VelloRenderer};
use std::sync::Arc;
use thiserror::Error;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::alert::show_alert;
use crate::event_handler::{EventHandler, cursor_icon, map_mouse_button};
use crate::ui::{TOOLBAR_HEIGHT, UiAction, UiState, color32, render_ui, stroke_color};

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("Surface creation failed: {0}")]
    Surface(String),
    #[error("Platform error: {0}")]
    Platform(String),
    #[error(transparent)]
    Renderer(#[from] RendererError),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub surface: SurfaceConfig,
    pub background_color: Color,
    pub selection_color: Color,
    /// Palette color active at startup.
    pub initial_color: Option<StrokeColor>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Rectpad".to_string(),
            surface: SurfaceConfig::default(),
            background_color: Color::from_rgba8(241, 245, 249, 255),
            selection_color: Color::from_rgba8(59, 130, 246, 255),
            initial_color: None,
        }
    }
}

impl AppConfig {
    /// Window size: palette bar plus canvas.
    pub fn window_size(&self) -> LogicalSize<f64> {
        LogicalSize::new(
            self.surface.width,
            self.surface.height + f64::from(TOOLBAR_HEIGHT),
        )
    }

    pub fn canvas_origin(&self) -> Point {
        Point::new(0.0, f64::from(TOOLBAR_HEIGHT))
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    shape_renderer: VelloRenderer,
    /// Copies the Rgba8Unorm render target onto the surface format.
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    canvas: CanvasSurface,
    input: InputState,
    event_handler: EventHandler,
    cursor: CursorKind,
    config: AppConfig,
}

impl AppState {
    /// React to signals from the canvas surface.
    fn apply_surface_events(&mut self, events: Vec<SurfaceEvent>) {
        for event in events {
            match event {
                SurfaceEvent::ClearColor => {
                    self.ui_state.color = None;
                    self.canvas.set_color(None);
                }
                SurfaceEvent::Alert(warning) => {
                    log::warn!("{warning}");
                    show_alert(&warning.to_string());
                }
            }
        }
    }

    fn handle_ui_action(&mut self, action: UiAction) {
        match action {
            UiAction::SetColor(color) => {
                self.ui_state.color = color;
                let selected = self.canvas.set_color(color.map(stroke_color));
                log::debug!("Color changed, selection is {selected:?}");
            }
        }
    }

    /// Colors already bound to a rectangle.
    fn colors_in_use(&self) -> Vec<Color32> {
        self.canvas
            .store()
            .iter()
            .filter_map(|rect| rect.stroke)
            .map(color32)
            .collect()
    }

    /// Run the UI, build the scene and present one frame.
    fn redraw(&mut self, render_cx: &vello::util::RenderContext) -> RenderResult<()> {
        let in_use = self.colors_in_use();
        let egui_input = self.egui_state.take_egui_input(&self.window);
        let mut action = None;
        let mut egui_output = self.egui_ctx.run(egui_input, |ctx| {
            action = render_ui(ctx, &self.ui_state, &in_use);
        });
        if let Some(action) = action {
            self.handle_ui_action(action);
        }

        // Over the canvas the surface decides the cursor
        if !self.egui_ctx.is_pointer_over_area() {
            egui_output.platform_output.cursor_icon = cursor_icon(self.cursor);
        }
        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);
        let egui_primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        let width = self.surface.config.width;
        let height = self.surface.config.height;

        let render_ctx = RenderContext::new(&self.canvas, Size::new(f64::from(width), f64::from(height)))
            .with_scale_factor(self.window.scale_factor())
            .with_canvas_origin(self.config.canvas_origin())
            .with_background(self.config.background_color)
            .with_selection_color(self.config.selection_color);
        self.shape_renderer.build_scene(&render_ctx);
        let base_color = self.shape_renderer.background_color(&render_ctx);
        let scene = self.shape_renderer.take_scene();

        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = self
            .surface
            .surface
            .get_current_texture()
            .map_err(|e| RendererError::Surface(e.to_string()))?;

        let params = RenderParams {
            base_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello needs a STORAGE_BINDING target, which WebGPU only allows for
        // Rgba8Unorm; the surface itself may be Bgra8Unorm.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        self.vello_renderer
            .render_to_texture(device, queue, &scene, &render_texture_view, &params)
            .map_err(|e| RendererError::RenderFailed(e.to_string()))?;

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("blit encoder"),
                });
            self.texture_blitter
                .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &egui_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        {
            let mut egui_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("egui encoder"),
                });
            self.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load, // Keep Vello content
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu wants a 'static render pass
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        surface_texture.present();
        Ok(())
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
    /// Flag to indicate async init is in progress
    #[cfg(target_arch = "wasm32")]
    init_in_progress: std::cell::Cell<bool>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            init_in_progress: std::cell::Cell::new(false),
        }
    }

    /// Run the application.
    pub async fn run() -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        let app = App::new();

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            event_loop.run_app(&mut app)?;
        }

        Ok(())
    }

    /// Create the window and, on native, its render surface.
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        log::info!("Creating window...");

        #[cfg(not(target_arch = "wasm32"))]
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(self.config.window_size())
            .with_resizable(false);

        #[cfg(target_arch = "wasm32")]
        let window_attrs = {
            use winit::platform::web::WindowAttributesExtWebSys;
            Window::default_attributes()
                .with_title(&self.config.title)
                .with_canvas(Some(self.attach_canvas()?))
        };

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        // On native, block on async surface creation
        #[cfg(not(target_arch = "wasm32"))]
        {
            let size = window.inner_size();
            let (width, height) = if size.width == 0 || size.height == 0 {
                let physical = self
                    .config
                    .window_size()
                    .to_physical::<u32>(window.scale_factor());
                (physical.width, physical.height)
            } else {
                (size.width, size.height)
            };
            log::info!("Surface size: {}x{}", width, height);

            let render_cx = self
                .render_cx
                .get_or_insert_with(vello::util::RenderContext::new);
            let surface = pollster::block_on(render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            ))
            .map_err(|e| AppError::Surface(e.to_string()))?;

            // SAFETY: the surface borrows the window, which the App keeps alive
            // in the same AppState for as long as the surface exists.
            let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
            self.finish_init(window, surface)?;
        }

        // On WASM, store window for later async initialization
        #[cfg(target_arch = "wasm32")]
        {
            self.pending_window = Some(window);
        }

        Ok(())
    }

    /// Find or create the page canvas, sized to the window in device pixels.
    #[cfg(target_arch = "wasm32")]
    fn attach_canvas(&self) -> Result<web_sys::HtmlCanvasElement, AppError> {
        use wasm_bindgen::JsCast;

        let web_window = web_sys::window().ok_or_else(|| AppError::Platform("no window".into()))?;
        let document = web_window
            .document()
            .ok_or_else(|| AppError::Platform("no document".into()))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            loading.remove();
        }

        let canvas = document
            .get_element_by_id("rectpad-canvas")
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
            .or_else(|| {
                let body = document.body()?;
                let canvas = document.create_element("canvas").ok()?;
                canvas.set_id("rectpad-canvas");
                body.append_child(&canvas).ok()?;
                canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()
            })
            .ok_or_else(|| AppError::Platform("failed to create canvas".into()))?;

        let size = self.config.window_size();
        let dpr = web_window.device_pixel_ratio();
        canvas.set_width((size.width * dpr) as u32);
        canvas.set_height((size.height * dpr) as u32);
        let style = canvas.style();
        let _ = style.set_property("width", &format!("{}px", size.width));
        let _ = style.set_property("height", &format!("{}px", size.height));
        let _ = style.set_property("display", "block");
        let _ = style.set_property("touch-action", "none");

        log::info!("Canvas created: {}x{} (dpr: {})", size.width, size.height, dpr);
        Ok(canvas)
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) -> Result<(), AppError> {
        let render_cx = self
            .render_cx
            .as_ref()
            .ok_or_else(|| RendererError::InitFailed("render context not initialized".into()))?;
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(e.to_string()))?;
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let mut canvas = CanvasSurface::with_config(self.config.surface.clone());
        canvas.set_color(self.config.initial_color);

        log::info!(
            "Rectpad initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            shape_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState::new(self.config.initial_color.map(color32)),
            canvas,
            input: InputState::new(),
            event_handler: EventHandler::new(self.config.canvas_origin()),
            cursor: CursorKind::Crosshair,
            config: self.config.clone(),
        });

        self.pending_window = None;

        window.request_redraw();
        Ok(())
    }

    /// Create the surface asynchronously once the browser is ready.
    #[cfg(target_arch = "wasm32")]
    fn start_async_init(&mut self, window: Arc<Window>) {
        if self.init_in_progress.get() {
            return;
        }
        self.init_in_progress.set(true);

        let physical = self.config.window_size().to_physical::<u32>(window.scale_factor());
        let self_ptr = self as *mut Self;

        wasm_bindgen_futures::spawn_local(async move {
            log::info!("Creating surface asynchronously...");
            let mut render_cx = vello::util::RenderContext::new();

            // SAFETY: WASM is single-threaded and the event loop keeps the App
            // alive for the lifetime of the page.
            let app = unsafe { &mut *self_ptr };
            match render_cx
                .create_surface(window.clone(), physical.width, physical.height, PresentMode::AutoVsync)
                .await
            {
                Ok(surface) => {
                    let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
                    app.render_cx = Some(render_cx);
                    if let Err(e) = app.finish_init(window, surface) {
                        log::error!("Initialization failed: {e}");
                        app.init_in_progress.set(false);
                    }
                }
                Err(e) => {
                    log::error!("Failed to create surface: {e}");
                    app.init_in_progress.set(false);
                }
            }
        });
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            log::error!("Failed to start: {e}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            if let Some(window) = self.pending_window.clone() {
                self.start_async_init(window.clone());
                // Keep the event loop running until the surface exists
                window.request_redraw();
            }
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        let egui_wants_input = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_ref() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.window.request_redraw();
            }

            WindowEvent::Focused(false) => {
                let events = state.event_handler.focus_lost(&mut state.canvas, &mut state.input);
                state.apply_surface_events(events);
            }

            WindowEvent::RedrawRequested => {
                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                if let Err(e) = state.redraw(render_cx) {
                    log::warn!("Frame skipped: {e}");
                }
                state.window.request_redraw();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let point = state
                    .event_handler
                    .to_canvas(position, state.window.scale_factor());

                // Skip canvas processing if egui wants the pointer, unless a
                // canvas gesture is already running
                if egui_wants_input && !state.input.is_dragging {
                    return;
                }

                let events = state
                    .event_handler
                    .pointer_moved(&mut state.canvas, &mut state.input, point);
                state.cursor = state.canvas.cursor_at(point);
                state.apply_surface_events(events);
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                let Some(button) = map_mouse_button(button) else {
                    return;
                };
                let pressed = btn_state == ElementState::Pressed;
                if pressed && egui_wants_input {
                    return;
                }

                let events = state.event_handler.mouse_button(
                    &mut state.canvas,
                    &mut state.input,
                    button,
                    pressed,
                );
                state.apply_surface_events(events);
            }

            WindowEvent::Touch(touch) => {
                if touch.phase == winit::event::TouchPhase::Started && egui_wants_input {
                    return;
                }
                let point = state
                    .event_handler
                    .to_canvas(touch.location, state.window.scale_factor());
                let events = state.event_handler.touch(
                    &mut state.canvas,
                    &mut state.input,
                    touch.id,
                    touch.phase,
                    point,
                );
                state.apply_surface_events(events);
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_fits_canvas_and_palette() {
        let config = AppConfig::default();
        let size = config.window_size();
        assert_eq!(size.width, 1000.0);
        assert_eq!(size.height, 500.0 + f64::from(TOOLBAR_HEIGHT));
        assert_eq!(config.canvas_origin(), Point::new(0.0, f64::from(TOOLBAR_HEIGHT)));
        assert_eq!(config.initial_color, None);
    }
}
