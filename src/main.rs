//! Flappy Circle entry point
//!
//! In the browser this drives a `GameFrame` from `requestAnimationFrame`.
//! Natively it runs a headless autopilot against the recording backend.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use flappy_circle::renderer::WgpuBackend;
    use flappy_circle::{GameConfig, GameFrame, RenderError};

    /// Browser-side state around the core
    struct Host {
        frame: Option<GameFrame<WgpuBackend>>,
        config: GameConfig,
        canvas: HtmlCanvasElement,
    }

    impl Host {
        /// Match the canvas backing store to its CSS size
        fn fit_canvas(&mut self) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let width = (self.canvas.client_width() as f64 * dpr) as u32;
            let height = (self.canvas.client_height() as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Some(frame) = self.frame.as_mut() {
                frame.resize(width, height);
            }
        }

        fn tap(&mut self) {
            if let Some(frame) = self.frame.as_mut() {
                frame.notify_tap();
            }
        }

        /// Tear down the failed frame and start over on the same backend
        fn restart(&mut self) {
            let Some(frame) = self.frame.take() else {
                return;
            };
            if !frame.failed() {
                self.frame = Some(frame);
                return;
            }

            let size = frame.window_size();
            let backend = frame.destroy();
            match GameFrame::new(backend, self.config.clone()) {
                Ok(mut frame) => {
                    frame.resize(size.0, size.1);
                    self.frame = Some(frame);
                    log::info!("Restarted");
                }
                Err(e) => log::error!("Restart failed: {e}"),
            }
        }

        fn draw(&mut self) {
            let Some(frame) = self.frame.as_mut() else {
                return;
            };
            match frame.draw_frame() {
                Ok(_) => {}
                Err(RenderError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                    let (w, h) = frame.window_size();
                    frame.resize(w, h);
                }
                Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {e}"),
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flappy Circle starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let config = GameConfig::load();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {e}");
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {e}");
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let backend =
            match WgpuBackend::new(surface, &adapter, width, height, config.clear_color).await {
                Ok(backend) => backend,
                Err(e) => {
                    log::error!("Renderer setup failed: {e}");
                    return;
                }
            };

        let mut frame = match GameFrame::new(backend, config.clone()) {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("Startup failed: {e}");
                return;
            }
        };
        frame.resize(width, height);

        let host = Rc::new(RefCell::new(Host {
            frame: Some(frame),
            config,
            canvas: canvas.clone(),
        }));

        setup_input_handlers(&canvas, host.clone());
        setup_resize_handler(host.clone());

        request_animation_frame(host);

        log::info!("Flappy Circle running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        // Mouse / pen / touch press
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PointerEvent| {
                host.borrow_mut().tap();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Browsers without pointer events
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
                event.prevent_default();
                host.borrow_mut().tap();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let host = host.clone();
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut h = host.borrow_mut();
                match event.key().as_str() {
                    " " => {
                        event.prevent_default();
                        h.tap();
                    }
                    "r" | "R" => h.restart(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            host.borrow_mut().fit_canvas();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(host);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>) {
        host.borrow_mut().draw();
        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flappy Circle (native) starting...");
    log::info!("Native mode runs headless - use `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let config_path = args.next();
    let frames = args
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(autopilot::DEFAULT_FRAMES);

    if let Err(e) = autopilot::run(config_path.as_deref(), frames) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use flappy_circle::renderer::RecordingBackend;
    use flappy_circle::sim::{FrameOutcome, gap_band};
    use flappy_circle::{GameConfig, GameFrame, InitError};

    pub const DEFAULT_FRAMES: u64 = 1200;

    /// Play headlessly, tapping whenever the circle sinks below the middle
    /// of the gap
    pub fn run(config_path: Option<&str>, frames: u64) -> Result<(), InitError> {
        let config = match config_path {
            Some(path) => GameConfig::from_path(path)?,
            None => GameConfig::default(),
        };

        let mut game = GameFrame::new(RecordingBackend::with_history(1), config)?;
        game.resize(1280, 720);

        let mut wraps = 0u32;
        for _ in 0..frames {
            let state = game.state();
            let band = gap_band(state.gap_height, &game.config().tuning);
            if -state.fall_offset < (band.top + band.bottom) / 2.0 {
                game.notify_tap();
            }

            match game.draw_frame()? {
                FrameOutcome::Playing { wrapped: true, .. } => wraps += 1,
                FrameOutcome::Failed { .. } => break,
                FrameOutcome::Playing { .. } => {}
            }
        }

        let summary = format!(
            "{} frames, {} columns cleared, {}",
            game.frames(),
            wraps,
            if game.failed() { "failed" } else { "still flying" }
        );
        log::info!("Autopilot: {summary}");
        println!("{summary}");

        let backend = game.destroy();
        log::info!("Buffers uploaded: {}", backend.buffers_uploaded());
        Ok(())
    }
}
