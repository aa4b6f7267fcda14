//! modelview: a minimal free-camera 3D model viewer
//!
//! Loads a model and a texture, lets you fly around it, spin it and pick
//! it with the mouse. Drop a model or image file on the window to swap
//! either one.
//!
//! Controls: WASD move, Q/E up/down, mouse look, R reset camera,
//! Z/X/C rotate the model, left click select, Tab release the cursor,
//! Escape quit.

mod app;
mod asset;
mod camera;
mod config;
mod draw;
mod drop;
mod input;
mod picking;
mod scene;

use app::Viewer;
use clap::Parser;
use config::{search_resource_dir, Cli, ViewerConfig};
use input::InputState;
use macroquad::prelude::*;
use scene::Scene;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Everything resolved before the window opens
struct Startup {
    config: ViewerConfig,
    model_path: PathBuf,
    texture_path: Option<PathBuf>,
}

static STARTUP: OnceLock<Startup> = OnceLock::new();

/// Parse arguments, set up logging and read the config. Runs once, from
/// `window_conf`, since the window size comes from the config.
fn startup() -> &'static Startup {
    STARTUP.get_or_init(|| {
        let cli = Cli::parse();
        let default_filter = if cli.verbose { "debug" } else { "info" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

        let mut config = match &cli.config {
            Some(path) => match ViewerConfig::load(path) {
                Ok(config) => {
                    log::info!("Loaded config {}", path.display());
                    config
                }
                Err(e) => {
                    log::error!("{}", e);
                    std::process::exit(2);
                }
            },
            None => ViewerConfig::default(),
        };
        config.apply_cli(&cli);

        let resource_dir = search_resource_dir(&config.resources.dir).unwrap_or_else(|| {
            log::warn!(
                "Resource directory '{}' not found, using the working directory",
                config.resources.dir
            );
            PathBuf::from(".")
        });
        log::debug!("Resource directory: {}", resource_dir.display());

        let model_path = resource_dir.join(&config.resources.model);
        let texture_path = config.resources.texture.as_ref().map(|t| resource_dir.join(t));

        Startup {
            config,
            model_path,
            texture_path,
        }
    })
}

fn window_conf() -> Conf {
    let window = &startup().config.window;
    Conf {
        window_title: window.title.clone(),
        window_width: window.width,
        window_height: window.height,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn apply_cursor_grab(grabbed: bool) {
    set_cursor_grab(grabbed);
    show_mouse(!grabbed);
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let startup = startup();
    let config = &startup.config;

    let mut scene = match Scene::load(&startup.model_path, startup.texture_path.as_deref()) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Cannot open {}: {}", startup.model_path.display(), e);
            std::process::exit(1);
        }
    };

    let mut viewer = Viewer::new(config);
    let mut input = InputState::new();
    apply_cursor_grab(viewer.cursor_grabbed);

    let target_frame_time = config.window.target_fps.filter(|&fps| fps > 0).map(|fps| 1.0 / fps as f64);

    loop {
        let frame_start = get_time();

        let frame = input.poll();
        let update = viewer.update(&frame);
        if update.quit {
            break;
        }
        if update.cursor_toggled {
            apply_cursor_grab(viewer.cursor_grabbed);
            input.reset_mouse();
        }

        let dropped = drop::classify_drop(&drop::poll_dropped());
        if scene.apply_drop(&dropped) {
            viewer.clear_selection();
        }

        let screen = vec2(screen_width(), screen_height());
        viewer.handle_click(&frame, &scene.bounds(), screen);

        // 3D
        clear_background(draw::RAYWHITE);
        set_camera(&viewer.camera.to_macroquad());
        scene.draw(viewer.model_matrix());
        draw_grid(config.scene.grid_slices, config.scene.grid_spacing, GRAY, LIGHTGRAY);
        draw::draw_axes(config.scene.axes_scale);
        if viewer.selected {
            draw::draw_bounds(&scene.bounds(), GREEN);
        }

        // 2D overlay
        set_default_camera();
        draw::draw_hud(viewer.selected, &scene.status_line());

        if let Some(target_frame_time) = target_frame_time {
            let elapsed = get_time() - frame_start;
            if elapsed < target_frame_time {
                // Native: use sleep for bulk, then spin-wait for precision
                #[cfg(not(target_arch = "wasm32"))]
                {
                    let spin_margin = 0.002; // 2ms
                    while get_time() - frame_start + spin_margin < target_frame_time {
                        std::thread::sleep(std::time::Duration::from_millis(1));
                    }
                    while get_time() - frame_start < target_frame_time {
                        std::hint::spin_loop();
                    }
                }
                // WASM: the browser paces frames
            }
        }

        next_frame().await;
    }

    log::info!("Shutting down");
}
