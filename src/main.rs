use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use raylib::prelude::*;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use slide_rotator::constants::{FPS, FRAME_TIME, RENDER_HEIGHT, RENDER_WIDTH};
use slide_rotator::{Pager, Rotator, RotatorEvent, RotatorOptions, TransitionRegistry, TweenEngine};

mod texture_loader;
mod viewer;

use crate::texture_loader::{load_sorted_image_paths, load_texture_with_exif_rotation};
use crate::viewer::{Frame, Picture, draw_pager, draw_panel, key_binding, pager_hit};

const DIGIT_KEYS: [KeyboardKey; 9] = [
    KeyboardKey::KEY_ONE,
    KeyboardKey::KEY_TWO,
    KeyboardKey::KEY_THREE,
    KeyboardKey::KEY_FOUR,
    KeyboardKey::KEY_FIVE,
    KeyboardKey::KEY_SIX,
    KeyboardKey::KEY_SEVEN,
    KeyboardKey::KEY_EIGHT,
    KeyboardKey::KEY_NINE,
];

/// Rotates the pictures of a directory with cycle-style transitions.
///
/// Right/Space: next, Left: previous, 1-9: jump, P: pause. With --pager, click a dot to jump.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory holding the pictures
    #[arg(required_unless_present = "list_fx")]
    image_directory: Option<PathBuf>,

    /// JSON file with rotator options, camelCase like the plugin's option object
    #[arg(long)]
    options: Option<PathBuf>,

    /// Transition preset
    #[arg(long)]
    fx: Option<String>,

    /// Milliseconds between transitions, 0 for manual only
    #[arg(long)]
    timeout: Option<u64>,

    /// Transition duration in milliseconds
    #[arg(long)]
    speed: Option<u64>,

    #[arg(long)]
    random: bool,

    /// Stop at the last slide instead of wrapping around
    #[arg(long)]
    nowrap: bool,

    #[arg(long)]
    continuous: bool,

    /// Pause while the cursor is over the window
    #[arg(long)]
    pause: bool,

    /// End the show after this many automatic transitions, 0 for one per slide
    #[arg(long)]
    autostop: Option<usize>,

    /// Index of the first slide
    #[arg(long)]
    start: Option<usize>,

    /// Close the window once the show ends
    #[arg(long)]
    exit_at_end: bool,

    /// Key for the next slide (Right, Left, Up, Down, Space, Enter, PageUp, PageDown, N, B, J, K)
    #[arg(long)]
    next: Option<String>,

    /// Key for the previous slide
    #[arg(long)]
    prev: Option<String>,

    /// Show clickable pager dots
    #[arg(long)]
    pager: bool,

    /// Print the available transitions and exit
    #[arg(long)]
    list_fx: bool,
}

impl Args {
    /// Options file first, then command line flags on top.
    fn options(&self) -> Result<RotatorOptions> {
        let mut options = match &self.options {
            Some(path) => RotatorOptions::from_json_file(path)
                .with_context(|| format!("invalid options file {}", path.display()))?,
            None => RotatorOptions::default(),
        };
        if let Some(fx) = &self.fx {
            options.fx = fx.clone();
        }
        if let Some(timeout) = self.timeout {
            options.timeout = timeout;
        }
        if let Some(speed) = self.speed {
            options.speed = speed;
        }
        if let Some(count) = self.autostop {
            options.autostop = true;
            options.autostop_count = Some(count);
        }
        if let Some(start) = self.start {
            options.starting_slide = start;
        }
        if let Some(next) = &self.next {
            options.next = Some(next.clone());
        }
        if let Some(prev) = &self.prev {
            options.prev = Some(prev.clone());
        }
        if self.pager {
            options.pager = Some("dots".to_string());
        }
        options.random |= self.random;
        options.nowrap |= self.nowrap;
        options.continuous |= self.continuous;
        options.pause |= self.pause;
        Ok(options)
    }
}

/// Key bound through the `next`/`prev` options, `default` when unset or unknown.
fn bound_key(name: Option<&str>, default: KeyboardKey) -> KeyboardKey {
    match name {
        Some(name) => key_binding(name).unwrap_or_else(|| {
            warn!(key = name, "unknown key name, keeping the default binding");
            default
        }),
        None => default,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let registry = TransitionRegistry::default();
    if args.list_fx {
        for name in registry.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let directory = args.image_directory.clone().context("missing picture directory")?;
    let config = args.options()?.normalize();
    info!(directory = %directory.display(), fx = %config.fx, "starting slideshow");

    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH / 2, RENDER_HEIGHT / 2)
        .title("Slide Rotator")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // --- Load Slides ---
    let mut pictures = Vec::new();
    for path in load_sorted_image_paths(&directory)? {
        match load_texture_with_exif_rotation(&mut rl, &thread, &path) {
            Ok(texture) => pictures.push(Picture::new(texture)),
            Err(e) => warn!(error = %e, "skipping picture"),
        }
    }
    info!(count = pictures.len(), "pictures loaded");

    let mut rotator = Rotator::new(config, pictures, &registry, TweenEngine::new());
    let pager = Rc::new(RefCell::new(Pager::new()));
    rotator.register_pager(Rc::clone(&pager));
    rotator.observe(|event: &RotatorEvent| debug!(?event, "rotator event"));
    rotator.start().context("cannot start the show")?;
    let triggers = rotator.triggers();

    let mut framebuffer = rl
        .load_render_texture(&thread, RENDER_WIDTH as u32, RENDER_HEIGHT as u32)
        .map_err(|e| anyhow!("failed to create render texture: {e}"))?;

    let next_key = bound_key(rotator.config().next.as_deref(), KeyboardKey::KEY_RIGHT);
    let prev_key = bound_key(rotator.config().prev.as_deref(), KeyboardKey::KEY_LEFT);
    let show_pager = rotator.config().pager.is_some();

    let frame_time = Duration::from_secs_f32(FRAME_TIME);
    let mut hovering = false;
    let mut held = false;

    // --- Main Loop ---
    while !rl.window_should_close() {
        // 1. Input becomes triggers, applied on the next tick
        if rl.is_key_pressed(next_key) || rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            triggers.next();
        }
        if rl.is_key_pressed(prev_key) {
            triggers.prev();
        }
        for (index, key) in DIGIT_KEYS.iter().enumerate() {
            if rl.is_key_pressed(*key) {
                triggers.pager(index);
            }
        }
        if rl.is_key_pressed(KeyboardKey::KEY_P) {
            held = !held;
            if held {
                rotator.pause();
            } else {
                rotator.resume();
            }
        }
        if show_pager && rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            let mouse = rl.get_mouse_position();
            let point = Vector2::new(
                mouse.x * RENDER_WIDTH as f32 / rl.get_screen_width() as f32,
                mouse.y * RENDER_HEIGHT as f32 / rl.get_screen_height() as f32,
            );
            if let Some(index) = pager_hit(&pager.borrow(), point) {
                triggers.pager(index);
            }
        }
        let on_screen = rl.is_cursor_on_screen();
        if on_screen != hovering {
            hovering = on_screen;
            triggers.hover(hovering);
        }

        // 2. Advance the show by one fixed frame
        rotator.tick(frame_time);
        if args.exit_at_end && rotator.has_ended() && !rotator.is_busy() {
            info!("show ended");
            break;
        }

        // --- Render each frame into fixed size "framebuffer" ---
        let frame = Frame::fit(rotator.container());
        let mut order: Vec<usize> = (0..rotator.len()).collect();
        order.sort_by_key(|&index| rotator.panels()[index].style.z_index);

        rl.draw_texture_mode(&thread, &mut framebuffer, |mut tmd| {
            let mut d = tmd.begin_drawing(&thread);
            d.clear_background(Color::BLACK);
            for &index in &order {
                draw_panel(&mut d, &rotator.slides()[index], &rotator.panels()[index], frame);
            }
            if show_pager {
                draw_pager(&mut d, &pager.borrow());
            }
        });

        // Scale the framebuffer to the window, flipped back upright
        let mut d = rl.begin_drawing(&thread);
        let sw = d.get_screen_width() as f32;
        let sh = d.get_screen_height() as f32;
        d.draw_texture_pro(
            &framebuffer,
            Rectangle::new(0.0, 0.0, framebuffer.width() as f32, -(framebuffer.height() as f32)),
            Rectangle::new(0.0, 0.0, sw, sh),
            Vector2::new(0.0, 0.0),
            0.0,
            Color::WHITE,
        );
    }

    rotator.stop();
    Ok(())
}
