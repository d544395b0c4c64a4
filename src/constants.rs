use std::time::Duration;

pub const DEFAULT_FX: &str = "fade";                              // Preset used when no fx is configured
pub const DEFAULT_TIMEOUT_MS: u64 = 4000;                         // Time between automatic transitions
pub const DEFAULT_SPEED_MS: u64 = 1000;                           // Duration of a transition
pub const MIN_DWELL_MS: u64 = 250;                                // Minimum time a slide stays still between transitions

pub const CONTINUOUS_DELAY: Duration = Duration::from_millis(10); // Gap between transitions in continuous mode
pub const FAST_EVENT_SPEED: Duration = Duration::from_millis(1);  // Transition duration for manual triggers with fastOnEvent

// Viewer
pub const RENDER_WIDTH: i32 = 1920;                               // Width of the render texture
pub const RENDER_HEIGHT: i32 = 1080;                              // Height of the render texture
pub const FPS: u32 = 60;                                          // Frames per second
pub const FRAME_TIME: f32 = 1.0 / FPS as f32;                     // Time per frame (seconds)
