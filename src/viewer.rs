use raylib::prelude::*;

use slide_rotator::constants::{RENDER_HEIGHT, RENDER_WIDTH};
use slide_rotator::{ClipRect, Pager, Panel, Size, SlideContent};

const PICTURE_MARGIN: f32 = 0.9; // Share of the render texture a picture may cover
const DOT_RADIUS: f32 = 8.0;
const DOT_SPACING: f32 = 28.0;
const DOT_MARGIN: f32 = 40.0; // Distance of the pager from the bottom edge

/// A loaded picture, sized to fit the render texture.
pub struct Picture {
    texture: Texture2D,
    size: Size,
}

impl Picture {
    pub fn new(texture: Texture2D) -> Self {
        let width = texture.width() as f32;
        let height = texture.height() as f32;
        let scale = (RENDER_WIDTH as f32 * PICTURE_MARGIN / width)
            .min(RENDER_HEIGHT as f32 * PICTURE_MARGIN / height)
            .min(1.0);
        Self { texture, size: Size::new(width * scale, height * scale) }
    }
}

impl SlideContent for Picture {
    fn size(&self) -> Size {
        self.size
    }
}

/// Placement of the container inside the render texture: centered, scaled to fit.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    origin: Vector2,
    scale: f32,
}

impl Frame {
    pub fn fit(container: Size) -> Self {
        if container.width <= 0.0 || container.height <= 0.0 {
            return Self { origin: Vector2::new(0.0, 0.0), scale: 1.0 };
        }
        let scale = (RENDER_WIDTH as f32 / container.width).min(RENDER_HEIGHT as f32 / container.height);
        let origin = Vector2::new(
            (RENDER_WIDTH as f32 - container.width * scale) / 2.0,
            (RENDER_HEIGHT as f32 - container.height * scale) / 2.0,
        );
        Self { origin, scale }
    }

    fn to_render(self, x: f32, y: f32) -> Vector2 {
        Vector2::new(self.origin.x + x * self.scale, self.origin.y + y * self.scale)
    }
}

/// Draws one panel with its opacity and clip. The clip crops both the
/// texture source and the destination so no scissor state is needed.
pub fn draw_panel(d: &mut impl RaylibDraw, picture: &Picture, panel: &Panel, frame: Frame) {
    let style = &panel.style;
    if !style.visible || style.opacity <= 0.0 || style.width <= 0.0 || style.height <= 0.0 {
        return;
    }

    let clip = style.clip.unwrap_or(ClipRect::new(0.0, style.width, style.height, 0.0));
    let left = clip.left.clamp(0.0, style.width);
    let right = clip.right.clamp(left, style.width);
    let top = clip.top.clamp(0.0, style.height);
    let bottom = clip.bottom.clamp(top, style.height);
    if right <= left || bottom <= top {
        return;
    }

    let sx = picture.texture.width() as f32 / style.width;
    let sy = picture.texture.height() as f32 / style.height;
    let source = Rectangle::new(left * sx, top * sy, (right - left) * sx, (bottom - top) * sy);
    let position = frame.to_render(style.left + left, style.top + top);
    let dest = Rectangle::new(position.x, position.y, (right - left) * frame.scale, (bottom - top) * frame.scale);
    let tint = Color::new(255, 255, 255, (style.opacity * 255.0).round() as u8);

    d.draw_texture_pro(&picture.texture, source, dest, Vector2::new(0.0, 0.0), 0.0, tint);
}

fn dot_center(index: usize, count: usize) -> Vector2 {
    let row = count.saturating_sub(1) as f32 * DOT_SPACING;
    Vector2::new(
        RENDER_WIDTH as f32 / 2.0 - row / 2.0 + index as f32 * DOT_SPACING,
        RENDER_HEIGHT as f32 - DOT_MARGIN,
    )
}

pub fn draw_pager(d: &mut impl RaylibDraw, pager: &Pager) {
    let count = pager.anchors();
    for index in 0..count {
        let color = if pager.active() == Some(index) { Color::WHITE } else { Color::GRAY };
        d.draw_circle_v(dot_center(index, count), DOT_RADIUS, color);
    }
}

/// Key named by the `next` or `prev` option, e.g. `"Right"`, `"Space"` or `"N"`.
pub fn key_binding(name: &str) -> Option<KeyboardKey> {
    let key = match name.to_ascii_lowercase().as_str() {
        "right" => KeyboardKey::KEY_RIGHT,
        "left" => KeyboardKey::KEY_LEFT,
        "up" => KeyboardKey::KEY_UP,
        "down" => KeyboardKey::KEY_DOWN,
        "space" => KeyboardKey::KEY_SPACE,
        "enter" => KeyboardKey::KEY_ENTER,
        "pageup" => KeyboardKey::KEY_PAGE_UP,
        "pagedown" => KeyboardKey::KEY_PAGE_DOWN,
        "n" => KeyboardKey::KEY_N,
        "b" => KeyboardKey::KEY_B,
        "j" => KeyboardKey::KEY_J,
        "k" => KeyboardKey::KEY_K,
        _ => return None,
    };
    Some(key)
}

/// Anchor under `point`, in render texture coordinates.
pub fn pager_hit(pager: &Pager, point: Vector2) -> Option<usize> {
    let count = pager.anchors();
    (0..count).find(|&index| {
        let center = dot_center(index, count);
        (center.x - point.x).hypot(center.y - point.y) <= DOT_RADIUS * 1.5
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_binding_names() {
        assert_eq!(key_binding("Right"), Some(KeyboardKey::KEY_RIGHT));
        assert_eq!(key_binding("pagedown"), Some(KeyboardKey::KEY_PAGE_DOWN));
        assert_eq!(key_binding("N"), Some(KeyboardKey::KEY_N));
        assert_eq!(key_binding("#next"), None);
    }

    #[test]
    fn test_pager_hit_finds_dot() {
        let mut pager = Pager::new();
        for index in 0..3 {
            slide_rotator::PagerSink::anchor_added(&mut pager, index);
        }
        assert_eq!(pager_hit(&pager, dot_center(2, 3)), Some(2));
        assert_eq!(pager_hit(&pager, Vector2::new(0.0, 0.0)), None);
    }
}
