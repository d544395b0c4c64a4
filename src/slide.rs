use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Smallest size containing both.
    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }
}

/// Anything the rotator can show. Only its natural size is ever read.
pub trait SlideContent {
    fn size(&self) -> Size;
}

impl SlideContent for Size {
    fn size(&self) -> Size {
        *self
    }
}

/// Clip rectangle in css `rect(top right bottom left)` order, relative to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClipRect {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl ClipRect {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self { top, right, bottom, left }
    }

    pub fn full(size: Size) -> Self {
        Self::new(0.0, size.width, size.height, 0.0)
    }

    pub fn lerp(self, to: ClipRect, t: f32) -> ClipRect {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        ClipRect::new(
            mix(self.top, to.top),
            mix(self.right, to.right),
            mix(self.bottom, to.bottom),
            mix(self.left, to.left),
        )
    }
}

/// Resolved style of a panel, in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelStyle {
    pub visible: bool,
    pub opacity: f32,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub z_index: i32,
    pub clip: Option<ClipRect>,
}

impl PanelStyle {
    fn resting(size: Size) -> Self {
        Self {
            visible: false,
            opacity: 1.0,
            left: 0.0,
            top: 0.0,
            width: size.width,
            height: size.height,
            z_index: 0,
            clip: None,
        }
    }
}

/// Partial style: every `Some` field overrides the panel's value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleDelta {
    pub visible: Option<bool>,
    pub opacity: Option<f32>,
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub z_index: Option<i32>,
    pub clip: Option<ClipRect>,
}

impl StyleDelta {
    pub fn is_empty(&self) -> bool {
        *self == StyleDelta::default()
    }

    /// Fields of `other` win.
    pub fn merge(self, other: StyleDelta) -> StyleDelta {
        StyleDelta {
            visible: other.visible.or(self.visible),
            opacity: other.opacity.or(self.opacity),
            left: other.left.or(self.left),
            top: other.top.or(self.top),
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            z_index: other.z_index.or(self.z_index),
            clip: other.clip.or(self.clip),
        }
    }

    pub fn shown() -> Self {
        Self { visible: Some(true), ..Self::default() }
    }

    pub fn hidden() -> Self {
        Self { visible: Some(false), ..Self::default() }
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn left(mut self, left: f32) -> Self {
        self.left = Some(left);
        self
    }

    pub fn top(mut self, top: f32) -> Self {
        self.top = Some(top);
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn clip(mut self, clip: ClipRect) -> Self {
        self.clip = Some(clip);
        self
    }
}

/// One stacked slide inside the container.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    natural: Size,
    pub style: PanelStyle,
}

impl Panel {
    pub fn new(natural: Size) -> Self {
        Self { natural, style: PanelStyle::resting(natural) }
    }

    pub fn natural(&self) -> Size {
        self.natural
    }

    pub fn is_visible(&self) -> bool {
        self.style.visible
    }

    pub fn apply(&mut self, delta: &StyleDelta) {
        let style = &mut self.style;
        if let Some(visible) = delta.visible {
            style.visible = visible;
        }
        if let Some(opacity) = delta.opacity {
            style.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(left) = delta.left {
            style.left = left;
        }
        if let Some(top) = delta.top {
            style.top = top;
        }
        if let Some(width) = delta.width {
            style.width = width.max(0.0);
        }
        if let Some(height) = delta.height {
            style.height = height.max(0.0);
        }
        if let Some(z_index) = delta.z_index {
            style.z_index = z_index;
        }
        if delta.clip.is_some() {
            style.clip = delta.clip;
        }
    }

    /// Back to natural geometry at the container origin, keeping visibility and stacking.
    pub fn reset_geometry(&mut self) {
        let resting = PanelStyle::resting(self.natural);
        self.style = PanelStyle {
            visible: self.style.visible,
            z_index: self.style.z_index,
            ..resting
        };
    }

    /// Forces the natural size, as the `fit` option does.
    pub(crate) fn fit_to(&mut self, size: Size) {
        self.natural = size;
        self.style.width = size.width;
        self.style.height = size.height;
    }
}
