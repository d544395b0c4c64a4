use crate::slide::{ClipRect, StyleDelta};

use super::{Choreography, ClipOrigin, CoverDirection, Step, TransitionRegistry};

pub(super) fn register_all(registry: &mut TransitionRegistry) {
    registry.register("fade", fade);
    registry.register("scrollUp", scroll_up);
    registry.register("scrollDown", scroll_down);
    registry.register("scrollLeft", scroll_left);
    registry.register("scrollRight", scroll_right);
    registry.register("scrollHorz", scroll_horz);
    registry.register("scrollVert", scroll_vert);
    registry.register("slideX", slide_x);
    registry.register("slideY", slide_y);
    registry.register("turnUp", turn_up);
    registry.register("turnDown", turn_down);
    registry.register("turnLeft", turn_left);
    registry.register("turnRight", turn_right);
    registry.register("zoom", zoom);
    registry.register("fadeZoom", fade_zoom);
    registry.register("blindX", blind_x);
    registry.register("blindY", blind_y);
    registry.register("blindZ", blind_z);
    registry.register("growX", grow_x);
    registry.register("growY", grow_y);
    registry.register("curtainX", curtain_x);
    registry.register("curtainY", curtain_y);
    registry.register("cover", cover);
    registry.register("uncover", uncover);
    registry.register("toss", toss);
    registry.register("wipe", wipe);
}

fn style() -> StyleDelta {
    StyleDelta::default()
}

fn gone() -> StyleDelta {
    StyleDelta::hidden()
}

fn fade(_: &Step) -> Choreography {
    Choreography {
        next_before: style().opacity(0.0),
        anim_in: style().opacity(1.0),
        anim_out: style().opacity(0.0),
        curr_after: gone(),
        ..Choreography::default()
    }
}

// scrollUp/Down/Left/Right

fn scroll_up(s: &Step) -> Choreography {
    Choreography {
        next_before: style().top(s.incoming.height),
        anim_in: style().top(0.0),
        anim_out: style().top(-s.outgoing.height),
        curr_after: gone(),
        ..Choreography::default()
    }
}

fn scroll_down(s: &Step) -> Choreography {
    Choreography {
        next_before: style().top(-s.incoming.height),
        anim_in: style().top(0.0),
        anim_out: style().top(s.outgoing.height),
        curr_after: gone(),
        ..Choreography::default()
    }
}

fn scroll_left(s: &Step) -> Choreography {
    Choreography {
        next_before: style().left(s.incoming.width),
        anim_in: style().left(0.0),
        anim_out: style().left(-s.outgoing.width),
        ..Choreography::default()
    }
}

fn scroll_right(s: &Step) -> Choreography {
    Choreography {
        next_before: style().left(-s.incoming.width),
        anim_in: style().left(0.0),
        anim_out: style().left(s.outgoing.width),
        ..Choreography::default()
    }
}

fn scroll_horz(s: &Step) -> Choreography {
    let (before, out) = if s.forward {
        (s.incoming.width, -s.outgoing.width)
    } else {
        (-s.incoming.width, s.outgoing.width)
    };
    Choreography {
        next_before: style().left(before),
        anim_in: style().left(0.0),
        anim_out: style().left(out),
        curr_after: gone(),
        ..Choreography::default()
    }
}

fn scroll_vert(s: &Step) -> Choreography {
    let (before, out) = if s.forward {
        (-s.incoming.height, s.outgoing.height)
    } else {
        (s.incoming.height, -s.outgoing.height)
    };
    Choreography {
        next_before: style().top(before),
        anim_in: style().top(0.0),
        anim_out: style().top(out),
        curr_after: gone(),
        ..Choreography::default()
    }
}

// slideX/slideY

fn slide_x(s: &Step) -> Choreography {
    Choreography {
        curr_before: style().z_index(1),
        next_before: style().z_index(2).width(0.0),
        anim_in: style().width(s.incoming.width),
        anim_out: style().width(0.0),
        curr_after: gone(),
    }
}

fn slide_y(s: &Step) -> Choreography {
    Choreography {
        curr_before: style().z_index(1),
        next_before: style().z_index(2).height(0.0),
        anim_in: style().height(s.incoming.height),
        anim_out: style().height(0.0),
        curr_after: gone(),
    }
}

// turnUp/Down/Left/Right

fn turn_up(s: &Step) -> Choreography {
    Choreography {
        next_before: style().top(s.incoming.height).height(0.0),
        anim_in: style().top(0.0).height(s.incoming.height),
        anim_out: style().height(0.0),
        curr_after: gone(),
        ..Choreography::default()
    }
}

fn turn_down(s: &Step) -> Choreography {
    Choreography {
        next_before: style().top(0.0).height(0.0),
        anim_in: style().height(s.incoming.height),
        anim_out: style().height(0.0).top(s.outgoing.height),
        curr_after: gone(),
        ..Choreography::default()
    }
}

fn turn_left(s: &Step) -> Choreography {
    Choreography {
        next_before: style().left(s.incoming.width).width(0.0),
        anim_in: style().left(0.0).width(s.incoming.width),
        anim_out: style().width(0.0),
        curr_after: gone(),
        ..Choreography::default()
    }
}

fn turn_right(s: &Step) -> Choreography {
    Choreography {
        next_before: style().left(0.0).width(0.0),
        anim_in: style().left(0.0).width(s.incoming.width),
        anim_out: style().width(0.0).left(s.outgoing.width),
        curr_after: gone(),
        ..Choreography::default()
    }
}

// zoom

fn zoom(s: &Step) -> Choreography {
    let (next, curr) = (s.incoming, s.outgoing);
    Choreography {
        curr_before: style().z_index(2),
        next_before: style()
            .width(0.0)
            .height(0.0)
            .top(next.height / 2.0)
            .left(next.width / 2.0)
            .z_index(1),
        anim_in: style().top(0.0).left(0.0).width(next.width).height(next.height),
        anim_out: style()
            .width(0.0)
            .height(0.0)
            .top(curr.height / 2.0)
            .left(curr.width / 2.0),
        curr_after: gone(),
    }
}

fn fade_zoom(s: &Step) -> Choreography {
    let next = s.incoming;
    Choreography {
        curr_before: style().z_index(2),
        next_before: style()
            .width(0.0)
            .height(0.0)
            .opacity(1.0)
            .left(next.width / 2.0)
            .top(next.height / 2.0)
            .z_index(1),
        anim_in: style().top(0.0).left(0.0).width(next.width).height(next.height),
        anim_out: style().opacity(0.0),
        curr_after: style().z_index(0),
    }
}

// blindX/Y/Z

fn blind(left: Option<f32>, top: Option<f32>) -> Choreography {
    let offset = StyleDelta { left, top, ..StyleDelta::default() };
    let home = StyleDelta { left: left.map(|_| 0.0), top: top.map(|_| 0.0), ..StyleDelta::default() };
    Choreography {
        curr_before: style().z_index(1),
        next_before: offset.z_index(2),
        anim_in: home,
        anim_out: offset,
        curr_after: style().z_index(1),
    }
}

fn blind_x(s: &Step) -> Choreography {
    blind(Some(s.container.width), None)
}

fn blind_y(s: &Step) -> Choreography {
    blind(None, Some(s.container.height))
}

fn blind_z(s: &Step) -> Choreography {
    blind(Some(s.container.width), Some(s.container.height))
}

// growX/Y: grow from the centre line

fn grow_x(s: &Step) -> Choreography {
    Choreography {
        curr_before: style().z_index(1),
        next_before: style().left(s.incoming.width / 2.0).width(0.0).z_index(2),
        anim_in: style().left(0.0).width(s.incoming.width),
        anim_out: style().left(0.0),
        ..Choreography::default()
    }
}

fn grow_y(s: &Step) -> Choreography {
    Choreography {
        curr_before: style().z_index(1),
        next_before: style().top(s.incoming.height / 2.0).height(0.0).z_index(2),
        anim_in: style().top(0.0).height(s.incoming.height),
        anim_out: style().top(0.0),
        ..Choreography::default()
    }
}

// curtainX/Y: squeeze both edges

fn curtain_x(s: &Step) -> Choreography {
    Choreography {
        curr_before: style().z_index(2),
        next_before: style().left(s.incoming.width / 2.0).width(0.0).z_index(1),
        anim_in: style().left(0.0).width(s.incoming.width),
        anim_out: style().left(s.outgoing.width / 2.0).width(0.0),
        curr_after: gone().z_index(1),
    }
}

fn curtain_y(s: &Step) -> Choreography {
    Choreography {
        curr_before: style().z_index(2),
        next_before: style().top(s.incoming.height / 2.0).height(0.0).z_index(1),
        anim_in: style().top(0.0).height(s.incoming.height),
        anim_out: style().top(s.outgoing.height / 2.0).height(0.0),
        curr_after: gone().z_index(1),
    }
}

// cover: the next slide slides over the current one

fn cover(s: &Step) -> Choreography {
    let (w, h) = (s.container.width, s.container.height);
    let from = match s.direction {
        CoverDirection::Right => style().left(-w),
        CoverDirection::Up => style().top(h),
        CoverDirection::Down => style().top(-h),
        CoverDirection::Left => style().left(w),
    };
    Choreography {
        curr_before: style().z_index(1),
        next_before: from.z_index(2),
        anim_in: style().left(0.0).top(0.0),
        anim_out: style().left(0.0).top(0.0),
        curr_after: gone().z_index(2),
    }
}

// uncover: the current slide moves off the next one

fn uncover(s: &Step) -> Choreography {
    let (w, h) = (s.container.width, s.container.height);
    let to = match s.direction {
        CoverDirection::Right => style().left(w),
        CoverDirection::Up => style().top(-h),
        CoverDirection::Down => style().top(h),
        CoverDirection::Left => style().left(-w),
    };
    Choreography {
        curr_before: style().z_index(2),
        next_before: style().left(0.0).top(0.0).z_index(1),
        anim_in: style().left(0.0).top(0.0),
        anim_out: to,
        curr_after: gone().z_index(1),
    }
}

// toss: throw the current slide away while fading it

fn toss(s: &Step) -> Choreography {
    let (w, h) = (s.container.width, s.container.height);
    Choreography {
        curr_before: style().z_index(2),
        next_before: style().left(0.0).top(0.0).z_index(1).opacity(1.0),
        anim_in: style().left(0.0),
        anim_out: style().left(w * 2.0).top(-h / 2.0).opacity(0.0),
        curr_after: gone().z_index(2),
    }
}

// wipe: reveal the next slide through a growing clip

fn wipe(s: &Step) -> Choreography {
    let (w, h) = (s.container.width, s.container.height);
    let start = match s.clip {
        ClipOrigin::L2r => ClipRect::new(0.0, 0.0, h, 0.0),
        ClipOrigin::R2l => ClipRect::new(0.0, w, h, w),
        ClipOrigin::T2b => ClipRect::new(0.0, w, 0.0, 0.0),
        ClipOrigin::B2t => ClipRect::new(h, w, h, 0.0),
        ClipOrigin::Zoom => ClipRect::new((h / 2.0).floor(), (w / 2.0).floor(), (h / 2.0).floor(), (w / 2.0).floor()),
        ClipOrigin::Corner => ClipRect::default(),
    };
    Choreography {
        curr_before: style().z_index(2),
        next_before: style().z_index(3).clip(start),
        anim_in: style().clip(ClipRect::full(s.container)),
        ..Choreography::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slide::Size;

    fn step() -> Step {
        Step {
            container: Size::new(400.0, 300.0),
            outgoing: Size::new(400.0, 300.0),
            incoming: Size::new(400.0, 300.0),
            forward: true,
            direction: CoverDirection::Left,
            clip: ClipOrigin::Corner,
        }
    }

    #[test]
    fn test_every_preset_moves_something() {
        let registry = TransitionRegistry::default();
        for name in registry.names() {
            let c = registry.get(name).unwrap().choreograph(&step());
            assert!(
                !(c.anim_in.is_empty() && c.anim_out.is_empty()),
                "{name} has nothing to animate"
            );
        }
    }

    #[test]
    fn test_blind_returns_home() {
        let c = blind_x(&step());
        assert_eq!(c.next_before.left, Some(400.0));
        assert_eq!(c.anim_in.left, Some(0.0));
        assert!(c.anim_in.top.is_none());
    }

    #[test]
    fn test_zoom_starts_from_centre() {
        let c = zoom(&step());
        assert_eq!(c.next_before.left, Some(200.0));
        assert_eq!(c.next_before.top, Some(150.0));
        assert_eq!(c.anim_in.width, Some(400.0));
    }
}
