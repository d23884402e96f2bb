//! Scene - the macroquad side of a level
//!
//! Everything that needs a window lives here: drawing dots and connection
//! lines, turning mouse clicks into dot ids, and orbit/zoom camera input.
//! The math (orbit conversion, picking rays, hit tests) is kept in plain
//! functions over `crate::math` types so it can be tested headless.

use macroquad::prelude::{
    draw_line_3d, draw_sphere, draw_sphere_wires, set_camera, set_default_camera, vec3, Camera3D,
    Color, BLUE, GREEN, ORANGE, PINK, PURPLE, RED, WHITE, YELLOW,
};
use crate::config::GameConfig;
use crate::game::{CameraTransform, LevelSession, PlayState, SegmentKind};
use crate::level::{DotColor, LevelDefinition};
use crate::math::{ray_sphere_intersect, Ray, Vec3};
use crate::ui::{MouseState, Rect};

/// Radians of orbit per pixel dragged
const ORBIT_SPEED: f32 = 0.005;
/// Keep the camera off the poles so the up vector stays usable
const MAX_ELEVATION: f32 = 1.4;
const MIN_DISTANCE: f32 = 0.2;
const MAX_DISTANCE: f32 = 50.0;
/// Picking sphere relative to the drawn dot
const PICK_RADIUS_SCALE: f32 = 1.5;
/// Highlight wire sphere relative to the drawn dot
const HIGHLIGHT_SCALE: f32 = 1.6;

/// Spherical view of a camera transform, used while the player drags
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Rotation around the Y axis, 0 looks down -Z
    pub azimuth: f32,
    /// Angle above the XZ plane
    pub elevation: f32,
}

impl OrbitCamera {
    pub fn from_transform(transform: CameraTransform) -> Self {
        let offset = transform.position - transform.target;
        let distance = transform.position.distance(transform.target).max(MIN_DISTANCE);
        Self {
            target: transform.target,
            distance,
            azimuth: offset.x.atan2(offset.z),
            elevation: (offset.y / distance).clamp(-1.0, 1.0).asin(),
        }
    }

    pub fn to_transform(&self) -> CameraTransform {
        let (sin_e, cos_e) = self.elevation.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        let offset = Vec3::new(cos_e * sin_a, sin_e, cos_e * cos_a) * self.distance;
        CameraTransform::new(self.target + offset, self.target)
    }

    /// Orbit by a mouse delta in pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.azimuth -= dx * ORBIT_SPEED;
        self.elevation = (self.elevation + dy * ORBIT_SPEED).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Zoom by wheel notches, positive moves closer
    pub fn zoom(&mut self, scroll: f32) {
        let scroll = scroll.clamp(-1.0, 1.0);
        self.distance = (self.distance * (1.0 - scroll * 0.1)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

/// Ray from the camera through a screen pixel.
///
/// Matches macroquad's `Camera3D` projection: perspective with vertical
/// field of view `fov_y` (radians) and aspect taken from the screen size.
pub fn screen_ray(
    camera: &CameraTransform,
    fov_y: f32,
    mouse: (f32, f32),
    screen: (f32, f32),
) -> Ray {
    let (width, height) = (screen.0.max(1.0), screen.1.max(1.0));
    let forward = camera.forward();
    let mut right = forward.cross(Vec3::UP).normalize();
    if right.len() < 0.5 {
        // Looking straight along Y
        right = Vec3::new(1.0, 0.0, 0.0);
    }
    let up = right.cross(forward);

    let half_h = (fov_y * 0.5).tan();
    let half_w = half_h * width / height;
    let ndc_x = 2.0 * mouse.0 / width - 1.0;
    let ndc_y = 1.0 - 2.0 * mouse.1 / height;

    let direction = forward + right * (ndc_x * half_w) + up * (ndc_y * half_h);
    Ray::new(camera.position, direction)
}

/// Nearest dot hit by `ray`, if any
pub fn pick_dot<'a>(level: &'a LevelDefinition, ray: &Ray, radius: f32) -> Option<&'a str> {
    level.dots
        .iter()
        .filter_map(|dot| ray_sphere_intersect(ray, dot.position, radius).map(|t| (t, dot)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, dot)| dot.id.as_str())
}

pub fn dot_color(color: DotColor) -> Color {
    match color {
        DotColor::Blue => BLUE,
        DotColor::Red => RED,
        DotColor::Green => GREEN,
        DotColor::Purple => PURPLE,
        DotColor::Yellow => YELLOW,
        DotColor::Orange => ORANGE,
        DotColor::White => WHITE,
        DotColor::Cyan => Color::new(0.0, 1.0, 1.0, 1.0),
        DotColor::Pink => PINK,
    }
}

fn to_mq(v: Vec3) -> macroquad::math::Vec3 {
    vec3(v.x, v.y, v.z)
}

/// Draw the level's dots, its connections and the armed-dot highlight
pub fn draw_level(session: &LevelSession, camera: &CameraTransform, config: &GameConfig) {
    set_camera(&Camera3D {
        position: to_mq(camera.position),
        target: to_mq(camera.target),
        up: vec3(0.0, 1.0, 0.0),
        fovy: config.fov_degrees.to_radians(),
        ..Default::default()
    });

    for dot in &session.level().dots {
        draw_sphere(to_mq(dot.position), config.dot_radius, None, dot_color(dot.color));
    }

    for segment in session.segments() {
        match segment.kind {
            SegmentKind::Connection(color) => {
                draw_line_3d(to_mq(segment.from), to_mq(segment.to), dot_color(color));
            }
            SegmentKind::Highlight => {
                draw_sphere_wires(to_mq(segment.from), config.dot_radius * HIGHLIGHT_SCALE, None, YELLOW);
            }
        }
    }

    set_default_camera();
}

/// Mouse handling for the 3D viewport
#[derive(Debug, Default)]
pub struct Viewport {
    /// Mouse position seen by the previous `track` call
    last_mouse: Option<(f32, f32)>,
    /// Movement since the previous frame
    drag: (f32, f32),
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this frame's mouse position and return the movement since the
    /// last call. Must run every frame, on every screen, so the first drag
    /// after a menu or modal does not see the distance moved meanwhile.
    pub fn track(&mut self, mouse: &MouseState) -> (f32, f32) {
        self.drag = match self.last_mouse {
            Some((x, y)) => (mouse.x - x, mouse.y - y),
            None => (0.0, 0.0),
        };
        self.last_mouse = Some((mouse.x, mouse.y));
        self.drag
    }

    /// Right-drag orbits, wheel zooms, left click picks a dot.
    ///
    /// Input outside `area` is ignored so HUD buttons don't hit dots
    /// behind them. Drag deltas come from the last `track` call. Returns
    /// the id of the clicked dot.
    pub fn handle_input(
        &mut self,
        play: &mut PlayState,
        config: &GameConfig,
        area: Rect,
        screen: Rect,
        mouse: &MouseState,
    ) -> Option<String> {
        let (dx, dy) = self.drag;

        if !mouse.inside(&area) {
            return None;
        }

        if mouse.right_down || mouse.scroll.abs() > 0.1 {
            let mut orbit = OrbitCamera::from_transform(play.camera());
            if mouse.right_down {
                orbit.rotate(dx, dy);
            }
            if mouse.scroll.abs() > 0.1 {
                orbit.zoom(mouse.scroll);
            }
            play.framing.set_current(orbit.to_transform());
        }

        if !mouse.left_pressed {
            return None;
        }
        let camera = play.camera();
        let ray = screen_ray(
            &camera,
            config.fov_degrees.to_radians(),
            (mouse.x, mouse.y),
            (screen.w, screen.h),
        );
        pick_dot(play.session.level(), &ray, config.dot_radius * PICK_RADIUS_SCALE)
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::DotDescriptor;

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-4
    }

    #[test]
    fn test_orbit_round_trips_transform() {
        let transform = CameraTransform::looking_at_origin(Vec3::new(0.59, 0.44, 0.79));
        let back = OrbitCamera::from_transform(transform).to_transform();
        assert!(close(back.position, transform.position));
        assert_eq!(back.target, Vec3::ZERO);
    }

    #[test]
    fn test_orbit_rotate_keeps_distance_and_clamps() {
        let mut orbit = OrbitCamera::from_transform(CameraTransform::default());
        orbit.rotate(100.0, 0.0);
        let moved = orbit.to_transform();
        assert!((moved.position.distance(moved.target) - 5.0).abs() < 1e-4);

        orbit.rotate(0.0, 10_000.0);
        assert_eq!(orbit.elevation, MAX_ELEVATION);
    }

    #[test]
    fn test_orbit_zoom_clamps() {
        let mut orbit = OrbitCamera::from_transform(CameraTransform::default());
        orbit.zoom(1.0);
        assert!((orbit.distance - 4.5).abs() < 1e-4);

        for _ in 0..200 {
            orbit.zoom(1.0);
        }
        assert_eq!(orbit.distance, MIN_DISTANCE);
    }

    #[test]
    fn test_center_ray_follows_forward() {
        let camera = CameraTransform::default();
        let ray = screen_ray(&camera, 75f32.to_radians(), (400.0, 300.0), (800.0, 600.0));
        assert!(close(ray.origin, camera.position));
        assert!(close(ray.direction, Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_ray_edges_match_fov() {
        let camera = CameraTransform::default();
        let fov = 90f32.to_radians();
        // Top edge of a square screen at 90 degrees is 45 degrees up
        let ray = screen_ray(&camera, fov, (50.0, 0.0), (100.0, 100.0));
        let expected = Vec3::new(0.0, 1.0, -1.0).normalize();
        assert!(close(ray.direction, expected));

        // Right edge goes to +X
        let ray = screen_ray(&camera, fov, (100.0, 50.0), (100.0, 100.0));
        assert!(ray.direction.x > 0.0);
    }

    fn right_drag_at(x: f32, y: f32) -> MouseState {
        MouseState { x, y, right_down: true, ..Default::default() }
    }

    #[test]
    fn test_drag_delta_spans_one_frame() {
        let mut viewport = Viewport::new();
        assert_eq!(viewport.track(&right_drag_at(100.0, 100.0)), (0.0, 0.0));
        assert_eq!(viewport.track(&right_drag_at(110.0, 95.0)), (10.0, -5.0));
        assert_eq!(viewport.track(&right_drag_at(110.0, 95.0)), (0.0, 0.0));
    }

    #[test]
    fn test_camera_does_not_jump_when_returning_to_level() {
        let screen = Rect::new(0.0, 0.0, 800.0, 600.0);
        let config = GameConfig::default();
        let mut play = PlayState::new(0.5, CameraTransform::default());
        let mut viewport = Viewport::new();

        // Last in-level frame, then the mouse travels while a menu is shown
        viewport.track(&MouseState { x: 10.0, y: 10.0, ..Default::default() });
        viewport.handle_input(&mut play, &config, screen, screen, &MouseState { x: 10.0, y: 10.0, ..Default::default() });
        for step in 1..=20 {
            viewport.track(&MouseState { x: 10.0 + step as f32 * 30.0, y: 10.0 + step as f32 * 20.0, ..Default::default() });
        }

        // Back in the level with the right button already held
        let before = play.camera();
        let held = right_drag_at(610.0, 410.0);
        viewport.track(&held);
        viewport.handle_input(&mut play, &config, screen, screen, &held);
        assert!(close(play.camera().position, before.position));

        // A real drag still orbits
        let moved = right_drag_at(640.0, 410.0);
        viewport.track(&moved);
        viewport.handle_input(&mut play, &config, screen, screen, &moved);
        assert!(!close(play.camera().position, before.position));
    }

    #[test]
    fn test_pick_nearest_dot() {
        let level = LevelDefinition::new("1", "Line", vec![
            DotDescriptor::new("far", Vec3::new(0.0, 0.0, -1.0), DotColor::Red),
            DotDescriptor::new("near", Vec3::new(0.0, 0.0, 1.0), DotColor::Red),
            DotDescriptor::new("off", Vec3::new(1.0, 0.0, 0.0), DotColor::Blue),
        ]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        assert_eq!(pick_dot(&level, &ray, 0.1), Some("near"));

        let miss = Ray::new(Vec3::new(0.0, 2.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(pick_dot(&level, &miss, 0.1), None);
    }
}
