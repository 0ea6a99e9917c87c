use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::gamepad::{default_gamepad_source, GamepadSource};
use super::input::ActionStates;
use super::metrics::{LoopMetricsSnapshot, MetricsAccumulator};
use super::rendering::Renderer;
use super::{InputAction, InputSnapshot, Scene, SceneLoadError, TextureStore, Viewport};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub game_width: u32,
    pub game_height: u32,
    pub max_frame_delta: Duration,
    pub max_render_fps: Option<u32>,
    pub metrics_log_interval: Duration,
    /// Initial state of the F3 debug toggle.
    pub debug_visible: bool,
    /// Draw the HUD text while debug is visible.
    pub hud_enabled: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Pyso Realm".to_string(),
            window_width: 1920,
            window_height: 1080,
            game_width: 1920,
            game_height: 1080,
            max_frame_delta: Duration::from_millis(250),
            max_render_fps: Some(144),
            metrics_log_interval: Duration::from_secs(1),
            debug_visible: true,
            hud_enabled: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("failed to load scene: {0}")]
    SceneLoad(#[from] SceneLoadError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig, mut scene: Box<dyn Scene>) -> Result<(), AppError> {
    let mut gamepad: Box<dyn GamepadSource> = default_gamepad_source();
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .with_resizable(true)
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let initial_size = window.inner_size();
    info!(
        width = initial_size.width,
        height = initial_size.height,
        "window_created"
    );

    let game_viewport = Viewport {
        width: config.game_width.max(1),
        height: config.game_height.max(1),
    };
    let mut renderer =
        Renderer::new(Arc::clone(&window), game_viewport).map_err(AppError::CreateRenderer)?;
    let mut textures = TextureStore::new();
    scene.load(&mut textures)?;
    info!(textures = textures.loaded_count(), "scene_loaded");

    event_loop.set_control_flow(ControlFlow::Poll);

    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);
    let hud_enabled = config.hud_enabled;
    let mut input_collector = InputCollector {
        debug_visible: config.debug_visible,
        ..InputCollector::default()
    };

    info!(
        game_width = game_viewport.width,
        game_height = game_viewport.height,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        render_fps_cap = %format_render_cap(effective_render_cap),
        "loop_config"
    );

    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);
    let mut scene_unloaded = false;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    input_collector.mark_quit_requested();
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                    if input_collector.quit_requested {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    if input_collector.apply_debug_toggle() {
                        info!(
                            debug_visible = input_collector.debug_visible,
                            "debug_toggled"
                        );
                    }

                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;
                    let dt_seconds = clamp_frame_delta(raw_frame_dt, max_frame_delta).as_secs_f32();

                    let input_snapshot = input_collector.snapshot(gamepad.poll());
                    scene.update(dt_seconds, &input_snapshot);

                    {
                        let mut canvas = renderer.target_mut().canvas(&textures);
                        scene.render(&mut canvas);
                    }

                    let hud_lines = (hud_enabled && input_snapshot.debug_visible()).then(|| {
                        hud_lines(metrics_accumulator.latest(), scene.debug_lines())
                    });
                    if let Err(error) = renderer.present(hud_lines.as_deref()) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }

                    scene.end_frame(dt_seconds);

                    // Single authoritative FPS cap sleep point.
                    let elapsed_since_last_present =
                        Instant::now().saturating_duration_since(last_present_instant);
                    let cap_sleep =
                        compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }
                    last_present_instant = Instant::now();

                    metrics_accumulator.record_frame(raw_frame_dt);
                    if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                        info!(
                            fps = snapshot.fps,
                            frame_time_ms = snapshot.frame_time_ms,
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                if !scene_unloaded {
                    scene.unload(&mut textures);
                    scene_unloaded = true;
                }
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

fn hud_lines(metrics: LoopMetricsSnapshot, scene_lines: Vec<String>) -> Vec<String> {
    let mut lines = Vec::with_capacity(scene_lines.len() + 1);
    lines.push(format!("{:.0} FPS", metrics.fps));
    lines.extend(scene_lines);
    lines
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    debug_visible: bool,
    debug_toggle_is_down: bool,
    debug_toggle_pressed_edge: bool,
    action_states: ActionStates,
}

impl InputCollector {
    fn mark_quit_requested(&mut self) {
        self.quit_requested = true;
    }

    fn handle_keyboard_input(&mut self, key_event: &winit::event::KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.update_action_state_from_physical_key(key_event.physical_key, is_pressed);
        self.handle_debug_toggle_key_state(is_debug_toggle_key(key_event), key_event.state);
    }

    fn update_action_state_from_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        match key {
            PhysicalKey::Code(KeyCode::KeyW) | PhysicalKey::Code(KeyCode::ArrowUp) => {
                self.action_states.set(InputAction::Up, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyS) | PhysicalKey::Code(KeyCode::ArrowDown) => {
                self.action_states.set(InputAction::Down, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyA) | PhysicalKey::Code(KeyCode::ArrowLeft) => {
                self.action_states.set(InputAction::Left, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyD) | PhysicalKey::Code(KeyCode::ArrowRight) => {
                self.action_states.set(InputAction::Right, is_pressed);
            }
            PhysicalKey::Code(KeyCode::F3) => {
                self.action_states.set(InputAction::ToggleDebug, is_pressed);
            }
            PhysicalKey::Code(KeyCode::Escape) => {
                self.action_states.set(InputAction::Quit, is_pressed);
                if is_pressed {
                    self.mark_quit_requested();
                }
            }
            _ => {}
        }
    }

    fn handle_debug_toggle_key_state(&mut self, is_toggle_key: bool, state: ElementState) {
        if !is_toggle_key {
            return;
        }

        match state {
            ElementState::Pressed => {
                if !self.debug_toggle_is_down {
                    self.debug_toggle_pressed_edge = true;
                }
                self.debug_toggle_is_down = true;
            }
            ElementState::Released => self.debug_toggle_is_down = false,
        }
    }

    /// Consumes a pending F3 press; returns true when visibility flipped.
    fn apply_debug_toggle(&mut self) -> bool {
        let was_pressed = self.debug_toggle_pressed_edge;
        self.debug_toggle_pressed_edge = false;
        if was_pressed {
            self.debug_visible = !self.debug_visible;
        }
        was_pressed
    }

    fn snapshot(&self, gamepad: super::GamepadSnapshot) -> InputSnapshot {
        InputSnapshot::new(self.debug_visible, self.action_states, gamepad)
    }
}

fn is_debug_toggle_key(key_event: &winit::event::KeyEvent) -> bool {
    matches!(key_event.physical_key, PhysicalKey::Code(KeyCode::F3))
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::GamepadSnapshot;

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let max_frame_delta = Duration::from_millis(250);
        let raw_frame_dt = Duration::from_millis(600);

        assert_eq!(
            clamp_frame_delta(raw_frame_dt, max_frame_delta),
            max_frame_delta
        );
    }

    #[test]
    fn clamp_frame_delta_passes_short_frame_through() {
        let frame = Duration::from_millis(7);
        assert_eq!(clamp_frame_delta(frame, Duration::from_millis(250)), frame);
    }

    #[test]
    fn zero_durations_fall_back() {
        let fallback = Duration::from_secs(1);
        assert_eq!(normalize_non_zero_duration(Duration::ZERO, fallback), fallback);
        assert_eq!(
            normalize_non_zero_duration(Duration::from_millis(10), fallback),
            Duration::from_millis(10)
        );
    }

    #[test]
    fn wasd_and_arrow_keys_map_to_actions() {
        let mut input = InputCollector::default();

        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::KeyW), true);
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::ArrowLeft), true);

        let snapshot = input.snapshot(GamepadSnapshot::disconnected());
        assert!(snapshot.is_down(InputAction::Up));
        assert!(snapshot.is_down(InputAction::Left));
        assert!(!snapshot.is_down(InputAction::Down));
    }

    #[test]
    fn key_release_clears_action_state() {
        let mut input = InputCollector::default();
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::KeyD), true);
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::KeyD), false);

        let snapshot = input.snapshot(GamepadSnapshot::disconnected());
        assert!(!snapshot.is_down(InputAction::Right));
    }

    #[test]
    fn escape_requests_quit() {
        let mut input = InputCollector::default();
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::Escape), true);

        assert!(input.quit_requested);
        assert!(input
            .snapshot(GamepadSnapshot::disconnected())
            .is_down(InputAction::Quit));
    }

    #[test]
    fn f3_toggle_is_edge_triggered() {
        let mut input = InputCollector::default();
        input.debug_visible = true;

        input.handle_debug_toggle_key_state(true, ElementState::Pressed);
        assert!(input.apply_debug_toggle());
        assert!(!input.debug_visible);

        input.handle_debug_toggle_key_state(true, ElementState::Pressed);
        assert!(!input.apply_debug_toggle());
        assert!(!input.debug_visible);

        input.handle_debug_toggle_key_state(true, ElementState::Released);
        input.handle_debug_toggle_key_state(true, ElementState::Pressed);
        assert!(input.apply_debug_toggle());
        assert!(input.debug_visible);
    }

    #[test]
    fn snapshot_carries_gamepad_and_debug_flag() {
        let mut input = InputCollector::default();
        input.debug_visible = true;
        let snapshot = input.snapshot(GamepadSnapshot::with_left_stick(0.5, -0.5));

        assert!(snapshot.debug_visible());
        assert!(snapshot.gamepad().connected);
        assert!(!input
            .snapshot(GamepadSnapshot::disconnected())
            .gamepad()
            .connected);
    }

    #[test]
    fn hud_lines_lead_with_fps() {
        let lines = hud_lines(
            LoopMetricsSnapshot {
                fps: 143.6,
                frame_time_ms: 7.0,
            },
            vec!["x:0, y:0".to_string()],
        );
        assert_eq!(lines, vec!["144 FPS".to_string(), "x:0, y:0".to_string()]);
    }

    #[test]
    fn target_frame_duration_none_when_cap_off() {
        assert_eq!(target_frame_duration(None), None);
    }

    #[test]
    fn target_frame_duration_for_144hz_is_expected() {
        let duration = target_frame_duration(Some(144)).expect("duration");
        assert!((duration.as_secs_f64() - (1.0 / 144.0)).abs() < 0.000_001);
    }

    #[test]
    fn compute_cap_sleep_zero_when_over_budget() {
        let sleep = compute_cap_sleep(Duration::from_millis(20), target_frame_duration(Some(60)));
        assert_eq!(sleep, Duration::ZERO);
    }

    #[test]
    fn compute_cap_sleep_positive_when_under_budget() {
        let sleep = compute_cap_sleep(Duration::from_millis(5), target_frame_duration(Some(60)));
        assert!(sleep > Duration::ZERO);
    }

    #[test]
    fn normalize_render_fps_cap_disables_zero() {
        assert_eq!(normalize_render_fps_cap(Some(0)), None);
        assert_eq!(normalize_render_fps_cap(Some(144)), Some(144));
        assert_eq!(format_render_cap(None), "off");
    }
}
