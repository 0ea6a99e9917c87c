//! Per-frame sequencing of the realm: input, movement, population,
//! collision, camera, draw pass and animation bookkeeping.

use isorealm_engine::{Camera2D, Canvas, Color, InputSnapshot, TextureHandle, Vec2, Viewport};
use tracing::debug;

use super::actor::{integrate, Actor};
use super::catalog::{TextureTable, HIT_BOX_SMALL};
use super::collision::{self, TileRect};
use super::coords::{
    tile_to_screen, tile_to_screen_i32, TILE_FULL_HEIGHT, TILE_HEIGHT, TILE_WIDTH,
};
use super::input::{resolve_direction, resolve_intent, MovementIntent, StickReading};
use super::world::{
    back_walls, front_walls, populate_frame, FramePopulation, WallPlacement, WorldSize,
};

pub(crate) const CLEAR_COLOR: Color = Color::rgb(30, 30, 30);
const ACTOR_BOX_COLOR: Color = Color::GREEN;
const SCENERY_BOX_COLOR: Color = Color::MAGENTA;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SessionSettings {
    pub(crate) world: WorldSize,
    pub(crate) frame_seed: u64,
    pub(crate) speed: f32,
    pub(crate) collision_boxes: bool,
    pub(crate) render_size: Viewport,
}

/// Everything the frame loop mutates between ticks.
#[derive(Debug)]
pub(crate) struct SessionState {
    pub(crate) world: WorldSize,
    pub(crate) frame_seed: u64,
    pub(crate) speed: f32,
    pub(crate) actor: Actor,
    pub(crate) population: FramePopulation,
    pub(crate) camera: Camera2D,
    pub(crate) intent: MovementIntent,
    pub(crate) stick: StickReading,
    pub(crate) was_collision: bool,
    pub(crate) show_collision_boxes: bool,
    pub(crate) debug_visible: bool,
    render_size: Viewport,
    back_walls: Vec<WallPlacement>,
    front_walls: Vec<WallPlacement>,
}

/// One entry of the actor layer, painted back to front by screen y.
#[derive(Debug, Clone, Copy)]
struct LayerSprite {
    handle: TextureHandle,
    anchor: Vec2,
}

impl SessionState {
    pub(crate) fn new(settings: SessionSettings) -> Self {
        let actor = Actor::spawn(settings.world.center());
        let mut state = Self {
            world: settings.world,
            frame_seed: settings.frame_seed,
            speed: settings.speed,
            actor,
            population: FramePopulation::default(),
            camera: Camera2D::default(),
            intent: MovementIntent::default(),
            stick: StickReading::default(),
            was_collision: false,
            show_collision_boxes: settings.collision_boxes,
            debug_visible: true,
            render_size: settings.render_size,
            back_walls: back_walls(settings.world),
            front_walls: front_walls(settings.world),
        };
        state.follow_actor();
        state
    }

    /// Input, movement, world population, collision and camera follow.
    pub(crate) fn tick(&mut self, dt_seconds: f32, input: &InputSnapshot) {
        self.debug_visible = input.debug_visible();

        let resolved = resolve_intent(input);
        self.intent = resolved.intent;
        self.stick = resolved.stick;
        // the moving flag starts every frame cleared; only a matched intent sets it
        let (direction, is_moving) =
            resolve_direction(resolved.intent, self.actor.direction, false);
        self.actor.direction = direction;
        self.actor.is_moving = is_moving;
        self.actor.position = integrate(
            self.actor.position,
            resolved.intent,
            self.speed,
            dt_seconds,
            self.world,
        );

        self.population = populate_frame(self.world, self.frame_seed);

        let outcome = collision::resolve(
            self.actor.position,
            HIT_BOX_SMALL,
            &self.population.collision_boxes,
        );
        self.actor.position = outcome.position;
        self.was_collision = outcome.collided;
        if outcome.collided {
            self.actor.is_moving = false;
            debug!(
                u = outcome.position.x,
                v = outcome.position.y,
                "actor_pushed_out"
            );
        }

        self.follow_actor();
    }

    fn follow_actor(&mut self) {
        let half_width = self.render_size.width as f32 * 0.5;
        let half_height = self.render_size.height as f32 * 0.5;
        self.camera = Camera2D {
            target: tile_to_screen(self.actor.position.x, self.actor.position.y),
            offset: Vec2::new(
                half_width - TILE_WIDTH * 0.5,
                half_height - TILE_HEIGHT * 0.5 - (TILE_FULL_HEIGHT + TILE_HEIGHT) * 0.5,
            ),
            zoom: 1.0,
        };
    }

    pub(crate) fn actor_hit_box(&self) -> TileRect {
        HIT_BOX_SMALL.translated(self.actor.position.x, self.actor.position.y)
    }

    /// Paints the frame back to front. Picking the character pose may
    /// rewind the idle timer, so this takes `&mut self`.
    pub(crate) fn draw(&mut self, canvas: &mut dyn Canvas, textures: &TextureTable) {
        canvas.set_camera(self.camera);
        canvas.clear(CLEAR_COLOR);

        for tile in &self.population.floor {
            let (x, y) = tile_to_screen_i32(tile.u as f32, tile.v as f32);
            canvas.draw_texture(textures.floor(tile.tile), x, y);
        }
        for tile in &self.population.coverings {
            let (x, y) = tile_to_screen_i32(tile.u as f32, tile.v as f32);
            canvas.draw_texture(textures.covering(tile.tile), x, y);
        }
        draw_walls(canvas, textures, &self.back_walls);

        let pose = self.actor.animation.select_pose(self.actor.is_moving);
        let mut layer = Vec::with_capacity(self.population.objects.len() + 1);
        layer.push(LayerSprite {
            handle: textures.character(self.actor.direction, pose),
            anchor: tile_to_screen(self.actor.position.x, self.actor.position.y),
        });
        layer.extend(self.population.objects.iter().map(|object| LayerSprite {
            handle: textures.scenery(object.template),
            anchor: tile_to_screen(object.position.x, object.position.y),
        }));
        layer.sort_by(|a, b| a.anchor.y.total_cmp(&b.anchor.y));
        for sprite in &layer {
            canvas.draw_quad(sprite.handle, sprite.anchor.x, sprite.anchor.y);
        }

        draw_walls(canvas, textures, &self.front_walls);

        if self.show_collision_boxes && self.debug_visible {
            for hit_box in &self.population.collision_boxes {
                draw_wireframe(canvas, hit_box, SCENERY_BOX_COLOR);
            }
            draw_wireframe(canvas, &self.actor_hit_box(), ACTOR_BOX_COLOR);
        }
    }

    pub(crate) fn end_frame(&mut self, dt_seconds: f32) {
        self.actor
            .animation
            .end_frame(dt_seconds, self.actor.is_moving);
    }

    pub(crate) fn debug_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("x:{}, y:{}", self.intent.dx, self.intent.dy),
            format!("{:.1}", self.stick.angle_degrees),
            format!("{:.1}", self.stick.magnitude),
        ];
        if self.was_collision {
            lines.push("COLLISION".to_string());
        }
        lines
    }
}

fn draw_walls(canvas: &mut dyn Canvas, textures: &TextureTable, walls: &[WallPlacement]) {
    for wall in walls {
        let (x, y) = tile_to_screen_i32(wall.u, wall.v);
        canvas.draw_texture(textures.wall(wall.tile), x, y);
    }
}

fn draw_wireframe(canvas: &mut dyn Canvas, rect: &TileRect, color: Color) {
    let corners = rect.corners().map(|corner| tile_to_screen(corner.x, corner.y));
    for (i, from) in corners.iter().enumerate() {
        let to = corners[(i + 1) % corners.len()];
        canvas.draw_line(*from, to, color);
    }
}
