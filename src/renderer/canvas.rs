//! Canvas2D backend

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::*;
use crate::sim::{EntitySprite, RenderView, VehicleSprite};

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Device pixels per CSS pixel
    dpr: f64,
    camera_shake: bool,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, dpr: f64) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            canvas,
            ctx,
            dpr,
            camera_shake: true,
        })
    }

    pub fn set_camera_shake(&mut self, enabled: bool) {
        self.camera_shake = enabled;
    }

    /// Match the backing store to the CSS size; returns the size in CSS px
    pub fn resize(&mut self, dpr: f64) -> (f32, f32) {
        self.dpr = dpr;
        let w = self.canvas.client_width().max(1);
        let h = self.canvas.client_height().max(1);
        self.canvas.set_width((w as f64 * dpr) as u32);
        self.canvas.set_height((h as f64 * dpr) as u32);
        (w as f32, h as f32)
    }

    pub fn render(&self, view: &RenderView, time_ms: f64) {
        let ctx = &self.ctx;
        let w = view.viewport.width as f64;
        let h = view.viewport.height as f64;

        ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0).ok();
        ctx.set_fill_style_str(GRASS_COLOR);
        ctx.fill_rect(0.0, 0.0, w, h);

        ctx.save();
        if self.camera_shake {
            let shake = shake_offset(view.camera_shake, time_ms);
            ctx.translate(shake.x as f64, shake.y as f64).ok();
        }

        self.draw_road(view);
        for sprite in &view.entities {
            self.draw_entity(sprite);
        }
        self.draw_vehicle(&view.vehicle);

        ctx.restore();
    }

    fn draw_road(&self, view: &RenderView) {
        let ctx = &self.ctx;
        let road = &view.road;
        let h = view.viewport.height as f64;

        ctx.set_fill_style_str(ROAD_COLOR);
        ctx.fill_rect(road.left as f64, 0.0, road.width as f64, h);

        ctx.set_fill_style_str(EDGE_COLOR);
        ctx.fill_rect(road.left as f64 - 6.0, 0.0, 6.0, h);
        ctx.fill_rect(road.right() as f64, 0.0, 6.0, h);

        ctx.set_fill_style_str(MARKING_COLOR);
        let lane_w = road.lane_width();
        for lane in 1..road.lanes {
            let x = (road.left + lane as f32 * lane_w) as f64 - 2.0;
            for y in dash_positions(view.marking_offset, view.viewport.height) {
                ctx.fill_rect(x, y as f64, 4.0, DASH_LENGTH as f64);
            }
        }
    }

    fn draw_entity(&self, sprite: &EntitySprite) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.translate(sprite.pos.x as f64, (sprite.pos.y - sprite.lift) as f64)
            .ok();
        ctx.rotate(sprite.rotation as f64).ok();
        ctx.set_fill_style_str(entity_color(sprite.kind));

        let (w, h) = (sprite.size.x as f64, sprite.size.y as f64);
        match sprite.kind {
            EntityKind::Bonus(_) => {
                ctx.begin_path();
                ctx.arc(0.0, 0.0, w.min(h) / 2.0, 0.0, TAU).ok();
                ctx.fill();
                ctx.set_stroke_style_str(MARKING_COLOR);
                ctx.set_line_width(2.0);
                ctx.stroke();
            }
            EntityKind::Obstacle(
                ObstacleKind::Barrel | ObstacleKind::RockSmall | ObstacleKind::RockBig,
            ) => {
                ctx.begin_path();
                ctx.ellipse(0.0, 0.0, w / 2.0, h / 2.0, 0.0, 0.0, TAU).ok();
                ctx.fill();
            }
            EntityKind::Obstacle(_) => {
                ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);
            }
        }
        ctx.restore();
    }

    fn draw_vehicle(&self, car: &VehicleSprite) {
        let ctx = &self.ctx;
        let (w, h) = (car.size.x as f64, car.size.y as f64);

        ctx.save();
        ctx.translate(car.pos.x as f64, car.pos.y as f64).ok();
        ctx.rotate(car.tilt as f64).ok();

        ctx.set_fill_style_str(CAR_COLOR);
        ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);
        // Windshield
        ctx.set_fill_style_str("#1b263b");
        ctx.fill_rect(-w / 2.0 + 8.0, -h / 2.0 + 18.0, w - 16.0, h * 0.2);

        if car.shielded {
            ctx.begin_path();
            ctx.arc(0.0, 0.0, h * 0.65, 0.0, TAU).ok();
            ctx.set_fill_style_str(SHIELD_COLOR);
            ctx.fill();
        }
        ctx.restore();
    }
}
