//! Player vehicle and its kinematics
//!
//! Handling is integrated per tick (not per millisecond), matching the feel
//! of a frame-locked arcade racer; only lateral travel is scaled by world time.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::input::Intent;
use crate::tuning::VehicleTuning;

/// Horizontal band the car's center may occupy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadBounds {
    pub min_x: f32,
    pub max_x: f32,
}

impl RoadBounds {
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min_x, self.max_x)
    }

    pub fn contains(&self, x: f32) -> bool {
        x >= self.min_x && x <= self.max_x
    }
}

/// Effect-driven handling modifiers for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveModifiers {
    /// Scales top speed and acceleration (boost)
    pub speed_multiplier: f32,
    /// Scales steering response (slippery)
    pub turn_multiplier: f32,
    /// Scales lateral travel (slow motion)
    pub time_scale: f32,
}

impl Default for DriveModifiers {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            turn_multiplier: 1.0,
            time_scale: 1.0,
        }
    }
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Center position; y is fixed on screen
    pub pos: Vec2,
    /// Collision footprint (width, height)
    pub size: Vec2,
    pub speed: f32,
    /// Signed lateral rate; negative steers left
    pub turn_speed: f32,
    /// Body roll for rendering (radians)
    pub tilt: f32,
}

impl Vehicle {
    pub fn new(pos: Vec2, tuning: &VehicleTuning) -> Self {
        Self {
            pos,
            size: Vec2::new(tuning.width, tuning.height),
            speed: 0.0,
            turn_speed: 0.0,
            tilt: 0.0,
        }
    }

    /// Top speed reachable under the given multiplier
    pub fn top_speed(tuning: &VehicleTuning, speed_multiplier: f32) -> f32 {
        tuning.max_speed * speed_multiplier
    }

    /// Advance speed, turn rate, lateral position and tilt by one tick
    pub fn drive(
        &mut self,
        intent: &Intent,
        tuning: &VehicleTuning,
        mods: DriveModifiers,
        bounds: RoadBounds,
    ) {
        self.update_speed(intent, tuning, mods.speed_multiplier);
        self.update_turn(intent, tuning, mods.turn_multiplier);

        // Less steering authority at low speed
        let authority = 0.4 + (self.speed / tuning.max_speed) * 0.6;
        self.pos.x = bounds.clamp(self.pos.x + self.turn_speed * authority * mods.time_scale);

        self.tilt = self.turn_speed * tuning.tilt_factor;
    }

    fn update_speed(&mut self, intent: &Intent, tuning: &VehicleTuning, multiplier: f32) {
        let top = Self::top_speed(tuning, multiplier);

        if intent.accelerate {
            self.speed = (self.speed + tuning.acceleration * multiplier).min(top);
        }
        if intent.brake {
            self.speed = (self.speed - tuning.brake_force).max(0.0);
        }
        if !intent.accelerate && !intent.brake {
            // Coast down, but never below cruising speed
            self.speed = (self.speed - tuning.deceleration).max(tuning.cruise_speed);
        }

        // Boost ending mid-run drops the ceiling
        self.speed = self.speed.clamp(0.0, top);
    }

    fn update_turn(&mut self, intent: &Intent, tuning: &VehicleTuning, multiplier: f32) {
        let max = tuning.max_turn_speed;
        let step = tuning.turn_accel * multiplier;

        if let Some(wheel) = intent.wheel_turn {
            self.turn_speed += wheel * step;
        } else if intent.steer_left {
            self.turn_speed -= step;
        } else if intent.steer_right {
            self.turn_speed += step;
        } else {
            self.turn_speed *= tuning.friction;
        }

        self.turn_speed = self.turn_speed.clamp(-max, max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> RoadBounds {
        RoadBounds {
            min_x: 130.0,
            max_x: 670.0,
        }
    }

    fn car() -> Vehicle {
        Vehicle::new(Vec2::new(400.0, 500.0), &VehicleTuning::default())
    }

    #[test]
    fn test_acceleration_ramp() {
        let tuning = VehicleTuning::default();
        let mut car = car();
        let gas = Intent::accelerate();

        for n in 1..=250 {
            car.drive(&gas, &tuning, DriveModifiers::default(), bounds());
            let expected = (1.2 * n as f32).min(220.0);
            assert!((car.speed - expected).abs() < 1e-2, "tick {n}: {}", car.speed);
        }
    }

    #[test]
    fn test_coasting_settles_at_cruise_speed() {
        let tuning = VehicleTuning::default();
        let mut car = car();

        // From standstill the car immediately rolls at cruise speed
        car.drive(&Intent::default(), &tuning, DriveModifiers::default(), bounds());
        assert_eq!(car.speed, tuning.cruise_speed);

        car.speed = 31.0;
        for _ in 0..10 {
            car.drive(&Intent::default(), &tuning, DriveModifiers::default(), bounds());
        }
        assert_eq!(car.speed, tuning.cruise_speed);
    }

    #[test]
    fn test_brake_stops_the_car() {
        let tuning = VehicleTuning::default();
        let mut car = car();
        car.speed = 10.0;
        let brake = Intent {
            brake: true,
            ..Default::default()
        };
        for _ in 0..10 {
            car.drive(&brake, &tuning, DriveModifiers::default(), bounds());
        }
        assert_eq!(car.speed, 0.0);
    }

    #[test]
    fn test_boost_raises_ceiling_and_expiry_clamps() {
        let tuning = VehicleTuning::default();
        let mut car = car();
        car.speed = 220.0;
        let boosted = DriveModifiers {
            speed_multiplier: 1.5,
            ..Default::default()
        };
        car.drive(&Intent::accelerate(), &tuning, boosted, bounds());
        assert!((car.speed - (220.0 + 1.8)).abs() < 1e-3);

        car.drive(&Intent::default(), &tuning, DriveModifiers::default(), bounds());
        assert_eq!(car.speed, 220.0);
    }

    #[test]
    fn test_steering_is_bounded() {
        let tuning = VehicleTuning::default();
        let mut car = car();
        let left = Intent {
            steer_left: true,
            ..Default::default()
        };
        for _ in 0..500 {
            car.drive(&left, &tuning, DriveModifiers::default(), bounds());
            assert!(car.turn_speed >= -tuning.max_turn_speed);
            assert!(bounds().contains(car.pos.x));
        }
        assert_eq!(car.pos.x, bounds().min_x);
        assert_eq!(car.turn_speed, -tuning.max_turn_speed);
        assert!((car.tilt - car.turn_speed * tuning.tilt_factor).abs() < 1e-6);
    }

    #[test]
    fn test_friction_decays_turn_rate() {
        let tuning = VehicleTuning::default();
        let mut car = car();
        car.turn_speed = 10.0;
        car.drive(&Intent::default(), &tuning, DriveModifiers::default(), bounds());
        assert!((car.turn_speed - 8.8).abs() < 1e-4);
    }

    #[test]
    fn test_slippery_reduces_grip() {
        let tuning = VehicleTuning::default();
        let mut car = car();
        let right = Intent {
            steer_right: true,
            ..Default::default()
        };
        let slippery = DriveModifiers {
            turn_multiplier: 0.3,
            ..Default::default()
        };
        car.drive(&right, &tuning, slippery, bounds());
        assert!((car.turn_speed - 1.3 * 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_wheel_overrides_discrete_steering() {
        let tuning = VehicleTuning::default();
        let mut car = car();
        let intent = Intent {
            steer_left: true,
            wheel_turn: Some(0.5),
            ..Default::default()
        };
        car.drive(&intent, &tuning, DriveModifiers::default(), bounds());
        assert!((car.turn_speed - 0.65).abs() < 1e-5);
    }
}
