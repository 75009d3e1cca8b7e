//! Global alert channel
//!
//! A shared, decaying broadcast of the player's last known position. Any
//! actor that sees the player overwrites it; everyone else may respond once
//! the alert is older than their own response delay. One instance per
//! session, owned by the game state and handed to actors explicitly.

use glam::Vec2;

/// Read-only view of the alert at a point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertReading {
    pub position: Option<Vec2>,
    /// Seconds since the last report
    pub age: f32,
    pub active: bool,
}

impl AlertReading {
    /// Position to investigate if the alert is live and at least `delay` old
    pub fn actionable(&self, delay: f32) -> Option<Vec2> {
        if self.active && self.age >= delay {
            self.position
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct GlobalAlert {
    position: Option<Vec2>,
    age: f32,
    active: bool,
    expiry: f32,
}

impl GlobalAlert {
    pub fn new(expiry: f32) -> Self {
        Self {
            position: None,
            age: 0.0,
            active: false,
            expiry,
        }
    }

    /// Overwrite the reported position, reset the age and activate
    pub fn publish(&mut self, position: Vec2) {
        self.position = Some(position);
        self.age = 0.0;
        self.active = true;
    }

    /// Age the alert; it clears itself once older than the expiry
    pub fn tick(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.age += dt;
        if self.age > self.expiry {
            self.active = false;
            self.position = None;
            log::debug!("Global alert expired");
        }
    }

    pub fn query(&self) -> AlertReading {
        AlertReading {
            position: self.position,
            age: self.age,
            active: self.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_activates() {
        let mut alert = GlobalAlert::new(6.0);
        assert!(!alert.query().active);
        alert.publish(Vec2::new(10.0, 20.0));
        let r = alert.query();
        assert!(r.active);
        assert_eq!(r.position, Some(Vec2::new(10.0, 20.0)));
        assert_eq!(r.age, 0.0);
    }

    #[test]
    fn test_expires_after_duration() {
        let mut alert = GlobalAlert::new(6.0);
        alert.publish(Vec2::new(1.0, 1.0));
        alert.tick(5.9);
        assert!(alert.query().active);
        for _ in 0..3 {
            alert.tick(0.1);
        }
        let r = alert.query();
        assert!(!r.active);
        assert_eq!(r.position, None);
    }

    #[test]
    fn test_republish_resets_age() {
        let mut alert = GlobalAlert::new(6.0);
        alert.publish(Vec2::ZERO);
        alert.tick(5.0);
        alert.publish(Vec2::new(3.0, 4.0));
        alert.tick(5.0);
        let r = alert.query();
        assert!(r.active);
        assert_eq!(r.position, Some(Vec2::new(3.0, 4.0)));
        assert!((r.age - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_actionable_respects_delay() {
        let mut alert = GlobalAlert::new(6.0);
        alert.publish(Vec2::new(5.0, 5.0));
        alert.tick(0.5);
        let r = alert.query();
        assert_eq!(r.actionable(1.0), None);
        assert_eq!(r.actionable(0.5), Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_inactive_alert_does_not_age() {
        let mut alert = GlobalAlert::new(6.0);
        alert.tick(1.0);
        assert_eq!(alert.query().age, 0.0);
    }
}
