//! Orbit camera control.
//!
//! The scene owns the camera behind a [`CameraHandle`]; the adapter keeps only a
//! weak reference and turns rotation and zoom intents into camera moves around
//! a fixed target. Every operation is a silent no-op while no camera is
//! attached, after the scene dropped it, or while the scene holds a borrow.

use crate::{config::CameraConfig, config::IdleConfig, constants::EPSILON};
use nalgebra::{Rotation3, Unit, Vector3};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    cell::RefCell,
    f64::consts::PI,
    rc::{Rc, Weak},
    time::{Duration, Instant},
};

/// Camera that orbits a target point
pub trait OrbitCamera {
    /// Camera position in world space
    fn position(&self) -> Vector3<f64>;

    /// Point the camera orbits and looks at
    fn target(&self) -> Vector3<f64>;

    /// Move the camera without changing its target
    fn set_position(&mut self, position: Vector3<f64>);

    /// Aim the camera at a point
    fn look_at(&mut self, target: Vector3<f64>);
}

/// Shared camera handle owned by the scene
pub type CameraHandle = Rc<RefCell<dyn OrbitCamera>>;

/// Plain orbit camera: a position and a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitRig {
    position: Vector3<f64>,
    target: Vector3<f64>,
}

impl OrbitRig {
    /// Create a rig at `position` looking at `target`
    #[must_use]
    pub const fn new(position: Vector3<f64>, target: Vector3<f64>) -> Self {
        Self { position, target }
    }

    /// Wrap the rig into a shareable handle
    #[must_use]
    pub fn into_handle(self) -> CameraHandle {
        Rc::new(RefCell::new(self))
    }
}

impl Default for OrbitRig {
    /// Three units in front of the origin, as the viewer starts
    fn default() -> Self {
        Self::new(Vector3::new(0.0, 0.0, 3.0), Vector3::zeros())
    }
}

impl OrbitCamera for OrbitRig {
    fn position(&self) -> Vector3<f64> {
        self.position
    }

    fn target(&self) -> Vector3<f64> {
        self.target
    }

    fn set_position(&mut self, position: Vector3<f64>) {
        self.position = position;
    }

    fn look_at(&mut self, target: Vector3<f64>) {
        self.target = target;
    }
}

/// Camera placement relative to its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    /// Distance to the target
    pub radius: f64,
    /// Azimuth, `atan2(x, z)`
    pub theta: f64,
    /// Polar angle from the +y axis
    pub phi: f64,
}

impl Spherical {
    /// Spherical coordinates of an offset from the target
    #[must_use]
    pub fn from_offset(offset: &Vector3<f64>) -> Self {
        let radius = offset.norm();
        if radius < EPSILON {
            return Self {
                radius: 0.0,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    /// Offset from the target for these coordinates
    #[must_use]
    pub fn to_offset(&self) -> Vector3<f64> {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vector3::new(
            self.radius * sin_phi * sin_theta,
            self.radius * cos_phi,
            self.radius * sin_phi * cos_theta,
        )
    }
}

/// Orbit by angle deltas
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationIntent {
    /// Subtracted from the azimuth
    pub delta_theta: f64,
    /// Added to the polar angle
    pub delta_phi: f64,
}

impl RotationIntent {
    /// Create a rotation intent
    #[must_use]
    pub const fn new(delta_theta: f64, delta_phi: f64) -> Self {
        Self {
            delta_theta,
            delta_phi,
        }
    }
}

/// Move the camera along its line of sight; positive moves it away
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoomIntent {
    /// Signed distance change before sensitivity
    pub change: f64,
}

/// Holds at most one deferred payload; a newer one replaces the older
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSlot<T> {
    slot: Option<T>,
}

impl<T> PendingSlot<T> {
    /// Empty slot
    #[must_use]
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// Store a payload, returning the one it replaced
    pub fn set(&mut self, payload: T) -> Option<T> {
        self.slot.replace(payload)
    }

    /// Remove and return the pending payload
    pub fn take(&mut self) -> Option<T> {
        self.slot.take()
    }

    /// Drop the pending payload without running it
    pub fn cancel(&mut self) {
        self.slot = None;
    }

    /// Whether a payload is waiting
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.slot.is_some()
    }
}

impl<T> Default for PendingSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies control intents to the attached orbit camera
pub struct CameraAdapter {
    camera: Option<Weak<RefCell<dyn OrbitCamera>>>,
    min_distance: f64,
    max_distance: f64,
    zoom_sensitivity: f64,
    polar_margin: f64,
    coalesce: bool,
    pending: PendingSlot<RotationIntent>,
}

impl CameraAdapter {
    /// Create a detached adapter
    #[must_use]
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            camera: None,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            zoom_sensitivity: config.zoom_sensitivity,
            polar_margin: config.polar_margin,
            coalesce: config.coalesce_rotations,
            pending: PendingSlot::new(),
        }
    }

    /// Bind to a camera, or detach with `None`
    pub fn attach(&mut self, camera: Option<&CameraHandle>) {
        self.pending.cancel();
        self.camera = camera.map(Rc::downgrade);
        if self.camera.is_some() {
            log::debug!("Camera attached");
        } else {
            log::debug!("Camera detached");
        }
    }

    /// Whether a live camera is attached
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.camera.as_ref().is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Current spherical placement of the camera, if attached
    #[must_use]
    pub fn spherical(&self) -> Option<Spherical> {
        let camera = self.camera.as_ref()?.upgrade()?;
        let camera = camera.try_borrow().ok()?;
        Some(Spherical::from_offset(&(camera.position() - camera.target())))
    }

    fn with_camera(&self, apply: impl FnOnce(&mut dyn OrbitCamera)) -> bool {
        let Some(camera) = self.camera.as_ref().and_then(Weak::upgrade) else {
            return false;
        };
        let Ok(mut camera) = camera.try_borrow_mut() else {
            log::debug!("Camera busy, skipping update");
            return false;
        };
        apply(&mut *camera);
        true
    }

    /// Orbit the camera around its target
    ///
    /// Theta decreases by `delta_theta` and phi increases by `delta_phi`,
    /// clamped away from the poles. The radius and target never change.
    pub fn rotate(&self, intent: RotationIntent) -> bool {
        if intent.delta_theta == 0.0 && intent.delta_phi == 0.0 {
            return false;
        }
        let (min_phi, max_phi) = (self.polar_margin, PI - self.polar_margin);
        self.with_camera(|camera| {
            let target = camera.target();
            let mut spherical = Spherical::from_offset(&(camera.position() - target));
            if spherical.radius < EPSILON {
                return;
            }
            spherical.theta -= intent.delta_theta;
            spherical.phi = (spherical.phi + intent.delta_phi).clamp(min_phi, max_phi);
            camera.set_position(target + spherical.to_offset());
            camera.look_at(target);
        })
    }

    /// Move the camera towards or away from its target
    pub fn zoom(&self, intent: ZoomIntent) -> bool {
        let (min, max) = (self.min_distance, self.max_distance);
        let change = intent.change * self.zoom_sensitivity;
        self.with_camera(|camera| {
            let target = camera.target();
            let offset = camera.position() - target;
            let distance = offset.norm();
            if distance < EPSILON {
                return;
            }
            let new_distance = (distance + change).clamp(min, max);
            camera.set_position(target + offset / distance * new_distance);
            camera.look_at(target);
        })
    }

    /// Rotate about an arbitrary axis through the target
    ///
    /// The result is held inside the same polar band as `rotate`.
    pub fn orbit_about(&self, axis: &Unit<Vector3<f64>>, angle: f64) -> bool {
        let (min_phi, max_phi) = (self.polar_margin, PI - self.polar_margin);
        self.with_camera(|camera| {
            let target = camera.target();
            let rotation = Rotation3::from_axis_angle(axis, angle);
            let mut offset = rotation * (camera.position() - target);
            let mut spherical = Spherical::from_offset(&offset);
            if spherical.radius >= EPSILON && !(min_phi..=max_phi).contains(&spherical.phi) {
                spherical.phi = spherical.phi.clamp(min_phi, max_phi);
                offset = spherical.to_offset();
            }
            camera.set_position(target + offset);
            camera.look_at(target);
        })
    }

    /// Rotate now, or park the intent for the next render frame when coalescing
    pub fn submit_rotation(&mut self, intent: RotationIntent) {
        if self.coalesce {
            self.pending.set(intent);
        } else {
            self.rotate(intent);
        }
    }

    /// Apply the parked rotation, if any
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(intent) => self.rotate(intent),
            None => false,
        }
    }

    /// Drop the parked rotation
    pub fn cancel_pending(&mut self) {
        self.pending.cancel();
    }

    /// Whether a rotation is parked
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_pending()
    }
}

/// Ambient rotation that runs while nobody gestures
///
/// Starts rotating. Gesture input suspends it immediately; it resumes about a
/// fresh random axis once no input arrived for the inactivity timeout.
pub struct IdleRotation {
    enabled: bool,
    timeout: Duration,
    speed: f64,
    axis: Unit<Vector3<f64>>,
    last_input: Option<Instant>,
    rng: StdRng,
}

impl IdleRotation {
    /// Create an idle rotation driver seeded from entropy
    #[must_use]
    pub fn new(config: &IdleConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an idle rotation driver with a fixed seed
    #[must_use]
    pub fn with_seed(config: &IdleConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &IdleConfig, mut rng: StdRng) -> Self {
        let axis = random_axis(&mut rng);
        Self {
            enabled: config.enabled,
            timeout: config.inactivity_timeout(),
            speed: config.rotation_speed,
            axis,
            last_input: None,
            rng,
        }
    }

    /// Record gesture input; stops any running rotation
    pub fn suspend(&mut self, now: Instant) {
        if self.is_active() {
            log::debug!("Idle rotation suspended by gesture input");
        }
        self.last_input = Some(now);
    }

    /// Whether the idle rotation currently drives the camera
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && self.last_input.is_none()
    }

    /// Current rotation axis
    #[must_use]
    pub const fn axis(&self) -> &Unit<Vector3<f64>> {
        &self.axis
    }

    /// Advance one render frame; returns whether the camera moved
    pub fn tick(&mut self, now: Instant, adapter: &CameraAdapter) -> bool {
        if !self.enabled {
            return false;
        }
        if let Some(last) = self.last_input {
            if now.saturating_duration_since(last) < self.timeout {
                return false;
            }
            self.last_input = None;
            self.axis = random_axis(&mut self.rng);
            log::info!("No gesture input for {:?}, resuming idle rotation", self.timeout);
        }
        adapter.orbit_about(&self.axis, self.speed)
    }
}

fn random_axis(rng: &mut impl Rng) -> Unit<Vector3<f64>> {
    let raw = Vector3::new(rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>());
    Unit::try_new(raw, EPSILON).unwrap_or_else(Vector3::y_axis)
}
