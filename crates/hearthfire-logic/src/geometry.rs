//! Geometry primitives shared by targeting and warmth association.
//!
//! Vectors, aim rays, and the bounded volumes that make up a fire's deposit
//! and sensing regions. All queries are pure functions over plain structs.

use serde::{Deserialize, Serialize};

/// 3D vector in world units
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        (*self - *other).length_squared()
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length_squared(&self) -> f32 {
        self.dot(self)
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            *self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }

    /// Component-wise clamp into `[min, max]`.
    pub fn clamp(&self, min: &Self, max: &Self) -> Self {
        Self {
            x: self.x.clamp(min.x, max.x),
            y: self.y.clamp(min.y, max.y),
            z: self.z.clamp(min.z, max.z),
        }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

/// `[0, 1]` clamp that maps NaN to 0.
pub fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Unclamped linear interpolation.
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Aim ray. The direction is normalized on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given full extents centered on `center`.
    pub fn from_center(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn contains(&self, point: &Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

/// A bounded region of space: a collider shape for fuel bodies, fire deposit
/// surfaces, and warmth-sensing triggers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Volume {
    Sphere { center: Vec3, radius: f32 },
    Box(Aabb),
}

impl Volume {
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn cuboid(center: Vec3, size: Vec3) -> Self {
        Self::Box(Aabb::from_center(center, size))
    }

    /// The same volume moved by `offset` (local → world placement).
    pub fn translated(&self, offset: Vec3) -> Self {
        match *self {
            Self::Sphere { center, radius } => Self::Sphere {
                center: center + offset,
                radius,
            },
            Self::Box(aabb) => Self::Box(Aabb::new(aabb.min + offset, aabb.max + offset)),
        }
    }

    pub fn contains(&self, point: &Vec3) -> bool {
        match self {
            Self::Sphere { center, radius } => center.distance_squared(point) <= radius * radius,
            Self::Box(aabb) => aabb.contains(point),
        }
    }

    /// Nearest point of the (solid) volume to `point`; `point` itself when inside.
    pub fn closest_point(&self, point: &Vec3) -> Vec3 {
        match self {
            Self::Sphere { center, radius } => {
                let offset = *point - *center;
                let dist = offset.length();
                if dist <= *radius {
                    *point
                } else {
                    *center + offset * (radius / dist)
                }
            }
            Self::Box(aabb) => point.clamp(&aabb.min, &aabb.max),
        }
    }

    /// Distance from `point` to the volume, zero when inside.
    pub fn distance_to(&self, point: &Vec3) -> f32 {
        self.closest_point(point).distance(point)
    }

    /// Unsigned distance from `point` to the volume's boundary surface.
    pub fn distance_to_boundary(&self, point: &Vec3) -> f32 {
        match self {
            Self::Sphere { center, radius } => (center.distance(point) - radius).abs(),
            Self::Box(aabb) => {
                if aabb.contains(point) {
                    let faces = [
                        point.x - aabb.min.x,
                        aabb.max.x - point.x,
                        point.y - aabb.min.y,
                        aabb.max.y - point.y,
                        point.z - aabb.min.z,
                        aabb.max.z - point.z,
                    ];
                    faces.into_iter().fold(f32::INFINITY, f32::min)
                } else {
                    self.distance_to(point)
                }
            }
        }
    }

    /// Distance along `ray` to the first boundary crossing within `max_distance`.
    ///
    /// From outside this is the entry point; from inside it is the exit point,
    /// so a ray never reports a hit at its own origin.
    pub fn ray_hit(&self, ray: &Ray, max_distance: f32) -> Option<f32> {
        let t = match self {
            Self::Sphere { center, radius } => ray_sphere(ray, center, *radius)?,
            Self::Box(aabb) => ray_aabb(ray, aabb)?,
        };
        (t <= max_distance).then_some(t)
    }
}

fn ray_sphere(ray: &Ray, center: &Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - *center;
    let b = oc.dot(&ray.direction);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let t = if c <= 0.0 { -b + root } else { -b - root };
    (t >= 0.0).then_some(t)
}

fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let origin = [ray.origin.x, ray.origin.y, ray.origin.z];
    let dir = [ray.direction.x, ray.direction.y, ray.direction.z];
    let min = [aabb.min.x, aabb.min.y, aabb.min.z];
    let max = [aabb.max.x, aabb.max.y, aabb.max.z];

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    for axis in 0..3 {
        if dir[axis].abs() < f32::EPSILON {
            if origin[axis] < min[axis] || origin[axis] > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir[axis];
        let mut t0 = (min[axis] - origin[axis]) * inv;
        let mut t1 = (max[axis] - origin[axis]) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
    }

    if t_exit < t_enter || t_exit < 0.0 {
        return None;
    }
    Some(if t_enter >= 0.0 { t_enter } else { t_exit })
}
