//! Geometry of the two-point boundary value problem.
//!
//! Computes the transfer angle Δν between the two position vectors and the
//! constant A that stays fixed for the whole universal-variable iteration.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::InputIssue;
use crate::vector::{dot, norm};

const TWO_PI: f64 = 2.0 * PI;

/// Transfer direction around the focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Short way: the transfer sweeps Δν
    ShortWay,
    /// Long way: the transfer sweeps 2π - Δν
    LongWay,
}

impl Direction {
    /// Returns +1.0 for short way, -1.0 for long way
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::ShortWay => 1.0,
            Direction::LongWay => -1.0,
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = InputIssue;

    /// Accepts the numeric encoding +1 (short way) / -1 (long way)
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Direction::ShortWay),
            -1 => Ok(Direction::LongWay),
            _ => Err(InputIssue::InvalidDirection { value }),
        }
    }
}

impl From<Direction> for i32 {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::ShortWay => 1,
            Direction::LongWay => -1,
        }
    }
}

/// Whether the transfer plane is fixed by r1 and r2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryFlag {
    /// Transfer angle well away from π
    Normal,
    /// Δν within tolerance of π: r1 and r2 are nearly anti-parallel and the
    /// plane of the transfer is poorly determined
    NearHalfRevolution,
}

/// Geometric parameters computed once from the boundary conditions.
#[derive(Debug, Clone)]
pub struct Geometry {
    /// Departure position vector
    pub r1_vec: [f64; 3],
    /// Arrival position vector
    pub r2_vec: [f64; 3],
    /// |r1|
    pub r1: f64,
    /// |r2|
    pub r2: f64,
    /// Transfer angle Δν in [0, 2π], already swapped for the long way
    pub transfer_angle: f64,
    /// A = d * sqrt(|r1| |r2| (1 + cos Δν))
    pub a: f64,
    /// Near-π warning
    pub flag: GeometryFlag,
}

impl Geometry {
    /// Evaluate Δν and A.
    ///
    /// # Arguments
    /// * `r1_vec` - Departure position, non-zero
    /// * `r2_vec` - Arrival position, non-zero
    /// * `direction` - Short way or long way
    /// * `degenerate_tolerance` - |Δν - π| that raises the near-half-rev flag
    pub fn new(
        r1_vec: &[f64; 3],
        r2_vec: &[f64; 3],
        direction: Direction,
        degenerate_tolerance: f64,
    ) -> Self {
        let r1 = norm(r1_vec);
        let r2 = norm(r2_vec);

        // Rounding can push the cosine a hair outside [-1, 1]
        let cos_dnu = (dot(r1_vec, r2_vec) / (r1 * r2)).clamp(-1.0, 1.0);
        let mut transfer_angle = cos_dnu.acos();
        if direction == Direction::LongWay {
            transfer_angle = TWO_PI - transfer_angle;
        }

        let a = direction.sign() * (r1 * r2 * (1.0 + transfer_angle.cos())).sqrt();

        let flag = if (transfer_angle - PI).abs() <= degenerate_tolerance {
            GeometryFlag::NearHalfRevolution
        } else {
            GeometryFlag::Normal
        };

        Self {
            r1_vec: *r1_vec,
            r2_vec: *r2_vec,
            r1,
            r2,
            transfer_angle,
            a,
            flag,
        }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.flag == GeometryFlag::NearHalfRevolution
    }
}
