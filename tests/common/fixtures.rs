//! Reference transfer table.
//!
//! Each entry is a (r1, r2, time_of_flight, direction) quadruple in canonical
//! units with the velocities and converged z it must reproduce. Direction uses
//! the numeric encoding +1 short way / -1 long way.

use gauss_transfer::{Direction, TransferRequest};
use serde::Deserialize;

const TABLE: &str = include_str!("../fixtures/reference_transfers.json");

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceTransfer {
    pub name: String,
    pub r1: [f64; 3],
    pub r2: [f64; 3],
    pub time_of_flight: f64,
    pub direction: i32,
    pub v1: [f64; 3],
    pub v2: [f64; 3],
    pub z: f64,
}

impl ReferenceTransfer {
    pub fn direction(&self) -> Direction {
        Direction::try_from(self.direction).expect("fixture direction must be +1 or -1")
    }

    pub fn request(&self) -> TransferRequest {
        TransferRequest::new(self.r1, self.r2, self.time_of_flight, self.direction())
    }
}

pub fn load() -> Vec<ReferenceTransfer> {
    serde_json::from_str(TABLE).expect("reference_transfers.json is malformed")
}

pub fn by_name(name: &str) -> ReferenceTransfer {
    load()
        .into_iter()
        .find(|case| case.name == name)
        .unwrap_or_else(|| panic!("no reference transfer named {}", name))
}
