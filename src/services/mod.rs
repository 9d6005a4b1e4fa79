#![allow(dead_code)]

pub mod goals;
pub mod points;
pub mod progress;
pub mod streaks;
