// src/models/mod.rs

pub mod difficulty;
pub mod exam;
pub mod exercise;
pub mod module;
pub mod quiz;
pub mod section;
