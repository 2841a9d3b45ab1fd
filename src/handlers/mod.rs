// src/handlers/mod.rs

pub mod exam;
pub mod exercise;
pub mod module;
pub mod quiz;
pub mod section;
