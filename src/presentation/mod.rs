//! Presentation layer: mapping card colors onto egui.

pub mod color_mapping;
