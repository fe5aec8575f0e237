//! Draws an orange triangle. Escape closes the window.

//////////////////////////////////////////////////
// Using

use learn_gl::prelude::*;

//////////////////////////////////////////////////
// Entry point

pub fn main() {
    std::process::exit(learn_gl::start(DemoConfig::default(), DrawMode::ShadedTriangle));
}
