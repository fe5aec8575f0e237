//! Uploads a triangle without drawing it. Escape closes the window.

//////////////////////////////////////////////////
// Using

use learn_gl::prelude::*;

//////////////////////////////////////////////////
// Entry point

pub fn main() {
    std::process::exit(learn_gl::start(DemoConfig::default(), DrawMode::Triangle));
}
