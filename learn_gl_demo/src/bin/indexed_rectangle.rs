//! Draws an orange rectangle from two indexed triangles. Escape closes the window.

//////////////////////////////////////////////////
// Using

use learn_gl::prelude::*;

//////////////////////////////////////////////////
// Entry point

pub fn main() {
    std::process::exit(learn_gl::start(DemoConfig::default(), DrawMode::IndexedRectangle));
}
