//////////////////////////////////////////////////
// Definition

/// Compiled-in settings of a demo run. There are no command line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub gl_version: (u8, u8),
    pub vsync: bool,
    pub clear_color: [f32; 4],
    pub wireframe: bool,
}

//////////////////////////////////////////////////
// Implementation

impl DemoConfig {
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_clear_color(mut self, clear_color: [f32; 4]) -> Self {
        self.clear_color = clear_color;
        self
    }

    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            title: "LearnOpenGL".to_owned(),
            width: 800,
            height: 600,
            gl_version: (3, 3),
            vsync: true,
            clear_color: [0.2, 0.3, 0.3, 1.0],
            wireframe: false,
        }
    }
}
