//////////////////////////////////////////////////
// Using

use std::error::Error;
use std::fmt;

use crate::demo::DemoState;

//////////////////////////////////////////////////
// Definition

/// Fatal setup failures. Each one ends the process before the render loop starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoError {
    /// The window or its OpenGL context could not be created.
    WindowCreation(String),
    /// The OpenGL entry points could not be resolved for the current context.
    FunctionLoader(String),
    /// A demo only runs once; it was asked to start again from this state.
    AlreadyStarted(DemoState),
}

//////////////////////////////////////////////////
// Implementation

impl DemoError {
    pub fn window_creation(err: impl fmt::Display) -> Self {
        DemoError::WindowCreation(err.to_string())
    }

    pub fn function_loader(err: impl fmt::Display) -> Self {
        DemoError::FunctionLoader(err.to_string())
    }

    /// Process exit status reported for this failure.
    pub fn exit_code(&self) -> i32 {
        -1
    }
}

//////////////////////////////////////////////////
// Traits

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoError::WindowCreation(reason) => write!(f, "Failed to create window: {}", reason),
            DemoError::FunctionLoader(reason) => write!(f, "Failed to load OpenGL functions: {}", reason),
            DemoError::AlreadyStarted(state) => write!(f, "Demo cannot be initialized again ({:?})", state),
        }
    }
}

impl Error for DemoError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_failing_step() {
        let err = DemoError::window_creation("no display");
        assert_eq!(err.to_string(), "Failed to create window: no display");

        let err = DemoError::function_loader("glViewport missing");
        assert_eq!(err.to_string(), "Failed to load OpenGL functions: glViewport missing");
    }

    #[test]
    fn test_every_failure_exits_with_minus_one() {
        assert_eq!(DemoError::window_creation("x").exit_code(), -1);
        assert_eq!(DemoError::function_loader("x").exit_code(), -1);
        assert_eq!(DemoError::AlreadyStarted(DemoState::Terminated).exit_code(), -1);
    }
}
