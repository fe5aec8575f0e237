//////////////////////////////////////////////////
// Input

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub state: KeyState,
    pub key: Key,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Unknown,
}

/// Keys currently held down, built from the keyboard events seen so far.
#[derive(Debug, Default, Clone)]
pub struct KeyboardState {
    pressed: Vec<Key>,
}

//////////////////////////////////////////////////
// Implementation

impl KeyboardState {
    pub fn apply(&mut self, event: KeyboardEvent) {
        if event.key == Key::Unknown {
            return;
        }
        match event.state {
            KeyState::Pressed => {
                if !self.pressed.contains(&event.key) {
                    self.pressed.push(event.key);
                }
            }
            KeyState::Released => self.pressed.retain(|key| *key != event.key),
        }
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

//////////////////////////////////////////////////
// Conversion

impl From<winit::event::ElementState> for KeyState {
    fn from(e: winit::event::ElementState) -> KeyState {
        match e {
            winit::event::ElementState::Pressed => KeyState::Pressed,
            winit::event::ElementState::Released => KeyState::Released,
        }
    }
}

impl From<winit::keyboard::PhysicalKey> for Key {
    fn from(e: winit::keyboard::PhysicalKey) -> Key {
        use winit::keyboard::{KeyCode, PhysicalKey};
        match e {
            PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
            _ => Key::Unknown,
        }
    }
}

impl From<winit::event::KeyEvent> for KeyboardEvent {
    fn from(e: winit::event::KeyEvent) -> KeyboardEvent {
        let winit::event::KeyEvent { physical_key, state, .. } = e;
        KeyboardEvent {
            state: state.into(),
            key: physical_key.into(),
        }
    }
}
