use super::position::Position;
use std::rc::Rc;

/// Display name of the top level program frame.
pub const PROGRAM: &str = "<program>";

/// Frame of evaluation, used to build tracebacks for runtime errors.
#[derive(Debug)]
pub struct Context {
    pub display_name: String,
    pub parent: Option<Rc<Context>>,

    /// Where the frame was entered from within its parent.
    pub entry: Option<Position>,
}

impl Context {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            parent: None,
            entry: None,
        }
    }

    pub fn with_parent(
        display_name: impl Into<String>,
        parent: Rc<Context>,
        entry: Position,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            parent: Some(parent),
            entry: Some(entry),
        }
    }
}
