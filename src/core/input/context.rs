use serde_json::Value;

/// Values already collected during one evaluation, visible to later
/// definitions.
///
/// Frames are ordered innermost first: `get(0)` is the structure currently
/// being built (the partial object for a field, the current items for a list
/// item), `root()` is the outermost. Contexts are never mutated;
/// [`Context::with_parent`] returns a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    frames: Vec<Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from frames given innermost first.
    pub fn from_frames(frames: Vec<Value>) -> Self {
        Self { frames }
    }

    /// New context with `parent` as the innermost frame.
    pub fn with_parent(&self, parent: Value) -> Self {
        let mut frames = Vec::with_capacity(self.frames.len() + 1);
        frames.push(parent);
        frames.extend(self.frames.iter().cloned());
        Self { frames }
    }

    pub fn parent(&self) -> Option<&Value> {
        self.frames.first()
    }

    pub fn get(&self, depth: usize) -> Option<&Value> {
        self.frames.get(depth)
    }

    pub fn root(&self) -> Option<&Value> {
        self.frames.last()
    }

    /// A field of the innermost frame, if it is an object holding `key`.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.parent()?.as_object()?.get(key)
    }

    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.field(key)?.as_str()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.frames.iter()
    }
}
