//! Frame stack

use std::fmt;

use crate::resumable::Resumable;

/// Stack of nested computations belonging to one coroutine instance
///
/// The top frame is the only active one; every frame beneath it is a
/// parent suspended until the frame above it completes.
pub struct FrameStack {
    frames: Vec<Box<dyn Resumable>>,
}

impl FrameStack {
    /// Create a stack whose only frame is `root`
    pub fn new(root: Box<dyn Resumable>) -> Self {
        FrameStack { frames: vec![root] }
    }

    pub fn push(&mut self, frame: Box<dyn Resumable>) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Box<dyn Resumable>> {
        self.frames.pop()
    }

    /// The active frame, if any
    pub fn top_mut(&mut self) -> Option<&mut (dyn Resumable + 'static)> {
        self.frames.last_mut().map(|frame| frame.as_mut())
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl fmt::Debug for FrameStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameStack")
            .field("depth", &self.frames.len())
            .finish()
    }
}
