//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};
use crate::key::Key;

/// Keys currently under construction, outermost first.
#[derive(Debug, Default)]
pub(crate) struct ResolutionStack {
    keys: Vec<Key>,
}

impl ResolutionStack {
    pub(crate) fn depth(&self) -> usize {
        self.keys.len()
    }

    fn path_to(&self, key: Key) -> Vec<&'static str> {
        self.keys
            .iter()
            .chain(std::iter::once(&key))
            .map(|k| k.display_name())
            .collect()
    }
}

/// Guard for one frame of the container's resolution stack.
///
/// Entering fails fast when the key is already being constructed further up
/// the stack, or when the stack is at the depth limit. The frame is popped on
/// drop, including while unwinding out of a panicking constructor.
pub(crate) struct StackGuard<'a> {
    stack: &'a RefCell<ResolutionStack>,
    key: Key,
}

impl<'a> StackGuard<'a> {
    pub(crate) fn enter(
        stack: &'a RefCell<ResolutionStack>,
        key: Key,
        max_depth: usize,
    ) -> DiResult<Self> {
        let mut frames = stack.borrow_mut();

        // Circular detection BEFORE pushing the new key
        if frames.keys.contains(&key) {
            return Err(DiError::Circular(frames.path_to(key)));
        }

        if frames.depth() >= max_depth {
            return Err(DiError::DepthExceeded(max_depth));
        }

        frames.keys.push(key);
        Ok(Self { stack, key })
    }
}

impl Drop for StackGuard<'_> {
    fn drop(&mut self) {
        let mut frames = self.stack.borrow_mut();
        if let Some(last) = frames.keys.pop() {
            debug_assert_eq!(last, self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::key_of;

    struct A;
    struct B;

    #[test]
    fn test_reentry_reports_full_path() {
        let stack = RefCell::new(ResolutionStack::default());
        let _a = StackGuard::enter(&stack, key_of::<A>(), 8).unwrap();
        let _b = StackGuard::enter(&stack, key_of::<B>(), 8).unwrap();

        match StackGuard::enter(&stack, key_of::<A>(), 8) {
            Err(DiError::Circular(path)) => {
                assert_eq!(path.len(), 3);
                assert_eq!(path[0], path[2]);
                assert!(path[1].ends_with("B"));
            }
            _ => panic!("expected circular error"),
        }
        assert_eq!(stack.borrow().depth(), 2);
    }

    #[test]
    fn test_guard_pops_on_drop() {
        let stack = RefCell::new(ResolutionStack::default());
        {
            let _a = StackGuard::enter(&stack, key_of::<A>(), 8).unwrap();
            assert_eq!(stack.borrow().depth(), 1);
        }
        assert_eq!(stack.borrow().depth(), 0);
        assert!(StackGuard::enter(&stack, key_of::<A>(), 8).is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let stack = RefCell::new(ResolutionStack::default());
        let _a = StackGuard::enter(&stack, key_of::<A>(), 1).unwrap();
        assert!(matches!(
            StackGuard::enter(&stack, key_of::<B>(), 1),
            Err(DiError::DepthExceeded(1))
        ));
    }
}
