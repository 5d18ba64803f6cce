//! Tracking of components under resolution

use crate::error::Error;
use std::cell::RefCell;

/// Marks a component as being resolved until dropped
///
/// Guards nest in call order, so dropping one always pops its own name,
/// whether resolution succeeded or failed.
pub(super) struct Resolving<'a> {
    stack: &'a RefCell<Vec<String>>,
}

impl<'a> Resolving<'a> {
    /// Pushes `name`, failing if it is already under resolution
    pub(super) fn enter(stack: &'a RefCell<Vec<String>>, name: &str) -> Result<Self, Error> {
        let mut names = stack.borrow_mut();
        if let Some(start) = names.iter().position(|n| n == name) {
            let mut chain = names[start..].to_vec();
            chain.push(name.to_owned());
            return Err(Error::CircularDependency { name: name.to_owned(), chain });
        }
        names.push(name.to_owned());
        drop(names);
        Ok(Self { stack })
    }
}

impl Drop for Resolving<'_> {
    #[inline]
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_pops_on_drop() {
        let stack = RefCell::new(Vec::new());
        {
            let _a = Resolving::enter(&stack, "a").unwrap();
            let _b = Resolving::enter(&stack, "b").unwrap();
            assert_eq!(*stack.borrow(), ["a", "b"]);
        }
        assert!(stack.borrow().is_empty());
    }

    #[test]
    fn it_reports_the_cycle_only() {
        let stack = RefCell::new(Vec::new());
        let _x = Resolving::enter(&stack, "x").unwrap();
        let _a = Resolving::enter(&stack, "a").unwrap();
        let _b = Resolving::enter(&stack, "b").unwrap();

        let err = Resolving::enter(&stack, "a").err().unwrap();

        assert!(matches!(err, Error::CircularDependency { ref chain, .. } if chain == &["a", "b", "a"]));
        assert_eq!(stack.borrow().len(), 3);
    }
}
