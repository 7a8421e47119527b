//! Binding key types for the dependency injection container.

use std::any::TypeId;
use std::fmt;

/// Key identifying a binding contract.
///
/// A key is the identity of the abstraction a binding satisfies. Concrete
/// types (`Database`) and trait objects (`dyn Logger`) both have a `TypeId`,
/// so a single representation covers both. The type name is carried along
/// purely for diagnostics and error messages.
///
/// # Examples
///
/// ```rust
/// use ferrous_bind::{Key, key_of};
///
/// trait Logger: Send + Sync {}
///
/// let string_key = key_of::<String>();
/// let logger_key = key_of::<dyn Logger>();
///
/// assert_eq!(string_key.display_name(), "alloc::string::String");
/// assert!(logger_key.display_name().contains("Logger"));
/// assert_ne!(string_key, logger_key);
/// assert_eq!(string_key, key_of::<String>());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Creates a key from a type id and its diagnostic name.
    pub fn new(id: TypeId, name: &'static str) -> Self {
        Self { id, name }
    }

    /// Get the type or trait name for display
    ///
    /// Returns the human-readable type or trait name for debugging and
    /// error messages. This is the `std::any::type_name` result.
    pub fn display_name(&self) -> &'static str {
        self.name
    }

    /// The underlying type id.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Short name without the module path, used in graph labels.
    ///
    /// ```rust
    /// use ferrous_bind::key_of;
    ///
    /// struct Repository;
    /// assert_eq!(key_of::<Repository>().short_name(), "Repository");
    /// assert_eq!(key_of::<Vec<String>>().short_name(), "Vec<alloc::string::String>");
    /// ```
    pub fn short_name(&self) -> &'static str {
        let head = match self.name.find('<') {
            Some(pos) => &self.name[..pos],
            None => self.name,
        };
        let start = head.rfind("::").map(|pos| pos + 2).unwrap_or(0);
        &self.name[start..]
    }
}

// Identity is the TypeId alone; the name only feeds diagnostics.
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::hash::Hash for Key {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Returns the key for a contract type, sized or not.
#[inline(always)]
pub fn key_of<T: ?Sized + 'static>() -> Key {
    Key::new(TypeId::of::<T>(), std::any::type_name::<T>())
}
