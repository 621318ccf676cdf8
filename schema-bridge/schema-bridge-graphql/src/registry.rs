use fnv::FnvHashMap;

use crate::data::TypeIndex;

/// Memoization of converted class types, scoped to one schema build.
#[derive(Default, Debug)]
pub struct TypeRegistry {
    types: FnvHashMap<String, TypeIndex>,
}

impl TypeRegistry {
    pub fn get(&self, name: &str) -> Option<TypeIndex> {
        self.types.get(name).copied()
    }

    /// Register the converted type for a name.
    ///
    /// Registering the same index twice is harmless,
    /// registering a different index under a taken name is a bug in the converter.
    pub fn put(&mut self, name: &str, index: TypeIndex) {
        match self.types.get(name) {
            Some(existing) if *existing == index => {}
            Some(existing) => {
                panic!("BUG: `{name}` is already registered as {existing:?}, not {index:?}")
            }
            None => {
                self.types.insert(name.to_string(), index);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
