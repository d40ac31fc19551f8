use std::sync::Arc;

use tracing::debug;

use super::{ClassRef, FieldRef, MethodRef, SymbolicReference};
use crate::{
    class::{ConstantPool, ConstantPoolEntry},
    error::{Error, Result},
};

/// How a full sweep treats entries no symbolic reference exists for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolvePolicy {
    /// Fail with [`Error::UnresolvableConstant`].
    #[default]
    Strict,
    SkipUnresolvable,
}

#[derive(Debug, Clone, Default)]
enum Slot {
    #[default]
    Unresolved,
    Resolving,
    Resolved(SymbolicReference),
}

/// Resolved symbolic references of one constant pool, keyed by pool index.
///
/// Slots only ever move forward; once resolved an index keeps its value, so
/// every member naming the same class entry shares one [`ClassRef`].
#[derive(Debug, Clone)]
pub struct ResolutionCache {
    slots: Vec<Slot>,
    classes_resolved: usize,
}

impl ResolutionCache {
    pub fn new(pool: &ConstantPool) -> Self {
        ResolutionCache {
            slots: vec![Slot::Unresolved; pool.len()],
            classes_resolved: 0,
        }
    }

    pub fn get(&self, index: u16) -> Option<&SymbolicReference> {
        match self.slot(index) {
            Some(Slot::Resolved(reference)) => Some(reference),
            _ => None,
        }
    }

    /// Iterates over resolved `(pool index, reference)` pairs in pool order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &SymbolicReference)> + '_ {
        (1u16..).zip(self.slots.iter()).filter_map(|(index, slot)| match slot {
            Slot::Resolved(reference) => Some((index, reference)),
            _ => None,
        })
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times a class name was actually decoded.
    pub fn classes_resolved(&self) -> usize {
        self.classes_resolved
    }

    /// Returns the shared [`ClassRef`] of the `Class` entry at `index`, resolving
    /// it on first use.
    pub fn get_or_resolve_class(
        &mut self,
        pool: &ConstantPool,
        index: u16,
    ) -> Result<Arc<ClassRef>> {
        pool.get_class_name_index(index)?;
        match self.get_or_resolve(pool, index)? {
            SymbolicReference::Class(class) => Ok(class),
            _ => Err(Error::InvalidConstantPoolReference {
                index,
                expected: "Class",
                found: pool.get(index)?.kind(),
            }),
        }
    }

    /// Resolves a `Class`, `Fieldref`, `Methodref` or `InterfaceMethodref` entry.
    pub fn get_or_resolve(&mut self, pool: &ConstantPool, index: u16) -> Result<SymbolicReference> {
        let entry = pool.get(index)?;
        let position = (index - 1) as usize;

        match self.slot(index) {
            Some(Slot::Resolved(reference)) => return Ok(reference.clone()),
            Some(Slot::Resolving) => return Err(Error::CyclicReference { index }),
            Some(Slot::Unresolved) => {}
            // cache built for a smaller pool
            None => {
                return Err(Error::IndexOutOfRange {
                    index,
                    len: self.slots.len(),
                });
            }
        }

        self.slots[position] = Slot::Resolving;
        match self.resolve_entry(pool, index, entry) {
            Ok(reference) => {
                debug!(index, %reference, "resolved constant");
                self.slots[position] = Slot::Resolved(reference.clone());
                Ok(reference)
            }
            Err(err) => {
                self.slots[position] = Slot::Unresolved;
                Err(err)
            }
        }
    }

    fn resolve_entry(
        &mut self,
        pool: &ConstantPool,
        index: u16,
        entry: &ConstantPoolEntry,
    ) -> Result<SymbolicReference> {
        match *entry {
            ConstantPoolEntry::Class { name_index } => {
                let name = pool.get_utf8(name_index)?;
                if name.starts_with('[') {
                    // TODO: resolve array classes through their element type
                    return Err(Error::UnsupportedArrayClass {
                        index,
                        name: Arc::clone(name),
                    });
                }
                self.classes_resolved += 1;
                Ok(SymbolicReference::Class(Arc::new(ClassRef {
                    name: Arc::clone(name),
                })))
            }
            ConstantPoolEntry::FieldRef {
                class_index,
                name_and_type_index,
            } => {
                let (name, descriptor) = resolve_name_and_type(pool, name_and_type_index)?;
                let owner = self.get_or_resolve_class(pool, class_index)?;
                Ok(SymbolicReference::Field(Arc::new(FieldRef {
                    name,
                    descriptor,
                    owner,
                })))
            }
            ConstantPoolEntry::MethodRef {
                class_index,
                name_and_type_index,
            } => Ok(SymbolicReference::Method(self.resolve_method(
                pool,
                class_index,
                name_and_type_index,
            )?)),
            ConstantPoolEntry::InterfaceMethodRef {
                class_index,
                name_and_type_index,
            } => Ok(SymbolicReference::InterfaceMethod(self.resolve_method(
                pool,
                class_index,
                name_and_type_index,
            )?)),
            _ => Err(Error::UnresolvableConstant {
                index,
                kind: entry.kind(),
            }),
        }
    }

    fn resolve_method(
        &mut self,
        pool: &ConstantPool,
        class_index: u16,
        name_and_type_index: u16,
    ) -> Result<Arc<MethodRef>> {
        let (name, descriptor) = resolve_name_and_type(pool, name_and_type_index)?;
        let owner = self.get_or_resolve_class(pool, class_index)?;
        Ok(Arc::new(MethodRef {
            name,
            descriptor,
            owner,
        }))
    }

    fn slot(&self, index: u16) -> Option<&Slot> {
        index
            .checked_sub(1)
            .and_then(|position| self.slots.get(position as usize))
    }
}

fn resolve_name_and_type(pool: &ConstantPool, index: u16) -> Result<(Arc<str>, Arc<str>)> {
    let (name_index, descriptor_index) = pool.get_name_and_type(index)?;
    let name = pool.get_utf8(name_index)?;
    let descriptor = pool.get_utf8(descriptor_index)?;
    Ok((Arc::clone(name), Arc::clone(descriptor)))
}

/// Shorthand for [`ResolutionCache::get_or_resolve_class`].
pub fn get_or_resolve_class(
    cache: &mut ResolutionCache,
    pool: &ConstantPool,
    index: u16,
) -> Result<Arc<ClassRef>> {
    cache.get_or_resolve_class(pool, index)
}

/// Resolves every class and member reference of `pool`, failing on entries
/// that have no symbolic form.
pub fn resolve_all(pool: &ConstantPool) -> Result<ResolutionCache> {
    resolve_all_with(pool, ResolvePolicy::Strict)
}

pub fn resolve_all_with(pool: &ConstantPool, policy: ResolvePolicy) -> Result<ResolutionCache> {
    let mut cache = ResolutionCache::new(pool);

    for (index, entry) in pool.iter() {
        match entry {
            ConstantPoolEntry::Class { .. }
            | ConstantPoolEntry::FieldRef { .. }
            | ConstantPoolEntry::MethodRef { .. }
            | ConstantPoolEntry::InterfaceMethodRef { .. } => {
                cache.get_or_resolve(pool, index)?;
            }
            ConstantPoolEntry::Utf8(_)
            | ConstantPoolEntry::Integer(_)
            | ConstantPoolEntry::Float(_)
            | ConstantPoolEntry::String { .. }
            | ConstantPoolEntry::NameAndType { .. } => {}
            ConstantPoolEntry::MethodHandle { .. }
            | ConstantPoolEntry::MethodType { .. }
            | ConstantPoolEntry::InvokeDynamic { .. } => match policy {
                ResolvePolicy::Strict => {
                    return Err(Error::UnresolvableConstant {
                        index,
                        kind: entry.kind(),
                    });
                }
                ResolvePolicy::SkipUnresolvable => {
                    debug!(index, kind = entry.kind(), "skipping unresolvable constant");
                }
            },
        }
    }

    debug!(
        resolved = cache.len(),
        constants = pool.len(),
        "resolved constant pool"
    );
    Ok(cache)
}
