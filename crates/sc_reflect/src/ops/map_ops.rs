use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Reflect;

/// Access to key/value maps such as `HashMap<K, V>` and `BTreeMap<K, V>`.
///
/// New entries are built by taking zero values from
/// [`new_key`](Map::new_key) / [`new_value`](Map::new_value), filling them
/// through reflection and handing them back to
/// [`insert_boxed`](Map::insert_boxed).
pub trait Map: Reflect {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries, in the map's own iteration order.
    fn entries(&self) -> Vec<(&dyn Reflect, &dyn Reflect)>;

    /// A zero value of the key type.
    fn new_key(&self) -> Box<dyn Reflect>;

    /// A zero value of the value type.
    fn new_value(&self) -> Box<dyn Reflect>;

    /// Inserts an entry, replacing any value stored under an equal key.
    ///
    /// Returns the pair back if either half has the wrong type.
    fn insert_boxed(
        &mut self,
        key: Box<dyn Reflect>,
        value: Box<dyn Reflect>,
    ) -> Result<(), (Box<dyn Reflect>, Box<dyn Reflect>)>;
}
