//! Memo slots for lazily computed properties.

use std::cell::OnceCell;

/// A key addressing one memo slot.
pub(crate) trait CacheKey: Copy {
    const COUNT: usize;

    fn slot(self) -> usize;
}

impl CacheKey for crate::input::FluidParam {
    const COUNT: usize = crate::input::FluidParam::ALL.len();

    fn slot(self) -> usize {
        self as usize
    }
}

impl CacheKey for crate::humid_air_input::HumidAirParam {
    const COUNT: usize = crate::humid_air_input::HumidAirParam::ALL.len();

    fn slot(self) -> usize {
        self as usize
    }
}

/// One `OnceCell` per key. Values are SI; failures are never memoized.
#[derive(Debug)]
pub(crate) struct PropertyCache<K> {
    slots: Vec<OnceCell<f64>>,
    _key: std::marker::PhantomData<K>,
}

impl<K: CacheKey> PropertyCache<K> {
    pub(crate) fn new() -> Self {
        Self {
            slots: (0..K::COUNT).map(|_| OnceCell::new()).collect(),
            _key: std::marker::PhantomData,
        }
    }

    pub(crate) fn get_or_try_init<E>(
        &self,
        key: K,
        compute: impl FnOnce() -> Result<f64, E>,
    ) -> Result<f64, E> {
        let slot = &self.slots[key.slot()];
        if let Some(value) = slot.get() {
            return Ok(*value);
        }
        let value = compute()?;
        Ok(*slot.get_or_init(|| value))
    }

    pub(crate) fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.take();
        }
    }

    pub(crate) fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.get().is_some()).count()
    }
}
