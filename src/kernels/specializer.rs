use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use rustc_hash::FxHashMap;

use crate::algorithms::accumulation::{self, Generic};
use crate::basis::base::BasisKernel;
use crate::options::InterpolatorOptions;

use super::dispatch;
use super::entry::{ArrayFn, CallShape, EntryPoint, KernelCacheEntry, KernelFlags, KernelKey, ManyMultistateFn, ManyStatelessFn, ValueFn};

///
/// Resolves a `KernelKey` to an entry point once and caches it for the lifetime
/// of the specializer.
///
/// The first resolution of a key tries the dimension-specialized table and falls
/// back to the generic kernels when there is no match. Both compute the same
/// floating point operations in the same order, so the choice only affects speed.
/// Entries are never replaced. Concurrent first resolutions of a key serialize
/// on the write lock and the loser observes the winner's entry.
///
pub struct KernelSpecializer<B: BasisKernel>
{
    cache: RwLock<FxHashMap<KernelKey, KernelCacheEntry>>,
    options: InterpolatorOptions,
    resolutions: AtomicUsize,
    _basis: PhantomData<B>,
}

impl<B: BasisKernel> Default for KernelSpecializer<B>
{
    fn default() -> Self {
        Self::new(InterpolatorOptions::default())
    }
}

impl<B: BasisKernel> KernelSpecializer<B>
{
    pub fn new(options: InterpolatorOptions) -> Self
    {
        Self { cache: RwLock::new(FxHashMap::default()), options, resolutions: AtomicUsize::new(0), _basis: PhantomData }
    }

    pub fn options(&self) -> &InterpolatorOptions
    {
        &self.options
    }

    pub fn resolve(&self, key: KernelKey) -> KernelCacheEntry
    {
        if let Some(entry) = self.cache.read().unwrap_or_else(PoisonError::into_inner).get(&key)
        {
            return *entry;
        }
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = cache.get(&key)
        {
            return *entry;
        }
        let entry = self.build(key);
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        cache.insert(key, entry);
        entry
    }

    fn build(&self, key: KernelKey) -> KernelCacheEntry
    {
        if !self.options.runtime_optimization
        {
            return KernelCacheEntry { entry: EntryPoint::generic::<B>(key.shape), flags: KernelFlags::new() };
        }
        match dispatch::specialized::<B>(key.dimension, key.shape)
        {
            Some(entry) =>
            {
                log::debug!("resolved specialized {:?} kernel for {:?}", B::basis_type(), key);
                KernelCacheEntry { entry, flags: KernelFlags::new().with_attempted(true).with_specialized(true) }
            }
            None =>
            {
                log::debug!("no specialized {:?} kernel for {:?}, using generic fallback", B::basis_type(), key);
                KernelCacheEntry { entry: EntryPoint::generic::<B>(key.shape), flags: KernelFlags::new().with_attempted(true) }
            }
        }
    }

    pub fn value(&self, dimension: usize) -> ValueFn
    {
        match self.resolve(KernelKey::new(dimension, CallShape::Value, 1)).entry
        {
            EntryPoint::Value(f) => f,
            _ => accumulation::interpolate_value::<Generic<B>>,
        }
    }

    pub fn array(&self, dimension: usize) -> ArrayFn
    {
        match self.resolve(KernelKey::new(dimension, CallShape::Array, 1)).entry
        {
            EntryPoint::Array(f) => f,
            _ => accumulation::interpolate_array::<Generic<B>>,
        }
    }

    pub fn many_stateless(&self, dimension: usize, count: usize) -> ManyStatelessFn
    {
        match self.resolve(KernelKey::new(dimension, CallShape::ManyStateless, count)).entry
        {
            EntryPoint::ManyStateless(f) => f,
            _ => accumulation::interpolate_array_many_stateless::<Generic<B>>,
        }
    }

    pub fn many_multistate(&self, dimension: usize, count: usize) -> ManyMultistateFn
    {
        match self.resolve(KernelKey::new(dimension, CallShape::ManyMultistate, count)).entry
        {
            EntryPoint::ManyMultistate(f) => f,
            _ => accumulation::interpolate_array_many_multistate::<Generic<B>>,
        }
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize
    {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.len() == 0
    }

    /// Number of resolutions performed, one per distinct key.
    pub fn resolutions(&self) -> usize
    {
        self.resolutions.load(Ordering::Relaxed)
    }
}
