//! Bucketed object pool
//!
//! Keeps reusable instances grouped by a bucket key (usually the template an
//! instance was built from). Each tracked instance remembers its owning
//! bucket, so callers return objects without naming the key again.
//!
//! Misuse never panics: returning an unknown or already-free object and
//! re-inserting a tracked object are reported through `false` results.
//!
//! The pool is single-owner. It does no locking; wrap it in a mutex if it
//! must be shared between threads.

mod stats;

pub use stats::PoolStats;

use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use log::{debug, warn};

/// An object the pool can track.
///
/// The id must stay stable for the lifetime of the object and be unique
/// among all objects handed to the same pool.
pub trait PoolObject {
    type Id: Copy + Eq + Hash + fmt::Debug;

    fn pool_id(&self) -> Self::Id;
}

/// Builds a fresh instance for a bucket key
pub type ObjectFactory<K, T> = Box<dyn FnMut(&K) -> T>;

/// Hook run on an instance as it leaves or enters a free list
pub type LifecycleAction<T> = Box<dyn FnMut(&mut T)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Free,
    InUse,
}

#[derive(Debug, Clone)]
struct Ownership<K> {
    key: K,
    slot: Slot,
}

/// Object pool with one LIFO free list per bucket key
pub struct BucketedPool<K, T: PoolObject> {
    buckets: HashMap<K, Vec<T>>,
    owners: HashMap<T::Id, Ownership<K>>,
    factory: ObjectFactory<K, T>,
    take_action: Option<LifecycleAction<T>>,
    return_action: Option<LifecycleAction<T>>,
    initial_capacity: usize,
    stats: PoolStats,
}

impl<K, T> BucketedPool<K, T>
where
    K: Clone + Eq + Hash + fmt::Debug,
    T: PoolObject,
{
    /// Create a pool that builds missing instances with `factory`
    pub fn new(factory: impl FnMut(&K) -> T + 'static) -> Self {
        Self {
            buckets: HashMap::new(),
            owners: HashMap::new(),
            factory: Box::new(factory),
            take_action: None,
            return_action: None,
            initial_capacity: 0,
            stats: PoolStats::default(),
        }
    }

    /// Hook invoked on a reused instance right before it is handed out.
    /// Not invoked for instances fresh from the factory.
    pub fn with_take_action(mut self, action: impl FnMut(&mut T) + 'static) -> Self {
        self.take_action = Some(Box::new(action));
        self
    }

    /// Hook invoked on an instance right before it is placed on a free list
    /// (returns, inserts and pre-warming).
    pub fn with_return_action(mut self, action: impl FnMut(&mut T) + 'static) -> Self {
        self.return_action = Some(Box::new(action));
        self
    }

    /// Number of instances built into a bucket the first time it is touched
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Take an instance for `key`.
    ///
    /// Returns `(true, obj)` when the instance came off the free list and
    /// `(false, obj)` when it was freshly built.
    pub fn try_take_object(&mut self, key: &K) -> (bool, T) {
        if !self.buckets.contains_key(key) {
            self.initialise_bucket(key);
        }

        match self.buckets.get_mut(key).and_then(Vec::pop) {
            Some(mut obj) => {
                if let Some(owner) = self.owners.get_mut(&obj.pool_id()) {
                    owner.slot = Slot::InUse;
                }
                if let Some(action) = self.take_action.as_mut() {
                    action(&mut obj);
                }
                self.stats.reused += 1;
                (true, obj)
            }
            None => {
                let obj = (self.factory)(key);
                self.owners.insert(
                    obj.pool_id(),
                    Ownership {
                        key: key.clone(),
                        slot: Slot::InUse,
                    },
                );
                self.stats.created += 1;
                (false, obj)
            }
        }
    }

    /// Take an instance for `key`, reused or new
    pub fn take_object(&mut self, key: &K) -> T {
        self.try_take_object(key).1
    }

    /// Put an instance back on its owner's free list.
    ///
    /// Returns false (and drops `obj`) if the pool never handed it out or
    /// it is already free.
    pub fn return_object(&mut self, mut obj: T) -> bool {
        let key = match self.owners.get_mut(&obj.pool_id()) {
            Some(owner) if owner.slot == Slot::InUse => {
                owner.slot = Slot::Free;
                owner.key.clone()
            }
            _ => {
                self.stats.rejected_returns += 1;
                return false;
            }
        };

        if let Some(action) = self.return_action.as_mut() {
            action(&mut obj);
        }
        self.buckets.entry(key).or_default().push(obj);
        self.stats.returned += 1;
        true
    }

    /// Seed the pool with an instance it has never seen.
    ///
    /// Returns false if the instance is already tracked by any bucket.
    pub fn insert_object(&mut self, key: K, mut obj: T) -> bool {
        let id = obj.pool_id();
        if let Some(owner) = self.owners.get(&id) {
            warn!(
                "Refusing to insert pooled object {:?} into bucket {:?}: already owned by bucket {:?}",
                id, key, owner.key
            );
            self.stats.rejected_inserts += 1;
            return false;
        }

        if !self.buckets.contains_key(&key) {
            self.initialise_bucket(&key);
        }

        if let Some(action) = self.return_action.as_mut() {
            action(&mut obj);
        }
        self.owners.insert(
            id,
            Ownership {
                key: key.clone(),
                slot: Slot::Free,
            },
        );
        self.buckets.entry(key).or_default().push(obj);
        true
    }

    /// Drop every bucket and ownership record. Hooks are not run.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.owners.clear();
    }

    /// Describe every bucket as `name: free / tracked`, one per line.
    ///
    /// Keys are named with `name_resolver` when given, otherwise with their
    /// `Debug` form. The text is also logged at debug level.
    pub fn dump_pool_info(&self, name_resolver: Option<&dyn Fn(&K) -> String>) -> String {
        let mut lines: Vec<String> = self
            .buckets
            .iter()
            .map(|(key, free)| {
                let name = match name_resolver {
                    Some(resolve) => resolve(key),
                    None => format!("{:?}", key),
                };
                let tracked = self.owners.values().filter(|o| &o.key == key).count();
                format!("  {}: {} free / {} tracked", name, free.len(), tracked)
            })
            .collect();
        lines.sort();

        let mut info = format!(
            "Pool info: {} buckets, {} tracked objects",
            self.buckets.len(),
            self.owners.len()
        );
        for line in lines {
            info.push('\n');
            info.push_str(&line);
        }
        debug!("{}", info);
        info
    }

    /// Free instances currently waiting in `key`'s bucket
    pub fn bucket_len(&self, key: &K) -> usize {
        self.buckets.get(key).map_or(0, Vec::len)
    }

    /// Number of buckets created so far
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of instances the pool knows about, free or in use
    pub fn tracked_count(&self) -> usize {
        self.owners.len()
    }

    /// Whether the pool tracks an instance with this id
    pub fn is_tracked(&self, id: T::Id) -> bool {
        self.owners.contains_key(&id)
    }

    /// Usage counters
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    fn initialise_bucket(&mut self, key: &K) {
        let mut bucket = Vec::with_capacity(self.initial_capacity);
        for _ in 0..self.initial_capacity {
            let mut obj = (self.factory)(key);
            if let Some(action) = self.return_action.as_mut() {
                action(&mut obj);
            }
            self.owners.insert(
                obj.pool_id(),
                Ownership {
                    key: key.clone(),
                    slot: Slot::Free,
                },
            );
            bucket.push(obj);
        }
        self.stats.prewarmed += self.initial_capacity as u64;
        self.buckets.insert(key.clone(), bucket);
    }
}

impl<K, T> fmt::Debug for BucketedPool<K, T>
where
    K: fmt::Debug,
    T: PoolObject,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketedPool")
            .field("buckets", &self.buckets.len())
            .field("tracked", &self.owners.len())
            .field("initial_capacity", &self.initial_capacity)
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Widget {
        id: u32,
        template: &'static str,
        active: bool,
    }

    impl PoolObject for Widget {
        type Id = u32;

        fn pool_id(&self) -> u32 {
            self.id
        }
    }

    fn counting_factory() -> impl FnMut(&&'static str) -> Widget {
        let mut next = 0;
        move |template: &&'static str| {
            next += 1;
            Widget {
                id: next,
                template: *template,
                active: true,
            }
        }
    }

    fn pool() -> BucketedPool<&'static str, Widget> {
        BucketedPool::new(counting_factory())
    }

    #[test]
    fn test_take_from_empty_bucket_builds_new() {
        let mut pool = pool();
        let (found, obj) = pool.try_take_object(&"room");
        assert!(!found);
        assert_eq!(obj.id, 1);
        assert_eq!(obj.template, "room");
        assert_eq!(pool.bucket_count(), 1);
        assert_eq!(pool.stats().created, 1);
    }

    #[test]
    fn test_lifo_reuse() {
        let mut pool = pool();
        let a = pool.take_object(&"room");
        let b = pool.take_object(&"room");
        let (a_id, b_id) = (a.id, b.id);

        assert!(pool.return_object(a));
        assert!(pool.return_object(b));

        let (found, next) = pool.try_take_object(&"room");
        assert!(found);
        assert_eq!(next.id, b_id);
        let (found, next) = pool.try_take_object(&"room");
        assert!(found);
        assert_eq!(next.id, a_id);
    }

    #[test]
    fn test_return_goes_to_owning_bucket() {
        let mut pool = pool();
        let room = pool.take_object(&"room");
        let hall = pool.take_object(&"hall");
        assert!(pool.return_object(room));
        assert!(pool.return_object(hall));
        assert_eq!(pool.bucket_len(&"room"), 1);
        assert_eq!(pool.bucket_len(&"hall"), 1);
    }

    #[test]
    fn test_return_unknown_object_fails() {
        let mut pool = pool();
        let stranger = Widget {
            id: 99,
            template: "room",
            active: true,
        };
        assert!(!pool.return_object(stranger));
        assert_eq!(pool.stats().rejected_returns, 1);
    }

    #[test]
    fn test_double_return_fails() {
        let mut pool = pool();
        let obj = pool.take_object(&"room");
        let copy = obj.clone();
        assert!(pool.return_object(obj));
        assert!(!pool.return_object(copy));
        assert_eq!(pool.bucket_len(&"room"), 1);
    }

    #[test]
    fn test_insert_rejects_tracked_object() {
        let mut pool = pool();
        let obj = Widget {
            id: 500,
            template: "room",
            active: true,
        };
        assert!(pool.insert_object("room", obj.clone()));
        assert!(!pool.insert_object("room", obj.clone()));
        assert!(!pool.insert_object("hall", obj));
        assert_eq!(pool.bucket_len(&"room"), 1);
        assert_eq!(pool.stats().rejected_inserts, 2);
    }

    #[test]
    fn test_inserted_object_is_reused() {
        let mut pool = pool();
        let obj = Widget {
            id: 500,
            template: "room",
            active: true,
        };
        assert!(pool.insert_object("room", obj));
        let (found, taken) = pool.try_take_object(&"room");
        assert!(found);
        assert_eq!(taken.id, 500);
        assert!(pool.return_object(taken));
    }

    #[test]
    fn test_take_action_only_on_reuse() {
        let taken = Rc::new(Cell::new(0));
        let counter = Rc::clone(&taken);
        let mut pool = pool().with_take_action(move |w: &mut Widget| {
            counter.set(counter.get() + 1);
            w.active = true;
        });

        let obj = pool.take_object(&"room");
        assert_eq!(taken.get(), 0);
        pool.return_object(obj);
        let _ = pool.take_object(&"room");
        assert_eq!(taken.get(), 1);
    }

    #[test]
    fn test_return_action_on_return_and_insert() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let mut pool = pool().with_return_action(move |w: &mut Widget| {
            log.borrow_mut().push(w.id);
            w.active = false;
        });

        let obj = pool.take_object(&"room");
        pool.return_object(obj);
        pool.insert_object(
            "room",
            Widget {
                id: 77,
                template: "room",
                active: true,
            },
        );
        assert_eq!(*seen.borrow(), vec![1, 77]);

        let (_, reused) = pool.try_take_object(&"room");
        assert!(!reused.active);
    }

    #[test]
    fn test_prewarm_places_instances_on_free_list() {
        // Pre-warmed instances are immediately reusable.
        let mut pool = pool().with_initial_capacity(2);
        let (found, first) = pool.try_take_object(&"room");
        assert!(found);
        assert_eq!(pool.bucket_len(&"room"), 1);
        assert_eq!(pool.tracked_count(), 2);
        assert_eq!(pool.stats().prewarmed, 2);
        assert_eq!(first.id, 2);

        let (found, _) = pool.try_take_object(&"room");
        assert!(found);
        let (found, fresh) = pool.try_take_object(&"room");
        assert!(!found);
        assert_eq!(fresh.id, 3);
    }

    #[test]
    fn test_clear_forgets_everything() {
        let mut pool = pool();
        let obj = pool.take_object(&"room");
        pool.clear();
        assert_eq!(pool.bucket_count(), 0);
        assert_eq!(pool.tracked_count(), 0);
        assert!(!pool.return_object(obj));
    }

    #[test]
    fn test_dump_pool_info() {
        let mut pool = pool();
        let a = pool.take_object(&"room");
        let _b = pool.take_object(&"room");
        let _c = pool.take_object(&"hall");
        pool.return_object(a);

        let info = pool.dump_pool_info(None);
        assert!(info.starts_with("Pool info: 2 buckets, 3 tracked objects"));
        assert!(info.contains("\"room\": 1 free / 2 tracked"));
        assert!(info.contains("\"hall\": 0 free / 1 tracked"));

        let named = pool.dump_pool_info(Some(&|k: &&'static str| k.to_uppercase()));
        assert!(named.contains("ROOM: 1 free / 2 tracked"));
    }
}
