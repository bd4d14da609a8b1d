//! Shared, load-once access to trajectory files.
//!
//! Several consumers asking for the same file get the same [`Arc<Trajectory>`].
//! The cache only keeps weak references: a trajectory is dropped as soon as
//! its last user releases it, and the next request loads the file again.
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError, Weak},
};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, trace};

use super::{options::TrajectoryOptions, Trajectory};
use crate::xyzv_errors::Result;

/// Path-keyed cache of loaded trajectories.
#[derive(Debug, Default)]
pub struct TrajectoryCache {
    entries: Mutex<HashMap<Utf8PathBuf, Weak<Trajectory>>>,
    options: TrajectoryOptions,
}

impl TrajectoryCache {
    /// Create an empty cache whose trajectories are loaded with `options`.
    pub fn new(options: TrajectoryOptions) -> Self {
        TrajectoryCache {
            entries: Mutex::new(HashMap::new()),
            options,
        }
    }

    /// Return the trajectory stored at `path`, loading it if no live copy exists.
    ///
    /// The lock is held during the load, so concurrent requests for a missing
    /// file load it only once. A successful load also drops the entries of
    /// trajectories no longer alive. A failed load leaves the cache unchanged.
    pub fn get_or_load(&self, path: impl AsRef<Utf8Path>) -> Result<Arc<Trajectory>> {
        let path = path.as_ref();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(trajectory) = entries.get(path).and_then(Weak::upgrade) {
            trace!(%path, "trajectory cache hit");
            return Ok(trajectory);
        }

        debug!(%path, "trajectory cache miss");
        let trajectory = Arc::new(Trajectory::open_with(path, self.options)?);
        entries.retain(|_, weak| weak.strong_count() > 0);
        entries.insert(path.to_owned(), Arc::downgrade(&trajectory));
        Ok(trajectory)
    }

    /// Forget entries whose trajectory has been dropped.
    pub fn purge(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, weak| weak.strong_count() > 0);
    }

    /// Number of trajectories still alive.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod test_trajectory_cache {
    use nalgebra::Vector3;

    use super::*;
    use crate::{
        binary::{byte_order::ByteOrder, precision::Precision, sample_record::Sample},
        xyzv_errors::XyzvError,
    };

    fn write_file(dir: &tempfile::TempDir, name: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
        let samples = (0..4)
            .map(|i| {
                let t = i as f64;
                Sample::new(t, Vector3::new(t, 0.0, 0.0), Vector3::zeros())
            })
            .collect();
        Trajectory::from_samples(ByteOrder::Little, Precision::Float32, samples)
            .unwrap()
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_shared_while_alive() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "body.xyzv");
        let cache = TrajectoryCache::default();

        let first = cache.get_or_load(&path).unwrap();
        let second = cache.get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        drop(first);
        drop(second);
        assert!(cache.is_empty());
        cache.purge();
        assert!(cache.entries.lock().unwrap().is_empty());

        // reloaded on demand
        let again = cache.get_or_load(&path).unwrap();
        assert_eq!(again.len(), 4);
    }

    #[test]
    fn test_miss_drops_dead_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TrajectoryCache::default();

        for name in ["a.xyzv", "b.xyzv", "c.xyzv"] {
            let path = write_file(&dir, name);
            drop(cache.get_or_load(&path).unwrap());
        }
        // only the last load is left, its trajectory already dropped
        assert_eq!(cache.entries.lock().unwrap().len(), 1);

        let _kept = cache.get_or_load(write_file(&dir, "d.xyzv")).unwrap();
        let entries = cache.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries.values().all(|weak| weak.strong_count() == 1));
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("missing.xyzv")).unwrap();
        let cache = TrajectoryCache::default();

        assert!(matches!(cache.get_or_load(&path), Err(XyzvError::Io(_))));
        assert!(cache.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn test_options_are_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "cubic.xyzv");
        let options = TrajectoryOptions::default()
            .with_interpolation(crate::trajectory::Interpolation::Cubic);
        let cache = TrajectoryCache::new(options);

        assert_eq!(cache.get_or_load(&path).unwrap().options(), &options);
    }
}
