use std::sync::Arc;

use genvisor_model::StatusSnapshot;

use crate::instance::Instance;

/// Immutable-after-construction set of instances, in declaration order.
///
/// Cloning is cheap (the instances are shared); the supervisor and the HTTP
/// router hold the same set and read it without synchronization.
#[derive(Clone)]
pub struct InstanceSet {
    inner: Arc<[Arc<Instance>]>,
}

impl InstanceSet {
    pub fn new(instances: Vec<Arc<Instance>>) -> Self {
        Self {
            inner: instances.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Instance>> {
        self.inner.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Instance>> {
        self.inner.iter().find(|instance| instance.name() == name)
    }

    /// The single instance, when exactly one is configured.
    pub fn sole(&self) -> Option<&Arc<Instance>> {
        match &*self.inner {
            [only] => Some(only),
            _ => None,
        }
    }

    /// One lock-consistent snapshot per instance, in declaration order.
    ///
    /// No global lock is taken: each element is consistent with itself, but
    /// two elements may reflect different moments in time.
    pub fn snapshots(&self) -> Vec<StatusSnapshot> {
        self.inner.iter().map(|instance| instance.snapshot()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use genvisor_model::InstanceSpec;

    use super::*;

    fn set(names: &[&str]) -> InstanceSet {
        InstanceSet::new(
            names
                .iter()
                .map(|name| {
                    Arc::new(Instance::new(InstanceSpec::new(
                        *name,
                        Path::new("/tmp/genvisor-test"),
                        Duration::from_secs(60),
                    )))
                })
                .collect(),
        )
    }

    #[test]
    fn snapshots_preserve_declaration_order() {
        let names: Vec<String> = set(&["c", "a", "b"])
            .snapshots()
            .into_iter()
            .map(|snap| snap.name)
            .collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn get_finds_instances_by_name() {
        let set = set(&["a", "b"]);
        assert!(set.get("b").is_some());
        assert!(set.get("missing").is_none());
    }

    #[test]
    fn sole_only_matches_a_single_instance_set() {
        assert!(set(&["a"]).sole().is_some());
        assert!(set(&["a", "b"]).sole().is_none());
        assert!(set(&[]).sole().is_none());
    }

    #[test]
    fn empty_set_snapshots_to_empty_vec() {
        assert!(set(&[]).snapshots().is_empty());
    }
}
