//! # Resource Scopes
//!
//! A [`ResourceScope`] exclusively owns a set of [`Disposable`]s and releases
//! all of them together. Disposal is a best-effort sweep: a member that fails
//! is logged and the sweep moves on to its siblings. Disposing twice is a
//! no-op, and dropping a scope disposes whatever it still holds.
//!
//! [`ScopeManager`] gives every view-model its two tiers:
//!
//! ```text
//!   active scope   created lazily ─▶ disposed on deactivate ─▶ created again on next use
//!   destroy scope  created with the manager ─▶ disposed once on destroy
//! ```

use std::sync::{Arc, Mutex};

use log::{debug, warn};

use super::disposable::Disposable;
use super::lock;

pub struct ResourceScope {
    label: &'static str,
    /// `None` once disposed.
    members: Mutex<Option<Vec<Box<dyn Disposable>>>>,
}

impl ResourceScope {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            members: Mutex::new(Some(Vec::new())),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Take ownership of `resource`.
    ///
    /// Adding to a scope that is already disposed releases the resource
    /// immediately, so nothing can outlive its scope.
    pub fn add(&self, resource: impl Disposable + 'static) {
        let resource: Box<dyn Disposable> = Box::new(resource);
        let rejected = {
            let mut members = lock(&self.members);
            match members.as_mut() {
                Some(list) => {
                    list.push(resource);
                    None
                }
                None => Some(resource),
            }
        };
        if let Some(resource) = rejected {
            debug!("{} scope already disposed, releasing new member", self.label);
            if let Err(e) = resource.dispose() {
                warn!("{} scope: {}", self.label, e);
            }
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.members).as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_disposed(&self) -> bool {
        lock(&self.members).is_none()
    }

    /// Release every member exactly once. Idempotent.
    pub fn dispose(&self) {
        // Members are released outside the lock; a member may touch this scope.
        let Some(members) = lock(&self.members).take() else {
            return;
        };
        let total = members.len();
        let mut failed = 0;
        for member in members {
            if let Err(e) = member.dispose() {
                failed += 1;
                warn!("{} scope: {}", self.label, e);
            }
        }
        debug!(
            "{} scope disposed ({} members, {} failed)",
            self.label, total, failed
        );
    }
}

impl Drop for ResourceScope {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for ResourceScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceScope")
            .field("label", &self.label)
            .field("members", &self.len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Owns the active and destroy scopes of one view-model.
pub struct ScopeManager {
    active: Mutex<Option<Arc<ResourceScope>>>,
    destroy: Arc<ResourceScope>,
}

impl Default for ScopeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeManager {
    pub fn new() -> Self {
        Self {
            active: Mutex::new(None),
            destroy: Arc::new(ResourceScope::new("destroy")),
        }
    }

    /// Current active scope, created if there is none.
    pub fn active_scope(&self) -> Arc<ResourceScope> {
        lock(&self.active)
            .get_or_insert_with(|| Arc::new(ResourceScope::new("active")))
            .clone()
    }

    pub fn has_active_scope(&self) -> bool {
        lock(&self.active).is_some()
    }

    /// Detach the active scope without disposing it. The next
    /// [`active_scope`](Self::active_scope) call starts a fresh one.
    pub fn take_active(&self) -> Option<Arc<ResourceScope>> {
        lock(&self.active).take()
    }

    /// Dispose the active scope (if any) and forget it.
    pub fn deactivate(&self) {
        if let Some(scope) = self.take_active() {
            scope.dispose();
        }
    }

    /// The lifetime scope. Never recreated.
    pub fn destroy_scope(&self) -> Arc<ResourceScope> {
        self.destroy.clone()
    }

    /// Dispose the destroy scope. Idempotent.
    pub fn destroy(&self) {
        self.destroy.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::disposable::{DisposeError, from_fn};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>) -> impl Disposable + 'static {
        let counter = counter.clone();
        from_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn test_dispose_releases_each_member_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let scope = ResourceScope::new("active");
        scope.add(counting(&released));
        scope.add(counting(&released));
        assert_eq!(scope.len(), 2);

        scope.dispose();
        scope.dispose();

        assert_eq!(released.load(Ordering::SeqCst), 2);
        assert!(scope.is_disposed());
        assert!(scope.is_empty());
    }

    #[test]
    fn test_dispose_empty_scope_is_noop() {
        let scope = ResourceScope::new("active");
        scope.dispose();
        assert!(scope.is_disposed());
    }

    #[test]
    fn test_failing_member_does_not_block_siblings() {
        let released = Arc::new(AtomicUsize::new(0));
        let scope = ResourceScope::new("destroy");
        scope.add(counting(&released));
        scope.add(from_fn(|| Err(DisposeError::new("socket already closed"))));
        scope.add(counting(&released));

        scope.dispose();

        assert_eq!(released.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_add_after_dispose_releases_immediately() {
        let released = Arc::new(AtomicUsize::new(0));
        let scope = ResourceScope::new("active");
        scope.dispose();
        scope.add(counting(&released));
        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert_eq!(scope.len(), 0);
    }

    #[test]
    fn test_dropped_scope_releases_members() {
        let released = Arc::new(AtomicUsize::new(0));
        let scope = ResourceScope::new("active");
        scope.add(counting(&released));
        drop(scope);
        assert_eq!(released.load(Ordering::SeqCst), 1);

        let scope = ResourceScope::new("active");
        scope.add(counting(&released));
        scope.dispose();
        drop(scope);
        assert_eq!(released.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dropped_manager_releases_both_scopes() {
        let released = Arc::new(AtomicUsize::new(0));
        let scopes = ScopeManager::new();
        scopes.active_scope().add(counting(&released));
        scopes.destroy_scope().add(counting(&released));
        drop(scopes);
        assert_eq!(released.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_active_scope_recreated_after_deactivate() {
        let scopes = ScopeManager::new();
        assert!(!scopes.has_active_scope());

        let first = scopes.active_scope();
        assert!(Arc::ptr_eq(&first, &scopes.active_scope()));

        scopes.deactivate();
        assert!(first.is_disposed());
        assert!(!scopes.has_active_scope());

        let second = scopes.active_scope();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(!second.is_disposed());
    }

    #[test]
    fn test_deactivate_without_active_scope_is_noop() {
        let scopes = ScopeManager::new();
        scopes.deactivate();
        assert!(!scopes.has_active_scope());
    }

    #[test]
    fn test_destroy_scope_is_stable_and_disposed_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let scopes = ScopeManager::new();
        let scope = scopes.destroy_scope();
        scope.add(counting(&released));

        scopes.destroy();
        scopes.destroy();
        scopes.active_scope();
        scopes.deactivate();

        assert!(Arc::ptr_eq(&scope, &scopes.destroy_scope()));
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
