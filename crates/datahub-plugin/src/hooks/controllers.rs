use datahub_core::result::AppResult;
use datahub_core::types::{Context, DataDict};

use crate::interfaces::{
    GroupController, OrganizationController, PackageController, ResourceController,
    RoleAssignment, TagController,
};

use super::HookDispatcher;

/// Which CRUD event a controller notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    /// The entity was read.
    Read,
    /// The entity was created.
    Create,
    /// The entity was edited.
    Edit,
    /// The entity was deleted.
    Delete,
}

impl ControllerEvent {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

impl HookDispatcher {
    /// A tag dict after every tag controller has seen it.
    pub fn tag_before_view(&self, tag: DataDict) -> AppResult<DataDict> {
        self.filter::<dyn TagController, _, _>("before_view", tag, |hook, tag| hook.before_view(tag))
    }

    /// Notifies group controllers of a CRUD event.
    pub fn group_event(&self, event: ControllerEvent, group: &DataDict) -> AppResult<()> {
        self.notify::<dyn GroupController, _>(event.as_str(), |hook| match event {
            ControllerEvent::Read => hook.read(group),
            ControllerEvent::Create => hook.create(group),
            ControllerEvent::Edit => hook.edit(group),
            ControllerEvent::Delete => hook.delete(group),
        })
    }

    /// Notifies group controllers that a role was granted (`granted`) or
    /// revoked.
    pub fn group_role_changed(&self, role: &RoleAssignment, granted: bool) -> AppResult<()> {
        let hook_name = if granted { "authz_add_role" } else { "authz_remove_role" };
        self.notify::<dyn GroupController, _>(hook_name, |hook| {
            if granted {
                hook.authz_add_role(role)
            } else {
                hook.authz_remove_role(role)
            }
        })
    }

    /// A group dict after every group controller has seen it.
    pub fn group_before_view(&self, group: DataDict) -> AppResult<DataDict> {
        self.filter::<dyn GroupController, _, _>("before_view", group, |hook, group| {
            hook.before_view(group)
        })
    }

    /// Notifies organization controllers of a CRUD event.
    pub fn organization_event(&self, event: ControllerEvent, organization: &DataDict) -> AppResult<()> {
        self.notify::<dyn OrganizationController, _>(event.as_str(), |hook| match event {
            ControllerEvent::Read => hook.read(organization),
            ControllerEvent::Create => hook.create(organization),
            ControllerEvent::Edit => hook.edit(organization),
            ControllerEvent::Delete => hook.delete(organization),
        })
    }

    /// Notifies organization controllers that a role was granted or
    /// revoked.
    pub fn organization_role_changed(&self, role: &RoleAssignment, granted: bool) -> AppResult<()> {
        let hook_name = if granted { "authz_add_role" } else { "authz_remove_role" };
        self.notify::<dyn OrganizationController, _>(hook_name, |hook| {
            if granted {
                hook.authz_add_role(role)
            } else {
                hook.authz_remove_role(role)
            }
        })
    }

    /// An organization dict after every organization controller has seen
    /// it.
    pub fn organization_before_view(&self, organization: DataDict) -> AppResult<DataDict> {
        self.filter::<dyn OrganizationController, _, _>("before_view", organization, |hook, org| {
            hook.before_view(org)
        })
    }

    /// Notifies package controllers of a CRUD event on the dataset object.
    pub fn package_event(&self, event: ControllerEvent, dataset: &DataDict) -> AppResult<()> {
        self.notify::<dyn PackageController, _>(event.as_str(), |hook| match event {
            ControllerEvent::Read => hook.read(dataset),
            ControllerEvent::Create => hook.create(dataset),
            ControllerEvent::Edit => hook.edit(dataset),
            ControllerEvent::Delete => hook.delete(dataset),
        })
    }

    /// Notifies package controllers that a role was granted or revoked.
    pub fn package_role_changed(&self, role: &RoleAssignment, granted: bool) -> AppResult<()> {
        let hook_name = if granted { "authz_add_role" } else { "authz_remove_role" };
        self.notify::<dyn PackageController, _>(hook_name, |hook| {
            if granted {
                hook.authz_add_role(role)
            } else {
                hook.authz_remove_role(role)
            }
        })
    }

    /// Notifies package controllers after a dataset was created.
    pub fn package_after_create(&self, ctx: &Context, dataset: &DataDict) -> AppResult<()> {
        self.notify::<dyn PackageController, _>("after_create", |hook| hook.after_create(ctx, dataset))
    }

    /// Notifies package controllers after a dataset was updated.
    pub fn package_after_update(&self, ctx: &Context, dataset: &DataDict) -> AppResult<()> {
        self.notify::<dyn PackageController, _>("after_update", |hook| hook.after_update(ctx, dataset))
    }

    /// Notifies package controllers after a dataset was deleted.
    pub fn package_after_delete(&self, ctx: &Context, dataset: &DataDict) -> AppResult<()> {
        self.notify::<dyn PackageController, _>("after_delete", |hook| hook.after_delete(ctx, dataset))
    }

    /// Notifies package controllers after a dataset was read for display.
    pub fn package_after_show(&self, ctx: &Context, dataset: &DataDict) -> AppResult<()> {
        self.notify::<dyn PackageController, _>("after_show", |hook| hook.after_show(ctx, dataset))
    }

    /// A dataset dict after every package controller has seen it.
    pub fn package_before_view(&self, dataset: DataDict) -> AppResult<DataDict> {
        self.filter::<dyn PackageController, _, _>("before_view", dataset, |hook, dataset| {
            hook.before_view(dataset)
        })
    }

    /// Notifies resource controllers before a resource is created.
    pub fn resource_before_create(&self, ctx: &Context, resource: &DataDict) -> AppResult<()> {
        self.notify::<dyn ResourceController, _>("before_create", |hook| {
            hook.before_create(ctx, resource)
        })
    }

    /// Notifies resource controllers after a resource was created.
    pub fn resource_after_create(&self, ctx: &Context, resource: &DataDict) -> AppResult<()> {
        self.notify::<dyn ResourceController, _>("after_create", |hook| {
            hook.after_create(ctx, resource)
        })
    }

    /// Notifies resource controllers before `current` is replaced by
    /// `resource`.
    pub fn resource_before_update(
        &self,
        ctx: &Context,
        current: &DataDict,
        resource: &DataDict,
    ) -> AppResult<()> {
        self.notify::<dyn ResourceController, _>("before_update", |hook| {
            hook.before_update(ctx, current, resource)
        })
    }

    /// Notifies resource controllers after a resource was updated.
    pub fn resource_after_update(&self, ctx: &Context, resource: &DataDict) -> AppResult<()> {
        self.notify::<dyn ResourceController, _>("after_update", |hook| {
            hook.after_update(ctx, resource)
        })
    }

    /// Notifies resource controllers before `resource` is removed from
    /// `resources`.
    pub fn resource_before_delete(
        &self,
        ctx: &Context,
        resource: &DataDict,
        resources: &[DataDict],
    ) -> AppResult<()> {
        self.notify::<dyn ResourceController, _>("before_delete", |hook| {
            hook.before_delete(ctx, resource, resources)
        })
    }

    /// Notifies resource controllers after a resource was removed.
    pub fn resource_after_delete(&self, ctx: &Context, resources: &[DataDict]) -> AppResult<()> {
        self.notify::<dyn ResourceController, _>("after_delete", |hook| {
            hook.after_delete(ctx, resources)
        })
    }

    /// A resource dict after every resource controller has seen it.
    pub fn resource_before_show(&self, resource: DataDict) -> AppResult<DataDict> {
        self.filter::<dyn ResourceController, _, _>("before_show", resource, |hook, resource| {
            hook.before_show(resource)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::exports::PluginExport;
    use crate::registry::{PluginInfo, PluginRegistry};
    use datahub_core::error::AppError;

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl GroupController for Recorder {
        fn create(&self, _entity: &DataDict) -> AppResult<()> {
            self.log.lock().expect("lock").push(self.name.to_string());
            if self.fail {
                return Err(AppError::plugin(format!("{} rejected the group", self.name)));
            }
            Ok(())
        }
    }

    #[test]
    fn test_group_create_notification_fails_fast() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PluginRegistry::new();
        for (name, fail) in [("a", false), ("b", true), ("c", false)] {
            registry
                .register(
                    PluginExport::new(PluginInfo::new(name, "1.0.0")).implements::<dyn GroupController>(
                        Arc::new(Recorder {
                            name,
                            log: Arc::clone(&log),
                            fail,
                        }),
                    ),
                )
                .expect("register");
        }
        let dispatcher = HookDispatcher::new(Arc::new(registry));

        let err = dispatcher
            .group_event(ControllerEvent::Create, &DataDict::new())
            .unwrap_err();

        assert_eq!(err.message, "b rejected the group");
        assert_eq!(*log.lock().expect("lock"), vec!["a", "b"]);
    }
}
