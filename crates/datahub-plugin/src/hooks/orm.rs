use datahub_core::result::AppResult;
use datahub_core::types::DataDict;

use crate::interfaces::{
    DomainObjectModification, DomainOperation, Mapper, RecordEvent, ResourceUrlChange, Session,
    SessionEvent,
};

use super::HookDispatcher;

/// A persistence-layer record event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperEvent {
    /// Before a row is inserted.
    BeforeInsert,
    /// Before a row is updated.
    BeforeUpdate,
    /// Before a row is deleted.
    BeforeDelete,
    /// After a row was inserted.
    AfterInsert,
    /// After a row was updated.
    AfterUpdate,
    /// After a row was deleted.
    AfterDelete,
}

impl MapperEvent {
    fn as_str(&self) -> &'static str {
        match self {
            Self::BeforeInsert => "before_insert",
            Self::BeforeUpdate => "before_update",
            Self::BeforeDelete => "before_delete",
            Self::AfterInsert => "after_insert",
            Self::AfterUpdate => "after_update",
            Self::AfterDelete => "after_delete",
        }
    }
}

/// A database session event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStage {
    /// A transaction began.
    AfterBegin,
    /// Pending changes are about to be flushed.
    BeforeFlush,
    /// Pending changes were flushed.
    AfterFlush,
    /// The transaction is about to commit.
    BeforeCommit,
    /// The transaction committed.
    AfterCommit,
    /// The transaction rolled back.
    AfterRollback,
}

impl SessionStage {
    fn as_str(&self) -> &'static str {
        match self {
            Self::AfterBegin => "after_begin",
            Self::BeforeFlush => "before_flush",
            Self::AfterFlush => "after_flush",
            Self::BeforeCommit => "before_commit",
            Self::AfterCommit => "after_commit",
            Self::AfterRollback => "after_rollback",
        }
    }
}

impl HookDispatcher {
    /// Notifies mappers of a record event.
    pub fn mapper_event(&self, stage: MapperEvent, event: &RecordEvent) -> AppResult<()> {
        self.notify::<dyn Mapper, _>(stage.as_str(), |hook| match stage {
            MapperEvent::BeforeInsert => hook.before_insert(event),
            MapperEvent::BeforeUpdate => hook.before_update(event),
            MapperEvent::BeforeDelete => hook.before_delete(event),
            MapperEvent::AfterInsert => hook.after_insert(event),
            MapperEvent::AfterUpdate => hook.after_update(event),
            MapperEvent::AfterDelete => hook.after_delete(event),
        })
    }

    /// Notifies session observers of a session event.
    pub fn session_event(&self, stage: SessionStage, event: &SessionEvent) -> AppResult<()> {
        self.notify::<dyn Session, _>(stage.as_str(), |hook| match stage {
            SessionStage::AfterBegin => hook.after_begin(event),
            SessionStage::BeforeFlush => hook.before_flush(event),
            SessionStage::AfterFlush => hook.after_flush(event),
            SessionStage::BeforeCommit => hook.before_commit(event),
            SessionStage::AfterCommit => hook.after_commit(event),
            SessionStage::AfterRollback => hook.after_rollback(event),
        })
    }

    /// Notifies domain object observers of a change, before commit.
    pub fn domain_object_modified(&self, entity: &DataDict, operation: DomainOperation) -> AppResult<()> {
        self.notify::<dyn DomainObjectModification, _>("notify", |hook| hook.notify(entity, operation))
    }

    /// Notifies domain object observers of a change, after commit.
    pub fn domain_object_committed(&self, entity: &DataDict, operation: DomainOperation) -> AppResult<()> {
        self.notify::<dyn DomainObjectModification, _>("notify_after_commit", |hook| {
            hook.notify_after_commit(entity, operation)
        })
    }

    /// Notifies observers that a resource URL changed.
    pub fn resource_url_changed(&self, resource: &DataDict) -> AppResult<()> {
        self.notify::<dyn ResourceUrlChange, _>("notify", |hook| hook.notify(resource))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::exports::PluginExport;
    use crate::registry::{PluginInfo, PluginRegistry};
    use datahub_core::error::AppError;
    use datahub_core::types::SessionId;

    #[derive(Default)]
    struct Audit {
        seen: Mutex<Vec<String>>,
    }

    impl DomainObjectModification for Audit {
        fn notify(&self, entity: &DataDict, operation: DomainOperation) -> AppResult<()> {
            let name = entity.get("name").and_then(|v| v.as_str()).unwrap_or("");
            self.seen.lock().expect("lock").push(format!("{operation} {name}"));
            Ok(())
        }
    }

    struct Refuse;

    impl Session for Refuse {
        fn before_commit(&self, _event: &SessionEvent) -> AppResult<()> {
            Err(AppError::plugin("commit refused"))
        }
    }

    #[test]
    fn test_domain_notifications_reach_observer() {
        let audit = Arc::new(Audit::default());
        let mut registry = PluginRegistry::new();
        registry
            .register(
                PluginExport::new(PluginInfo::new("audit", "1.0.0"))
                    .implements::<dyn DomainObjectModification>(audit.clone()),
            )
            .expect("register");
        let dispatcher = HookDispatcher::new(Arc::new(registry));

        let mut entity = DataDict::new();
        entity.insert("name".into(), "census".into());
        dispatcher
            .domain_object_modified(&entity, DomainOperation::New)
            .expect("notify");
        dispatcher
            .domain_object_committed(&entity, DomainOperation::New)
            .expect("notify after commit");

        assert_eq!(audit.seen.lock().expect("lock").len(), 1);
    }

    #[test]
    fn test_session_failure_propagates() {
        let mut registry = PluginRegistry::new();
        registry
            .register(
                PluginExport::new(PluginInfo::new("guard", "1.0.0"))
                    .implements::<dyn Session>(Arc::new(Refuse)),
            )
            .expect("register");
        let dispatcher = HookDispatcher::new(Arc::new(registry));
        let event = SessionEvent::new(SessionId::new());

        assert!(dispatcher.session_event(SessionStage::AfterBegin, &event).is_ok());
        let err = dispatcher
            .session_event(SessionStage::BeforeCommit, &event)
            .unwrap_err();
        assert_eq!(err.message, "commit refused");
    }
}
