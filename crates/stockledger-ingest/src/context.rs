use stockledger_canonical::{ActorId, RequestId, TenantId};

/// Already-resolved caller identity for one write.
///
/// Session and tenant resolution happen upstream; a missing tenant here means
/// resolution failed and the write is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Resolved tenant, if any.
    pub tenant_id: Option<TenantId>,
    /// Submitting user or service.
    pub actor_user_id: Option<ActorId>,
    /// Correlation id for this request.
    pub request_id: RequestId,
}

impl RequestContext {
    /// Context for `tenant` with no actor.
    pub fn new(tenant: impl Into<TenantId>, request_id: impl Into<RequestId>) -> Self {
        Self {
            tenant_id: Some(tenant.into()),
            actor_user_id: None,
            request_id: request_id.into(),
        }
    }

    /// Context whose tenant could not be resolved.
    pub fn unresolved(request_id: impl Into<RequestId>) -> Self {
        Self {
            tenant_id: None,
            actor_user_id: None,
            request_id: request_id.into(),
        }
    }

    /// Sets the submitting actor.
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor_user_id = Some(actor.into());
        self
    }
}
