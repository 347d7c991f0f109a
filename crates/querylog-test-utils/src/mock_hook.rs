// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hook that records the notifications it receives.

use std::sync::{Arc, Mutex, PoisonError};

use querylog_core::{QueryContext, QueryEvent, QueryHook};

/// One notification seen by [`RecordingHook`].
#[derive(Debug, Clone)]
pub enum HookCall {
    Before { name: String, query: String },
    After {
        name: String,
        event: QueryEvent,
        request_id: Option<String>,
    },
}

/// Records before/after calls into a log shared between hooks, so ordering
/// across several hooks can be asserted.
#[derive(Debug, Clone)]
pub struct RecordingHook {
    name: String,
    calls: Arc<Mutex<Vec<HookCall>>>,
    request_id: Option<String>,
}

impl RecordingHook {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: Arc::new(Mutex::new(Vec::new())),
            request_id: None,
        }
    }

    /// A hook writing into the same call log as `self`.
    pub fn sibling(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: Arc::clone(&self.calls),
            request_id: None,
        }
    }

    /// Make `before_query` tag the context with `request_id`.
    pub fn tagging(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn calls(&self) -> Vec<HookCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events passed to `after_query`, across all sibling hooks.
    pub fn completed(&self) -> Vec<QueryEvent> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HookCall::After { name, event, .. } if name == self.name => Some(event),
                _ => None,
            })
            .collect()
    }

    /// Request ids of the contexts passed to this hook's `after_query`.
    pub fn after_request_ids(&self) -> Vec<Option<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HookCall::After {
                    name, request_id, ..
                } if name == self.name => Some(request_id),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: HookCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl QueryHook for RecordingHook {
    fn before_query(&self, ctx: QueryContext, event: &QueryEvent) -> QueryContext {
        self.push(HookCall::Before {
            name: self.name.clone(),
            query: event.query.clone(),
        });
        match &self.request_id {
            Some(id) => ctx.with_request_id(id.clone()),
            None => ctx,
        }
    }

    fn after_query(&self, ctx: &QueryContext, event: &QueryEvent) {
        self.push(HookCall::After {
            name: self.name.clone(),
            event: event.clone(),
            request_id: ctx.request_id().map(str::to_string),
        });
    }
}
