// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Before/after interception protocol fired by query layers.

use crate::types::{QueryContext, QueryEvent};

/// A hook invoked around every query a query layer executes.
///
/// Both methods run synchronously on whatever thread executes the query.
/// Implementations must not fail the query they observe.
pub trait QueryHook: Send + Sync + 'static {
    /// Called before the query runs. Returns the context the query (and the
    /// matching `after_query` call) proceeds with.
    fn before_query(&self, ctx: QueryContext, event: &QueryEvent) -> QueryContext;

    /// Called once the query has completed, successfully or not.
    fn after_query(&self, ctx: &QueryContext, event: &QueryEvent);
}
