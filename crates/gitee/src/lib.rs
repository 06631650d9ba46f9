//! Gitee webhook payload model.
//!
//! Typed representations of the webhook events Gitee delivers to a robot,
//! together with the deserializer that turns a raw request body into one of
//! them. Only the fields robots and the dispatcher actually read are modelled;
//! unknown fields in the JSON are ignored.
//!
//! ## Architectural Layer
//!
//! **Data.** This crate has no runtime, network, or logging dependencies. The
//! `robot` crate calls [`GiteeEvent::from_payload`] and sees nothing else of
//! the JSON schema.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`events`] | Event structs (`NoteEvent`, `IssueEvent`, ...) and their nested hook objects |
//! | [`payload`] | [`GiteeEvent`] trait: event-type identifier, deserialization, validation |
//! | [`errors`] | [`PayloadError`] |

pub mod errors;
pub mod events;
pub mod payload;

pub use errors::PayloadError;
pub use events::{
    BranchHook, Comment, IssueEvent, IssueHook, Label, NoteEvent, PullRequestEvent,
    PullRequestHook, PushEvent, Repository, User,
};
pub use payload::GiteeEvent;
