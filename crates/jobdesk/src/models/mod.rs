//! Entity models.
//!
//! Each model is a thin consumer of the fragment builder: it builds a
//! `SET`/`WHERE` fragment, embeds it into a literal SQL template, runs one
//! parameterized statement through a [`GenericClient`](crate::GenericClient),
//! and maps the returned rows back into a record.

pub mod company;
pub mod job;
pub mod user;

pub use company::{Company, CompanyFilter, CompanyPatch, NewCompany};
pub use job::{Job, JobFilter, JobPatch, NewJob};
pub use user::{NewUser, User, UserPatch};
