//! # jobdesk
//!
//! A small job-board backend core for PostgreSQL.
//!
//! The heart of the crate is the partial-update / filter SQL fragment
//! builder: an ordered field map goes in, a parameterized `SET` or `WHERE`
//! fragment plus its positional values comes out. Thin entity models
//! (companies, jobs, users) consume the builder, run one parameterized
//! statement each, and map rows back to records.
//!
//! ```ignore
//! use jobdesk::{AppConfig, Company, CompanyFilter};
//!
//! let pool = AppConfig::from_env()?.create_pool()?;
//! let client = pool.get().await?;
//!
//! let filter = CompanyFilter {
//!     name_like: Some("net".into()),
//!     min_employees: Some(10),
//!     ..Default::default()
//! };
//! let companies = Company::filter_all(&client, filter).await?;
//! ```
//!
//! Models accept anything implementing [`GenericClient`], so the same
//! operations run against a direct connection, a pooled client, or inside a
//! transaction.

pub mod client;
pub mod config;
pub mod error;
pub mod fragment;
pub mod models;
pub mod pool;
pub mod row;
pub mod value;

pub use client::GenericClient;
pub use config::AppConfig;
pub use error::{BoardError, BoardResult};
pub use fragment::{FieldMap, Fragment, FragmentMode, RenameMap, build};
pub use models::{
    Company, CompanyFilter, CompanyPatch, Job, JobFilter, JobPatch, NewCompany, NewJob, NewUser,
    User, UserPatch,
};
pub use pool::{create_pool, create_pool_with_config};
pub use row::{FromRow, RowExt};
pub use value::FieldValue;
