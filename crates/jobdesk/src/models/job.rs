//! Job model.
//!
//! `equity` is stored as text: the `hasEquity` filter compares against the
//! string `'0'`, and keeping the column stringly-typed preserves that
//! comparison exactly as observed.

use crate::client::GenericClient;
use crate::error::{BoardError, BoardResult};
use crate::fragment::{FieldMap, FragmentMode, RenameMap, build};
use crate::row::{FromRow, RowExt};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

/// A job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> BoardResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

/// Input for creating a job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<String>,
    pub company_handle: String,
}

/// Query-string filters for listing jobs.
///
/// `title` filters by plain equality; `minSalary` and `hasEquity` get the
/// builder's special clause handling.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobFilter {
    pub title: Option<String>,
    pub min_salary: Option<i32>,
    pub has_equity: Option<bool>,
}

impl JobFilter {
    fn into_field_map(self) -> FieldMap {
        let mut map = FieldMap::new();
        map.insert_opt("title", self.title);
        map.insert_opt("minSalary", self.min_salary);
        map.insert_opt("hasEquity", self.has_equity);
        map
    }
}

/// Partial update for a job, built field by field.
#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    map: FieldMap,
}

impl JobPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.map.insert("title", title.into());
        self
    }

    pub fn salary(mut self, salary: Option<i32>) -> Self {
        self.map.insert("salary", salary);
        self
    }

    pub fn equity(mut self, equity: Option<String>) -> Self {
        self.map.insert("equity", equity);
        self
    }

    pub fn company_handle(mut self, handle: impl Into<String>) -> Self {
        self.map.insert("companyHandle", handle.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn into_field_map(self) -> FieldMap {
        self.map
    }
}

fn update_rename() -> RenameMap {
    RenameMap::from_pairs(&[("companyHandle", "company_handle")])
}

fn filter_rename() -> RenameMap {
    RenameMap::from_pairs(&[("minSalary", "salary"), ("hasEquity", "equity")])
}

impl Job {
    /// Create a job and return it with its assigned id.
    pub async fn create(client: &impl GenericClient, data: NewJob) -> BoardResult<Job> {
        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {JOB_COLUMNS}"
        );
        let row = client
            .query_one(
                &sql,
                &[&data.title, &data.salary, &data.equity, &data.company_handle],
            )
            .await?;
        Job::from_row(&row)
    }

    /// List all jobs, ordered by id.
    pub async fn find_all(client: &impl GenericClient) -> BoardResult<Vec<Job>> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs ORDER BY id");
        let rows = client.query(&sql, &[]).await?;
        rows.iter().map(Job::from_row).collect()
    }

    /// List jobs matching a filter.
    ///
    /// An empty filter, or one whose only field was a falsy `hasEquity`
    /// (which produces an empty fragment), degenerates to the unfiltered
    /// listing.
    pub async fn filter_all(client: &impl GenericClient, filter: JobFilter) -> BoardResult<Vec<Job>> {
        let fields = filter.into_field_map();
        if fields.is_empty() {
            return Self::find_all(client).await;
        }
        let fragment = build(fields, &filter_rename(), FragmentMode::Filter)?;
        if fragment.is_empty() {
            return Self::find_all(client).await;
        }
        let sql = format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE {} ORDER BY id",
            fragment.sql()
        );
        let rows = client.query(&sql, &fragment.params_ref()).await?;
        rows.iter().map(Job::from_row).collect()
    }

    /// Fetch one job by id.
    pub async fn get(client: &impl GenericClient, id: i32) -> BoardResult<Job> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
        let row = client
            .query_opt(&sql, &[&id])
            .await?
            .ok_or_else(|| BoardError::not_found(format!("No job: {id}")))?;
        Job::from_row(&row)
    }

    /// Apply a partial update and return the updated job.
    pub async fn update(client: &impl GenericClient, id: i32, patch: JobPatch) -> BoardResult<Job> {
        let fragment = build(patch.into_field_map(), &update_rename(), FragmentMode::Update)?;
        let key_idx = fragment.len() + 1;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${key_idx} RETURNING {JOB_COLUMNS}",
            fragment.sql()
        );
        let mut params = fragment.params_ref();
        params.push(&id);

        let row = client
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| BoardError::not_found(format!("No job: {id}")))?;
        Job::from_row(&row)
    }

    /// Delete a job by id.
    pub async fn remove(client: &impl GenericClient, id: i32) -> BoardResult<()> {
        let deleted = client
            .execute("DELETE FROM jobs WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(BoardError::not_found(format!("No job: {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;

    #[test]
    fn filter_with_equity_substitutes_string_zero() {
        let filter = JobFilter {
            title: Some("test".into()),
            min_salary: Some(2),
            has_equity: Some(true),
        };
        let fragment =
            build(filter.into_field_map(), &filter_rename(), FragmentMode::Filter).unwrap();
        assert_eq!(
            fragment.sql(),
            r#""title"=$1 AND salary>=$2 AND "equity"!=$3"#
        );
        assert_eq!(fragment.values()[2], FieldValue::Text("0".into()));
    }

    #[test]
    fn filter_without_equity_drops_clause_and_renumbers() {
        let filter = JobFilter {
            title: Some("test".into()),
            min_salary: Some(2),
            has_equity: Some(false),
        };
        let fragment =
            build(filter.into_field_map(), &filter_rename(), FragmentMode::Filter).unwrap();
        assert_eq!(fragment.sql(), r#""title"=$1 AND salary>=$2"#);
        assert_eq!(fragment.len(), 2);
    }

    #[test]
    fn lone_false_equity_filter_is_empty_not_an_error() {
        let filter = JobFilter {
            has_equity: Some(false),
            ..Default::default()
        };
        let fragment =
            build(filter.into_field_map(), &filter_rename(), FragmentMode::Filter).unwrap();
        assert!(fragment.is_empty());
    }

    #[test]
    fn patch_allows_explicit_nulls() {
        let patch = JobPatch::new()
            .title("New2")
            .salary(None)
            .equity(None)
            .company_handle("c2");
        let fragment =
            build(patch.into_field_map(), &update_rename(), FragmentMode::Update).unwrap();
        assert_eq!(
            fragment.sql(),
            r#""title"=$1, "salary"=$2, "equity"=$3, "company_handle"=$4"#
        );
        assert_eq!(fragment.values()[1], FieldValue::Null);
        assert_eq!(fragment.values()[2], FieldValue::Null);
    }

    #[test]
    fn filter_deserializes_camel_case_query_keys() {
        let filter: JobFilter = serde_json::from_value(serde_json::json!({
            "minSalary": 100,
            "hasEquity": true,
        }))
        .unwrap();
        assert_eq!(filter.min_salary, Some(100));
        assert_eq!(filter.has_equity, Some(true));
        assert_eq!(filter.title, None);
    }
}
