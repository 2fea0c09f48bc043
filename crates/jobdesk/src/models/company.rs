//! Company model.

use crate::client::GenericClient;
use crate::error::{BoardError, BoardResult};
use crate::fragment::{FieldMap, FragmentMode, RenameMap, build};
use crate::row::{FromRow, RowExt};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";

/// A company that posts jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> BoardResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// Input for creating a company.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Query-string filters for listing companies.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyFilter {
    pub name_like: Option<String>,
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
}

impl CompanyFilter {
    fn into_field_map(self) -> FieldMap {
        let mut map = FieldMap::new();
        map.insert_opt("nameLike", self.name_like.map(|name| format!("%{name}%")));
        map.insert_opt("minEmployees", self.min_employees);
        map.insert_opt("maxEmployees", self.max_employees);
        map
    }
}

/// Partial update for a company, built field by field.
///
/// A field left unset is not touched; passing `None` to an optional field
/// stores SQL NULL.
#[derive(Debug, Clone, Default)]
pub struct CompanyPatch {
    map: FieldMap,
}

impl CompanyPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.map.insert("name", name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.map.insert("description", description.into());
        self
    }

    pub fn num_employees(mut self, num_employees: Option<i32>) -> Self {
        self.map.insert("numEmployees", num_employees);
        self
    }

    pub fn logo_url(mut self, logo_url: Option<String>) -> Self {
        self.map.insert("logoUrl", logo_url);
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
    RenameMap::from_pairs(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")])
}

fn filter_rename() -> RenameMap {
    RenameMap::from_pairs(&[
        ("nameLike", "name"),
        ("minEmployees", "num_employees"),
        ("maxEmployees", "num_employees"),
    ])
}

impl Company {
    /// Create a company. A duplicate handle is reported as a bad request.
    pub async fn create(client: &impl GenericClient, data: NewCompany) -> BoardResult<Company> {
        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COMPANY_COLUMNS}"
        );
        let row = client
            .query_one(
                &sql,
                &[
                    &data.handle,
                    &data.name,
                    &data.description,
                    &data.num_employees,
                    &data.logo_url,
                ],
            )
            .await
            .map_err(|err| match err {
                BoardError::UniqueViolation(_) => {
                    BoardError::bad_request(format!("Duplicate company: {}", data.handle))
                }
                other => other,
            })?;
        Company::from_row(&row)
    }

    /// List all companies, ordered by name.
    pub async fn find_all(client: &impl GenericClient) -> BoardResult<Vec<Company>> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies ORDER BY name");
        let rows = client.query(&sql, &[]).await?;
        rows.iter().map(Company::from_row).collect()
    }

    /// List companies matching a filter.
    ///
    /// `minEmployees > maxEmployees` is rejected before any SQL is built.
    /// A filter with no fields set degenerates to the unfiltered listing.
    pub async fn filter_all(
        client: &impl GenericClient,
        filter: CompanyFilter,
    ) -> BoardResult<Vec<Company>> {
        if let (Some(min), Some(max)) = (filter.min_employees, filter.max_employees) {
            if min > max {
                return Err(BoardError::bad_request(
                    "minEmployees cannot be greater than maxEmployees",
                ));
            }
        }

        let fields = filter.into_field_map();
        if fields.is_empty() {
            return Self::find_all(client).await;
        }
        let fragment = build(fields, &filter_rename(), FragmentMode::Filter)?;
        let sql = format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE {} ORDER BY name",
            fragment.sql()
        );
        let rows = client.query(&sql, &fragment.params_ref()).await?;
        rows.iter().map(Company::from_row).collect()
    }

    /// Fetch one company by handle.
    pub async fn get(client: &impl GenericClient, handle: &str) -> BoardResult<Company> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE handle = $1");
        let row = client
            .query_opt(&sql, &[&handle])
            .await?
            .ok_or_else(|| BoardError::not_found(format!("No company: {handle}")))?;
        Company::from_row(&row)
    }

    /// Apply a partial update and return the updated company.
    ///
    /// An empty patch fails with a bad request (from the fragment builder);
    /// an unknown handle fails with not found.
    pub async fn update(
        client: &impl GenericClient,
        handle: &str,
        patch: CompanyPatch,
    ) -> BoardResult<Company> {
        let fragment = build(patch.into_field_map(), &update_rename(), FragmentMode::Update)?;
        let key_idx = fragment.len() + 1;
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${key_idx} RETURNING {COMPANY_COLUMNS}",
            fragment.sql()
        );
        let mut params = fragment.params_ref();
        params.push(&handle);

        let row = client
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| BoardError::not_found(format!("No company: {handle}")))?;
        Company::from_row(&row)
    }

    /// Delete a company by handle.
    pub async fn remove(client: &impl GenericClient, handle: &str) -> BoardResult<()> {
        let deleted = client
            .execute("DELETE FROM companies WHERE handle = $1", &[&handle])
            .await?;
        if deleted == 0 {
            return Err(BoardError::not_found(format!("No company: {handle}")));
        }
        Ok(())
    }
}
