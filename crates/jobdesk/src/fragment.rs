//! Partial-update / filter SQL fragment builder.
//!
//! This is the core of the crate: it turns an ordered map of logical field
//! names and values into a parameterized SQL fragment, either a comma-joined
//! `SET` list (update mode) or an AND-joined predicate list (filter mode),
//! plus the positional parameter values aligned with the `$1, $2, ...`
//! placeholders.

use crate::error::{BoardError, BoardResult};
use crate::value::FieldValue;
use tokio_postgres::types::ToSql;

/// An insertion-ordered map from logical field name to value.
///
/// Iteration order is the order the `$n` placeholders are assigned in, so it
/// must match the order fields were supplied in. Keys are unique; inserting
/// an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    /// Create an empty field map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing the value in place if the key exists.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    /// Insert a field only when a value is present.
    ///
    /// `None` means "not supplied" and leaves the map untouched; to store an
    /// explicit SQL NULL, insert [`FieldValue::Null`].
    pub fn insert_opt<T: Into<FieldValue>>(
        &mut self,
        name: impl Into<String>,
        value: Option<T>,
    ) -> &mut Self {
        if let Some(v) = value {
            self.insert(name, v);
        }
        self
    }

    /// Look up a field's value.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn into_entries(self) -> Vec<(String, FieldValue)> {
        self.entries
    }
}

/// Translation table from logical field names to storage column names.
///
/// Fields absent from the map keep their own name as the column name.
#[derive(Debug, Clone, Default)]
pub struct RenameMap {
    entries: Vec<(String, String)>,
}

impl RenameMap {
    /// Create an empty rename map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rename map from static pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|(field, column)| (field.to_string(), column.to_string()))
                .collect(),
        }
    }

    /// Add a field-to-column translation.
    pub fn insert(&mut self, field: impl Into<String>, column: impl Into<String>) -> &mut Self {
        self.entries.push((field.into(), column.into()));
        self
    }

    /// Resolve a logical field name to its column name, falling back to the
    /// field name itself.
    pub fn resolve<'a>(&'a self, field: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, c)| c.as_str())
            .unwrap_or(field)
    }
}

/// Builder mode: assignment list for writes, predicate list for reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FragmentMode {
    /// Comma-joined `"col"=$n` assignments.
    #[default]
    Update,
    /// AND-joined comparison predicates.
    Filter,
}

impl FragmentMode {
    fn joiner(self) -> &'static str {
        match self {
            FragmentMode::Update => ", ",
            FragmentMode::Filter => " AND ",
        }
    }
}

/// Clause shape for a field, resolved from its logical name.
///
/// The comparison kinds emit the column unquoted while the rest double-quote
/// it; that asymmetry is load-bearing for compatibility and must not be
/// "fixed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClauseKind {
    /// `"col"=$n`
    Equal,
    /// `col>=$n`
    AtLeast,
    /// `col<=$n`
    AtMost,
    /// `"col" ILIKE $n`
    ILike,
    /// `"col"!=$n`, with the truthy/falsy pre-pass in [`build`]
    EquityFlag,
}

const SPECIAL_FIELDS: &[(&str, ClauseKind)] = &[
    ("minEmployees", ClauseKind::AtLeast),
    ("minSalary", ClauseKind::AtLeast),
    ("maxEmployees", ClauseKind::AtMost),
    ("nameLike", ClauseKind::ILike),
    ("hasEquity", ClauseKind::EquityFlag),
];

fn clause_kind(field: &str) -> ClauseKind {
    SPECIAL_FIELDS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, kind)| *kind)
        .unwrap_or(ClauseKind::Equal)
}

/// A built SQL fragment plus its positional parameter values.
///
/// The number of values always equals the number of clauses, and the `$n`
/// indices are contiguous from 1.
#[must_use]
#[derive(Debug)]
pub struct Fragment {
    sql: String,
    values: Vec<FieldValue>,
}

impl Fragment {
    /// The SQL fragment with `$1, $2, ...` placeholders.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The parameter values, positionally aligned with the placeholders.
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Number of clauses (= number of parameters).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when every field was dropped by the pre-pass (e.g. a filter whose
    /// only field was a falsy `hasEquity`).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values
            .iter()
            .map(|v| v as &(dyn ToSql + Sync))
            .collect()
    }
}

/// Build a SQL fragment from a field map.
///
/// Fails with [`BoardError::BadRequest`] when `fields` is empty. The
/// `hasEquity` field resolves before placeholder indices are assigned: a
/// falsy value drops the field from both the fragment and the values, a
/// truthy value keeps the clause but replaces the value with the string
/// `"0"`.
///
/// ```
/// use jobdesk::{FieldMap, FragmentMode, RenameMap, build};
///
/// let mut fields = FieldMap::new();
/// fields
///     .insert("firstName", "Phoenix")
///     .insert("lastName", "Petterson")
///     .insert("isAdmin", false);
/// let rename = RenameMap::from_pairs(&[
///     ("firstName", "first_name"),
///     ("lastName", "last_name"),
///     ("isAdmin", "is_admin"),
/// ]);
///
/// let fragment = build(fields, &rename, FragmentMode::Update).unwrap();
/// assert_eq!(fragment.sql(), r#""first_name"=$1, "last_name"=$2, "is_admin"=$3"#);
/// assert_eq!(fragment.values().len(), 3);
/// ```
pub fn build(fields: FieldMap, rename: &RenameMap, mode: FragmentMode) -> BoardResult<Fragment> {
    if fields.is_empty() {
        return Err(BoardError::bad_request("No data"));
    }

    let mut entries = fields.into_entries();

    // hasEquity resolves before positions are assigned, so every later field
    // renumbers when it is dropped.
    if let Some(pos) = entries.iter().position(|(name, _)| name == "hasEquity") {
        if entries[pos].1.is_truthy() {
            entries[pos].1 = FieldValue::Text("0".to_string());
        } else {
            entries.remove(pos);
        }
    }

    let mut clauses = Vec::with_capacity(entries.len());
    let mut values = Vec::with_capacity(entries.len());

    for (name, value) in entries {
        let kind = clause_kind(&name);
        let column = rename.resolve(&name);
        let idx = values.len() + 1;
        clauses.push(match kind {
            ClauseKind::AtLeast => format!("{column}>=${idx}"),
            ClauseKind::AtMost => format!("{column}<=${idx}"),
            ClauseKind::ILike => format!("\"{column}\" ILIKE ${idx}"),
            ClauseKind::EquityFlag => format!("\"{column}\"!=${idx}"),
            ClauseKind::Equal => format!("\"{column}\"=${idx}"),
        });
        values.push(value);
    }

    Ok(Fragment {
        sql: clauses.join(mode.joiner()),
        values,
    })
}
