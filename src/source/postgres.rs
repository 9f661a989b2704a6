//! `PostgreSQL` connection backed by the sync `postgres` crate.
//!
//! Columns are decoded by their declared type; a column of a type with no
//! decoding fails the read. Parameters are converted to
//! the types the server inferred for the prepared statement, so an update
//! such as `UPDATE t SET payload = $1 WHERE id = $2` binds the JSON document
//! to a `jsonb` column and the key to an integer column as-is.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use log::debug;
use postgres::types::{ToSql, Type};
use postgres::{Client, Column, Config, NoTls, Row as PgRow};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;

use crate::config::ConnectionSettings;
use crate::error::{PipelineError, Result};
use crate::reader::{ResultSet, Value};
use crate::source::SqlConnection;

/// Strip a JDBC prefix, leaving a libpq connection string or URI
#[must_use]
pub fn normalize_url(url: &str) -> &str {
    let url = url.trim();
    url.strip_prefix("jdbc:").unwrap_or(url)
}

pub struct PostgresConnection {
    client: Client,
}

impl PostgresConnection {
    /// Connect with the configured URL, applying user and password when set
    pub fn open(settings: &ConnectionSettings) -> Result<Self> {
        let url = normalize_url(&settings.url);
        let mut config: Config = url
            .parse()
            .map_err(|e| PipelineError::Connection(format!("Invalid PostgreSQL URL: {e}")))?;

        if let Some(user) = &settings.user {
            config.user(user.as_str());
        }
        if let Some(password) = &settings.password {
            config.password(password.as_str());
        }

        let client = config
            .connect(NoTls)
            .map_err(|e| PipelineError::Connection(format!("Failed to connect to PostgreSQL: {e}")))?;

        debug!("Connected to PostgreSQL");
        Ok(Self { client })
    }
}

/// Decode every column of a row by its declared type
///
/// A non-null cell whose type has no decoding fails the read rather than
/// turning into a null.
fn decode_row(row: &PgRow, columns: &[Column]) -> Result<Vec<Value>> {
    columns
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let ty = col.type_();
            let value = match *ty {
                Type::BOOL => row.try_get::<_, Option<bool>>(idx).map(Value::from),
                Type::INT2 => row
                    .try_get::<_, Option<i16>>(idx)
                    .map(|v| Value::from(v.map(i64::from))),
                Type::INT4 => row
                    .try_get::<_, Option<i32>>(idx)
                    .map(|v| Value::from(v.map(i64::from))),
                Type::INT8 => row.try_get::<_, Option<i64>>(idx).map(Value::from),
                Type::FLOAT4 => row
                    .try_get::<_, Option<f32>>(idx)
                    .map(|v| Value::from(v.map(f64::from))),
                Type::FLOAT8 => row.try_get::<_, Option<f64>>(idx).map(Value::from),
                Type::NUMERIC => row.try_get::<_, Option<Decimal>>(idx).map(Value::from),
                Type::DATE => row
                    .try_get::<_, Option<NaiveDate>>(idx)
                    .map(|v| Value::from(v.map(|d| d.to_string()))),
                Type::TIME => row
                    .try_get::<_, Option<NaiveTime>>(idx)
                    .map(|v| Value::from(v.map(|t| t.to_string()))),
                Type::TIMESTAMP => row
                    .try_get::<_, Option<NaiveDateTime>>(idx)
                    .map(|v| Value::from(v.map(|t| t.format("%Y-%m-%dT%H:%M:%S%.f").to_string()))),
                Type::TIMESTAMPTZ => row
                    .try_get::<_, Option<DateTime<Utc>>>(idx)
                    .map(|v| Value::from(v.map(|t| t.to_rfc3339()))),
                Type::UUID => row
                    .try_get::<_, Option<Uuid>>(idx)
                    .map(|v| Value::from(v.map(|u| u.to_string()))),
                Type::BYTEA => row
                    .try_get::<_, Option<Vec<u8>>>(idx)
                    .map(|v| Value::from(v.map(|b| String::from_utf8_lossy(&b).into_owned()))),
                Type::JSON | Type::JSONB => row
                    .try_get::<_, Option<serde_json::Value>>(idx)
                    .map(|v| Value::from(v.map(|j| j.to_string()))),
                _ => row.try_get::<_, Option<String>>(idx).map(Value::from),
            };

            value.map_err(|e| decode_error(col.name(), ty, e))
        })
        .collect()
}

fn decode_error(column: &str, ty: &Type, reason: impl std::fmt::Display) -> PipelineError {
    PipelineError::Read(format!(
        "Column '{column}' of type {ty} could not be decoded ({reason}); cast it to text in the fetch query"
    ))
}

/// A statement parameter converted to the type the server expects
#[derive(Debug)]
enum PgParam {
    Bool(Option<bool>),
    Int2(Option<i16>),
    Int4(Option<i32>),
    Int8(Option<i64>),
    Float4(Option<f32>),
    Float8(Option<f64>),
    Numeric(Option<Decimal>),
    Json(Option<serde_json::Value>),
    Uuid(Option<Uuid>),
    Text(Option<String>),
}

impl PgParam {
    fn as_tosql(&self) -> &(dyn ToSql + Sync) {
        match self {
            PgParam::Bool(value) => value,
            PgParam::Int2(value) => value,
            PgParam::Int4(value) => value,
            PgParam::Int8(value) => value,
            PgParam::Float4(value) => value,
            PgParam::Float8(value) => value,
            PgParam::Numeric(value) => value,
            PgParam::Json(value) => value,
            PgParam::Uuid(value) => value,
            PgParam::Text(value) => value,
        }
    }

    fn convert(value: &Value, ty: &Type) -> Result<Self> {
        let mismatch = || {
            PipelineError::Write(format!(
                "Cannot bind {} value '{value}' to a {ty} parameter",
                value.kind()
            ))
        };

        Ok(match *ty {
            Type::BOOL => PgParam::Bool(match value {
                Value::Null => None,
                Value::Boolean(b) => Some(*b),
                Value::Integer(i) => Some(*i != 0),
                _ => return Err(mismatch()),
            }),
            Type::INT2 => PgParam::Int2(
                as_i64(value)
                    .map_err(|()| mismatch())?
                    .map(i16::try_from)
                    .transpose()
                    .map_err(|_| mismatch())?,
            ),
            Type::INT4 => PgParam::Int4(
                as_i64(value)
                    .map_err(|()| mismatch())?
                    .map(i32::try_from)
                    .transpose()
                    .map_err(|_| mismatch())?,
            ),
            Type::INT8 => PgParam::Int8(as_i64(value).map_err(|()| mismatch())?),
            #[allow(clippy::cast_possible_truncation)]
            Type::FLOAT4 => PgParam::Float4(as_f64(value).map_err(|()| mismatch())?.map(|f| f as f32)),
            Type::FLOAT8 => PgParam::Float8(as_f64(value).map_err(|()| mismatch())?),
            Type::NUMERIC => PgParam::Numeric(match value {
                Value::Null => None,
                Value::Numeric(d) => Some(*d),
                Value::Integer(i) => Some(Decimal::from(*i)),
                other => Some(other.to_string().parse().map_err(|_| mismatch())?),
            }),
            Type::JSON | Type::JSONB => PgParam::Json(match value {
                Value::Null => None,
                Value::Text(s) => Some(serde_json::from_str(s).map_err(|_| mismatch())?),
                _ => return Err(mismatch()),
            }),
            Type::UUID => PgParam::Uuid(match value {
                Value::Null => None,
                Value::Text(s) => Some(Uuid::parse_str(s.trim()).map_err(|_| mismatch())?),
                _ => return Err(mismatch()),
            }),
            _ => PgParam::Text(match value {
                Value::Null => None,
                other => Some(other.to_string()),
            }),
        })
    }
}

fn as_i64(value: &Value) -> std::result::Result<Option<i64>, ()> {
    match value {
        Value::Null => Ok(None),
        Value::Integer(i) => Ok(Some(*i)),
        Value::Boolean(b) => Ok(Some(i64::from(*b))),
        Value::Numeric(d) if d.fract().is_zero() => d.to_i64().map(Some).ok_or(()),
        Value::Text(s) => s.trim().parse().map(Some).map_err(|_| ()),
        _ => Err(()),
    }
}

fn as_f64(value: &Value) -> std::result::Result<Option<f64>, ()> {
    match value {
        Value::Null => Ok(None),
        #[allow(clippy::cast_precision_loss)]
        Value::Integer(i) => Ok(Some(*i as f64)),
        Value::Real(r) => Ok(Some(*r)),
        Value::Numeric(d) => d.to_f64().map(Some).ok_or(()),
        Value::Text(s) => s.trim().parse().map(Some).map_err(|_| ()),
        _ => Err(()),
    }
}

impl SqlConnection for PostgresConnection {
    fn query(&mut self, sql: &str) -> Result<ResultSet> {
        let read_err = |e: postgres::Error| PipelineError::Read(e.to_string());

        let stmt = self.client.prepare(sql).map_err(read_err)?;
        let rows = self.client.query(&stmt, &[]).map_err(read_err)?;

        Ok(ResultSet {
            columns: stmt.columns().iter().map(|c| c.name().to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| decode_row(row, stmt.columns()))
                .collect::<Result<_>>()?,
        })
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<usize> {
        let write_err = |e: postgres::Error| PipelineError::Write(e.to_string());

        let stmt = self.client.prepare(sql).map_err(write_err)?;
        if stmt.params().len() != params.len() {
            return Err(PipelineError::Write(format!(
                "Statement expects {} parameter(s), got {}",
                stmt.params().len(),
                params.len()
            )));
        }

        let converted = stmt
            .params()
            .iter()
            .zip(params)
            .map(|(ty, value)| PgParam::convert(value, ty))
            .collect::<Result<Vec<_>>>()?;
        let refs: Vec<&(dyn ToSql + Sync)> = converted.iter().map(PgParam::as_tosql).collect();

        let affected = self.client.execute(&stmt, &refs).map_err(write_err)?;
        usize::try_from(affected).map_err(|e| PipelineError::Write(e.to_string()))
    }
}
