//! tokio-postgres adapter.

use crate::client::GenericClient;
use crate::error::QbResult;
use crate::value::Value;
use crate::vendor::{Dialect, Vendor};
use bytes::BytesMut;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

type BoxError = Box<dyn std::error::Error + Sync + Send>;

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql(ty, out),
            Value::Int(v) => {
                if *ty == Type::INT2 {
                    i16::try_from(*v)?.to_sql(ty, out)
                } else if *ty == Type::INT4 {
                    i32::try_from(*v)?.to_sql(ty, out)
                } else if *ty == Type::FLOAT8 {
                    (*v as f64).to_sql(ty, out)
                } else if *ty == Type::TEXT || *ty == Type::VARCHAR {
                    v.to_string().to_sql(ty, out)
                } else {
                    v.to_sql(ty, out)
                }
            }
            Value::Float(v) => {
                if *ty == Type::FLOAT4 {
                    (*v as f32).to_sql(ty, out)
                } else {
                    v.to_sql(ty, out)
                }
            }
            Value::Text(v) => v.to_sql(ty, out),
            Value::Bytes(v) => v.to_sql(ty, out),
            Value::Timestamp(v) => v.to_sql(ty, out),
            Value::Date(v) => v.to_sql(ty, out),
            Value::Uuid(v) => v.to_sql(ty, out),
            Value::Json(v) => v.to_sql(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn param_refs(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

impl Dialect for tokio_postgres::Client {
    fn vendor(&self) -> Option<Vendor> {
        Some(Vendor::PostgreSql)
    }
}

impl GenericClient for tokio_postgres::Client {
    async fn execute(&self, sql: &str, params: &[Value]) -> QbResult<u64> {
        let refs = param_refs(params);
        Ok(tokio_postgres::Client::execute(self, sql, &refs).await?)
    }
}

impl Dialect for tokio_postgres::Transaction<'_> {
    fn vendor(&self) -> Option<Vendor> {
        Some(Vendor::PostgreSql)
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    async fn execute(&self, sql: &str, params: &[Value]) -> QbResult<u64> {
        let refs = param_refs(params);
        Ok(tokio_postgres::Transaction::execute(self, sql, &refs).await?)
    }
}
