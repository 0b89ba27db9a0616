//! A client paired with a composer.

use crate::client::GenericClient;
use crate::config::ComposerConfig;
use crate::error::QbResult;
use crate::qb::{Clause, Composer, Statement};
use crate::value::Value;
use crate::vendor::Dialect;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Builds statements with a shared [`Composer`] and executes them on `C`.
///
/// Each build holds the composer lock for its whole lifecycle, so concurrent tasks
/// never interleave parameter lists. Mutating operations execute exactly once.
///
/// ```ignore
/// let db = Db::new(client);
/// let affected = db.update("users", [("status", "inactive")], [eq("id", 7)]).await?;
/// ```
pub struct Db<C> {
    client: Arc<C>,
    composer: Mutex<Composer>,
}

impl<C: GenericClient + 'static> Db<C> {
    pub fn new(client: C) -> Self {
        Self::with_config(client, ComposerConfig::default())
    }

    pub fn with_config(client: C, config: ComposerConfig) -> Self {
        let client = Arc::new(client);
        let dialect: Arc<dyn Dialect> = client.clone();
        Self {
            client,
            composer: Mutex::new(Composer::with_dialect(dialect).with_config(config)),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run a build with exclusive access to the composer.
    pub async fn build<R>(&self, f: impl FnOnce(&mut Composer) -> QbResult<R>) -> QbResult<R> {
        let mut composer = self.composer.lock().await;
        f(&mut composer)
    }

    /// Build then execute exactly once.
    pub async fn run(&self, f: impl FnOnce(&mut Composer) -> QbResult<Statement>) -> QbResult<u64> {
        let stmt = self.build(f).await?;
        stmt.execute(self.client.as_ref()).await
    }

    pub async fn insert<I, K, V>(&self, table: &str, pairs: I) -> QbResult<u64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.run(|qb| qb.insert(table, pairs)).await
    }

    pub async fn replace<I, K, V>(&self, table: &str, pairs: I) -> QbResult<u64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.run(|qb| qb.replace(table, pairs)).await
    }

    pub async fn update<I, K, V, J, T>(&self, table: &str, pairs: I, clauses: J) -> QbResult<u64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
        J: IntoIterator<Item = T>,
        T: Into<Clause>,
    {
        self.run(|qb| qb.update(table, pairs, clauses)).await
    }

    pub async fn delete<J, T>(&self, table: &str, clauses: J) -> QbResult<u64>
    where
        J: IntoIterator<Item = T>,
        T: Into<Clause>,
    {
        self.run(|qb| qb.delete(table, clauses)).await
    }

    pub async fn insert_select<I, S, K, T, J, U>(
        &self,
        target: &str,
        columns: I,
        source: &str,
        source_columns: K,
        clauses: J,
    ) -> QbResult<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        K: IntoIterator<Item = T>,
        T: AsRef<str>,
        J: IntoIterator<Item = U>,
        U: Into<Clause>,
    {
        self.run(|qb| qb.insert_select(target, columns, source, source_columns, clauses))
            .await
    }

    pub async fn create_select<I, S, J, T>(
        &self,
        target: &str,
        source: &str,
        columns: I,
        clauses: J,
    ) -> QbResult<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = T>,
        T: Into<Clause>,
    {
        self.run(|qb| qb.create_select(target, source, columns, clauses))
            .await
    }

    pub async fn select_into<I, S, J, T>(
        &self,
        target: &str,
        source: &str,
        columns: I,
        clauses: J,
    ) -> QbResult<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = T>,
        T: Into<Clause>,
    {
        self.run(|qb| qb.select_into(target, source, columns, clauses))
            .await
    }

    pub async fn create<I, S>(&self, table: &str, definitions: I) -> QbResult<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.run(|qb| qb.create(table, definitions)).await
    }

    pub async fn alter<I, S>(&self, table: &str, actions: I) -> QbResult<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.run(|qb| qb.alter(table, actions)).await
    }

    pub async fn drop(&self, table: &str) -> QbResult<u64> {
        self.run(|qb| qb.drop(table)).await
    }
}
