//! Statement composition.
//!
//! A [`Composer`] owns the mutable state of one statement build: the parameter list,
//! the pending source table used by `create_select`/`select_into`, and the keyword
//! flag that switches condition clauses between `WHERE` and `HAVING`. Clause
//! fragments may be supplied in any order; they are concatenated in grammar order.
//!
//! ```ignore
//! use sqlweave::prelude::*;
//!
//! let mut qb = Composer::new(Vendor::PostgreSql);
//! let filter = qb.where_clause([eq("id", 5)])?;
//! let stmt = qb.select("users", ["*"], [filter])?;
//! assert_eq!(stmt.sql(), "SELECT * FROM users WHERE id = __param__ ");
//! ```

use crate::condition::{Condition, ConditionTree};
use crate::config::ComposerConfig;
use crate::error::{QbError, QbResult};
use crate::qb::clause::{ClauseKeyword, RenderCtx, build_clause};
use crate::qb::fragment::{Fragment, FragmentKind};
use crate::qb::param::ParamList;
use crate::qb::statement::{Statement, StatementKind};
use crate::schema::Schema;
use crate::value::Value;
use crate::vendor::{Dialect, Vendor};
use std::sync::Arc;

/// One argument of a clause-accepting call: a pre-built fragment or a raw condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Fragment(Fragment),
    Condition(ConditionTree),
}

impl From<Fragment> for Clause {
    fn from(f: Fragment) -> Self {
        Clause::Fragment(f)
    }
}

impl From<&str> for Clause {
    fn from(s: &str) -> Self {
        Clause::Fragment(Fragment::raw(s))
    }
}

impl From<String> for Clause {
    fn from(s: String) -> Self {
        Clause::Fragment(Fragment::raw(s))
    }
}

impl From<Condition> for Clause {
    fn from(c: Condition) -> Self {
        Clause::Condition(ConditionTree::Leaf(c))
    }
}

impl From<ConditionTree> for Clause {
    fn from(t: ConditionTree) -> Self {
        Clause::Condition(t)
    }
}

/// Empty clause list for calls that take none.
pub const NO_CLAUSES: [Clause; 0] = [];

const SELECT_CLAUSES: [FragmentKind; 7] = [
    FragmentKind::Join,
    FragmentKind::Where,
    FragmentKind::GroupBy,
    FragmentKind::Having,
    FragmentKind::OrderBy,
    FragmentKind::Limit,
    FragmentKind::Union,
];

const MUTATION_CLAUSES: [FragmentKind; 3] =
    [FragmentKind::Where, FragmentKind::OrderBy, FragmentKind::Limit];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceMode {
    /// `CREATE TABLE <target> AS SELECT ... FROM <source>`
    CreateAs,
    /// `SELECT ... INTO <target> FROM <source>`
    Into,
}

#[derive(Debug, Default)]
struct BuildContext {
    params: ParamList,
    pending_source: Option<(String, SourceMode)>,
    keyword: ClauseKeyword,
}

impl BuildContext {
    fn reset(&mut self) {
        self.params.clear();
        self.pending_source = None;
        self.keyword = ClauseKeyword::Where;
    }
}

/// Builds statements for one dialect.
///
/// A composer is not shared between concurrent builds; wrap it in a mutex (see
/// [`Db`](crate::Db)) when several tasks use the same one.
pub struct Composer {
    dialect: Arc<dyn Dialect>,
    config: ComposerConfig,
    ctx: BuildContext,
}

impl std::fmt::Debug for Composer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer")
            .field("vendor", &self.dialect.vendor())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn column_text<I, S>(columns: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let cols: Vec<String> = columns
        .into_iter()
        .map(|c| c.as_ref().trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if cols.is_empty() {
        "*".to_string()
    } else {
        cols.join(", ")
    }
}

fn table_name(table: &str) -> QbResult<&str> {
    let table = table.trim();
    if table.is_empty() {
        return Err(QbError::EmptyArgument("table"));
    }
    Ok(table)
}

/// Render an INSERT/UPDATE value: NULL and the current-time family pass through.
fn render_value(ctx: &RenderCtx<'_>, value: &Value, params: &mut ParamList) -> String {
    if value.is_null_token() {
        "NULL".to_string()
    } else if value.is_current_timestamp_token() {
        "CURRENT_TIMESTAMP()".to_string()
    } else {
        ctx.bind(value, params)
    }
}

fn collect_pairs<I, K, V>(pairs: I) -> QbResult<Vec<(String, Value)>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let mut out = Vec::new();
    for (k, v) in pairs {
        let k = k.into().trim().to_string();
        if k.is_empty() {
            return Err(QbError::EmptyArgument("column"));
        }
        out.push((k, v.into()));
    }
    if out.is_empty() {
        return Err(QbError::EmptyArgument("values"));
    }
    Ok(out)
}

impl Composer {
    /// Create a composer with default configuration.
    pub fn new(dialect: impl Dialect + 'static) -> Self {
        Self::with_dialect(Arc::new(dialect))
    }

    pub fn with_dialect(dialect: Arc<dyn Dialect>) -> Self {
        Self {
            dialect,
            config: ComposerConfig::default(),
            ctx: BuildContext::default(),
        }
    }

    /// Create a composer whose dialect is the configured vendor.
    pub fn from_config(config: ComposerConfig) -> Self {
        Self::new(config.vendor).with_config(config)
    }

    pub fn with_config(mut self, config: ComposerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Switch parameter mode on or off.
    pub fn set_prepare(&mut self, prepare: bool) {
        self.config.prepare = prepare;
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn vendor(&self) -> Option<Vendor> {
        self.dialect.vendor()
    }

    /// Schema DSL bound to this composer's dialect.
    pub fn schema(&self) -> Schema<'_> {
        Schema::new(self.dialect.as_ref())
    }

    fn reject(&mut self, err: QbError) -> QbError {
        self.ctx.reset();
        if err.is_unknown_data_type() {
            tracing::warn!(target: "sqlweave.qb", reason = %err, "statement build failed");
        } else {
            tracing::debug!(target: "sqlweave.qb", reason = %err, "statement build rejected");
        }
        err
    }

    /// Run one top-level build and turn its SQL and collected parameters into a
    /// [`Statement`]. Any failure clears the build state.
    fn run<F>(&mut self, kind: StatementKind, build: F) -> QbResult<Statement>
    where
        F: FnOnce(&mut Self) -> QbResult<String>,
    {
        self.ctx.reset();
        match build(self) {
            Ok(sql) => {
                let params = self.ctx.params.take();
                self.ctx.reset();
                let stmt = Statement::new(kind, sql, params, self.config.prepare);
                if self.config.log_sql {
                    tracing::debug!(
                        target: "sqlweave.sql",
                        kind = %kind,
                        param_count = stmt.params().len(),
                        sql = %self.config.truncate_sql(stmt.sql()),
                        "statement built"
                    );
                }
                Ok(stmt)
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    // ==================== Condition clauses ====================

    /// Build a ` WHERE ... ` fragment.
    ///
    /// A single pre-built WHERE/HAVING fragment is returned unchanged.
    pub fn where_clause<I, C>(&mut self, clauses: I) -> QbResult<Fragment>
    where
        I: IntoIterator<Item = C>,
        C: Into<Clause>,
    {
        let clauses: Vec<Clause> = clauses.into_iter().map(Into::into).collect();
        let keyword = std::mem::take(&mut self.ctx.keyword);
        match self.condition_clause(keyword, clauses) {
            Ok(fragment) => Ok(fragment),
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Build a ` HAVING ... ` fragment.
    pub fn having<I, C>(&mut self, clauses: I) -> QbResult<Fragment>
    where
        I: IntoIterator<Item = C>,
        C: Into<Clause>,
    {
        self.ctx.keyword = ClauseKeyword::Having;
        self.where_clause(clauses)
    }

    fn condition_clause(&self, keyword: ClauseKeyword, clauses: Vec<Clause>) -> QbResult<Fragment> {
        if let [Clause::Fragment(f)] = clauses.as_slice() {
            if matches!(f.kind(), FragmentKind::Where | FragmentKind::Having) {
                return Ok(f.clone());
            }
        }

        let mut trees = Vec::with_capacity(clauses.len());
        for clause in clauses {
            match clause {
                Clause::Condition(tree) => trees.push(tree),
                Clause::Fragment(f) => {
                    return Err(QbError::invalid_fragment(format!(
                        "'{}' cannot be combined into a {} clause",
                        f.as_str().trim(),
                        keyword.as_str()
                    )));
                }
            }
        }
        let ctx = RenderCtx {
            dialect: self.dialect.as_ref(),
            prepare: self.config.prepare,
        };
        build_clause(keyword, &trees, &ctx)
    }

    /// Sort clause arguments into grammar order and append their parameters.
    ///
    /// Raw conditions are assembled into a WHERE fragment unless one was supplied.
    fn clause_suffix(
        &mut self,
        clauses: Vec<Clause>,
        allowed: &[FragmentKind],
    ) -> QbResult<String> {
        let mut fragments: Vec<Fragment> = Vec::new();
        let mut trees: Vec<ConditionTree> = Vec::new();

        for clause in clauses {
            match clause {
                Clause::Condition(tree) => trees.push(tree),
                Clause::Fragment(f) => {
                    let kind = f.kind();
                    if !allowed.contains(&kind) {
                        return Err(QbError::invalid_fragment(format!(
                            "unexpected clause '{}'",
                            f.as_str().trim()
                        )));
                    }
                    if !kind.repeatable() && fragments.iter().any(|g| g.kind() == kind) {
                        return Err(QbError::invalid_fragment(format!(
                            "duplicate clause '{}'",
                            f.as_str().trim()
                        )));
                    }
                    fragments.push(f);
                }
            }
        }

        if !trees.is_empty() {
            if fragments.iter().any(|f| f.kind() == FragmentKind::Where) {
                return Err(QbError::invalid_fragment(
                    "conditions supplied alongside a pre-built WHERE clause",
                ));
            }
            let ctx = RenderCtx {
                dialect: self.dialect.as_ref(),
                prepare: self.config.prepare,
            };
            fragments.push(build_clause(ClauseKeyword::Where, &trees, &ctx)?);
        }

        let has = |kind: FragmentKind| fragments.iter().any(|f| f.kind() == kind);
        if has(FragmentKind::Having) && !has(FragmentKind::GroupBy) {
            return Err(QbError::HavingWithoutGroupBy);
        }

        if fragments.is_empty() {
            return Ok(String::new());
        }
        fragments.sort_by_key(|f| f.kind().rank());

        let mut parts = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            let (sql, params) = fragment.into_parts();
            self.ctx.params.extend(&params);
            parts.push(sql.trim().to_string());
        }
        Ok(format!(" {} ", parts.join(" ")))
    }

    // ==================== SELECT ====================

    fn select_body(
        &mut self,
        table: &str,
        columns: String,
        clauses: Vec<Clause>,
    ) -> QbResult<String> {
        let table = table_name(table)?;
        let head = match self.ctx.pending_source.take() {
            Some((source, SourceMode::CreateAs)) => {
                format!("CREATE TABLE {table} AS SELECT {columns} FROM {source}")
            }
            Some((source, SourceMode::Into)) => {
                format!("SELECT {columns} INTO {table} FROM {source}")
            }
            None => format!("SELECT {columns} FROM {table}"),
        };
        let suffix = self.clause_suffix(clauses, &SELECT_CLAUSES)?;
        Ok(format!("{head}{suffix}"))
    }

    /// `SELECT <columns> FROM <table>` followed by the supplied clauses.
    ///
    /// An empty column list selects `*`.
    pub fn select<I, S, J, C>(&mut self, table: &str, columns: I, clauses: J) -> QbResult<Statement>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = C>,
        C: Into<Clause>,
    {
        let columns = column_text(columns);
        let clauses: Vec<Clause> = clauses.into_iter().map(Into::into).collect();
        self.run(StatementKind::Select, |qb| qb.select_body(table, columns, clauses))
    }

    /// Alias for [`Composer::select`].
    pub fn selecting<I, S, J, C>(
        &mut self,
        table: &str,
        columns: I,
        clauses: J,
    ) -> QbResult<Statement>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = C>,
        C: Into<Clause>,
    {
        self.select(table, columns, clauses)
    }

    fn nested_select(
        &mut self,
        keyword: &str,
        table: &str,
        columns: String,
        clauses: Vec<Clause>,
    ) -> QbResult<Fragment> {
        let outer = self.ctx.params.take();
        let result = self.select_body(table, columns, clauses);
        let inner = std::mem::replace(&mut self.ctx.params, outer);
        match result {
            Ok(sql) => Ok(Fragment::new(
                FragmentKind::Union,
                format!(" {keyword} {} ", sql.trim()),
                inner,
            )),
            Err(err) => Err(self.reject(err)),
        }
    }

    /// ` UNION SELECT ... ` fragment.
    pub fn union<I, S, J, C>(&mut self, table: &str, columns: I, clauses: J) -> QbResult<Fragment>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = C>,
        C: Into<Clause>,
    {
        let clauses = clauses.into_iter().map(Into::into).collect();
        self.nested_select("UNION", table, column_text(columns), clauses)
    }

    /// ` UNION ALL SELECT ... ` fragment.
    pub fn union_all<I, S, J, C>(
        &mut self,
        table: &str,
        columns: I,
        clauses: J,
    ) -> QbResult<Fragment>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = C>,
        C: Into<Clause>,
    {
        let clauses = clauses.into_iter().map(Into::into).collect();
        self.nested_select("UNION ALL", table, column_text(columns), clauses)
    }

    // ==================== INSERT / REPLACE ====================

    fn values_body(
        &mut self,
        verb: &str,
        table: &str,
        pairs: Vec<(String, Value)>,
    ) -> QbResult<String> {
        let table = table_name(table)?;
        let ctx = RenderCtx {
            dialect: self.dialect.as_ref(),
            prepare: self.config.prepare,
        };
        let mut columns = Vec::with_capacity(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());
        for (column, value) in &pairs {
            columns.push(column.as_str());
            values.push(render_value(&ctx, value, &mut self.ctx.params));
        }
        Ok(format!(
            "{verb} INTO {table} ({}) VALUES ({})",
            columns.join(", "),
            values.join(", ")
        ))
    }

    /// `INSERT INTO <table> (<cols>) VALUES (<values>)`
    pub fn insert<I, K, V>(&mut self, table: &str, pairs: I) -> QbResult<Statement>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let pairs = collect_pairs(pairs);
        self.run(StatementKind::Insert, |qb| qb.values_body("INSERT", table, pairs?))
    }

    /// `REPLACE INTO <table> (<cols>) VALUES (<values>)`
    pub fn replace<I, K, V>(&mut self, table: &str, pairs: I) -> QbResult<Statement>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let pairs = collect_pairs(pairs);
        self.run(StatementKind::Replace, |qb| qb.values_body("REPLACE", table, pairs?))
    }

    // ==================== UPDATE / DELETE ====================

    /// `UPDATE <table> SET <col> = <value>, ...` followed by the supplied clauses.
    pub fn update<I, K, V, J, C>(
        &mut self,
        table: &str,
        pairs: I,
        clauses: J,
    ) -> QbResult<Statement>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
        J: IntoIterator<Item = C>,
        C: Into<Clause>,
    {
        let pairs = collect_pairs(pairs);
        let clauses: Vec<Clause> = clauses.into_iter().map(Into::into).collect();
        self.run(StatementKind::Update, |qb| {
            let table = table_name(table)?;
            let pairs = pairs?;
            let ctx = RenderCtx {
                dialect: qb.dialect.as_ref(),
                prepare: qb.config.prepare,
            };
            let sets: Vec<String> = pairs
                .iter()
                .map(|(column, value)| {
                    format!("{column} = {}", render_value(&ctx, value, &mut qb.ctx.params))
                })
                .collect();
            let suffix = qb.clause_suffix(clauses, &MUTATION_CLAUSES)?;
            Ok(format!("UPDATE {table} SET {}{suffix}", sets.join(", ")))
        })
    }

    /// `DELETE FROM <table>` followed by the supplied clauses.
    pub fn delete<J, C>(&mut self, table: &str, clauses: J) -> QbResult<Statement>
    where
        J: IntoIterator<Item = C>,
        C: Into<Clause>,
    {
        let clauses: Vec<Clause> = clauses.into_iter().map(Into::into).collect();
        self.run(StatementKind::Delete, |qb| {
            let table = table_name(table)?;
            let suffix = qb.clause_suffix(clauses, &MUTATION_CLAUSES)?;
            Ok(format!("DELETE FROM {table}{suffix}"))
        })
    }

    // ==================== Composite statements ====================

    /// `INSERT INTO <target> (<cols>) SELECT <source cols> FROM <source> ...`
    ///
    /// Both halves must succeed. When both column lists are explicit they must have
    /// the same length.
    pub fn insert_select<I, S, K, T, J, C>(
        &mut self,
        target: &str,
        columns: I,
        source: &str,
        source_columns: K,
        clauses: J,
    ) -> QbResult<Statement>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        K: IntoIterator<Item = T>,
        T: AsRef<str>,
        J: IntoIterator<Item = C>,
        C: Into<Clause>,
    {
        let target_columns: Vec<String> = columns
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        let selected: Vec<String> = source_columns
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        let source_columns = column_text(&selected);
        let clauses: Vec<Clause> = clauses.into_iter().map(Into::into).collect();

        self.run(StatementKind::InsertSelect, |qb| {
            let target = table_name(target)?;
            if !target_columns.is_empty() && source_columns != "*" {
                let selected = selected.len();
                if selected != target_columns.len() {
                    return Err(QbError::ColumnMismatch {
                        insert: target_columns.len(),
                        select: selected,
                    });
                }
            }
            let select = qb.select_body(source, source_columns, clauses)?;
            if target_columns.is_empty() {
                Ok(format!("INSERT INTO {target} {select}"))
            } else {
                Ok(format!(
                    "INSERT INTO {target} ({}) {select}",
                    target_columns.join(", ")
                ))
            }
        })
    }

    /// `CREATE TABLE <target> AS SELECT <cols> FROM <source> ...`
    pub fn create_select<I, S, J, C>(
        &mut self,
        target: &str,
        source: &str,
        columns: I,
        clauses: J,
    ) -> QbResult<Statement>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = C>,
        C: Into<Clause>,
    {
        let columns = column_text(columns);
        let clauses: Vec<Clause> = clauses.into_iter().map(Into::into).collect();
        self.run(StatementKind::CreateSelect, |qb| {
            let source = table_name(source)?.to_string();
            qb.ctx.pending_source = Some((source, SourceMode::CreateAs));
            qb.select_body(target, columns, clauses)
        })
    }

    /// `SELECT <cols> INTO <target> FROM <source> ...`
    pub fn select_into<I, S, J, C>(
        &mut self,
        target: &str,
        source: &str,
        columns: I,
        clauses: J,
    ) -> QbResult<Statement>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = C>,
        C: Into<Clause>,
    {
        let columns = column_text(columns);
        let clauses: Vec<Clause> = clauses.into_iter().map(Into::into).collect();
        self.run(StatementKind::SelectInto, |qb| {
            let source = table_name(source)?.to_string();
            qb.ctx.pending_source = Some((source, SourceMode::Into));
            qb.select_body(target, columns, clauses)
        })
    }

    // ==================== DDL ====================

    /// `CREATE TABLE IF NOT EXISTS <table> (<definitions>)`
    ///
    /// Definitions are usually produced by [`Schema`].
    pub fn create<I, S>(&mut self, table: &str, definitions: I) -> QbResult<Statement>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let defs = non_empty_list(definitions);
        self.run(StatementKind::Create, |_| {
            let table = table_name(table)?;
            let defs = defs.ok_or(QbError::EmptyArgument("column definitions"))?;
            Ok(format!("CREATE TABLE IF NOT EXISTS {table} ({defs})"))
        })
    }

    /// `ALTER TABLE <table> <action>, <action>...`
    pub fn alter<I, S>(&mut self, table: &str, actions: I) -> QbResult<Statement>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let actions = non_empty_list(actions);
        self.run(StatementKind::Alter, |_| {
            let table = table_name(table)?;
            let actions = actions.ok_or(QbError::EmptyArgument("alter actions"))?;
            Ok(format!("ALTER TABLE {table} {actions}"))
        })
    }

    /// `DROP TABLE IF EXISTS <table>`
    pub fn drop(&mut self, table: &str) -> QbResult<Statement> {
        self.run(StatementKind::Drop, |_| {
            Ok(format!("DROP TABLE IF EXISTS {}", table_name(table)?))
        })
    }
}

fn non_empty_list<I, S>(items: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items: Vec<String> = items
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    (!items.is_empty()).then(|| items.join(", "))
}
