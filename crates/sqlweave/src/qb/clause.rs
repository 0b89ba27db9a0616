//! WHERE / HAVING assembly.
//!
//! Flattened leaves are rendered one by one and joined by each leaf's combinator.
//! Values are either bound (a [`PLACEHOLDER`] is written and the value pushed to the
//! fragment's [`ParamList`]) or inlined as quoted literals escaped by the active
//! [`Dialect`].

use crate::condition::{CompareOp, ConditionTree, Expression};
use crate::error::{QbError, QbResult};
use crate::qb::flatten::{FlatLeaf, flatten};
use crate::qb::fragment::{Fragment, FragmentKind};
use crate::qb::param::ParamList;
use crate::value::Value;
use crate::vendor::{Dialect, PLACEHOLDER};

/// Keyword a condition clause is rendered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClauseKeyword {
    #[default]
    Where,
    Having,
}

impl ClauseKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClauseKeyword::Where => "WHERE",
            ClauseKeyword::Having => "HAVING",
        }
    }

    fn fragment_kind(&self) -> FragmentKind {
        match self {
            ClauseKeyword::Where => FragmentKind::Where,
            ClauseKeyword::Having => FragmentKind::Having,
        }
    }
}

/// How values reach the SQL text.
#[derive(Clone, Copy)]
pub(crate) struct RenderCtx<'a> {
    pub dialect: &'a dyn Dialect,
    /// Bind values as parameters instead of inlining escaped literals.
    pub prepare: bool,
}

impl RenderCtx<'_> {
    pub(crate) fn bind(&self, value: &Value, params: &mut ParamList) -> String {
        if self.prepare {
            params.push(value.clone());
            PLACEHOLDER.to_string()
        } else if matches!(value, Value::Null) {
            "NULL".to_string()
        } else {
            format!("'{}'", self.dialect.escape(&value.to_literal_text()))
        }
    }
}

/// Leaf shape after textual operators have been classified.
enum Shape<'e> {
    Compare(CompareOp, &'e Value),
    Like(&'e Value, bool),
    In(&'e [Value], bool),
    Between(&'e Value, &'e Value, bool),
    Null(bool),
}

fn single<'e>(column: &str, operator: &str, values: &'e [Value]) -> QbResult<&'e Value> {
    match values {
        [v] => Ok(v),
        _ => Err(QbError::malformed(format!(
            "'{column} {operator}' expects exactly one value, got {}",
            values.len()
        ))),
    }
}

fn classify_tuple<'e>(column: &str, operator: &str, values: &'e [Value]) -> QbResult<Shape<'e>> {
    let op = operator.trim().to_ascii_uppercase();
    let op = op.split_whitespace().collect::<Vec<_>>().join(" ");

    if let Some(cmp) = CompareOp::parse(&op) {
        return Ok(Shape::Compare(cmp, single(column, &op, values)?));
    }
    match op.as_str() {
        "LIKE" => Ok(Shape::Like(single(column, &op, values)?, false)),
        "NOT LIKE" => Ok(Shape::Like(single(column, &op, values)?, true)),
        "IN" => Ok(Shape::In(values, false)),
        "NOT IN" => Ok(Shape::In(values, true)),
        "BETWEEN" | "NOT BETWEEN" => match values {
            [low, high] => Ok(Shape::Between(low, high, op == "NOT BETWEEN")),
            _ => Err(QbError::malformed(format!(
                "'{column} {op}' expects two bounds, got {}",
                values.len()
            ))),
        },
        "IS" | "IS NOT" => match values {
            [] => Ok(Shape::Null(op == "IS NOT")),
            [v] if v.is_null_token() => Ok(Shape::Null(op == "IS NOT")),
            _ => Err(QbError::malformed(format!(
                "'{column} {op}' only accepts NULL"
            ))),
        },
        _ => Err(QbError::UnsupportedOperator(operator.trim().to_string())),
    }
}

fn shape(expr: &Expression) -> QbResult<Shape<'_>> {
    let shape = match expr {
        Expression::Comparison { op, value, .. } => Shape::Compare(*op, value),
        Expression::Pattern {
            pattern, negated, ..
        } => Shape::Like(pattern, *negated),
        Expression::SetMembership {
            values, negated, ..
        } => Shape::In(values, *negated),
        Expression::Range {
            low, high, negated, ..
        } => Shape::Between(low, high, *negated),
        Expression::Nullness { negated, .. } => Shape::Null(*negated),
        Expression::Tuple {
            column,
            operator,
            values,
        } => classify_tuple(column, operator, values)?,
    };

    // Only equality and inequality have a NULL form.
    match shape {
        Shape::Compare(op, v) if v.is_null_token() => match op {
            CompareOp::Eq => Ok(Shape::Null(false)),
            op if op.is_negative() => Ok(Shape::Null(true)),
            op => Err(QbError::malformed(format!(
                "'{} {op}' cannot compare against NULL",
                expr.column().trim()
            ))),
        },
        Shape::Like(v, _) if v.is_null_token() => Err(QbError::malformed(format!(
            "'{}' cannot match a pattern against NULL",
            expr.column().trim()
        ))),
        other => Ok(other),
    }
}

fn render_leaf(expr: &Expression, ctx: &RenderCtx<'_>, params: &mut ParamList) -> QbResult<String> {
    let column = expr.column().trim();
    match shape(expr)? {
        Shape::Compare(op, value) => Ok(format!("{column} {op} {}", ctx.bind(value, params))),
        Shape::Like(pattern, negated) => {
            let text = pattern.to_literal_text();
            if !(text.contains('%') || text.contains('_') || text.contains(PLACEHOLDER)) {
                return Err(QbError::MissingWildcard(text));
            }
            let kw = if negated { "NOT LIKE" } else { "LIKE" };
            Ok(format!("{column} {kw} {}", ctx.bind(pattern, params)))
        }
        Shape::In(values, negated) => {
            if values.is_empty() {
                // Empty IN matches nothing; empty NOT IN matches everything
                return Ok(if negated { "1=1" } else { "1=0" }.to_string());
            }
            let list: Vec<String> = values.iter().map(|v| ctx.bind(v, params)).collect();
            let kw = if negated { "NOT IN" } else { "IN" };
            Ok(format!("{column} {kw} ({})", list.join(", ")))
        }
        Shape::Between(low, high, negated) => {
            let kw = if negated { "NOT BETWEEN" } else { "BETWEEN" };
            let low = ctx.bind(low, params);
            let high = ctx.bind(high, params);
            Ok(format!("{column} {kw} {low} AND {high}"))
        }
        Shape::Null(negated) => {
            let kw = if negated { "IS NOT NULL" } else { "IS NULL" };
            Ok(format!("{column} {kw}"))
        }
    }
}

/// Render flattened leaves into a clause body (without the keyword).
///
/// Parameters are appended to `params` in textual placeholder order. The trailing
/// combinator of the last leaf is never emitted.
pub(crate) fn assemble(
    leaves: &[FlatLeaf<'_>],
    ctx: &RenderCtx<'_>,
    params: &mut ParamList,
) -> QbResult<String> {
    let mut sql = String::new();
    for (i, leaf) in leaves.iter().enumerate() {
        if i > 0 {
            sql.push(' ');
            sql.push_str(leaves[i - 1].condition.combinator().as_str());
            sql.push(' ');
        }
        sql.push_str(&"(".repeat(leaf.opens));
        sql.push_str(&render_leaf(leaf.condition.expression(), ctx, params)?);
        sql.push_str(&")".repeat(leaf.closes));
    }
    Ok(sql)
}

/// Build a ` WHERE ... ` or ` HAVING ... ` fragment from condition trees.
///
/// On failure nothing is kept: the parameters collected so far are discarded with
/// the partial text.
pub(crate) fn build_clause(
    keyword: ClauseKeyword,
    trees: &[ConditionTree],
    ctx: &RenderCtx<'_>,
) -> QbResult<Fragment> {
    if trees.is_empty() {
        return Err(QbError::EmptyArgument("conditions"));
    }
    let leaves = flatten(trees)?;
    let mut params = ParamList::new();
    let body = assemble(&leaves, ctx, &mut params)?;
    Ok(Fragment::new(
        keyword.fragment_kind(),
        format!(" {} {body} ", keyword.as_str()),
        params,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{
        Condition, between, eq, grouping, gt, in_list, is_not_null, like, lt, ne, neq,
        not_between, not_in,
    };
    use crate::vendor::Vendor;

    fn escaped() -> RenderCtx<'static> {
        RenderCtx {
            dialect: &Vendor::PostgreSql,
            prepare: false,
        }
    }

    fn prepared() -> RenderCtx<'static> {
        RenderCtx {
            dialect: &Vendor::PostgreSql,
            prepare: true,
        }
    }

    fn build(trees: Vec<ConditionTree>, ctx: RenderCtx<'_>) -> QbResult<Fragment> {
        build_clause(ClauseKeyword::Where, &trees, &ctx)
    }

    #[test]
    fn escaped_equality() {
        let f = build(vec![eq("id", 5).into()], escaped()).unwrap();
        assert_eq!(f.as_str(), " WHERE id = '5' ");
        assert!(f.params().is_empty());
    }

    #[test]
    fn prepared_equality() {
        let f = build(vec![eq("id", 5).into()], prepared()).unwrap();
        assert_eq!(f.as_str(), format!(" WHERE id = {PLACEHOLDER} "));
        assert_eq!(f.params().as_slice(), &[Value::Int(5)]);
    }

    #[test]
    fn escaping_uses_dialect() {
        let f = build(vec![eq("name", "O'Brien").into()], escaped()).unwrap();
        assert_eq!(f.as_str(), " WHERE name = 'O''Brien' ");
    }

    #[test]
    fn in_list_binds_every_value() {
        let f = build(vec![in_list("col", ["v1", "v2", "v3"]).into()], prepared()).unwrap();
        assert_eq!(
            f.as_str(),
            format!(" WHERE col IN ({PLACEHOLDER}, {PLACEHOLDER}, {PLACEHOLDER}) ")
        );
        assert_eq!(f.params().len(), 3);
        assert_eq!(f.params().as_slice()[0], Value::text("v1"));
    }

    #[test]
    fn empty_in_lists() {
        let empty: [i32; 0] = [];
        let f = build(vec![in_list("col", empty).into()], prepared()).unwrap();
        assert_eq!(f.as_str(), " WHERE 1=0 ");
        let f = build(vec![not_in("col", empty).into()], prepared()).unwrap();
        assert_eq!(f.as_str(), " WHERE 1=1 ");
        assert!(f.params().is_empty());
    }

    #[test]
    fn between_binds_two_values() {
        let f = build(vec![between("age", 18, 30).into()], prepared()).unwrap();
        assert_eq!(
            f.as_str(),
            format!(" WHERE age BETWEEN {PLACEHOLDER} AND {PLACEHOLDER} ")
        );
        assert_eq!(f.params().as_slice(), &[Value::Int(18), Value::Int(30)]);
    }

    #[test]
    fn null_values_become_is_null() {
        let f = build(
            vec![eq("deleted_at", "NULL").into(), neq("email", Value::Null).into()],
            prepared(),
        )
        .unwrap();
        assert_eq!(f.as_str(), " WHERE deleted_at IS NULL AND email IS NOT NULL ");
        assert!(f.params().is_empty());

        let f = build(vec![is_not_null("x").into()], escaped()).unwrap();
        assert_eq!(f.as_str(), " WHERE x IS NOT NULL ");
    }

    #[test]
    fn ordering_and_patterns_reject_null() {
        let err = build(vec![lt("a", Value::Null).into()], prepared()).unwrap_err();
        assert!(matches!(err, QbError::MalformedCondition(_)));

        let err = build(vec![like("a", "null").into()], escaped()).unwrap_err();
        assert!(matches!(err, QbError::MalformedCondition(_)));

        let tuple = Condition::from_parts("a", ">=", ["NULL"]);
        let err = build(vec![tuple.into()], escaped());
        assert!(matches!(err, Err(QbError::MalformedCondition(_))));
    }

    #[test]
    fn escaped_null_is_unquoted() {
        let f = build(vec![in_list("a", [Value::Null, 1.into()]).into()], escaped()).unwrap();
        assert_eq!(f.as_str(), " WHERE a IN (NULL, '1') ");

        let f = build(vec![in_list("a", [Value::Null, 1.into()]).into()], prepared()).unwrap();
        assert_eq!(f.params().as_slice(), &[Value::Null, Value::Int(1)]);
    }

    #[test]
    fn range_carries_following_combinator() {
        let f = build(
            vec![
                between("n", 1, 5).or().into(),
                eq("m", 2).into(),
                not_between("k", 0, 9).and_not().into(),
                eq("j", 3).into(),
            ],
            escaped(),
        )
        .unwrap();
        assert_eq!(
            f.as_str(),
            " WHERE n BETWEEN '1' AND '5' OR m = '2' \
             AND k NOT BETWEEN '0' AND '9' AND NOT j = '3' "
        );
    }

    #[test]
    fn like_requires_wildcard() {
        let err = build(vec![like("col", "novalidpattern").into()], escaped()).unwrap_err();
        assert!(matches!(err, QbError::MissingWildcard(_)));
        assert!(err.is_soft());

        let f = build(vec![like("col", "ab_").into()], escaped()).unwrap();
        assert_eq!(f.as_str(), " WHERE col LIKE 'ab_' ");
    }

    #[test]
    fn combinators_and_groups() {
        let f = build(
            vec![
                eq("status", "active").into(),
                grouping([like("name", "a%").or(), gt("age", 30)]),
            ],
            escaped(),
        )
        .unwrap();
        assert_eq!(
            f.as_str(),
            " WHERE status = 'active' AND (name LIKE 'a%' OR age > '30') "
        );
    }

    #[test]
    fn trailing_combinator_is_dropped() {
        let f = build(vec![eq("a", 1).or().into()], escaped()).unwrap();
        assert_eq!(f.as_str(), " WHERE a = '1' ");
    }

    #[test]
    fn tuple_operators_are_classified() {
        let f = build(
            vec![
                Condition::from_parts("a", "not in", [1, 2]).into(),
                Condition::from_parts("b", ">=", [3]).into(),
                Condition::from_parts("c", "between", [4, 5]).into(),
                Condition::from_parts("d", "IS NOT", Vec::<Value>::new()).into(),
            ],
            escaped(),
        )
        .unwrap();
        assert_eq!(
            f.as_str(),
            " WHERE a NOT IN ('1', '2') AND b >= '3' AND c BETWEEN '4' AND '5' AND d IS NOT NULL "
        );
    }

    #[test]
    fn unknown_operator_fails() {
        let err = build(vec![Condition::from_parts("a", "~~", [1]).into()], escaped()).unwrap_err();
        assert!(matches!(err, QbError::UnsupportedOperator(op) if op == "~~"));
    }

    #[test]
    fn wrong_arity_fails() {
        let err = build(vec![Condition::from_parts("a", "BETWEEN", [1]).into()], escaped());
        assert!(matches!(err, Err(QbError::MalformedCondition(_))));
        let err = build(vec![Condition::from_parts("a", "=", [1, 2]).into()], escaped());
        assert!(matches!(err, Err(QbError::MalformedCondition(_))));
    }

    #[test]
    fn having_keyword() {
        let trees: Vec<ConditionTree> = vec![ne("total", 0).into()];
        let f = build_clause(ClauseKeyword::Having, &trees, &escaped()).unwrap();
        assert_eq!(f.kind(), FragmentKind::Having);
        assert_eq!(f.as_str(), " HAVING total != '0' ");
    }

    #[test]
    fn empty_input_fails() {
        assert!(matches!(
            build(Vec::new(), escaped()),
            Err(QbError::EmptyArgument(_))
        ));
    }
}
