//! Depth-first flattening of condition trees.

use crate::condition::{Condition, ConditionTree, Expression, GroupMarker};
use crate::error::{QbError, QbResult};

/// A leaf surfaced by [`flatten`], annotated with the group boundaries it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatLeaf<'a> {
    pub condition: &'a Condition,
    /// Number of `(` emitted before the leaf
    pub opens: usize,
    /// Number of `)` emitted after the leaf
    pub closes: usize,
}

/// Flatten condition trees into an ordered leaf sequence.
///
/// Traversal is depth-first, left to right. Every [`ConditionTree::Group`] adds one
/// opening parenthesis to its first leaf and one closing parenthesis to its last leaf,
/// so nested groups stack. Explicit [`GroupMarker`]s on single conditions are folded
/// into the same counters.
///
/// A leaf with an empty column or an empty operator token fails the whole flatten;
/// nothing is skipped.
pub fn flatten(trees: &[ConditionTree]) -> QbResult<Vec<FlatLeaf<'_>>> {
    let mut out = Vec::new();
    for tree in trees {
        flatten_into(tree, &mut out)?;
    }
    Ok(out)
}

fn flatten_into<'a>(tree: &'a ConditionTree, out: &mut Vec<FlatLeaf<'a>>) -> QbResult<()> {
    match tree {
        ConditionTree::Leaf(condition) => {
            check_leaf(condition)?;
            let (opens, closes) = match condition.group_marker() {
                Some(GroupMarker::Open) => (1, 0),
                Some(GroupMarker::Close) => (0, 1),
                None => (0, 0),
            };
            out.push(FlatLeaf {
                condition,
                opens,
                closes,
            });
            Ok(())
        }
        ConditionTree::Group(children) => {
            let start = out.len();
            for child in children {
                flatten_into(child, out)?;
            }
            if out.len() == start {
                return Err(QbError::malformed("empty condition group"));
            }
            out[start].opens += 1;
            if let Some(last) = out.last_mut() {
                last.closes += 1;
            }
            Ok(())
        }
    }
}

fn check_leaf(condition: &Condition) -> QbResult<()> {
    let expr = condition.expression();
    if expr.column().trim().is_empty() {
        return Err(QbError::malformed("condition without a column"));
    }
    if let Expression::Tuple { operator, column, .. } = expr {
        if operator.trim().is_empty() {
            return Err(QbError::malformed(format!(
                "condition on '{column}' without an operator"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{eq, grouping, gt, like};

    #[test]
    fn flat_list_keeps_order() {
        let trees: Vec<ConditionTree> =
            vec![eq("a", 1).into(), eq("b", 2).into(), eq("c", 3).into()];
        let leaves = flatten(&trees).unwrap();
        let cols: Vec<&str> = leaves
            .iter()
            .map(|l| l.condition.expression().column())
            .collect();
        assert_eq!(cols, ["a", "b", "c"]);
        assert!(leaves.iter().all(|l| l.opens == 0 && l.closes == 0));
    }

    #[test]
    fn group_marks_first_and_last_leaf() {
        let trees: Vec<ConditionTree> = vec![
            eq("a", 1).into(),
            grouping([like("b", "x%").or(), gt("c", 3)]),
        ];
        let leaves = flatten(&trees).unwrap();
        assert_eq!(leaves.len(), 3);
        assert_eq!((leaves[1].opens, leaves[1].closes), (1, 0));
        assert_eq!((leaves[2].opens, leaves[2].closes), (0, 1));
    }

    #[test]
    fn nested_groups_stack_parentheses() {
        let trees: Vec<ConditionTree> = vec![grouping([grouping([eq("a", 1)]), eq("b", 2).into()])];
        let leaves = flatten(&trees).unwrap();
        assert_eq!((leaves[0].opens, leaves[0].closes), (2, 1));
        assert_eq!((leaves[1].opens, leaves[1].closes), (0, 1));
    }

    #[test]
    fn explicit_markers() {
        let trees: Vec<ConditionTree> = vec![
            eq("a", 1).open_group().or().into(),
            eq("b", 2).close_group().into(),
        ];
        let leaves = flatten(&trees).unwrap();
        assert_eq!(leaves[0].opens, 1);
        assert_eq!(leaves[1].closes, 1);
    }

    #[test]
    fn missing_operator_fails_whole_flatten() {
        let trees: Vec<ConditionTree> = vec![
            eq("a", 1).into(),
            Condition::from_parts("b", "", [2]).into(),
            eq("c", 3).into(),
        ];
        assert!(matches!(flatten(&trees), Err(QbError::MalformedCondition(_))));
    }

    #[test]
    fn empty_group_fails() {
        let trees: Vec<ConditionTree> = vec![ConditionTree::Group(Vec::new())];
        assert!(flatten(&trees).is_err());
    }
}
