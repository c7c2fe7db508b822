//! Combined constraint handed to a collection

use super::condition::Condition;
use super::expression::FilterExpression;

/// Boolean tree of filter expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Every key of the expression must match
    Match(FilterExpression),
    /// All children must match
    And(Vec<Constraint>),
    /// At least one child must match
    Or(Vec<Constraint>),
}

impl Constraint {
    /// Fold expressions with `condition`
    ///
    /// Returns `None` for an empty list. A single expression is returned as a
    /// bare [`Constraint::Match`].
    pub fn combine(condition: Condition, expressions: Vec<FilterExpression>) -> Option<Self> {
        let mut children: Vec<Constraint> =
            expressions.into_iter().map(Constraint::Match).collect();

        match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(match condition {
                Condition::And => Constraint::And(children),
                Condition::Or => Constraint::Or(children),
            }),
        }
    }

    /// Every expression in the tree, depth first
    pub fn expressions(&self) -> Vec<&FilterExpression> {
        let mut out = Vec::new();
        self.collect_expressions(&mut out);
        out
    }

    fn collect_expressions<'a>(&'a self, out: &mut Vec<&'a FilterExpression>) {
        match self {
            Constraint::Match(expr) => out.push(expr),
            Constraint::And(children) | Constraint::Or(children) => {
                for child in children {
                    child.collect_expressions(out);
                }
            }
        }
    }
}
