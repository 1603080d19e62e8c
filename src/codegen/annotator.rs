use crate::parser::{ExprKind, Expression};

/// Mark every node whose subtree references a variable.
///
/// Post-order: children are annotated before their parent. Returns the root's flag.
pub fn annotate(expr: &mut Expression) -> bool {
    let flag = match &mut expr.kind {
        ExprKind::Literal(_) => false,
        ExprKind::Variable(_) | ExprKind::IncDec { .. } => true,
        ExprKind::Assign { value, .. } => {
            annotate(value);
            true
        }
        ExprKind::Unary { operand, .. } => annotate(operand),
        ExprKind::Binary { left, right, .. } => {
            let left = annotate(left);
            let right = annotate(right);
            left || right
        }
    };
    expr.has_identifier = flag;
    flag
}
