//! Shadow-stack frame sizing.
//!
//! A second pass over each function body that sums the byte size of every
//! expression whose type cannot fit in a single Wasm value-slot. The result
//! is deliberately conservative: identifiers and member reads of aggregate
//! type count even though they reuse existing storage, so the emitter's
//! bump allocations can never exceed the reserved frame.

use mood_ast::nodes::{Definition, Expression};
use mood_type_checker::typed_context::TypedContext;
use rustc_hash::FxHashMap;

/// Function node-id → bytes reserved on the shadow stack for that function.
pub type StackSizes = FxHashMap<u32, u32>;

/// Computes the exact per-function frame size from the typed AST.
#[must_use = "the frame sizes drive prologue emission"]
pub fn compute_stack_sizes(ctx: &TypedContext) -> StackSizes {
    let mut sizes = StackSizes::default();
    let Some(program) = ctx.program() else {
        return sizes;
    };
    for definition in &program.definitions {
        if let Definition::Function(function) = definition {
            let mut total = 0u32;
            for expression in &function.body.expressions {
                total += expression_size(expression, ctx);
            }
            sizes.insert(function.id, total);
        }
    }
    sizes
}

/// Bytes this expression (including its subexpressions) may place on the
/// shadow stack. Primitive leaves contribute nothing; they live in Wasm
/// locals.
fn expression_size(expression: &Expression, ctx: &TypedContext) -> u32 {
    let own = match expression {
        Expression::Binary(_) | Expression::Block(_) => 0,
        Expression::Identifier(_)
        | Expression::Literal(_)
        | Expression::Call(_)
        | Expression::Path(_)
        | Expression::VariableDeclaration(_)
        | Expression::StructConstruction(_)
        | Expression::Member(_) => {
            let ty = ctx
                .get_node_typeinfo(expression.id())
                .expect("layout requires a fully populated type table");
            if ty.is_aggregate() { ty.size_of() } else { 0 }
        }
    };
    let children = match expression {
        Expression::Identifier(_) | Expression::Literal(_) => 0,
        Expression::Binary(binary) => {
            expression_size(&binary.left, ctx) + expression_size(&binary.right, ctx)
        }
        Expression::Call(call) => call
            .arguments
            .iter()
            .map(|argument| expression_size(argument, ctx))
            .sum(),
        Expression::Path(path) => path
            .arguments
            .iter()
            .flatten()
            .map(|argument| expression_size(argument, ctx))
            .sum(),
        Expression::Block(block) => block
            .expressions
            .iter()
            .map(|child| expression_size(child, ctx))
            .sum(),
        Expression::VariableDeclaration(declaration) => {
            expression_size(&declaration.value, ctx)
        }
        Expression::StructConstruction(construction) => construction
            .fields
            .iter()
            .map(|(_, value)| expression_size(value, ctx))
            .sum(),
        Expression::Member(member) => expression_size(&member.head, ctx),
    };
    own + children
}
