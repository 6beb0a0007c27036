//! Grammar productions, split into value expressions and type expressions.

mod expr;
mod ty;
