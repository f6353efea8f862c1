//! # Query Language - Abstract Syntax Tree
//!
//! This module defines the tree a query string is parsed into before it is
//! evaluated against a document.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[opcode]** - The closed set of operations a node can carry
//! - **[expressions]** - The expression node itself
//!
//! ## Quick Start
//!
//! ```text
//! max(orders.totals) - min(orders.totals)
//! ```
//!
//! This query looks up `orders`, descends into its nested `totals` field and
//! subtracts the smallest total from the largest.
//!
//! ## Core Concepts
//!
//! Every node is an [`Expression`]: an [`Opcode`], a literal whose meaning
//! depends on the opcode, and an ordered list of children.
//!
//! | Query        | Tree                                   |
//! |--------------|----------------------------------------|
//! | `a`          | `DEFAULT a`                            |
//! | `a.b.c`      | `GET a -> GET b -> DEFAULT c`          |
//! | `a[2]`       | `SUBSCRIPT 2 -> DEFAULT a`             |
//! | `size(a)`    | `SIZE -> DEFAULT a`                    |
//! | `1 + 2 * 3`  | `ADD -> (DEFAULT 1, MULT -> (2, 3))`   |
pub mod expressions;
pub mod opcode;
pub mod tokens;

pub use expressions::Expression;
pub use opcode::Opcode;
pub use tokens::Token;
