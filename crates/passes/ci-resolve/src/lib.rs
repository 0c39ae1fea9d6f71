//! Name resolution for the Ci tree
//!
//! Binds every name reference in a [`Program`] to its declaration and turns
//! it into a [`ResolvedProgram`]. The pass runs in three phases:
//!
//! - **Base classes**: each class's base is looked up among top-level types
//!   and inheritance cycles are rejected
//! - **Lexical binding**: member types and initializers resolve in their type
//!   scope; method bodies get a parameter scope and one block scope per
//!   block, `for` statement, branch or loop body and switch clause. In
//!   `object.member` only `object` is lexical; the member is looked up in
//!   the class or enum that `object` names or is declared with
//! - **Switch checks**: `goto default` placement and fallthrough out of the
//!   last case
//!
//! Errors are collected rather than returned at the first one. On failure the
//! program comes back unchanged inside the [`ResolveFailure`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use ci_resolve::{ResolveOptions, resolve};
//!
//! match resolve(program, &ResolveOptions::default()) {
//!     Ok(resolved) => emit(&resolved),
//!     Err(failure) => report(&failure.errors),
//! }
//! ```

pub mod config;
pub mod error;
mod resolver;
mod validate;

pub use config::{ConfigError, ResolveOptions};
pub use error::{ResolveError, ResolveFailure};

use ci_tree::pretty_print::dump_program;
use ci_tree::{Program, ResolvedProgram};
use resolver::Resolver;
use tracing::{instrument, trace};

/// Resolves every reference in `program`
///
/// # Errors
///
/// Returns a [`ResolveFailure`] holding every error found, up to
/// [`ResolveOptions::max_errors`], together with the untouched program.
#[instrument(skip_all, fields(classes = program.classes().len(), enums = program.enums().len()))]
pub fn resolve(
    program: Program,
    options: &ResolveOptions,
) -> Result<ResolvedProgram, ResolveFailure> {
    let (bindings, errors) = Resolver::new(&program, options).run();
    if !errors.is_empty() {
        return Err(ResolveFailure {
            errors,
            program: Box::new(program),
        });
    }

    let resolved = program
        .into_resolved(bindings)
        .map_err(|unbound| ResolveFailure {
            errors: unbound.errors.into_iter().map(ResolveError::from).collect(),
            program: unbound.program,
        })?;
    trace!(tree = %dump_program(&resolved), "resolved tree");
    Ok(resolved)
}
