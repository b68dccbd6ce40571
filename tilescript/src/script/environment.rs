//! The live script environment of one map source.
//!
//! A [`ScriptEnvironment`] is created once per source and lives as long as
//! the source does. It owns the engine, the compiled functions of the user
//! script and the top-level namespace the script populated when it ran.
//!
//! Two kinds of calls are supported:
//!
//! - [`ScriptEnvironment::call_fn`] runs a script function against a private
//!   copy of the load-time namespace. Calls never block each other.
//! - [`ScriptEnvironment::lock`] returns a [`Namespace`] guard over the shared
//!   namespace. Values bound through the guard stay visible to expressions
//!   evaluated through the same guard until it is dropped, so a bind followed
//!   by an evaluation is one critical section.
//!
//! In both cases script functions read load-time variables as
//! `global::NAME`; the top-level statements themselves run once, at load.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use rhai::{CallFnOptions, Dynamic, Engine, FuncArgs, Scope, AST};
use tracing::debug;

use super::error::ScriptError;
use super::preamble;
use crate::config::ScriptLimits;

/// Immutable script text, optionally remembering the file it came from.
#[derive(Debug, Clone)]
pub struct ScriptSource {
    text: Arc<str>,
    origin: Option<PathBuf>,
}

impl ScriptSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Arc::from(text.into()),
            origin: None,
        }
    }

    /// Reads a UTF-8 script file.
    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Ok(Self {
            text: Arc::from(text),
            origin: Some(path.to_path_buf()),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// File the script was read from, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

impl From<&str> for ScriptSource {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// An expression compiled against the script's functions.
///
/// Compile once, evaluate many times through [`Namespace::eval`].
#[derive(Debug, Clone)]
pub struct CompiledCall {
    expression: String,
    ast: AST,
}

impl CompiledCall {
    pub fn expression(&self) -> &str {
        &self.expression
    }
}

/// Signature of a function defined by the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub arity: usize,
}

/// Embedded evaluator state for one map source.
pub struct ScriptEnvironment {
    engine: Engine,
    functions: AST,
    calls: AST,
    snapshot: Scope<'static>,
    namespace: Mutex<Scope<'static>>,
}

impl ScriptEnvironment {
    /// Compiles and runs `source` after the host preamble.
    ///
    /// Any parse or evaluation error is fatal; there is no partially
    /// loaded environment.
    pub fn load(source: &ScriptSource, limits: &ScriptLimits) -> Result<Self, ScriptError> {
        let engine = preamble::build_engine(limits);

        let mut ast = engine.compile(source.text())?;
        if let Some(origin) = source.origin() {
            ast.set_source(origin.display().to_string());
        }

        let mut scope = Scope::new();
        engine.run_ast_with_scope(&mut scope, &ast)?;

        let functions = ast.clone_functions_only();
        let calls = globals_prelude(&engine, &scope)?.merge(&functions);
        debug!(
            origin = ?source.origin(),
            variables = scope.len(),
            functions = functions.iter_functions().count(),
            "Script environment loaded"
        );

        Ok(Self {
            engine,
            functions,
            calls,
            snapshot: scope.clone(),
            namespace: Mutex::new(scope),
        })
    }

    /// Reads a top-level variable.
    ///
    /// Absent names and variables holding `()` both read as `None`.
    pub fn get(&self, name: &str) -> Option<Dynamic> {
        self.lock().get(name)
    }

    /// Binds a host value into the shared namespace.
    pub fn bind<T: Clone + Send + Sync + 'static>(&self, name: &str, value: T) {
        self.lock().bind(name, value);
    }

    /// Compiles and evaluates an ad-hoc expression against the shared namespace.
    pub fn eval_call(&self, expression: &str) -> Result<Dynamic, ScriptError> {
        let call = self.compile_call(expression)?;
        self.lock().eval(&call)
    }

    /// Compiles an expression that may call functions defined by the script.
    pub fn compile_call(&self, expression: &str) -> Result<CompiledCall, ScriptError> {
        let statements = self.engine.compile(expression)?;
        Ok(CompiledCall {
            expression: expression.to_string(),
            ast: self.calls.merge(&statements),
        })
    }

    /// Calls a script function with typed arguments.
    ///
    /// Runs against a copy of the namespace as it stood after load, so
    /// concurrent callers never contend for the shared namespace.
    pub fn call_fn<T: Clone + Send + Sync + 'static>(
        &self,
        name: &str,
        args: impl FuncArgs,
    ) -> Result<T, ScriptError> {
        let mut scope = self.snapshot.clone();
        let options = CallFnOptions::new().eval_ast(true).rewind_scope(true);
        let value = self
            .engine
            .call_fn_with_options::<T>(options, &mut scope, &self.calls, name, args)?;
        Ok(value)
    }

    /// Returns true if the script defines `name` taking exactly `arity` parameters.
    pub fn has_function(&self, name: &str, arity: usize) -> bool {
        self.functions
            .iter_functions()
            .any(|f| f.name == name && f.params.len() == arity)
    }

    /// Functions the script defines, in declaration order.
    pub fn functions(&self) -> Vec<FunctionSignature> {
        self.functions
            .iter_functions()
            .map(|f| FunctionSignature {
                name: f.name.to_string(),
                arity: f.params.len(),
            })
            .collect()
    }

    /// Locks the shared namespace for a bind-then-evaluate sequence.
    pub fn lock(&self) -> Namespace<'_> {
        Namespace {
            engine: &self.engine,
            scope: self.namespace.lock(),
        }
    }
}

/// Re-declares every top-level variable as a constant.
///
/// Rhai functions cannot see the caller's scope; they read script globals
/// through `global::NAME`, which only holds constants declared by statements
/// of the AST being run. Prepending these declarations to every call makes
/// the load-time values readable that way without re-running the script.
fn globals_prelude(engine: &Engine, scope: &Scope) -> Result<AST, ScriptError> {
    let mut names: Vec<&str> = Vec::new();
    for (name, _, _) in scope.iter_raw() {
        if !names.contains(&name) {
            names.push(name);
        }
    }

    let text: String = names
        .iter()
        .map(|name| format!("const {0} = {0};\n", name))
        .collect();
    Ok(engine.compile(&text)?)
}

/// Exclusive access to an environment's shared namespace.
pub struct Namespace<'a> {
    engine: &'a Engine,
    scope: MutexGuard<'a, Scope<'static>>,
}

impl Namespace<'_> {
    pub fn get(&self, name: &str) -> Option<Dynamic> {
        self.scope
            .get_value::<Dynamic>(name)
            .filter(|value| !value.is_unit())
    }

    pub fn bind<T: Clone + Send + Sync + 'static>(&mut self, name: &str, value: T) {
        self.scope.set_or_push(name, value);
    }

    /// Evaluates `call`. Variables it declares do not outlive the evaluation.
    pub fn eval(&mut self, call: &CompiledCall) -> Result<Dynamic, ScriptError> {
        let mark = self.scope.len();
        let result = self
            .engine
            .eval_ast_with_scope::<Dynamic>(&mut *self.scope, &call.ast);
        self.scope.rewind(mark);
        Ok(result?)
    }

    /// Binds `name` for a single evaluation of `call`, then removes it.
    pub fn eval_with<T: Clone + Send + Sync + 'static>(
        &mut self,
        name: &str,
        value: T,
        call: &CompiledCall,
    ) -> Result<Dynamic, ScriptError> {
        let mark = self.scope.len();
        self.scope.push(name.to_string(), value);
        let result = self.eval(call);
        self.scope.rewind(mark);
        result
    }
}
