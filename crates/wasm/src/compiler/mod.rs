/*
 * Copyright (c) 2026. Mikhail Kulik.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! IR code generator.
//!
//! Lowers an [`IrModule`] into a [`CompiledModule`]: per-function instruction streams
//! plus the imports, function table and exports around them. The text and binary
//! back ends both render this one structure.
//!
//! Function index space:
//!
//! | index            | function                                   |
//! |------------------|--------------------------------------------|
//! | 0..4             | host imports, in [`BUILTINS`] order         |
//! | 4                | `$alloc`                                    |
//! | 5..9             | `$wrap_*`, builtins adapted to `(arg, env)` |
//! | 9..9+n           | lifted functions, in table-index order      |
//! | 9+n              | `main`                                      |
//!
//! Table slot `k` holds the function whose IR index is `k`, so a closure record
//! stores its IR index and `call_indirect` uses it unchanged.

mod control_flow;
mod data_access;
mod helpers;
mod literal;
mod op_dispatch;

use ast::BUILTINS;
use tracing::{debug, instrument};

use crate::functions::FunctionContext;
use crate::instruction::Instr;
use crate::ir::{Ir, IrFun, IrModule};

// ─── Signatures ──────────────────────────────────────────────────────────────

/// An all-`i32` function signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub params: u32,
    pub result: bool,
}

/// `(arg, env) -> result`: every closure, wrapper and `$alloc`.
pub const TYPE_FN: u32 = 0;
/// `(i32) -> ()`: `print_int`, `print_bool`.
pub const TYPE_PRINT: u32 = 1;
/// `() -> ()`: `print_unit`.
pub const TYPE_VOID: u32 = 2;
/// `() -> i32`: `now_ms` and `main`.
pub const TYPE_RESULT: u32 = 3;

pub const SIGNATURES: [Signature; 4] = [
    Signature { params: 2, result: true },
    Signature { params: 1, result: false },
    Signature { params: 0, result: false },
    Signature { params: 0, result: true },
];

const BUILTIN_TYPES: [u32; 4] = [TYPE_PRINT, TYPE_PRINT, TYPE_VOID, TYPE_RESULT];

pub const IMPORT_MODULE: &str = "host";
pub const ALLOC_FUNC: u32 = BUILTINS.len() as u32;
pub const FIRST_WRAPPER_FUNC: u32 = ALLOC_FUNC + 1;
pub const FIRST_LIFTED_FUNC: u32 = FIRST_WRAPPER_FUNC + BUILTINS.len() as u32;
/// The bump pointer is the only global.
pub const HEAP_POINTER_GLOBAL: u32 = 0;

// ─── Output ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub module: &'static str,
    pub name: &'static str,
    pub type_index: u32,
}

#[derive(Debug, Clone)]
pub struct CompiledFunction {
    /// Symbolic name, rendered as `$name` in text
    pub name: String,
    pub type_index: u32,
    pub export: Option<&'static str>,
    pub body: FunctionContext,
}

#[derive(Debug, Clone)]
pub struct CompiledModule {
    pub imports: Vec<Import>,
    /// Defined functions; the first one has index `imports.len()`
    pub functions: Vec<CompiledFunction>,
    /// Function indices, by table slot
    pub table: Vec<u32>,
    /// Function index of the exported entry point
    pub main: u32,
}

impl CompiledModule {
    pub fn function_count(&self) -> u32 {
        (self.imports.len() + self.functions.len()) as u32
    }

    /// The defined function at `index`, or `None` for imports and bad indices.
    pub fn defined(&self, index: u32) -> Option<&CompiledFunction> {
        let offset = (index as usize).checked_sub(self.imports.len())?;
        self.functions.get(offset)
    }

    pub fn import(&self, index: u32) -> Option<&Import> {
        self.imports.get(index as usize)
    }

    pub fn function_name(&self, index: u32) -> Option<&str> {
        match self.import(index) {
            Some(import) => Some(import.name),
            None => self.defined(index).map(|f| f.name.as_str()),
        }
    }

    pub fn type_of_function(&self, index: u32) -> Option<u32> {
        match self.import(index) {
            Some(import) => Some(import.type_index),
            None => self.defined(index).map(|f| f.type_index),
        }
    }

    pub fn instruction_count(&self) -> usize {
        self.functions
            .iter()
            .map(|f| f.body.instructions().len())
            .sum()
    }
}

/// Function index of the lifted function with IR index `fun`.
pub fn lifted_func_index(fun: u32) -> u32 {
    FIRST_LIFTED_FUNC + (fun - BUILTINS.len() as u32)
}

// ─── Compiler ────────────────────────────────────────────────────────────────

/// Compiles one IR module. Holds the function under construction in `ctx`, which
/// every lowering helper appends to.
#[derive(Debug, Default)]
pub struct Compiler {
    ctx: FunctionContext,
    functions: Vec<CompiledFunction>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile an entire module: runtime support first, then every lifted function
    /// in index order, then `main`.
    #[instrument(skip_all)]
    pub fn compile_module(mut self, module: &IrModule) -> CompiledModule {
        let imports = BUILTINS
            .iter()
            .zip(BUILTIN_TYPES)
            .map(|(name, type_index)| Import {
                module: IMPORT_MODULE,
                name: *name,
                type_index,
            })
            .collect();

        self.compile_alloc();
        self.compile_wrappers();

        let funs = module.funs_by_index();
        for fun in &funs {
            self.compile_fun(fun);
        }
        self.compile_main(module);

        let table = (0..BUILTINS.len() as u32)
            .map(|i| FIRST_WRAPPER_FUNC + i)
            .chain(funs.iter().map(|fun| lifted_func_index(fun.index)))
            .collect();
        let main = FIRST_WRAPPER_FUNC + BUILTINS.len() as u32 + funs.len() as u32;

        let compiled = CompiledModule {
            imports,
            functions: self.functions,
            table,
            main,
        };
        debug!(
            functions = compiled.function_count(),
            instructions = compiled.instruction_count(),
            "code generation finished"
        );
        compiled
    }

    fn begin_function(&mut self, ctx: FunctionContext) {
        self.ctx = ctx;
    }

    fn finish_function(&mut self, name: impl Into<String>, type_index: u32, export: Option<&'static str>) {
        let body = std::mem::take(&mut self.ctx);
        self.functions.push(CompiledFunction {
            name: name.into(),
            type_index,
            export,
            body,
        });
    }

    /// `(param $arg) (param $env)`: the argument and the closure being called,
    /// moved into the temps the IR assigned them.
    fn compile_fun(&mut self, fun: &IrFun) {
        self.begin_function(FunctionContext::with_frame(&["arg", "env"], fun.frame_size));
        self.emit(Instr::LocalGet(0));
        self.emit_set_temp(fun.param);
        self.emit(Instr::LocalGet(1));
        self.emit_set_temp(fun.env);
        self.compile_ir(&fun.body);
        self.finish_function(format!("f{}", fun.index), TYPE_FN, None);
    }

    /// The builtins' closure records go into temps `0..4` before the program runs.
    fn compile_main(&mut self, module: &IrModule) {
        self.begin_function(FunctionContext::with_frame(&[], module.temp_count));
        for slot in 0..BUILTINS.len() as u32 {
            let record = self.ctx.temp(slot);
            self.emit_closure_record(slot, &[], record);
        }
        self.compile_ir(&module.main);
        self.finish_function("main", TYPE_RESULT, Some("main"));
    }

    /// Compile an IR node, leaving its value on the operand stack.
    fn compile_ir(&mut self, ir: &Ir) {
        match ir {
            Ir::Int(n) => self.compile_int(*n),
            Ir::Bool(b) => self.compile_bool(*b),
            Ir::Unit => self.compile_unit(),
            Ir::Var(temp) => self.emit_get_temp(*temp),
            Ir::Let { temp, value, body } => self.compile_let(*temp, value, body),
            Ir::If {
                cond,
                then_branch,
                else_branch,
            } => self.compile_if(cond, then_branch, else_branch),
            Ir::Prim { op, left, right } => self.compile_prim(*op, left, right),
            Ir::MakeClosure { fun, captures } => self.compile_make_closure(*fun, captures),
            Ir::Call { closure, arg } => self.compile_call(*closure, *arg),
            Ir::Tuple(elts) => self.compile_tuple(elts),
            Ir::Proj { tuple, index } => self.compile_proj(*tuple, *index),
        }
    }
}
