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

use std::collections::HashMap;

use wasm_encoder::{Function, ValType};

use crate::instruction::Instr;
use crate::ir::Temp;

/// Context for compiling a single function body.
///
/// Because `wasm-encoder::Function` demands all local declarations at construction
/// time, this context buffers instructions and local declarations separately.
/// Every local is an `i32`; parameters occupy the first indices.
#[derive(Debug, Clone, Default)]
pub struct FunctionContext {
    /// Mapping of local names to their local indices
    locals: HashMap<String, u32>,
    /// Local names by index, parameters first
    names: Vec<String>,
    param_count: u32,
    /// Index of `t0`, when the function has a temp frame
    temp_base: u32,
    /// Index of `tmp`, the scratch local for records under construction
    scratch: u32,
    instructions: Vec<Instr>,
}

impl FunctionContext {
    /// Parameters are registered as locals at indices `0..params.len()`.
    pub fn new(params: &[&str]) -> Self {
        let mut ctx = Self::default();
        for name in params {
            ctx.declare_local(*name);
        }
        ctx.param_count = params.len() as u32;
        ctx
    }

    /// A function whose body addresses temps `t0..frame_size` plus the scratch local.
    pub fn with_frame(params: &[&str], frame_size: u32) -> Self {
        let mut ctx = Self::new(params);
        ctx.temp_base = ctx.names.len() as u32;
        for temp in 0..frame_size {
            ctx.declare_local(format!("t{temp}"));
        }
        ctx.scratch = ctx.declare_local("tmp");
        ctx
    }

    /// Declare a new local and return its index.
    /// If the name is already declared, returns the existing index.
    pub fn declare_local(&mut self, name: impl Into<String>) -> u32 {
        let name = name.into();
        if let Some(&existing_idx) = self.locals.get(&name) {
            return existing_idx;
        }
        let idx = self.names.len() as u32;
        self.locals.insert(name.clone(), idx);
        self.names.push(name);
        idx
    }

    pub fn local_name(&self, idx: u32) -> Option<&str> {
        self.names.get(idx as usize).map(String::as_str)
    }

    pub fn temp(&self, temp: Temp) -> u32 {
        self.temp_base + temp
    }

    pub fn scratch(&self) -> u32 {
        self.scratch
    }

    pub fn params(&self) -> &[String] {
        &self.names[..self.param_count as usize]
    }

    /// Declared locals that are not parameters.
    pub fn extra_locals(&self) -> &[String] {
        &self.names[self.param_count as usize..]
    }

    pub fn local_count(&self) -> u32 {
        self.names.len() as u32
    }

    /// Buffer an instruction.
    pub fn emit(&mut self, instr: Instr) {
        self.instructions.push(instr);
    }

    /// Instructions of the body, without the closing `end`.
    pub fn instructions(&self) -> &[Instr] {
        &self.instructions
    }

    /// Build the final `wasm_encoder::Function`, closing the body with `end`.
    pub fn build(&self) -> Function {
        let extra = self.extra_locals().len() as u32;
        let locals = (extra > 0).then_some((extra, ValType::I32));
        let mut func = Function::new(locals);
        for instr in &self.instructions {
            func.instruction(&instr.to_encoder());
        }
        func.instruction(&Instr::End.to_encoder());
        func
    }
}
