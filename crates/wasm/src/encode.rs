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

//! Binary encoding of a compiled module through `wasm-encoder`.

use std::borrow::Cow;

use wasm_encoder::{
    CodeSection, ConstExpr, ElementSection, Elements, EntityType, ExportKind, ExportSection,
    FunctionSection, GlobalSection, GlobalType, ImportSection, MemorySection, MemoryType,
    Module as WasmModule, RefType, TableSection, TableType, TypeSection, ValType,
};

use crate::compiler::{CompiledModule, SIGNATURES};
use crate::layout::{HEAP_BASE, MEMORY_PAGES};

/// Assemble the binary module.
///
/// `module ::= type* import* func* table* mem* global* export* elem* code*`
pub fn encode(module: &CompiledModule) -> Vec<u8> {
    let mut types = TypeSection::new();
    for signature in SIGNATURES {
        let params = vec![ValType::I32; signature.params as usize];
        let results: Vec<ValType> = signature.result.then_some(ValType::I32).into_iter().collect();
        types.ty().function(params, results);
    }

    let mut imports = ImportSection::new();
    for import in &module.imports {
        imports.import(import.module, import.name, EntityType::Function(import.type_index));
    }

    let mut functions = FunctionSection::new();
    let mut code = CodeSection::new();
    let mut exports = ExportSection::new();
    exports.export("mem", ExportKind::Memory, 0);
    for (offset, func) in module.functions.iter().enumerate() {
        functions.function(func.type_index);
        code.function(&func.body.build());
        if let Some(name) = func.export {
            let index = (module.imports.len() + offset) as u32;
            exports.export(name, ExportKind::Func, index);
        }
    }

    let slots = module.table.len() as u64;
    let mut tables = TableSection::new();
    tables.table(TableType {
        element_type: RefType::FUNCREF,
        table64: false,
        minimum: slots,
        maximum: Some(slots),
        shared: false,
    });

    let mut memories = MemorySection::new();
    memories.memory(MemoryType {
        minimum: MEMORY_PAGES,
        maximum: None,
        memory64: false,
        shared: false,
        page_size_log2: None,
    });

    let mut globals = GlobalSection::new();
    globals.global(
        GlobalType {
            val_type: ValType::I32,
            mutable: true,
            shared: false,
        },
        &ConstExpr::i32_const(HEAP_BASE),
    );

    let mut elements = ElementSection::new();
    elements.active(
        Some(0),
        &ConstExpr::i32_const(0),
        Elements::Functions(Cow::Borrowed(&module.table)),
    );

    let mut wasm_module = WasmModule::new();
    wasm_module.section(&types);
    wasm_module.section(&imports);
    wasm_module.section(&functions);
    wasm_module.section(&tables);
    wasm_module.section(&memories);
    wasm_module.section(&globals);
    wasm_module.section(&exports);
    wasm_module.section(&elements);
    wasm_module.section(&code);
    wasm_module.finish()
}
