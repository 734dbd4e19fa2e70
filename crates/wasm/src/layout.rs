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

//! Heap layout shared by the code generator and anything that executes its output.
//!
//! Records are sequences of 32-bit words:
//!
//! ```text
//! closure: [size][tag=1][function index][capture count][capture 0]...
//! tuple:   [size][tag=0][element 0]...
//! ```

/// Initial value of the bump pointer. Nothing below it is ever allocated.
pub const HEAP_BASE: i32 = 0x100;
pub const MEMORY_PAGES: u64 = 2;
/// `log2` of the page size; addresses shifted right by it give page numbers.
pub const PAGE_SHIFT: u32 = 16;
pub const PAGE_SIZE: usize = 1 << PAGE_SHIFT;
pub const WORD: u32 = 4;

pub const TAG_TUPLE: i32 = 0;
pub const TAG_CLOSURE: i32 = 1;

/// Header words before a closure's captures.
pub const CLOSURE_HEADER_WORDS: u32 = 4;
/// Header words before a tuple's elements.
pub const TUPLE_HEADER_WORDS: u32 = 2;

pub const SIZE_OFFSET: u32 = 0;
pub const TAG_OFFSET: u32 = 4;
pub const CLOSURE_FN_OFFSET: u32 = 8;
pub const CLOSURE_COUNT_OFFSET: u32 = 12;
pub const CLOSURE_CAPTURES_OFFSET: u32 = 16;
pub const TUPLE_ELEMENTS_OFFSET: u32 = 8;

/// Byte offset of capture `index` in a closure record.
pub const fn capture_offset(index: u32) -> u32 {
    CLOSURE_CAPTURES_OFFSET + index * WORD
}

/// Byte offset of element `index` in a tuple record.
pub const fn element_offset(index: u32) -> u32 {
    TUPLE_ELEMENTS_OFFSET + index * WORD
}
