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

use super::*;

impl Machine<'_> {
    pub(super) fn op_local_get(&mut self, idx: u32) -> Result<(), MachineError> {
        let value = *self
            .frame()?
            .locals
            .get(idx as usize)
            .ok_or(MachineError::UnknownLocal(idx))?;
        self.push(value)
    }

    pub(super) fn op_local_set(&mut self, idx: u32) -> Result<(), MachineError> {
        let value = self.pop()?;
        let slot = self
            .frame()?
            .locals
            .get_mut(idx as usize)
            .ok_or(MachineError::UnknownLocal(idx))?;
        *slot = value;
        Ok(())
    }

    pub(super) fn op_local_tee(&mut self, idx: u32) -> Result<(), MachineError> {
        self.op_local_set(idx)?;
        self.op_local_get(idx)
    }

    pub(super) fn op_global_get(&mut self, idx: u32) -> Result<(), MachineError> {
        let value = *self
            .globals
            .get(idx as usize)
            .ok_or(MachineError::UnknownGlobal(idx))?;
        self.push(value)
    }

    pub(super) fn op_global_set(&mut self, idx: u32) -> Result<(), MachineError> {
        let value = self.pop()?;
        let slot = self
            .globals
            .get_mut(idx as usize)
            .ok_or(MachineError::UnknownGlobal(idx))?;
        *slot = value;
        Ok(())
    }

    /// Pops the right operand, then the left, and pushes `f(left, right)`.
    pub(super) fn op_binary(&mut self, f: impl Fn(i32, i32) -> i32) -> Result<(), MachineError> {
        let right = self.pop()?;
        let left = self.pop()?;
        self.push(f(left, right))
    }

    /// Byte range of the word at `base + offset`, if it lies in memory.
    fn word_at(&self, base: i32, offset: u32) -> Result<std::ops::Range<usize>, MachineError> {
        let address = u64::from(base as u32) + u64::from(offset);
        if address + 4 > self.memory.len() as u64 {
            return Err(MachineError::OutOfBounds { address });
        }
        let start = address as usize;
        Ok(start..start + 4)
    }

    pub(super) fn op_load(&mut self, offset: u32) -> Result<(), MachineError> {
        let base = self.pop()?;
        let range = self.word_at(base, offset)?;
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.memory[range]);
        self.push(i32::from_le_bytes(word))
    }

    pub(super) fn op_store(&mut self, offset: u32) -> Result<(), MachineError> {
        let value = self.pop()?;
        let base = self.pop()?;
        let range = self.word_at(base, offset)?;
        self.memory[range].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub(super) fn op_memory_size(&mut self) -> Result<(), MachineError> {
        self.push(self.memory_pages() as i32)
    }

    /// Grows memory by the popped page count and pushes the previous size, or
    /// -1 if the request is negative or exceeds [`MAX_MEMORY_PAGES`].
    pub(super) fn op_memory_grow(&mut self) -> Result<(), MachineError> {
        let delta = self.pop()?;
        let old = self.memory_pages();
        let grown = usize::try_from(delta)
            .ok()
            .and_then(|delta| old.checked_add(delta))
            .filter(|&pages| pages <= MAX_MEMORY_PAGES);
        match grown {
            Some(pages) => {
                self.memory.resize(pages * PAGE_SIZE, 0);
                self.push(old as i32)
            }
            None => self.push(-1),
        }
    }

    /// Pops a table slot and calls the function stored there after checking
    /// its signature.
    pub(super) fn op_call_indirect(&mut self, type_index: u32, host: &mut dyn Host) -> Result<(), MachineError> {
        let slot = self.pop()?;
        let func = usize::try_from(slot)
            .ok()
            .and_then(|slot| self.module.table.get(slot))
            .copied()
            .ok_or(MachineError::TableOutOfBounds(slot))?;
        let found = self
            .module
            .type_of_function(func)
            .ok_or(MachineError::UnknownFunction(func))?;
        if found != type_index {
            return Err(MachineError::SignatureMismatch {
                expected: type_index,
                found,
            });
        }
        self.call(func, host)
    }

    /// A true condition falls into the `then` arm; otherwise jump past the `else`.
    pub(super) fn op_if(&mut self) -> Result<(), MachineError> {
        let cond = self.pop()?;
        if cond == 0 {
            self.jump()?;
        }
        Ok(())
    }

    /// Reached only at the end of a `then` arm: skip the `else` arm.
    pub(super) fn op_else(&mut self) -> Result<(), MachineError> {
        self.jump()
    }

    /// Jump from the instruction just executed to its precomputed target.
    fn jump(&mut self) -> Result<(), MachineError> {
        let frame = self.call_stack.last_mut().ok_or(MachineError::NoFrame)?;
        let target = self.jumps[frame.defined]
            .get(frame.pc - 1)
            .copied()
            .flatten()
            .ok_or(MachineError::MalformedControl(frame.func))?;
        frame.pc = target;
        Ok(())
    }

    /// Leaves the current frame, checking it left exactly its result behind.
    pub(super) fn op_return(&mut self) -> Result<(), MachineError> {
        let frame = self.call_stack.pop().ok_or(MachineError::NoFrame)?;
        let expected = frame.stack_base + usize::from(frame.returns);
        if self.stack.len() != expected {
            return Err(MachineError::UnbalancedStack(frame.func));
        }
        Ok(())
    }
}
