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

//! The host capability surface: the four operations generated code imports and
//! the interpreter's builtins call.

use std::time::Instant;

pub trait Host {
    fn print_int(&mut self, n: i32);
    fn print_bool(&mut self, b: bool);
    fn print_unit(&mut self);
    fn now_ms(&mut self) -> i32;
}

/// One observed host call, with its argument or result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    PrintInt(i32),
    PrintBool(bool),
    PrintUnit,
    NowMs(i32),
}

/// Records every call. The clock starts at a fixed value and ticks once per
/// `now_ms`, so two runs of the same program observe the same times.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    events: Vec<HostEvent>,
    clock: i32,
}

impl RecordingHost {
    pub const START_MS: i32 = 1_000;

    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            clock: Self::START_MS,
        }
    }

    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<HostEvent> {
        self.events
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for RecordingHost {
    fn print_int(&mut self, n: i32) {
        self.events.push(HostEvent::PrintInt(n));
    }

    fn print_bool(&mut self, b: bool) {
        self.events.push(HostEvent::PrintBool(b));
    }

    fn print_unit(&mut self) {
        self.events.push(HostEvent::PrintUnit);
    }

    fn now_ms(&mut self) -> i32 {
        let now = self.clock;
        self.clock = self.clock.wrapping_add(1);
        self.events.push(HostEvent::NowMs(now));
        now
    }
}

/// Prints one line per call to stdout. `now_ms` counts milliseconds since the
/// host was created, which keeps it within `i32`.
#[derive(Debug)]
pub struct StdoutHost {
    start: Instant,
}

impl StdoutHost {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for StdoutHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for StdoutHost {
    fn print_int(&mut self, n: i32) {
        println!("{n}");
    }

    fn print_bool(&mut self, b: bool) {
        println!("{b}");
    }

    fn print_unit(&mut self) {
        println!("()");
    }

    fn now_ms(&mut self) -> i32 {
        self.start.elapsed().as_millis() as i32
    }
}
