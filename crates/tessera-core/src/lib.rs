// Copyright 2025 the Tessera contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Tessera Core
//!
//! Foundational crate containing the backend-agnostic contracts of the
//! Tessera preview renderer: the math primitives used for bounds tracking and
//! the abstract interfaces through which the host application supplies GPU
//! resources, render-pass state, and scheduling callbacks.

#![warn(missing_docs)]

pub mod gpu;
pub mod math;

pub use gpu::api::EffectId;
pub use gpu::RenderDevice;
pub use math::Aabb;
