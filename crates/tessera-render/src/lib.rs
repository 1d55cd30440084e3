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

//! Incremental preview-geometry caching and rendering.
//!
//! This crate maintains per-object GPU geometry caches on top of a
//! host-provided [`RenderDevice`](tessera_core::gpu::RenderDevice). Geometry
//! arrives as double-precision tessellation packages, is chunked into
//! 16-bit-indexable staging buffers, and is drawn back through the host's
//! render callbacks. Object updates are coalesced and debounced so bursts of
//! model changes collapse into a single graphics rebuild and a single view
//! refresh.

#![warn(missing_docs)]

pub mod cache;
pub mod chain;
pub mod chunk;
pub mod debounce;
pub mod effects;
pub mod error;
pub mod package;
pub mod registry;
pub mod scheduler;
pub mod server;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::ObjectRenderCache;
pub use chain::BufferChain;
pub use chunk::{ChunkBuffer, MAX_CHUNK_VERTICES};
pub use error::GeometryError;
pub use package::{GeometryPackage, ObjectUpdate};
pub use registry::{ObjectId, RenderRegistry};
pub use scheduler::{SchedulerConfig, UpdateScheduler};
pub use server::PreviewServer;
