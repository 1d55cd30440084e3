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

//! Backend-agnostic rendering contracts.
//!
//! This module defines the common language between the Tessera geometry
//! caches and the host application's rendering pipeline. It contains the
//! abstract traits ([`RenderDevice`], [`RenderPassContext`], the host
//! collaborator traits in [`host`]), the opaque resource handles and
//! descriptors, and the error types. The "how" of every operation lives on
//! the host side; Tessera only ever holds ids.

pub mod api;
pub mod context;
pub mod device;
pub mod error;
pub mod host;

pub use self::api::*;
pub use self::context::{DisplayStyle, RenderPassContext, ViewKind};
pub use self::device::RenderDevice;
pub use self::error::ResourceError;
pub use self::host::{IdleDispatcher, RedrawHost, ServerId, UnitConverter, ViewServerRegistry};
