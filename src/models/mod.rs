// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: colors, strokes and the interaction session.

pub mod color;
pub mod session;
pub mod sketch;
