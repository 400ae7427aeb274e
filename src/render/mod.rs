// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Rendering of the sketch into pixel buffers.

pub mod raster;
