// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Camera capture, image export and settings files.

pub mod camera;
pub mod export;
pub mod settings;
