// Copyright 2025 the Pageflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runnable demos for the Pageflow crates. See the `examples/` directory.
