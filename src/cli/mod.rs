// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem for Polyframe Reduce

pub mod reporter;

pub use reporter::Reporter;

/// Install the global tracing subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let default = if verbose {
        "polyframe_reduce=debug"
    } else {
        "polyframe_reduce=info"
    };

    // ignore a subscriber installed by an embedding application
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
