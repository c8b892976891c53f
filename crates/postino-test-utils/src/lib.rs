// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Postino workspace: a capturing outbound
//! channel, a scriptable publish sink, and stub intake adapters.

pub mod mock_channel;
pub mod mock_sink;
pub mod stubs;

pub use mock_channel::{MockOutbound, SentReply};
pub use mock_sink::{Emission, MockPublishSink};
pub use stubs::{StubCaption, StubFetcher, StubObjectStore, StubTranscriber, StubVision};
