// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits for every external seam of the pipeline.

pub mod caption;
pub mod channel;
pub mod media;
pub mod sink;
pub mod speech;
pub mod store;

pub use caption::CaptionGenerator;
pub use channel::{OutboundChannel, MAX_BUTTONS};
pub use media::{MediaFetcher, ObjectStore, VisionAnalyzer};
pub use sink::PublishSink;
pub use speech::SpeechTranscriber;
pub use store::SessionStore;
